use crate::models::ServiceError;
use crate::services::signup_service;
use crate::utils::policy::{authorize, Action};
use crate::utils::{claims_from_request, schedule_storage};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Sign the caller up for a shift
#[post("/shifts/{shift_id}/signup")]
async fn signup_for_shift(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Signup)?;
    let shift_id = path.into_inner();

    info!("📝 Signup request from user: {} for shift: {}", claims.sub, shift_id);

    signup_service::signup(&claims.sub, &shift_id)?;

    Ok(HttpResponse::NoContent().finish())
}

// Cancel the caller's signup for a shift
#[delete("/shifts/{shift_id}/signup")]
async fn cancel_signup(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Signup)?;
    let shift_id = path.into_inner();

    info!("🗑️ Cancel request from user: {} for shift: {}", claims.sub, shift_id);

    signup_service::cancel(&claims.sub, &shift_id)?;

    Ok(HttpResponse::NoContent().finish())
}

// List the caller's committed assignments
#[get("/assignments/mine")]
async fn my_assignments(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Read)?;

    let assignments = signup_service::ASSIGNMENTS.for_user(&claims.sub)?;

    info!("✅ Found {} assignments for user: {}", assignments.len(), claims.sub);

    Ok(HttpResponse::Ok().json(assignments))
}

// Roster listing for a shift (admin only)
#[get("/shifts/{shift_id}/volunteers")]
async fn shift_volunteers(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ViewRoster)?;
    let shift_id = path.into_inner();

    if schedule_storage::find_shift_by_id(&shift_id)?.is_none() {
        error!("❌ Shift not found: {}", shift_id);
        return Err(ServiceError::NotFound);
    }

    let assignments = signup_service::ASSIGNMENTS.for_shift(&shift_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "shift_id": shift_id,
        "assigned_count": assignments.len(),
        "assignments": assignments,
    })))
}

// Register all signup routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup_for_shift)
        .service(cancel_signup)
        .service(my_assignments)
        .service(shift_volunteers);
}
