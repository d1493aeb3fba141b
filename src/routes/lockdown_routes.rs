use crate::models::{LockdownData, ServiceError};
use crate::utils::claims_from_request;
use crate::utils::lockdown::{LockdownScope, LOCKDOWN};
use crate::utils::policy::{authorize, Action};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use log::{error, info};

fn parse_scope(value: &str) -> Result<LockdownScope, ServiceError> {
    LockdownScope::parse(value).ok_or_else(|| {
        error!("❌ Unknown lockdown type: {}", value);
        ServiceError::BadRequest(format!("Unknown lockdown type: {}", value))
    })
}

// Current lockdown flags
#[get("/lockdown")]
async fn get_lockdown(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Read)?;

    let flags = LOCKDOWN.snapshot()?;

    Ok(HttpResponse::Ok().json(flags))
}

// Engage a lockdown flag (admin only); optional body carries a banner message
#[post("/lockdown/{type}")]
async fn engage_lockdown(
    req: HttpRequest,
    path: web::Path<String>,
    data: Option<web::Json<LockdownData>>,
) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageLockdown)?;
    let scope = parse_scope(&path.into_inner())?;

    info!("🔒 Admin: {} engaging lockdown: {}", claims.sub, scope.as_str());

    let message = data.and_then(|body| body.into_inner().message);
    LOCKDOWN.set(scope, true, message)?;

    Ok(HttpResponse::NoContent().finish())
}

// Lift a lockdown flag (admin only)
#[delete("/lockdown/{type}")]
async fn lift_lockdown(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageLockdown)?;
    let scope = parse_scope(&path.into_inner())?;

    info!("🔓 Admin: {} lifting lockdown: {}", claims.sub, scope.as_str());

    LOCKDOWN.set(scope, false, None)?;

    Ok(HttpResponse::NoContent().finish())
}

// Register all lockdown routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_lockdown)
        .service(engage_lockdown)
        .service(lift_lockdown);
}
