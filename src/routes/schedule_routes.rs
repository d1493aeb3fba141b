use crate::models::{ActiveData, Event, EventData, ServiceError, Shift, ShiftData, Team, TeamData};
use crate::services::signup_service;
use crate::utils::policy::{authorize, Action};
use crate::utils::{claims_from_request, schedule_storage};
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use uuid::Uuid;

// Create a new event
#[post("/events")]
async fn create_event(req: HttpRequest, data: web::Json<EventData>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageSchedule)?;

    info!("📝 Creating new event: {} by admin: {}", data.name, claims.sub);

    let event = Event {
        id: Uuid::new_v4().to_string(),
        name: data.name.clone(),
        active: true,
        created_at: Utc::now(),
    };

    schedule_storage::save_event(&event)?;

    info!("✅ Event created successfully: {}", event.id);

    Ok(HttpResponse::Ok().json(event))
}

// List all events
#[get("/events")]
async fn list_events(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Read)?;

    let events = schedule_storage::list_events()?;

    info!("✅ Found {} events", events.len());

    Ok(HttpResponse::Ok().json(events))
}

// Activate or deactivate an event
#[put("/events/{event_id}/active")]
async fn set_event_active(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ActiveData>,
) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageSchedule)?;
    let event_id = path.into_inner();

    info!("🔄 Setting event: {} active={}", event_id, data.active);

    let event = schedule_storage::set_event_active(&event_id, data.active)?;

    Ok(HttpResponse::Ok().json(event))
}

// Create a team within an event
#[post("/events/{event_id}/teams")]
async fn create_team(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageSchedule)?;
    let event_id = path.into_inner();

    if schedule_storage::find_event_by_id(&event_id)?.is_none() {
        error!("❌ Event not found: {}", event_id);
        return Err(ServiceError::NotFound);
    }

    info!("📝 Creating new team: {} in event: {}", data.name, event_id);

    let team = Team {
        id: Uuid::new_v4().to_string(),
        event_id,
        name: data.name.clone(),
        active: true,
        created_at: Utc::now(),
    };

    schedule_storage::save_team(&team)?;

    info!("✅ Team created successfully: {}", team.id);

    Ok(HttpResponse::Ok().json(team))
}

// List teams for an event
#[get("/events/{event_id}/teams")]
async fn list_teams(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Read)?;
    let event_id = path.into_inner();

    if schedule_storage::find_event_by_id(&event_id)?.is_none() {
        error!("❌ Event not found: {}", event_id);
        return Err(ServiceError::NotFound);
    }

    let teams = schedule_storage::list_teams_for_event(&event_id)?;

    Ok(HttpResponse::Ok().json(teams))
}

// Activate or deactivate a team
#[put("/teams/{team_id}/active")]
async fn set_team_active(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ActiveData>,
) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageSchedule)?;
    let team_id = path.into_inner();

    info!("🔄 Setting team: {} active={}", team_id, data.active);

    let team = schedule_storage::set_team_active(&team_id, data.active)?;

    Ok(HttpResponse::Ok().json(team))
}

// Create a shift on a team
#[post("/teams/{team_id}/shifts")]
async fn create_shift(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ShiftData>,
) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::ManageSchedule)?;
    let team_id = path.into_inner();

    if schedule_storage::find_team_by_id(&team_id)?.is_none() {
        error!("❌ Team not found: {}", team_id);
        return Err(ServiceError::NotFound);
    }

    if data.ends_at <= data.starts_at {
        return Err(ServiceError::BadRequest(
            "Shift must end after it starts".to_string(),
        ));
    }

    info!(
        "📝 Creating shift: {} on team: {} (capacity {})",
        data.name, team_id, data.capacity
    );

    let shift = Shift {
        id: Uuid::new_v4().to_string(),
        team_id,
        name: data.name.clone(),
        starts_at: data.starts_at,
        ends_at: data.ends_at,
        capacity: data.capacity,
        created_at: Utc::now(),
    };

    schedule_storage::save_shift(&shift)?;

    info!("✅ Shift created successfully: {}", shift.id);

    Ok(HttpResponse::Ok().json(shift))
}

// List shifts for a team, with current assigned counts
#[get("/teams/{team_id}/shifts")]
async fn list_shifts(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Read)?;
    let team_id = path.into_inner();

    if schedule_storage::find_team_by_id(&team_id)?.is_none() {
        error!("❌ Team not found: {}", team_id);
        return Err(ServiceError::NotFound);
    }

    let shifts = schedule_storage::list_shifts_for_team(&team_id)?;

    let mut listed = Vec::new();
    for shift in shifts {
        let assigned = signup_service::ASSIGNMENTS.count_for_shift(&shift.id)?;
        listed.push(json!({
            "shift": shift,
            "assigned_count": assigned,
        }));
    }

    Ok(HttpResponse::Ok().json(listed))
}

// Get a single shift with its current assigned count
#[get("/shifts/{shift_id}")]
async fn get_shift(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;
    authorize(&claims, Action::Read)?;
    let shift_id = path.into_inner();

    let shift = match schedule_storage::find_shift_by_id(&shift_id)? {
        Some(shift) => shift,
        None => {
            error!("❌ Shift not found: {}", shift_id);
            return Err(ServiceError::NotFound);
        }
    };

    let assigned = signup_service::ASSIGNMENTS.count_for_shift(&shift.id)?;

    Ok(HttpResponse::Ok().json(json!({
        "shift": shift,
        "assigned_count": assigned,
    })))
}

// Register all schedule routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_event)
        .service(list_events)
        .service(set_event_active)
        .service(create_team)
        .service(list_teams)
        .service(set_team_active)
        .service(create_shift)
        .service(list_shifts)
        .service(get_shift);
}
