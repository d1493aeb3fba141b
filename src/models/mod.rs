// marshal-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

// User models for authentication
#[derive(Serialize, Deserialize, Debug)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub is_admin: bool,
}

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub email: String,
    pub is_admin: bool,
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued at
}

// Scheduling models
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub active: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub active: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

// A scheduled volunteer slot: half-open interval [starts_at, ends_at).
// Times are immutable after creation; there is no edit endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Shift {
    pub id: String,
    pub team_id: String,
    pub name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub ends_at: DateTime<Utc>,
    pub capacity: u32,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

// A committed signup. The shift's interval is copied in at commit time so
// the overlap scan never has to touch shift storage while holding the
// registry guard.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Assignment {
    pub id: String,
    pub user_id: String,
    pub shift_id: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub ends_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

// Request bodies
#[derive(Serialize, Deserialize, Debug)]
pub struct EventData {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TeamData {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ShiftData {
    pub name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub ends_at: DateTime<Utc>,
    pub capacity: u32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ActiveData {
    pub active: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LockdownData {
    pub message: Option<String>,
}

// Lockdown flags: the site-wide flag takes precedence over every
// per-subsystem flag. Absent flags read as false.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LockdownFlags {
    pub site: bool,
    pub tickets: bool,
    pub grants: bool,
    pub volunteers: bool,
    pub message: Option<String>,
}

// Custom error types
#[derive(Debug)]
pub enum ServiceError {
    InternalServerError,
    BadRequest(String),
    Unauthorized,
    NotFound,
    Forbidden(String),
    CapacityExceeded,
    OverlapConflict,
    NoAssignment,
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
            ServiceError::BadRequest(msg) => write!(f, "BadRequest: {}", msg),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::Forbidden(reason) => write!(f, "Forbidden: {}", reason),
            ServiceError::CapacityExceeded => write!(f, "Shift is at capacity"),
            ServiceError::OverlapConflict => write!(f, "Assignment overlaps an existing shift"),
            ServiceError::NoAssignment => write!(f, "No existing assignment for this shift"),
        }
    }
}

// Implement std::error::Error for ServiceError
impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError =>
                HttpResponse::InternalServerError().json("Internal Server Error"),
            ServiceError::BadRequest(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::Unauthorized =>
                HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound =>
                HttpResponse::NotFound().json("Not Found"),
            ServiceError::Forbidden(ref reason) =>
                HttpResponse::Forbidden().json(json!({
                    "error": "forbidden",
                    "reason": reason,
                })),
            ServiceError::CapacityExceeded =>
                HttpResponse::UnprocessableEntity().json(json!({
                    "errors": ["shift is at capacity"],
                })),
            ServiceError::OverlapConflict =>
                HttpResponse::UnprocessableEntity().json(json!({
                    "errors": ["assignment overlaps an existing shift"],
                })),
            ServiceError::NoAssignment =>
                HttpResponse::UnprocessableEntity().json(json!({
                    "errors": ["no existing assignment for this shift"],
                })),
        }
    }
}
