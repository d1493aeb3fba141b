use crate::models::{LoginResponse, ServiceError, User, UserCredentials};
use crate::utils::{claims_from_request, is_admin_email, jwt, password, user_storage};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use uuid::Uuid;

// Register a new user
#[post("/auth/register")]
async fn register(credentials: web::Json<UserCredentials>) -> Result<HttpResponse, ServiceError> {
    info!("📝 Register request for email: {}", credentials.email);

    // Check if the email already exists
    if user_storage::find_user_by_email(&credentials.email)?.is_some() {
        error!("❌ Email already registered: {}", credentials.email);
        return Err(ServiceError::BadRequest("Email already registered".to_string()));
    }

    // Create a new user
    let user_id = Uuid::new_v4().to_string();
    let user = User {
        id: user_id.clone(),
        email: credentials.email.clone(),
        password_hash: password::hash_password(&credentials.password)?,
        created_at: Utc::now(),
    };

    // Save the user
    user_storage::save_user(&user)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "User registered successfully",
        "user_id": user.id
    })))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(credentials: web::Json<UserCredentials>) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login request for email: {}", credentials.email);

    // Find the user by email
    let user = match user_storage::find_user_by_email(&credentials.email)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", credentials.email);
            return Err(ServiceError::Unauthorized);
        }
    };

    // Verify password
    if !password::verify_password(&credentials.password, &user.password_hash)? {
        error!("❌ Invalid password for user: {}", credentials.email);
        return Err(ServiceError::Unauthorized);
    }

    // The admin flag is captured into the claims at login
    let is_admin = is_admin_email(&user.email);
    let token = jwt::generate_token(&user, is_admin)?;

    info!("✅ User logged in successfully: {}", user.id);

    let response = LoginResponse {
        token: token.clone(),
        user_id: user.id,
        email: user.email,
        is_admin,
    };

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(response))
}

// Get current user info (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let claims = claims_from_request(&req)?;

    // Get user details from storage
    let user = match user_storage::find_user_by_id(&claims.sub)? {
        Some(user) => user,
        None => {
            error!("❌ User not found for claims subject: {}", claims.sub);
            return Err(ServiceError::Unauthorized);
        }
    };

    info!("✅ Found user: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "user_id": user.id,
        "email": user.email,
        "is_admin": claims.is_admin,
        "created_at": user.created_at
    })))
}

// Register all auth routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login);
}

// Authenticated auth routes (registered behind the auth middleware)
pub fn init_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me);
}
