// src/routes/mod.rs
pub mod auth_routes;
pub mod lockdown_routes;
pub mod schedule_routes;
pub mod signup_routes;
