//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::env;

use marshal_service::routes;
use marshal_service::utils::auth_middleware::Authentication;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let address = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:9090".to_string());
    std::fs::create_dir_all("./storage")?;

    info!("🚀 Server started at {}", address);

    HttpServer::new(|| {
        App::new()
            .wrap(Cors::permissive())
            .configure(routes::auth_routes::init_routes)
            .service(
                web::scope("")
                    .wrap(Authentication)
                    .configure(routes::auth_routes::init_protected_routes)
                    .configure(routes::schedule_routes::init_routes)
                    .configure(routes::signup_routes::init_routes)
                    .configure(routes::lockdown_routes::init_routes),
            )
    })
        .bind(address)?
        .run()
        .await
}
