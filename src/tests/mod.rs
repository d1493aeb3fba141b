
mod auth_tests;
mod lockdown_tests;

// Builds the same app shape `main` serves: open auth routes, everything else
// behind the JWT middleware.
#[macro_export]
macro_rules! test_app {
    () => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure($crate::routes::auth_routes::init_routes)
                .service(
                    actix_web::web::scope("")
                        .wrap($crate::utils::auth_middleware::Authentication)
                        .configure($crate::routes::auth_routes::init_protected_routes)
                        .configure($crate::routes::schedule_routes::init_routes)
                        .configure($crate::routes::signup_routes::init_routes)
                        .configure($crate::routes::lockdown_routes::init_routes),
                ),
        )
        .await
    };
}
