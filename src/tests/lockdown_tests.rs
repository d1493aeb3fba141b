use crate::tests::fixtures::{self, ts};
use crate::utils::lockdown::{LockdownScope, LOCKDOWN};
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
}

#[::core::prelude::v1::test]
fn site_flag_takes_precedence_in_the_store() {
    let _guard = fixtures::serial();
    fixtures::reset_lockdown();

    assert!(!LOCKDOWN.is_locked(LockdownScope::Volunteers).unwrap());
    assert!(!LOCKDOWN.get(LockdownScope::Site).unwrap());

    LOCKDOWN.set(LockdownScope::Site, true, None).unwrap();
    // Subsystem flag is still false, but the gate reads locked
    assert!(!LOCKDOWN.get(LockdownScope::Volunteers).unwrap());
    assert!(LOCKDOWN.is_locked(LockdownScope::Volunteers).unwrap());
    assert!(LOCKDOWN.is_locked(LockdownScope::Tickets).unwrap());
    assert!(LOCKDOWN.is_locked(LockdownScope::Grants).unwrap());

    LOCKDOWN.set(LockdownScope::Site, false, None).unwrap();
    assert!(!LOCKDOWN.is_locked(LockdownScope::Volunteers).unwrap());
}

#[actix_rt::test]
async fn unknown_lockdown_type_is_rejected() {
    let app = crate::test_app!();
    let (_admin, token) = fixtures::make_admin();

    let req = authed(test::TestRequest::post().uri("/lockdown/everything"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn lockdown_mutations_require_admin() {
    let app = crate::test_app!();
    let (_user, token) = fixtures::make_volunteer();

    let req = authed(test::TestRequest::post().uri("/lockdown/volunteers"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["reason"], "policy");
}

#[actix_rt::test]
async fn volunteers_lockdown_blocks_signup_until_lifted() {
    let _guard = fixtures::serial();
    fixtures::reset_lockdown();
    let app = crate::test_app!();

    let (_admin, admin_token) = fixtures::make_admin();
    let (_user, token) = fixtures::make_volunteer();
    let (_event, _team, shift) = fixtures::make_schedule(5, ts(9, 0), ts(12, 0));

    let req = authed(test::TestRequest::post().uri("/lockdown/volunteers"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = authed(test::TestRequest::get().uri("/lockdown"), &token).to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["volunteers"], true);
    assert_eq!(body["site"], false);

    let req = authed(
        test::TestRequest::post().uri(&format!("/shifts/{}/signup", shift.id)),
        &token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["reason"], "lockdown");

    let req = authed(test::TestRequest::delete().uri("/lockdown/volunteers"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The gate is re-evaluated per call, so the same request now passes
    let req = authed(
        test::TestRequest::post().uri(&format!("/shifts/{}/signup", shift.id)),
        &token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn site_lockdown_blocks_signup_even_without_volunteers_flag() {
    let _guard = fixtures::serial();
    fixtures::reset_lockdown();
    let app = crate::test_app!();

    let (_admin, admin_token) = fixtures::make_admin();
    let (_user, token) = fixtures::make_volunteer();
    let (_event, _team, shift) = fixtures::make_schedule(5, ts(9, 0), ts(12, 0));

    let req = authed(test::TestRequest::post().uri("/lockdown/site"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = authed(
        test::TestRequest::post().uri(&format!("/shifts/{}/signup", shift.id)),
        &token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = authed(test::TestRequest::delete().uri("/lockdown/site"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_rt::test]
async fn unrelated_scopes_do_not_block_signup() {
    let _guard = fixtures::serial();
    fixtures::reset_lockdown();
    let app = crate::test_app!();

    let (_admin, admin_token) = fixtures::make_admin();
    let (_user, token) = fixtures::make_volunteer();
    let (_event, _team, shift) = fixtures::make_schedule(5, ts(9, 0), ts(12, 0));

    for scope in ["tickets", "grants"] {
        let req = authed(
            test::TestRequest::post().uri(&format!("/lockdown/{}", scope)),
            &admin_token,
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let req = authed(
        test::TestRequest::post().uri(&format!("/shifts/{}/signup", shift.id)),
        &token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    fixtures::reset_lockdown();
}

#[actix_rt::test]
async fn banner_message_round_trip() {
    let _guard = fixtures::serial();
    fixtures::reset_lockdown();
    let app = crate::test_app!();

    let (_admin, admin_token) = fixtures::make_admin();

    let req = authed(
        test::TestRequest::post()
            .uri("/lockdown/site")
            .set_json(json!({ "message": "Back after maintenance" })),
        &admin_token,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = authed(test::TestRequest::get().uri("/lockdown"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Back after maintenance");

    // Lifting the last engaged flag clears the banner
    let req = authed(test::TestRequest::delete().uri("/lockdown/site"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = authed(test::TestRequest::get().uri("/lockdown"), &admin_token).to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].is_null());
}
