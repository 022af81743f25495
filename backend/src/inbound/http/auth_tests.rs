//! Tests for the authentication endpoints.

use crate::inbound::http::test_utils::{TestContext, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn registration_body(username: &str) -> Value {
    json!({
        "full_name": "Ada Lovelace",
        "username": username,
        "email": format!("{username}@university.edu"),
        "password": "analytical engine",
        "department": "Mathematics",
    })
}

async fn post_auth(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    action: &str,
    body: &Value,
) -> (StatusCode, Value) {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(&format!("/auth?action={action}"))
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn register_login_and_verify_round_trip() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let (status, registered) = post_auth(&app, "register", &registration_body("ada")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(registered["success"], json!(true));
    assert_eq!(registered["user"]["role"], json!("student"));
    assert_eq!(registered["user"]["department"], json!("Mathematics"));
    assert!(registered["user"].get("password_hash").is_none());

    let (status, logged_in) = post_auth(
        &app,
        "login",
        &json!({ "email": "ADA@university.edu", "password": "analytical engine" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);
    let token = logged_in["token"].as_str().expect("token string");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/auth?action=verify")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let verified: Value = actix_test::read_body_json(res).await;
    assert_eq!(verified["success"], json!(true));
    assert_eq!(verified["user"]["username"], json!("ada"));
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;
    let (status, _) = post_auth(&app, "register", &registration_body("ada")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_auth(&app, "register", &registration_body("ada")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("User already exists"));
}

#[rstest]
#[case::unknown_email("nobody@university.edu", "analytical engine")]
#[case::wrong_password("ada@university.edu", "difference engine")]
#[actix_web::test]
async fn bad_credentials_are_unauthorized(#[case] email: &str, #[case] password: &str) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;
    post_auth(&app, "register", &registration_body("ada")).await;

    let (status, body) = post_auth(
        &app,
        "login",
        &json!({ "email": email, "password": password }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid credentials"));
}

#[rstest]
#[actix_web::test]
async fn short_password_names_the_field() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;
    let mut body = registration_body("ada");
    body["password"] = json!("short");

    let (status, payload) = post_auth(&app, "register", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["details"]["field"], json!("password"));
}

#[rstest]
#[case::post_missing("POST", "/auth")]
#[case::post_unknown("POST", "/auth?action=logout")]
#[case::post_verify("POST", "/auth?action=verify")]
#[case::get_login("GET", "/auth?action=login")]
#[case::get_blank("GET", "/auth?action=")]
#[actix_web::test]
async fn unknown_actions_are_invalid(#[case] method: &str, #[case] uri: &str) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;
    let req = match method {
        "POST" => actix_test::TestRequest::post().set_json(json!({})),
        _ => actix_test::TestRequest::get(),
    };

    let res = actix_test::call_service(&app, req.uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Invalid action"));
}

#[rstest]
#[actix_web::test]
async fn verify_without_token_is_unauthorized() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/auth?action=verify")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Invalid token"));
}

#[rstest]
#[actix_web::test]
async fn expired_token_fails_verification() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.seed_user("tess", crate::domain::Role::Technician).await;
    ctx.clock
        .advance_seconds(crate::domain::TOKEN_TTL_SECS + 1);
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/auth?action=verify")
            .insert_header(("Authorization", bearer))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn unsupported_methods_are_rejected() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/auth?action=login")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}
