//! Tests for the complaint endpoints.

use super::*;
use crate::domain::ports::AssignTechnicianRequest;
use crate::domain::{Role, User};
use crate::inbound::http::test_utils::{TestContext, test_app};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self as actix_test, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: TestRequest,
) -> (StatusCode, Value) {
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

fn submission(category_id: i32, title: &str) -> Value {
    json!({
        "category_id": category_id,
        "title": title,
        "description": "Water pooling under the sink",
        "priority": "high",
        "location": "Block B, room 12",
    })
}

async fn submit(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    bearer: &str,
    body: &Value,
) -> String {
    let (status, created) = send(
        app,
        TestRequest::post()
            .uri("/complaints")
            .insert_header(("Authorization", bearer))
            .set_json(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["success"], json!(true));
    created["complaint_id"]
        .as_str()
        .expect("complaint id")
        .to_owned()
}

async fn assign(ctx: &TestContext, admin: &User, complaint_id: &str, technician: &User) {
    ctx.state()
        .complaints
        .assign(
            admin,
            AssignTechnicianRequest {
                complaint_id: ComplaintId::new(complaint_id).expect("uuid"),
                technician_id: technician.id(),
            },
        )
        .await
        .expect("assigned");
}

fn ids(list: &Value) -> Vec<String> {
    list["complaints"]
        .as_array()
        .expect("complaints array")
        .iter()
        .map(|c| c["id"].as_str().expect("id").to_owned())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn submitted_complaint_starts_open_with_one_entry() {
    let ctx = TestContext::new();
    let (student, bearer) = ctx.seed_user("sam", Role::Student).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let id = submit(&app, &bearer, &submission(2, "Leaking sink")).await;
    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/complaints?id={id}"))
            .insert_header(("Authorization", bearer.as_str())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let complaint = &body["complaint"];
    assert_eq!(complaint["status"], json!("open"));
    assert_eq!(complaint["priority"], json!("high"));
    assert_eq!(complaint["user_id"], json!(student.id().to_string()));
    let history = complaint["history"].as_array().expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["old_status"], Value::Null);
    assert_eq!(history[0]["new_status"], json!("open"));
    assert_eq!(history[0]["comments"], json!("Complaint submitted"));
}

#[rstest]
#[actix_web::test]
async fn listings_are_scoped_by_role() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.seed_user("alice", Role::Student).await;
    let (_, bob) = ctx.seed_user("bob", Role::Student).await;
    let (tech, tech_bearer) = ctx.seed_user("tess", Role::Technician).await;
    let (_, other_tech) = ctx.seed_user("theo", Role::Technician).await;
    let (admin, admin_bearer) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let first = submit(&app, &alice, &submission(1, "Flickering light")).await;
    ctx.clock.advance_seconds(60);
    let second = submit(&app, &bob, &submission(3, "Wi-Fi down")).await;
    assign(&ctx, &admin, &second, &tech).await;

    let list = |bearer: String| TestRequest::get()
        .uri("/complaints")
        .insert_header(("Authorization", bearer));

    let (_, own) = send(&app, list(alice.clone())).await;
    assert_eq!(ids(&own), [first.clone()]);
    let (_, assigned) = send(&app, list(tech_bearer)).await;
    assert_eq!(ids(&assigned), [second.clone()]);
    let (_, unassigned) = send(&app, list(other_tech)).await;
    assert!(ids(&unassigned).is_empty());
    let (_, everything) = send(&app, list(admin_bearer)).await;
    assert_eq!(ids(&everything), [second.clone(), first.clone()]);

    let (status, _) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/complaints?id={second}"))
            .insert_header(("Authorization", alice)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn admin_filters_by_status_and_category() {
    let ctx = TestContext::new();
    let (_, student) = ctx.seed_user("sam", Role::Student).await;
    let (tech, _) = ctx.seed_user("tess", Role::Technician).await;
    let (admin, admin_bearer) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;
    let electrical = submit(&app, &student, &submission(1, "Socket sparks")).await;
    let plumbing = submit(&app, &student, &submission(2, "Blocked drain")).await;
    assign(&ctx, &admin, &plumbing, &tech).await;

    let query = |uri: &str| {
        TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", admin_bearer.clone()))
    };
    let (_, by_status) = send(&app, query("/complaints?status=in_progress")).await;
    assert_eq!(ids(&by_status), [plumbing.clone()]);
    let (_, by_category) = send(&app, query("/complaints?category=1&status=")).await;
    assert_eq!(ids(&by_category), [electrical]);
    let (_, none) = send(&app, query("/complaints?status=open&category=2")).await;
    assert!(ids(&none).is_empty());

    let (status, body) = send(&app, query("/complaints?status=pending")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], json!("status"));
    let (status, _) = send(&app, query("/complaints?category=plumbing")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn status_updates_are_audited_and_scoped() {
    let ctx = TestContext::new();
    let (_, student) = ctx.seed_user("sam", Role::Student).await;
    let (tech, tech_bearer) = ctx.seed_user("tess", Role::Technician).await;
    let (_, other_tech) = ctx.seed_user("theo", Role::Technician).await;
    let (admin, _) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;
    let id = submit(&app, &student, &submission(4, "Broken chair")).await;
    assign(&ctx, &admin, &id, &tech).await;

    let put = |bearer: &str, body: Value| {
        TestRequest::put()
            .uri(&format!("/complaints?id={id}"))
            .insert_header(("Authorization", bearer.to_owned()))
            .set_json(body)
    };

    let (status, _) = send(&app, put(&other_tech, json!({ "status": "resolved" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, put(&student, json!({ "status": "closed" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(
        &app,
        put(&tech_bearer, json!({ "status": "resolved", "comments": "Replaced leg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, detail) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/complaints?id={id}"))
            .insert_header(("Authorization", student.as_str())),
    )
    .await;
    let history = detail["complaint"]["history"].as_array().expect("history");
    assert_eq!(detail["complaint"]["status"], json!("resolved"));
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["old_status"], json!("in_progress"));
    assert_eq!(history[0]["new_status"], json!("resolved"));
    assert_eq!(history[0]["comments"], json!("Replaced leg"));
    assert_eq!(history[1]["comments"], json!("Assigned to technician"));
}

#[rstest]
#[actix_web::test]
async fn repeated_status_records_another_entry() {
    let ctx = TestContext::new();
    let (_, student) = ctx.seed_user("sam", Role::Student).await;
    let (_, admin) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;
    let id = submit(&app, &student, &submission(5, "Spill in corridor")).await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            TestRequest::put()
                .uri(&format!("/complaints?id={id}"))
                .insert_header(("Authorization", admin.as_str()))
                .set_json(json!({ "status": "closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, detail) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/complaints?id={id}"))
            .insert_header(("Authorization", admin.as_str())),
    )
    .await;
    let history = detail["complaint"]["history"].as_array().expect("history");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["old_status"], json!("closed"));
    assert_eq!(history[0]["new_status"], json!("closed"));
    assert_eq!(history[0]["comments"], json!(""));
}

#[rstest]
#[actix_web::test]
async fn update_without_id_is_rejected() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri("/complaints")
            .insert_header(("Authorization", admin))
            .set_json(json!({ "status": "closed" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Complaint ID required"));
}

#[rstest]
#[case::unknown_category(submission(99, "Mystery"), "Unknown category")]
#[case::blank_title(submission(1, "   "), "title must not be empty")]
#[actix_web::test]
async fn invalid_submissions_are_rejected(#[case] body: Value, #[case] message: &str) {
    let ctx = TestContext::new();
    let (_, student) = ctx.seed_user("sam", Role::Student).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let (status, payload) = send(
        &app,
        TestRequest::post()
            .uri("/complaints")
            .insert_header(("Authorization", student))
            .set_json(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], json!(message));
}

#[rstest]
#[case::list(TestRequest::get().uri("/complaints"))]
#[case::create(TestRequest::post().uri("/complaints").set_json(submission(1, "x")))]
#[actix_web::test]
async fn anonymous_requests_are_unauthorized(#[case] req: TestRequest) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Unauthorized"));
}

#[rstest]
#[actix_web::test]
async fn malformed_id_is_invalid_and_unknown_id_is_not_found() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let (status, _) = send(
        &app,
        TestRequest::get()
            .uri("/complaints?id=42")
            .insert_header(("Authorization", admin.as_str())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/complaints?id={}", ComplaintId::random()))
            .insert_header(("Authorization", admin.as_str())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Complaint not found"));
}

#[rstest]
#[actix_web::test]
async fn other_methods_are_not_allowed() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(test_app(ctx.state())).await;

    let (status, body) = send(
        &app,
        TestRequest::delete()
            .uri("/complaints?id=00000000-0000-0000-0000-000000000000")
            .insert_header(("Authorization", admin)),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], json!("Method not allowed"));
}
