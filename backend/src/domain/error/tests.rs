//! Tests for the domain error envelope.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(ErrorCode::InvalidRequest, "invalid_request")]
#[case(ErrorCode::Unauthorized, "unauthorized")]
#[case(ErrorCode::NotFound, "not_found")]
#[case(ErrorCode::MethodNotAllowed, "method_not_allowed")]
#[case(ErrorCode::InternalError, "internal_error")]
fn error_codes_serialise_as_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    let value = serde_json::to_value(code).expect("serialise code");
    assert_eq!(value, json!(expected));
}

#[rstest]
fn serialises_into_client_envelope() {
    let err = Error::invalid_request("Complaint ID required").with_trace_id("abc");
    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "success": false,
            "error": "Complaint ID required",
            "code": "invalid_request",
            "trace_id": "abc",
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let err = Error::not_found("Complaint not found");
    let value = serde_json::to_value(&err).expect("serialise error");
    let object = value.as_object().expect("object payload");
    assert!(!object.contains_key("trace_id"));
    assert!(!object.contains_key("details"));
}

#[rstest]
fn deserialises_envelope_with_details() {
    let payload = json!({
        "success": false,
        "error": "bad",
        "code": "invalid_request",
        "details": { "field": "title" },
    });
    let err: Error = serde_json::from_value(payload).expect("deserialise error");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({ "field": "title" })));
}

#[rstest]
fn rejects_blank_message_on_deserialise() {
    let payload = json!({ "error": "   ", "code": "not_found" });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InternalError, "  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_generic_message_for_blank_input() {
    let err = Error::new(ErrorCode::InternalError, "");
    assert_eq!(err.message(), "Unexpected error");
}

#[tokio::test]
async fn captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
        .parse()
        .expect("valid uuid");
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000001"));
}
