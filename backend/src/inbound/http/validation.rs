//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every client mistake becomes `400 invalid_request` with a `details`
//! object naming the offending field and a stable machine-readable code.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{
    ComplaintId, ComplaintValidationError, Error, LoginValidationError,
    RegistrationValidationError, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName, message: &str) -> Error {
    field_error(field.as_str(), message, ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_complaint_id(value: &str, field: FieldName) -> Result<ComplaintId, Error> {
    ComplaintId::new(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Treat blank query parameters as absent, as browsers send `?status=`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}

/// Decode a JSON body whose shape depends on a query parameter.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request("Invalid request body").with_details(json!({
            "code": ErrorCode::InvalidBody.as_str(),
            "reason": err.to_string(),
        }))
    })
}

pub(crate) fn map_complaint_validation_error(err: &ComplaintValidationError) -> Error {
    field_error(err.field(), err.to_string(), ErrorCode::InvalidValue)
}

pub(crate) fn map_registration_error(err: &RegistrationValidationError) -> Error {
    field_error(err.field(), err.to_string(), ErrorCode::InvalidValue)
}

pub(crate) fn map_login_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, err.to_string(), ErrorCode::MissingField)
}
