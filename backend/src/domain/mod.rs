//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for accounts, complaints and their
//! audit trail, plus the services that enforce authorisation and workflow
//! rules. Types validate on construction so adapters cannot persist invalid
//! state.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User, Role: account identity and role.
//! - Complaint, ComplaintStatus, HistoryEntry: the ticket and its audit trail.
//! - AccessScope, RoleSet: row-level and role-level authorisation.
//! - TokenService: bearer token issuing and verification.
//! - AccountServiceImpl, ComplaintWorkflow, BearerIdentityResolver: services
//!   behind the driving ports.

pub mod access_scope;
pub mod account_service;
pub mod auth;
pub mod complaint;
pub mod complaint_workflow;
pub mod error;
pub mod history;
pub mod identity;
pub mod ports;
pub mod role_guard;
pub mod token;
pub mod trace_id;
pub mod transition;
pub mod user;

pub use self::access_scope::AccessScope;
pub use self::account_service::AccountServiceImpl;
pub use self::auth::{
    AccountProfile, LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationParts, RegistrationValidationError,
};
pub use self::complaint::{
    CategoryId, Complaint, ComplaintDraft, ComplaintFilter, ComplaintId, ComplaintStatus,
    ComplaintValidationError, NewComplaint, Priority,
};
pub use self::complaint_workflow::ComplaintWorkflow;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::history::{
    ASSIGNED_COMMENT, HistoryEntry, NewHistoryEntry, SUBMITTED_COMMENT, StatusChange,
    newest_first,
};
pub use self::identity::{BearerIdentityResolver, bearer_token};
pub use self::role_guard::RoleSet;
pub use self::token::{
    SigningKey, TOKEN_TTL_SECS, TokenError, TokenKeyring, TokenService, key_fingerprint,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transition::{TransitionPolicy, TransitionRejected};
pub use self::user::{
    EmailAddress, FullName, Role, User, UserDraft, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use complaint_desk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Complaint not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
