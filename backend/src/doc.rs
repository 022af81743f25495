//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path, the request and response bodies
//! they exchange, and the bearer token security scheme. The document backs
//! Swagger UI in debug builds and is exported by `cargo run --bin
//! openapi-dump` for client tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Complaint, ComplaintId, ComplaintStatus, Error, ErrorCode, HistoryEntry, Priority, Role, User,
    UserId,
};
use crate::inbound::http::admin::{AssignRequest, Assigned, TechnicianRoster, TechnicianSummary};
use crate::inbound::http::auth::{LoginRequest, ProfileResponse, RegisterRequest, SessionResponse};
use crate::inbound::http::complaints::{
    ComplaintEnvelope, ComplaintList, ComplaintWithHistory, CreateComplaintRequest, Created,
    UpdateStatusBody, Updated,
};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("HMAC-SHA256 signed token from POST /auth")
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Complaint desk API",
        description = "Complaint submission, assignment and status tracking with an audited history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::auth_post,
        crate::inbound::http::auth::auth_get,
        crate::inbound::http::complaints::get_complaints,
        crate::inbound::http::complaints::create_complaint,
        crate::inbound::http::complaints::update_complaint,
        crate::inbound::http::admin::admin_get,
        crate::inbound::http::admin::admin_post,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserId,
        Role,
        Complaint,
        ComplaintId,
        ComplaintStatus,
        Priority,
        HistoryEntry,
        LoginRequest,
        RegisterRequest,
        SessionResponse,
        ProfileResponse,
        CreateComplaintRequest,
        UpdateStatusBody,
        ComplaintList,
        ComplaintWithHistory,
        ComplaintEnvelope,
        Created,
        Updated,
        TechnicianSummary,
        TechnicianRoster,
        AssignRequest,
        Assigned,
    )),
    tags(
        (name = "auth", description = "Registration, login and token verification"),
        (name = "complaints", description = "Complaint submission, listing and status changes"),
        (name = "admin", description = "Technician roster and assignment"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
