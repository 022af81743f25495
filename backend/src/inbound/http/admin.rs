//! Administrator endpoints dispatched on the `action` query parameter.
//!
//! ```text
//! GET  /admin?action=technicians
//! POST /admin?action=assign  {"complaint_id":"..","technician_id":".."}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AssignTechnicianRequest;
use crate::domain::{Error, RoleSet, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ActionQuery, invalid_action};
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_body, parse_complaint_id, parse_user_id};

/// Roster row for a technician.
#[derive(Debug, Serialize, ToSchema)]
pub struct TechnicianSummary {
    pub id: UserId,
    pub full_name: String,
    pub department: Option<String>,
    pub email: String,
}

impl From<&User> for TechnicianSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            full_name: user.full_name().as_str().to_owned(),
            department: user.department().map(str::to_owned),
            email: user.email().as_str().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TechnicianRoster {
    pub technicians: Vec<TechnicianSummary>,
}

/// Body of `POST /admin?action=assign`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignRequest {
    pub complaint_id: String,
    pub technician_id: String,
}

impl TryFrom<&AssignRequest> for AssignTechnicianRequest {
    type Error = Error;

    fn try_from(value: &AssignRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            complaint_id: parse_complaint_id(&value.complaint_id, FieldName::new("complaint_id"))?,
            technician_id: parse_user_id(&value.technician_id, FieldName::new("technician_id"))?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Assigned {
    pub success: bool,
}

/// List technicians.
#[utoipa::path(
    get,
    path = "/admin",
    params(ActionQuery),
    responses(
        (status = 200, description = "Technician roster", body = TechnicianRoster),
        (status = 400, description = "Invalid action", body = Error),
        (status = 401, description = "Caller is not an administrator", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listTechnicians"
)]
pub async fn admin_get(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ActionQuery>,
) -> ApiResult<HttpResponse> {
    RoleSet::ADMIN.require(caller.user())?;
    if query.action() != Some("technicians") {
        return Err(invalid_action());
    }
    let roster = state.accounts.technicians().await?;
    Ok(HttpResponse::Ok().json(TechnicianRoster {
        technicians: roster.iter().map(TechnicianSummary::from).collect(),
    }))
}

/// Assign a technician; the complaint moves to `in_progress`.
#[utoipa::path(
    post,
    path = "/admin",
    params(ActionQuery),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Technician assigned", body = Assigned),
        (status = 400, description = "Invalid action, id or technician", body = Error),
        (status = 401, description = "Caller is not an administrator", body = Error),
        (status = 404, description = "Complaint not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "assignTechnician"
)]
pub async fn admin_post(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ActionQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let admin = RoleSet::ADMIN.require(caller.user())?;
    if query.action() != Some("assign") {
        return Err(invalid_action());
    }
    let payload: AssignRequest = parse_body(&body)?;
    let request = AssignTechnicianRequest::try_from(&payload)?;
    state.complaints.assign(admin, request).await?;
    Ok(HttpResponse::Ok().json(Assigned { success: true }))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
