//! Complaint endpoints.
//!
//! ```text
//! GET  /complaints[?status=..&category=..]  scoped list
//! GET  /complaints?id=<uuid>                one complaint with its history
//! POST /complaints                          submit a complaint
//! PUT  /complaints?id=<uuid>                change the status
//! ```
//!
//! Every route requires a bearer token. Reads and writes are scoped to the
//! caller by the workflow service, so a complaint outside that scope looks
//! exactly like one that does not exist.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ComplaintDetails, UpdateStatusRequest};
use crate::domain::{
    CategoryId, Complaint, ComplaintFilter, ComplaintId, ComplaintStatus, Error, HistoryEntry,
    NewComplaint, Priority,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_complaint_validation_error, missing_field_error, non_blank,
    parse_complaint_id,
};

const ID_FIELD: FieldName = FieldName::new("id");

/// Query parameters accepted by `/complaints`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ComplaintsQuery {
    /// Complaint id; selects a single complaint or the update target.
    pub id: Option<String>,
    /// Status filter for listings.
    pub status: Option<String>,
    /// Category id filter for listings.
    pub category: Option<String>,
}

impl ComplaintsQuery {
    fn complaint_id(&self) -> Result<Option<ComplaintId>, Error> {
        non_blank(self.id.as_deref())
            .map(|raw| parse_complaint_id(raw, ID_FIELD))
            .transpose()
    }

    fn filter(&self) -> Result<ComplaintFilter, Error> {
        let status = non_blank(self.status.as_deref())
            .map(str::parse::<ComplaintStatus>)
            .transpose()
            .map_err(|err| map_complaint_validation_error(&err))?;
        let category = non_blank(self.category.as_deref())
            .map(|raw| {
                raw.parse::<i32>()
                    .ok()
                    .and_then(|value| CategoryId::new(value).ok())
                    .ok_or_else(|| {
                        Error::invalid_request("category must be a positive integer")
                            .with_details(serde_json::json!({ "field": "category", "value": raw }))
                    })
            })
            .transpose()?;
        Ok(ComplaintFilter { status, category })
    }
}

/// Body of `POST /complaints`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateComplaintRequest {
    pub category_id: i32,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub location: Option<String>,
}

impl TryFrom<&CreateComplaintRequest> for NewComplaint {
    type Error = Error;

    fn try_from(value: &CreateComplaintRequest) -> Result<Self, Self::Error> {
        Self::try_new(
            value.category_id,
            &value.title,
            &value.description,
            value.priority,
            value.location.as_deref(),
        )
        .map_err(|err| map_complaint_validation_error(&err))
    }
}

/// Body of `PUT /complaints?id=..`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusBody {
    pub status: ComplaintStatus,
    pub comments: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintList {
    pub complaints: Vec<Complaint>,
}

/// A complaint flattened together with its history, newest entry first.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintWithHistory {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintEnvelope {
    pub complaint: ComplaintWithHistory,
}

impl From<ComplaintDetails> for ComplaintEnvelope {
    fn from(details: ComplaintDetails) -> Self {
        Self {
            complaint: ComplaintWithHistory {
                complaint: details.complaint,
                history: details.history,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Created {
    pub success: bool,
    pub complaint_id: ComplaintId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Updated {
    pub success: bool,
}

/// List visible complaints, or fetch one when `id` is given.
#[utoipa::path(
    get,
    path = "/complaints",
    params(ComplaintsQuery),
    responses(
        (status = 200, description = "`ComplaintList` without `id`, `ComplaintEnvelope` with it", body = ComplaintList),
        (status = 400, description = "Invalid filter or id", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Complaint not found", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
pub async fn get_complaints(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ComplaintsQuery>,
) -> ApiResult<HttpResponse> {
    if let Some(id) = query.complaint_id()? {
        let details = state.complaints_query.get(caller.user(), &id).await?;
        return Ok(HttpResponse::Ok().json(ComplaintEnvelope::from(details)));
    }
    let filter = query.filter()?;
    let complaints = state.complaints_query.list(caller.user(), filter).await?;
    Ok(HttpResponse::Ok().json(ComplaintList { complaints }))
}

/// Submit a complaint owned by the caller.
#[utoipa::path(
    post,
    path = "/complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 200, description = "Complaint created", body = Created),
        (status = 400, description = "Invalid complaint or unknown category", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "createComplaint"
)]
pub async fn create_complaint(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<CreateComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let details = NewComplaint::try_from(&payload.into_inner())?;
    let complaint_id = state.complaints.submit(caller.user(), details).await?;
    Ok(HttpResponse::Ok().json(Created {
        success: true,
        complaint_id,
    }))
}

/// Change a complaint's status within the caller's write scope.
#[utoipa::path(
    put,
    path = "/complaints",
    params(ComplaintsQuery),
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Status changed and audited", body = Updated),
        (status = 400, description = "Missing id or invalid status", body = Error),
        (status = 401, description = "Missing token or no write access", body = Error),
        (status = 404, description = "Complaint not found", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaintStatus"
)]
pub async fn update_complaint(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    query: web::Query<ComplaintsQuery>,
    payload: web::Json<UpdateStatusBody>,
) -> ApiResult<HttpResponse> {
    let complaint_id = query
        .complaint_id()?
        .ok_or_else(|| missing_field_error(ID_FIELD, "Complaint ID required"))?;
    let UpdateStatusBody { status, comments } = payload.into_inner();
    state
        .complaints
        .update_status(
            caller.user(),
            UpdateStatusRequest {
                complaint_id,
                status,
                comments,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(Updated { success: true }))
}

#[cfg(test)]
#[path = "complaints_tests.rs"]
mod tests;
