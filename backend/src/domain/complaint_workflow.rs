//! Complaint workflow service.
//!
//! Implements the [`ComplaintCommand`] and [`ComplaintQuery`] driving ports.
//! Authorisation is settled here: the role guard and the access scope are
//! evaluated once per call, then the scope travels into the repository so
//! the lookup, lock and write all see the same predicate.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AssignTechnicianRequest, AuditLedger, AuditLedgerError, ComplaintCommand, ComplaintDetails,
    ComplaintQuery, ComplaintRepository, ComplaintRepositoryError, UpdateStatusRequest,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    ASSIGNED_COMMENT, AccessScope, Complaint, ComplaintFilter, ComplaintId, ComplaintStatus,
    Error, NewComplaint, NewHistoryEntry, Role, RoleSet, StatusChange, TransitionPolicy, User,
};

const NOT_FOUND: &str = "Complaint not found";

/// Workflow service over complaint, ledger and user adapters.
#[derive(Clone)]
pub struct ComplaintWorkflow<R, L, U> {
    complaints: Arc<R>,
    ledger: Arc<L>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    policy: TransitionPolicy,
}

impl<R, L, U> ComplaintWorkflow<R, L, U> {
    /// Create a workflow using the permissive transition policy.
    pub fn new(complaints: Arc<R>, ledger: Arc<L>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            complaints,
            ledger,
            users,
            clock,
            policy: TransitionPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<R, L, U> ComplaintWorkflow<R, L, U>
where
    R: ComplaintRepository,
    L: AuditLedger,
    U: UserRepository,
{
    fn map_repository_error(error: ComplaintRepositoryError) -> Error {
        match error {
            ComplaintRepositoryError::UnknownCategory { category } => {
                Error::invalid_request("Unknown category")
                    .with_details(json!({ "field": "category_id", "value": category }))
            }
            ComplaintRepositoryError::TransitionRejected { message } => {
                Error::invalid_request(message)
            }
            ComplaintRepositoryError::Connection { message } => {
                Error::internal(format!("complaint repository unavailable: {message}"))
            }
            ComplaintRepositoryError::Query { message } => {
                Error::internal(format!("complaint repository error: {message}"))
            }
        }
    }

    fn map_ledger_error(error: AuditLedgerError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_user_error(error: UserPersistenceError) -> Error {
        Error::internal(error.to_string())
    }

    async fn require_technician(&self, caller: &User, request: &AssignTechnicianRequest) -> Result<(), Error> {
        let candidate = self
            .users
            .find_by_id(&request.technician_id)
            .await
            .map_err(Self::map_user_error)?;
        match candidate {
            Some(user) if user.role() == Role::Technician => Ok(()),
            _ => {
                info!(
                    admin_id = %caller.id(),
                    technician_id = %request.technician_id,
                    "assignment rejected: not a technician"
                );
                Err(Error::invalid_request("Invalid technician")
                    .with_details(json!({ "field": "technician_id" })))
            }
        }
    }

    async fn commit(&self, change: &StatusChange, scope: &AccessScope) -> Result<Complaint, Error> {
        let applied = self
            .complaints
            .apply_change(change, scope)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        info!(
            complaint_id = %change.complaint_id,
            changed_by = %change.changed_by,
            old_status = ?applied.entry.old_status(),
            new_status = %applied.entry.new_status(),
            "complaint status changed"
        );
        Ok(applied.complaint)
    }
}

#[async_trait]
impl<R, L, U> ComplaintCommand for ComplaintWorkflow<R, L, U>
where
    R: ComplaintRepository,
    L: AuditLedger,
    U: UserRepository,
{
    async fn submit(&self, caller: &User, details: NewComplaint) -> Result<ComplaintId, Error> {
        let caller = RoleSet::ANY.require(caller)?;
        let complaint = Complaint::submit(ComplaintId::random(), caller.id(), details, self.clock.utc());
        let entry = NewHistoryEntry::submitted(&complaint);
        self.complaints
            .create(&complaint, &entry)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            complaint_id = %complaint.id(),
            user_id = %caller.id(),
            priority = %complaint.priority(),
            "complaint submitted"
        );
        Ok(complaint.id())
    }

    async fn assign(
        &self,
        caller: &User,
        request: AssignTechnicianRequest,
    ) -> Result<Complaint, Error> {
        let admin = RoleSet::ADMIN.require(caller)?;
        self.require_technician(admin, &request).await?;
        let change = StatusChange {
            complaint_id: request.complaint_id,
            new_status: ComplaintStatus::InProgress,
            assign_to: Some(request.technician_id),
            changed_by: admin.id(),
            comments: ASSIGNED_COMMENT.to_owned(),
            at: self.clock.utc(),
            policy: self.policy,
        };
        self.commit(&change, &AccessScope::All).await
    }

    async fn update_status(
        &self,
        caller: &User,
        request: UpdateStatusRequest,
    ) -> Result<Complaint, Error> {
        let scope = AccessScope::for_writer(caller)?;
        let change = StatusChange {
            complaint_id: request.complaint_id,
            new_status: request.status,
            assign_to: None,
            changed_by: caller.id(),
            comments: request.comments.unwrap_or_default(),
            at: self.clock.utc(),
            policy: self.policy,
        };
        self.commit(&change, &scope).await
    }
}

#[async_trait]
impl<R, L, U> ComplaintQuery for ComplaintWorkflow<R, L, U>
where
    R: ComplaintRepository,
    L: AuditLedger,
    U: UserRepository,
{
    async fn list(&self, caller: &User, filter: ComplaintFilter) -> Result<Vec<Complaint>, Error> {
        let scope = AccessScope::for_reader(caller);
        self.complaints
            .list(&scope, &filter)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, caller: &User, id: &ComplaintId) -> Result<ComplaintDetails, Error> {
        let scope = AccessScope::for_reader(caller);
        let complaint = self
            .complaints
            .find(id, &scope)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        let history = self
            .ledger
            .list_for(id)
            .await
            .map_err(Self::map_ledger_error)?;
        Ok(ComplaintDetails { complaint, history })
    }
}

#[cfg(test)]
#[path = "complaint_workflow_tests.rs"]
mod tests;
