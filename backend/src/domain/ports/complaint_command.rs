//! Driving port for complaint mutations.

use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintId, ComplaintStatus, Error, NewComplaint, User, UserId};

/// Request to hand a complaint to a technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignTechnicianRequest {
    pub complaint_id: ComplaintId,
    pub technician_id: UserId,
}

/// Request to move a complaint to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    pub complaint_id: ComplaintId,
    pub status: ComplaintStatus,
    /// Recorded on the audit entry; empty when absent.
    pub comments: Option<String>,
}

/// Driving port for complaint write operations.
///
/// Each call commits the complaint change and exactly one audit entry
/// atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintCommand: Send + Sync {
    /// File a complaint on behalf of the caller.
    async fn submit(&self, caller: &User, details: NewComplaint) -> Result<ComplaintId, Error>;

    /// Assign a technician and move the complaint to `in_progress`. Admin only.
    async fn assign(
        &self,
        caller: &User,
        request: AssignTechnicianRequest,
    ) -> Result<Complaint, Error>;

    /// Change the status of a complaint inside the caller's write scope.
    async fn update_status(
        &self,
        caller: &User,
        request: UpdateStatusRequest,
    ) -> Result<Complaint, Error>;
}
