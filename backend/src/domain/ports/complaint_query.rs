//! Driving port for scoped complaint reads.

use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintFilter, ComplaintId, Error, HistoryEntry, User};

/// A complaint and its audit trail, newest entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDetails {
    pub complaint: Complaint,
    pub history: Vec<HistoryEntry>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintQuery: Send + Sync {
    /// Complaints visible to the caller, newest first.
    async fn list(&self, caller: &User, filter: ComplaintFilter) -> Result<Vec<Complaint>, Error>;

    /// One complaint with its history. `NotFound` when absent or out of scope.
    async fn get(&self, caller: &User, id: &ComplaintId) -> Result<ComplaintDetails, Error>;
}
