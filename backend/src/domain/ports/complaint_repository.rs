//! Port for complaint persistence.
//!
//! Every mutating method is one unit of work: the complaint row and its audit
//! entry are written together or not at all. Reads and writes take an
//! [`AccessScope`] so adapters fold row-level visibility into the query.

use async_trait::async_trait;

use crate::domain::{
    AccessScope, Complaint, ComplaintFilter, ComplaintId, HistoryEntry, NewHistoryEntry,
    StatusChange,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by complaint repository adapters.
    pub enum ComplaintRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "complaint repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "complaint repository query failed: {message}",
        /// The referenced category is not seeded.
        UnknownCategory { category: i32 } => "category {category} does not exist",
        /// The transition policy refused the change.
        TransitionRejected { message: String } => "{message}",
    }
}

/// Result of a committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    pub complaint: Complaint,
    pub entry: HistoryEntry,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Store a new complaint and its creation entry.
    async fn create(
        &self,
        complaint: &Complaint,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, ComplaintRepositoryError>;

    /// Fetch a complaint when it exists inside the scope.
    async fn find(
        &self,
        id: &ComplaintId,
        scope: &AccessScope,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Complaints inside the scope matching the filter, newest first.
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError>;

    /// Lock the complaint, apply the change and append the audit entry.
    ///
    /// Returns `None` when the complaint does not exist inside the scope.
    async fn apply_change(
        &self,
        change: &StatusChange,
        scope: &AccessScope,
    ) -> Result<Option<AppliedChange>, ComplaintRepositoryError>;
}
