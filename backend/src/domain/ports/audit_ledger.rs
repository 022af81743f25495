//! Read side of the append-only complaint audit trail.
//!
//! Appends happen only inside [`super::ComplaintRepository`] units of work;
//! this port exposes no way to add, change or remove entries.

use async_trait::async_trait;

use crate::domain::{ComplaintId, HistoryEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit ledger adapters.
    pub enum AuditLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } => "audit ledger connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "audit ledger query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Entries for the complaint, newest first.
    async fn list_for(&self, complaint_id: &ComplaintId)
    -> Result<Vec<HistoryEntry>, AuditLedgerError>;
}
