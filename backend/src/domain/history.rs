//! Audit trail entries and the status-change command that produces them.
//!
//! History entries are append-only. The only way to create one is through a
//! complaint submission or a [`StatusChange`] applied by a persistence adapter
//! inside the same unit of work that mutates the complaint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Complaint, ComplaintId, ComplaintStatus, TransitionPolicy, TransitionRejected, UserId};

/// Comment recorded on the creation entry.
pub const SUBMITTED_COMMENT: &str = "Complaint submitted";
/// Comment recorded when an admin assigns a technician.
pub const ASSIGNED_COMMENT: &str = "Assigned to technician";

/// An audit entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub complaint_id: ComplaintId,
    pub changed_by: UserId,
    pub old_status: Option<ComplaintStatus>,
    pub new_status: ComplaintStatus,
    pub comments: String,
    pub changed_at: DateTime<Utc>,
}

impl NewHistoryEntry {
    /// The creation entry for a freshly submitted complaint.
    pub fn submitted(complaint: &Complaint) -> Self {
        Self {
            complaint_id: complaint.id(),
            changed_by: complaint.user_id(),
            old_status: None,
            new_status: complaint.status(),
            comments: SUBMITTED_COMMENT.to_owned(),
            changed_at: complaint.created_at(),
        }
    }

    /// Attach the sequence number assigned by the ledger.
    pub fn recorded(self, id: i64) -> HistoryEntry {
        HistoryEntry {
            id,
            complaint_id: self.complaint_id,
            changed_by: self.changed_by,
            old_status: self.old_status,
            new_status: self.new_status,
            comments: self.comments,
            changed_at: self.changed_at,
        }
    }
}

/// A stored, immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HistoryEntry {
    id: i64,
    complaint_id: ComplaintId,
    changed_by: UserId,
    old_status: Option<ComplaintStatus>,
    new_status: ComplaintStatus,
    comments: String,
    changed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn complaint_id(&self) -> ComplaintId {
        self.complaint_id
    }

    pub fn changed_by(&self) -> UserId {
        self.changed_by
    }

    pub fn old_status(&self) -> Option<ComplaintStatus> {
        self.old_status
    }

    pub fn new_status(&self) -> ComplaintStatus {
        self.new_status
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}

/// Sort entries newest first, breaking timestamp ties by sequence number.
pub fn newest_first(entries: &mut [HistoryEntry]) {
    entries.sort_by(|a, b| {
        b.changed_at
            .cmp(&a.changed_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// A requested status mutation, optionally reassigning the technician.
///
/// The prior status is unknown until the adapter has locked the record, so
/// the audit entry is derived from it with [`StatusChange::audit_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub complaint_id: ComplaintId,
    pub new_status: ComplaintStatus,
    pub assign_to: Option<UserId>,
    pub changed_by: UserId,
    pub comments: String,
    pub at: DateTime<Utc>,
    pub policy: TransitionPolicy,
}

impl StatusChange {
    /// Validate the transition from the locked prior status and build the
    /// matching audit entry.
    pub fn audit_entry(
        &self,
        old_status: ComplaintStatus,
    ) -> Result<NewHistoryEntry, TransitionRejected> {
        if self.assign_to.is_none() {
            self.policy.check(old_status, self.new_status)?;
        }
        Ok(NewHistoryEntry {
            complaint_id: self.complaint_id,
            changed_by: self.changed_by,
            old_status: Some(old_status),
            new_status: self.new_status,
            comments: self.comments.clone(),
            changed_at: self.at,
        })
    }
}
