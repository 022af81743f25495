//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types validate every column, so a row that violates a domain invariant
//! surfaces as a query error instead of a half-built aggregate.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Complaint, ComplaintDraft, ComplaintId, ComplaintStatus, HistoryEntry, NewHistoryEntry,
    Priority, Role, User, UserDraft, UserId,
};

use super::schema::{complaint_history, complaints, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, String), String> {
        let role = Role::from_str(&self.role).map_err(|err| err.to_string())?;
        let user = User::try_from(UserDraft {
            id: UserId::from_uuid(self.id),
            full_name: self.full_name,
            username: self.username,
            email: self.email,
            role,
            department: self.department,
            phone: self.phone,
            created_at: self.created_at,
        })
        .map_err(|err| err.to_string())?;
        Ok((user, self.password_hash))
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub full_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub department: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn new(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: *user.id().as_uuid(),
            full_name: user.full_name().as_str(),
            username: user.username().as_str(),
            email: user.email().as_str(),
            password_hash,
            role: user.role().as_str(),
            department: user.department(),
            phone: user.phone(),
            created_at: user.created_at(),
        }
    }
}

/// Row struct for reading from the complaints table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub category_id: i32,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub location: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = String;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        let priority = Priority::from_str(&row.priority).map_err(|err| err.to_string())?;
        let status = ComplaintStatus::from_str(&row.status).map_err(|err| err.to_string())?;
        Complaint::try_from(ComplaintDraft {
            id: ComplaintId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            technician_id: row.technician_id.map(UserId::from_uuid),
            category_id: row.category_id,
            title: row.title,
            description: row.description,
            priority,
            location: row.location,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .map_err(|err| err.to_string())
    }
}

/// Insertable struct for creating complaint records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaints)]
pub(crate) struct NewComplaintRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub category_id: i32,
    pub title: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
    pub location: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Complaint> for NewComplaintRow<'a> {
    fn from(complaint: &'a Complaint) -> Self {
        Self {
            id: *complaint.id().as_uuid(),
            user_id: *complaint.user_id().as_uuid(),
            technician_id: complaint.technician_id().map(|id| *id.as_uuid()),
            category_id: complaint.category_id().get(),
            title: complaint.title(),
            description: complaint.description(),
            priority: complaint.priority().as_str(),
            location: complaint.location(),
            status: complaint.status().as_str(),
            created_at: complaint.created_at(),
            updated_at: complaint.updated_at(),
        }
    }
}

/// Changeset written when a status change is applied.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = complaints)]
pub(crate) struct ComplaintStatusUpdate<'a> {
    pub technician_id: Option<Uuid>,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Complaint> for ComplaintStatusUpdate<'a> {
    fn from(complaint: &'a Complaint) -> Self {
        Self {
            technician_id: complaint.technician_id().map(|id| *id.as_uuid()),
            status: complaint.status().as_str(),
            updated_at: complaint.updated_at(),
        }
    }
}

/// Row struct for reading audit entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaint_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub id: i64,
    pub complaint_id: Uuid,
    pub changed_by: Uuid,
    pub old_status: Option<String>,
    pub new_status: String,
    pub comments: String,
    pub changed_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = String;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let old_status = row
            .old_status
            .as_deref()
            .map(ComplaintStatus::from_str)
            .transpose()
            .map_err(|err| err.to_string())?;
        let new_status = ComplaintStatus::from_str(&row.new_status).map_err(|err| err.to_string())?;
        Ok(NewHistoryEntry {
            complaint_id: ComplaintId::from_uuid(row.complaint_id),
            changed_by: UserId::from_uuid(row.changed_by),
            old_status,
            new_status,
            comments: row.comments,
            changed_at: row.changed_at,
        }
        .recorded(row.id))
    }
}

/// Insertable audit entry. The sequence number comes from `BIGSERIAL`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaint_history)]
pub(crate) struct NewHistoryRow<'a> {
    pub complaint_id: Uuid,
    pub changed_by: Uuid,
    pub old_status: Option<&'a str>,
    pub new_status: &'a str,
    pub comments: &'a str,
    pub changed_at: DateTime<Utc>,
}

impl<'a> From<&'a NewHistoryEntry> for NewHistoryRow<'a> {
    fn from(entry: &'a NewHistoryEntry) -> Self {
        Self {
            complaint_id: *entry.complaint_id.as_uuid(),
            changed_by: *entry.changed_by.as_uuid(),
            old_status: entry.old_status.map(ComplaintStatus::as_str),
            new_status: entry.new_status.as_str(),
            comments: &entry.comments,
            changed_at: entry.changed_at,
        }
    }
}
