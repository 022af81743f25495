//! Complaint aggregate, lifecycle statuses, and submission validation.
//!
//! A complaint is owned by its submitter for its whole life. Only two things
//! ever change after submission: the status (through the workflow) and the
//! assigned technician (through admin assignment).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;
use super::user::optional_text;

/// Maximum title length.
pub const TITLE_MAX: usize = 200;
/// Maximum location length.
pub const LOCATION_MAX: usize = 200;

/// Validation errors raised while building complaint values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplaintValidationError {
    #[error("complaint id must be a valid UUID")]
    InvalidId,
    #[error("category id must be positive")]
    InvalidCategory,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("location must be at most {max} characters")]
    LocationTooLong { max: usize },
    #[error("unknown status '{0}'")]
    UnknownStatus(String),
    #[error("unknown priority '{0}'")]
    UnknownPriority(String),
}

impl ComplaintValidationError {
    /// Name of the offending request field, for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::InvalidCategory => "category_id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription => "description",
            Self::LocationTooLong { .. } => "location",
            Self::UnknownStatus(_) => "status",
            Self::UnknownPriority(_) => "priority",
        }
    }
}

/// Complaint identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    /// Parse a complaint id from text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ComplaintValidationError> {
        Uuid::parse_str(raw.as_ref().trim())
            .map(Self)
            .map_err(|_| ComplaintValidationError::InvalidId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a seeded complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryId(i32);

impl CategoryId {
    pub fn new(raw: i32) -> Result<Self, ComplaintValidationError> {
        if raw <= 0 {
            return Err(ComplaintValidationError::InvalidCategory);
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl ComplaintStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Resolved,
        Self::Closed,
        Self::Rejected,
    ];

    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ComplaintValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ComplaintValidationError::UnknownStatus(value.to_owned()))
    }
}

/// Urgency chosen by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ComplaintValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(ComplaintValidationError::UnknownPriority(other.to_owned())),
        }
    }
}

/// Validated submission payload.
///
/// # Examples
/// ```
/// use complaint_desk::domain::{NewComplaint, Priority};
///
/// let draft = NewComplaint::try_new(3, " Broken tap ", "Leaks all night", Priority::High, None)
///     .unwrap();
/// assert_eq!(draft.title(), "Broken tap");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    category_id: CategoryId,
    title: String,
    description: String,
    priority: Priority,
    location: Option<String>,
}

impl NewComplaint {
    pub fn try_new(
        category_id: i32,
        title: &str,
        description: &str,
        priority: Priority,
        location: Option<&str>,
    ) -> Result<Self, ComplaintValidationError> {
        let category_id = CategoryId::new(category_id)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ComplaintValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ComplaintValidationError::TitleTooLong { max: TITLE_MAX });
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ComplaintValidationError::EmptyDescription);
        }
        let location = optional_text(location);
        if location
            .as_deref()
            .is_some_and(|value| value.chars().count() > LOCATION_MAX)
        {
            return Err(ComplaintValidationError::LocationTooLong { max: LOCATION_MAX });
        }
        Ok(Self {
            category_id,
            title: title.to_owned(),
            description: description.to_owned(),
            priority,
            location,
        })
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

/// Stored complaint fields used when rehydrating from persistence.
#[derive(Debug, Clone)]
pub struct ComplaintDraft {
    pub id: ComplaintId,
    pub user_id: UserId,
    pub technician_id: Option<UserId>,
    pub category_id: i32,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub location: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A complaint as seen by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Complaint {
    id: ComplaintId,
    user_id: UserId,
    technician_id: Option<UserId>,
    category_id: CategoryId,
    title: String,
    description: String,
    priority: Priority,
    location: Option<String>,
    status: ComplaintStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ComplaintDraft> for Complaint {
    type Error = ComplaintValidationError;

    fn try_from(draft: ComplaintDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: draft.id,
            user_id: draft.user_id,
            technician_id: draft.technician_id,
            category_id: CategoryId::new(draft.category_id)?,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            location: draft.location,
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }
}

impl Complaint {
    /// A freshly submitted complaint: status `open`, no technician.
    pub fn submit(
        id: ComplaintId,
        submitter: UserId,
        details: NewComplaint,
        at: DateTime<Utc>,
    ) -> Self {
        let NewComplaint {
            category_id,
            title,
            description,
            priority,
            location,
        } = details;
        Self {
            id,
            user_id: submitter,
            technician_id: None,
            category_id,
            title,
            description,
            priority,
            location,
            status: ComplaintStatus::Open,
            created_at: at,
            updated_at: at,
        }
    }

    /// Apply a status change in place. Adapters call this while holding the
    /// record exclusively.
    pub fn apply(&mut self, change: &super::StatusChange) {
        if let Some(technician) = change.assign_to {
            self.technician_id = Some(technician);
        }
        self.status = change.new_status;
        self.updated_at = change.at;
    }

    pub fn id(&self) -> ComplaintId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn technician_id(&self) -> Option<UserId> {
        self.technician_id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Optional list filters; `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<CategoryId>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.is_none_or(|status| complaint.status() == status)
            && self
                .category
                .is_none_or(|category| complaint.category_id() == category)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn new_complaint() -> NewComplaint {
        NewComplaint::try_new(2, "Leaking tap", "Room 101 sink", Priority::High, Some("B-101"))
            .expect("valid complaint")
    }

    #[rstest]
    #[case(0, "t", "d", ComplaintValidationError::InvalidCategory)]
    #[case(1, "  ", "d", ComplaintValidationError::EmptyTitle)]
    #[case(1, "t", "\n", ComplaintValidationError::EmptyDescription)]
    fn submission_validation(
        #[case] category: i32,
        #[case] title: &str,
        #[case] description: &str,
        #[case] expected: ComplaintValidationError,
    ) {
        let result = NewComplaint::try_new(category, title, description, Priority::Low, None);
        assert_eq!(result, Err(expected));
    }

    #[rstest]
    fn submission_rejects_overlong_location() {
        let location = "x".repeat(LOCATION_MAX + 1);
        let result = NewComplaint::try_new(1, "t", "d", Priority::Low, Some(&location));
        assert_eq!(
            result,
            Err(ComplaintValidationError::LocationTooLong { max: LOCATION_MAX })
        );
    }

    #[rstest]
    fn status_text_round_trips() {
        for status in ComplaintStatus::ALL {
            assert_eq!(status.as_str().parse::<ComplaintStatus>(), Ok(status));
        }
        assert!("pending".parse::<ComplaintStatus>().is_err());
    }

    #[rstest]
    #[case("low", Priority::Low)]
    #[case("urgent", Priority::Urgent)]
    fn priority_parses(#[case] text: &str, #[case] expected: Priority) {
        assert_eq!(text.parse::<Priority>(), Ok(expected));
    }

    #[rstest]
    fn submitted_complaints_start_open_and_unassigned() {
        let now = Utc::now();
        let owner = UserId::random();
        let complaint = Complaint::submit(ComplaintId::random(), owner, new_complaint(), now);
        assert_eq!(complaint.status(), ComplaintStatus::Open);
        assert_eq!(complaint.user_id(), owner);
        assert_eq!(complaint.technician_id(), None);
        assert_eq!(complaint.created_at(), complaint.updated_at());
    }

    #[rstest]
    fn filter_matches_status_and_category() {
        let complaint = Complaint::submit(
            ComplaintId::random(),
            UserId::random(),
            new_complaint(),
            Utc::now(),
        );
        let category = CategoryId::new(2).expect("category");
        let other = CategoryId::new(9).expect("category");
        assert!(ComplaintFilter::default().matches(&complaint));
        assert!(
            ComplaintFilter {
                status: Some(ComplaintStatus::Open),
                category: Some(category),
            }
            .matches(&complaint)
        );
        assert!(
            !ComplaintFilter {
                status: None,
                category: Some(other),
            }
            .matches(&complaint)
        );
        assert!(
            !ComplaintFilter {
                status: Some(ComplaintStatus::Closed),
                category: None,
            }
            .matches(&complaint)
        );
    }
}
