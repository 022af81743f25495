//! User identity, roles, and validated profile fields.
//!
//! Users are created either by self-registration (always as students) or by
//! staff provisioning. The role is fixed at creation time; there is no domain
//! operation that changes it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length accepted for usernames.
pub const USERNAME_MAX: usize = 50;
/// Maximum length accepted for full names.
pub const FULL_NAME_MAX: usize = 100;
/// Maximum length accepted for email addresses.
pub const EMAIL_MAX: usize = 100;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("full name must not be empty")]
    EmptyFullName,
    #[error("full name must be at most {max} characters")]
    FullNameTooLong { max: usize },
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username must not contain whitespace")]
    UsernameWhitespace,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must contain a local part and a domain separated by '@'")]
    InvalidEmail,
    #[error("unknown role '{0}'")]
    UnknownRole(String),
}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use complaint_desk::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The three fixed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Submits complaints and reads their own.
    Student,
    /// Works complaints assigned to them.
    Technician,
    /// Sees and manages everything.
    Admin,
}

impl Role {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Technician => "technician",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "technician" => Ok(Self::Technician),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Normalised email address (trimmed and lowercased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "ada@university.edu")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate an email address.
    ///
    /// Only the shape is checked: one `@`, non-empty local part, and a
    /// domain containing no whitespace.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = value.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || value.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value.to_lowercase()))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique login handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "ada")]
pub struct Username(String);

impl Username {
    /// Validate a username: trimmed, non-empty, no inner whitespace.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(UserValidationError::UsernameWhitespace);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name shown on complaints and rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "Ada Lovelace")]
pub struct FullName(String);

impl FullName {
    /// Validate a full name: trimmed and non-empty.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        if value.chars().count() > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Trim optional free-text fields, treating blanks as absent.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}

/// Unvalidated user fields, typically loaded from storage.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A registered user. Never carries password material.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use complaint_desk::domain::{Role, User, UserDraft, UserId};
///
/// let user = User::try_from(UserDraft {
///     id: UserId::random(),
///     full_name: "Ada Lovelace".into(),
///     username: "ada".into(),
///     email: "Ada@University.edu".into(),
///     role: Role::Student,
///     department: None,
///     phone: None,
///     created_at: Utc::now(),
/// })
/// .unwrap();
/// assert_eq!(user.email().as_str(), "ada@university.edu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    id: UserId,
    full_name: FullName,
    username: Username,
    email: EmailAddress,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserDraft> for User {
    type Error = UserValidationError;

    fn try_from(draft: UserDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: draft.id,
            full_name: FullName::new(&draft.full_name)?,
            username: Username::new(&draft.username)?,
            email: EmailAddress::new(&draft.email)?,
            role: draft.role,
            department: optional_text(draft.department.as_deref()),
            phone: optional_text(draft.phone.as_deref()),
            created_at: draft.created_at,
        })
    }
}

impl User {
    /// Assemble a user from already-validated parts.
    pub(crate) fn from_parts(
        id: UserId,
        profile: super::auth::AccountProfile,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            full_name: profile.full_name,
            username: profile.username,
            email: profile.email,
            role,
            department: profile.department,
            phone: profile.phone,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
