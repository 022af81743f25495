//! Row-level visibility and write scopes for complaints.
//!
//! The scope is folded into every lookup, so a complaint outside the caller's
//! scope is indistinguishable from one that does not exist.

use super::{Complaint, Error, Role, User, UserId};

/// Predicate restricting which complaints an identity may see or act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// No restriction.
    All,
    /// Complaints submitted by the user.
    Submitter(UserId),
    /// Complaints assigned to the technician.
    Assignee(UserId),
}

impl AccessScope {
    /// Read scope for a resolved identity.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use complaint_desk::domain::{AccessScope, Role, User, UserDraft, UserId};
    ///
    /// let id = UserId::random();
    /// let student = User::try_from(UserDraft {
    ///     id,
    ///     full_name: "Ada".into(),
    ///     username: "ada".into(),
    ///     email: "ada@university.edu".into(),
    ///     role: Role::Student,
    ///     department: None,
    ///     phone: None,
    ///     created_at: Utc::now(),
    /// })
    /// .unwrap();
    /// assert_eq!(AccessScope::for_reader(&student), AccessScope::Submitter(id));
    /// ```
    pub fn for_reader(user: &User) -> Self {
        match user.role() {
            Role::Admin => Self::All,
            Role::Student => Self::Submitter(user.id()),
            Role::Technician => Self::Assignee(user.id()),
        }
    }

    /// Write scope for status updates.
    ///
    /// Students own their complaints but cannot change their status.
    pub fn for_writer(user: &User) -> Result<Self, Error> {
        match user.role() {
            Role::Admin => Ok(Self::All),
            Role::Technician => Ok(Self::Assignee(user.id())),
            Role::Student => Err(Error::unauthorized("Unauthorized")),
        }
    }

    /// Whether the complaint falls inside this scope.
    pub fn permits(&self, complaint: &Complaint) -> bool {
        match self {
            Self::All => true,
            Self::Submitter(id) => complaint.user_id() == *id,
            Self::Assignee(id) => complaint.technician_id() == Some(*id),
        }
    }
}
