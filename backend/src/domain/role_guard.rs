//! Declarative role guard evaluated once per protected operation.

use tracing::warn;

use super::{Error, Role, User};

/// Set of roles allowed to perform an operation.
///
/// # Examples
/// ```
/// use complaint_desk::domain::{Role, RoleSet};
///
/// assert!(RoleSet::ADMIN.admits(Role::Admin));
/// assert!(!RoleSet::ADMIN.admits(Role::Technician));
/// assert!(RoleSet::STAFF.admits(Role::Technician));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet {
    student: bool,
    technician: bool,
    admin: bool,
}

impl RoleSet {
    /// Any authenticated user.
    pub const ANY: Self = Self {
        student: true,
        technician: true,
        admin: true,
    };
    /// Administrators only.
    pub const ADMIN: Self = Self {
        student: false,
        technician: false,
        admin: true,
    };
    /// Technicians and administrators.
    pub const STAFF: Self = Self {
        student: false,
        technician: true,
        admin: true,
    };

    pub const fn admits(self, role: Role) -> bool {
        match role {
            Role::Student => self.student,
            Role::Technician => self.technician,
            Role::Admin => self.admin,
        }
    }

    /// Pass the user through when their role is admitted.
    ///
    /// A role mismatch is reported as `Unauthorized`, the same class as a
    /// missing identity.
    pub fn require(self, user: &User) -> Result<&User, Error> {
        if self.admits(user.role()) {
            Ok(user)
        } else {
            warn!(user_id = %user.id(), role = %user.role(), "role not permitted for operation");
            Err(Error::unauthorized("Unauthorized"))
        }
    }
}
