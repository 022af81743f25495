//! Driving port for account use-cases.
//!
//! Inbound adapters call it to log in, register and list staff without
//! knowing how passwords are hashed or where accounts live.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, Role, User};

/// A freshly issued bearer token and the account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Domain use-case port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Check credentials and issue a token.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// `Unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Create a student account and issue a token for it.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// All technician accounts.
    async fn technicians(&self) -> Result<Vec<User>, Error>;

    /// Create a staff account with the given role.
    async fn provision_staff(&self, registration: Registration, role: Role)
    -> Result<User, Error>;
}
