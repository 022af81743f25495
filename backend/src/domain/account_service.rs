//! Account domain service.
//!
//! Implements [`AccountService`] over a user repository and a password
//! hasher. Hashing runs on the blocking pool so slow key derivation never
//! stalls the async executor.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tokio::task;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountService, AuthSession, PasswordHashError, PasswordHasher, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, Registration, Role, TokenService, User, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service implementing the [`AccountService`] driving port.
#[derive(Clone)]
pub struct AccountServiceImpl<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountServiceImpl<U, H> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H> AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Duplicate { field } => {
                Error::invalid_request("User already exists").with_details(json!({ "field": field }))
            }
            UserPersistenceError::Connection { message } => {
                Error::internal(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    async fn with_hasher<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || work(&hasher))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(Self::map_hash_error)
    }

    fn issue_token(&self, user: &User) -> Result<String, Error> {
        self.tokens
            .issue(user.id())
            .map_err(|err| Error::internal(format!("failed to issue token: {err}")))
    }

    async fn create_account(&self, registration: Registration, role: Role) -> Result<User, Error> {
        let password = Zeroizing::new(registration.password().to_owned());
        let hash = self
            .with_hasher(move |hasher| hasher.hash(password.as_str()))
            .await?;
        let user = User::from_parts(
            UserId::random(),
            registration.into_profile(),
            role,
            self.clock.utc(),
        );
        self.users
            .insert(&user, &hash)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id(), role = %role, "account created");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> AccountService for AccountServiceImpl<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        // A malformed address cannot belong to any account.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            info!("login rejected: malformed email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(account) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_user_error)?
        else {
            info!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = account.password_hash.clone();
        let matches = self
            .with_hasher(move |hasher| hasher.verify(password.as_str(), &stored))
            .await?;
        if !matches {
            warn!(user_id = %account.user.id(), "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issue_token(&account.user)?;
        info!(user_id = %account.user.id(), role = %account.user.role(), "login succeeded");
        Ok(AuthSession {
            token,
            user: account.user,
        })
    }

    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let user = self.create_account(registration, Role::Student).await?;
        let token = self.issue_token(&user)?;
        Ok(AuthSession { token, user })
    }

    async fn technicians(&self) -> Result<Vec<User>, Error> {
        self.users
            .list_by_role(Role::Technician)
            .await
            .map_err(Self::map_user_error)
    }

    async fn provision_staff(
        &self,
        registration: Registration,
        role: Role,
    ) -> Result<User, Error> {
        if role == Role::Student {
            return Err(Error::invalid_request(
                "students register themselves; staff role required",
            ));
        }
        self.create_account(registration, role).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
