//! Driving port turning a request's `Authorization` header into a user.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Resolves the caller behind a request.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the raw `Authorization` header value.
    ///
    /// Returns `Ok(None)` for a missing, malformed, expired or forged token
    /// and for tokens naming an unknown user. Storage failures are errors.
    async fn resolve(&self, authorization: Option<&str>) -> Result<Option<User>, Error>;
}
