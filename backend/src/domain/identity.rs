//! Bearer token identity resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{IdentityResolver, UserRepository};
use crate::domain::{Error, TokenService, User};

const BEARER: &str = "bearer";

/// Extract the token from an `Authorization` header value.
///
/// The scheme matches case-insensitively and the token is trimmed. Anything
/// other than `Bearer <token>` yields `None`.
///
/// # Examples
/// ```
/// use complaint_desk::domain::bearer_token;
///
/// assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
/// assert_eq!(bearer_token(Some("bearer   abc ")), Some("abc"));
/// assert_eq!(bearer_token(Some("Basic dXNlcg==")), None);
/// assert_eq!(bearer_token(None), None);
/// ```
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves callers by verifying their bearer token and loading the user.
pub struct BearerIdentityResolver<U> {
    tokens: Arc<TokenService>,
    users: Arc<U>,
}

impl<U> BearerIdentityResolver<U> {
    pub fn new(tokens: Arc<TokenService>, users: Arc<U>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl<U> IdentityResolver for BearerIdentityResolver<U>
where
    U: UserRepository,
{
    async fn resolve(&self, authorization: Option<&str>) -> Result<Option<User>, Error> {
        let Some(token) = bearer_token(authorization) else {
            debug!("no bearer token presented");
            return Ok(None);
        };
        let user_id = match self.tokens.verify(token) {
            Ok(user_id) => user_id,
            Err(err) => {
                info!(reason = %err, "bearer token rejected");
                return Ok(None);
            }
        };
        match self.users.find_by_id(&user_id).await {
            Ok(Some(user)) => Ok(Some(user)),
            Ok(None) => {
                warn!(user_id = %user_id, "valid token names an unknown user");
                Ok(None)
            }
            Err(err) => Err(Error::internal(format!("failed to load identity: {err}"))),
        }
    }
}
