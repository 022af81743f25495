//! Stateless bearer tokens signed with HMAC-SHA256.
//!
//! Tokens use the compact JWS layout: three URL-safe base64 segments
//! (`header.payload.signature`, no padding). The header names the signing
//! key through `kid`, a fingerprint of the secret, so a previous key can keep
//! verifying live tokens while a new key issues fresh ones.
//!
//! Tokens cannot be revoked. A token stays valid until `exp` even if the
//! user's password or role changes in the meantime.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";
/// Length of the key fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Reasons a token fails verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token must have exactly three segments")]
    Malformed,
    #[error("token segment could not be decoded")]
    Undecodable,
    #[error("unsupported token algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("token signed with unknown key '{0}'")]
    UnknownKey(String),
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token could not be encoded: {0}")]
    Encoding(String),
}

/// Generate a truncated SHA-256 fingerprint of key material.
///
/// # Examples
/// ```
/// use complaint_desk::domain::key_fingerprint;
///
/// let fp = key_fingerprint(b"secret");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// HMAC signing secret with its fingerprint.
pub struct SigningKey {
    id: String,
    secret: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            id: key_fingerprint(&secret),
            secret: Zeroizing::new(secret),
        }
    }

    /// Fingerprint used as the token `kid`.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| TokenError::Encoding(err.to_string()))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Active signing key plus an optional retired key still accepted for
/// verification.
#[derive(Debug)]
pub struct TokenKeyring {
    active: SigningKey,
    previous: Option<SigningKey>,
}

impl TokenKeyring {
    pub fn new(active: SigningKey) -> Self {
        Self {
            active,
            previous: None,
        }
    }

    #[must_use]
    pub fn with_previous(mut self, previous: SigningKey) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn active(&self) -> &SigningKey {
        &self.active
    }

    pub fn previous(&self) -> Option<&SigningKey> {
        self.previous.as_ref()
    }

    fn find(&self, kid: Option<&str>) -> Result<&SigningKey, TokenError> {
        let Some(kid) = kid else {
            return Ok(&self.active);
        };
        if self.active.id == kid {
            return Ok(&self.active);
        }
        self.previous
            .as_ref()
            .filter(|key| key.id == kid)
            .ok_or_else(|| TokenError::UnknownKey(kid.to_owned()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kid: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: UserId,
    exp: i64,
}

/// Issues and verifies bearer tokens.
pub struct TokenService {
    keys: TokenKeyring,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(keys: TokenKeyring, clock: Arc<dyn Clock>) -> Self {
        Self { keys, clock }
    }

    /// Fingerprint of the key used for new tokens.
    pub fn active_key_id(&self) -> &str {
        self.keys.active.id()
    }

    /// Issue a token for the user, expiring [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        let key = &self.keys.active;
        let header = Header {
            alg: ALGORITHM.to_owned(),
            typ: TOKEN_TYPE.to_owned(),
            kid: Some(key.id.clone()),
        };
        let claims = Claims {
            user_id,
            exp: self.clock.utc().timestamp() + TOKEN_TTL_SECS,
        };
        let signing_input = format!("{}.{}", encode_json(&header)?, encode_json(&claims)?);
        let mut mac = key.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify the token and return the user it was issued for.
    ///
    /// The signature comparison is constant-time. A token is still valid at
    /// the exact second of `exp` and rejected from the next second on.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let parsed_header: Header = decode_json(header)?;
        if parsed_header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm(parsed_header.alg));
        }
        let key = self.keys.find(parsed_header.kid.as_deref())?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::BadSignature)?;
        let mut mac = key.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_json(payload)?;
        if is_expired(claims.exp, self.clock.utc()) {
            return Err(TokenError::Expired);
        }
        Ok(claims.user_id)
    }
}

fn is_expired(exp: i64, now: DateTime<Utc>) -> bool {
    exp < now.timestamp()
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let bytes = serde_json::to_vec(value).map_err(|err| TokenError::Encoding(err.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn decode_json<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Undecodable)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Undecodable)
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
