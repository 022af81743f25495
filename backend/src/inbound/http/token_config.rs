//! Token signing key configuration.
//!
//! Reads the HMAC secrets from files named in the environment and builds the
//! [`TokenKeyring`] shared by every request. Release builds refuse to start
//! without a real key; debug builds fall back to a random per-process key so
//! local development needs no secrets.

use std::path::{Path, PathBuf};

use mockable::Env;
use rand::RngCore;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::domain::{SigningKey, TokenKeyring};

const TOKEN_KEY_DEFAULT_PATH: &str = "/var/run/secrets/token_key";
/// Minimum secret length accepted in release builds.
pub const TOKEN_KEY_MIN_LEN: usize = 32;
const KEY_FILE_ENV: &str = "TOKEN_KEY_FILE";
const PREVIOUS_KEY_FILE_ENV: &str = "TOKEN_PREVIOUS_KEY_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing or short keys with a warning.
    Debug,
    /// Release builds require a readable key of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use complaint_desk::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading token keys.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading a key file failed.
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short for release builds.
    #[error("token key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// The key file exists but is empty.
    #[error("token key at {path} is empty")]
    EmptyKey { path: PathBuf },
    /// Release builds must not sign with a random key.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build the token keyring from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use complaint_desk::inbound::http::token_config::{BuildMode, keyring_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("token_key_example");
/// std::fs::write(&key_path, vec![b'k'; 32])?;
///
/// let key_path = key_path.to_str().expect("valid path").to_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "TOKEN_KEY_FILE" => Some(key_path.clone()),
///     _ => None,
/// });
///
/// let keyring = keyring_from_env(&env, BuildMode::Release)?;
/// assert!(keyring.previous().is_none());
/// # Ok(())
/// # }
/// ```
pub fn keyring_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<TokenKeyring, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| TOKEN_KEY_DEFAULT_PATH.to_owned()),
    );
    let active = match read_key(&path, mode) {
        Ok(key) => key,
        Err(TokenConfigError::KeyRead { path, source }) if allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary token signing key (dev only)"
            );
            ephemeral_key()
        }
        Err(err) => return Err(err),
    };
    info!(kid = active.id(), "token signing key loaded");

    let mut keyring = TokenKeyring::new(active);
    if let Some(previous_path) = env.string(PREVIOUS_KEY_FILE_ENV) {
        match read_key(Path::new(&previous_path), mode) {
            Ok(previous) => {
                info!(kid = previous.id(), "previous token key accepted for verification");
                keyring = keyring.with_previous(previous);
            }
            Err(err) if mode.is_debug() => {
                warn!(error = %err, "ignoring unreadable previous token key");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(keyring)
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(mode.is_debug());
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(TokenConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to enabled");
            Ok(true)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn read_key(path: &Path, mode: BuildMode) -> Result<SigningKey, TokenConfigError> {
    let mut bytes = std::fs::read(path).map_err(|source| TokenConfigError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let length = bytes.len();
    if length == 0 {
        return Err(TokenConfigError::EmptyKey {
            path: path.to_path_buf(),
        });
    }
    if length < TOKEN_KEY_MIN_LEN {
        if mode.is_debug() {
            warn!(path = %path.display(), length, "token key shorter than release minimum");
        } else {
            bytes.zeroize();
            return Err(TokenConfigError::KeyTooShort {
                path: path.to_path_buf(),
                length,
                min_len: TOKEN_KEY_MIN_LEN,
            });
        }
    }
    Ok(SigningKey::new(bytes))
}

fn ephemeral_key() -> SigningKey {
    let mut secret = vec![0_u8; TOKEN_KEY_MIN_LEN];
    rand::thread_rng().fill_bytes(&mut secret);
    SigningKey::new(secret)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
