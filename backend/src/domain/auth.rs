//! Authentication primitives: login credentials and registration details.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::user::{EmailAddress, FullName, UserValidationError, Username, optional_text};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is trimmed, lowercased, and non-empty.
/// - `password` is non-empty and retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use complaint_desk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@University.edu", "secret").unwrap();
/// assert_eq!(creds.email(), "admin@university.edu");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error(transparent)]
    Profile(#[from] UserValidationError),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

impl RegistrationValidationError {
    /// Name of the offending request field, for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Profile(
                UserValidationError::EmptyFullName | UserValidationError::FullNameTooLong { .. },
            ) => "full_name",
            Self::Profile(
                UserValidationError::EmptyUsername
                | UserValidationError::UsernameTooLong { .. }
                | UserValidationError::UsernameWhitespace,
            ) => "username",
            Self::Profile(
                UserValidationError::EmptyEmail
                | UserValidationError::EmailTooLong { .. }
                | UserValidationError::InvalidEmail,
            ) => "email",
            Self::Profile(UserValidationError::UnknownRole(_)) => "role",
            Self::Profile(UserValidationError::InvalidId) => "id",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

/// Validated profile fields shared by registration and staff provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub(crate) full_name: FullName,
    pub(crate) username: Username,
    pub(crate) email: EmailAddress,
    pub(crate) department: Option<String>,
    pub(crate) phone: Option<String>,
}

impl AccountProfile {
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationParts<'a> {
    pub full_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub department: Option<&'a str>,
    pub phone: Option<&'a str>,
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use complaint_desk::domain::{Registration, RegistrationParts};
///
/// let registration = Registration::try_from_parts(RegistrationParts {
///     full_name: "Ada Lovelace",
///     username: "ada",
///     email: "ada@university.edu",
///     password: "correct horse",
///     ..RegistrationParts::default()
/// })
/// .unwrap();
/// assert_eq!(registration.profile().username().as_str(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    profile: AccountProfile,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_from_parts(parts: RegistrationParts<'_>) -> Result<Self, RegistrationValidationError> {
        let profile = AccountProfile {
            full_name: FullName::new(parts.full_name)?,
            username: Username::new(parts.username)?,
            email: EmailAddress::new(parts.email)?,
            department: optional_text(parts.department),
            phone: optional_text(parts.phone),
        };
        if parts.password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            profile,
            password: Zeroizing::new(parts.password.to_owned()),
        })
    }

    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub(crate) fn into_profile(self) -> AccountProfile {
        self.profile
    }
}
