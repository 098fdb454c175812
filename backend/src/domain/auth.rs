//! Authentication primitives: login credentials, registrations and the
//! identity carried by a verified session token.
//!
//! Constructors validate raw strings so inbound adapters never hand
//! unchecked input to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::user::{User, UserId, UserValidationError, Username};

/// Shortest password accepted at registration.
pub const PASSWORD_MIN: usize = 8;
/// Longest password accepted at registration; bounds hashing cost.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use booking_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "hunter22").unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while validating a registration request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("{0}")]
    Username(#[from] UserValidationError),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

/// Validated request to create a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
    is_admin: bool,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(username)?;
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(RegistrationValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
            is_admin,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Identity claims carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub username: Username,
    pub is_admin: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().clone(),
            is_admin: user.is_admin(),
        }
    }
}

impl From<Identity> for User {
    fn from(identity: Identity) -> Self {
        Self::new(identity.id, identity.username, identity.is_admin)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_trim_username_but_not_password() {
        let creds = LoginCredentials::try_from_parts("  alice ", " pass ").expect("valid");
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), " pass ");
    }

    #[rstest]
    #[case("alice", "short", RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("alice", &"p".repeat(PASSWORD_MAX + 1), RegistrationValidationError::PasswordTooLong { max: PASSWORD_MAX })]
    #[case("  ", "long enough", RegistrationValidationError::Username(UserValidationError::EmptyUsername))]
    fn invalid_registrations(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = Registration::try_from_parts(username, password, false)
            .expect_err("invalid registration must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_keeps_admin_flag() {
        let registration =
            Registration::try_from_parts(" root ", "correct horse", true).expect("valid");
        assert_eq!(registration.username().as_ref(), "root");
        assert!(registration.is_admin());
    }

    #[rstest]
    fn identity_round_trips_through_user() {
        let user = User::new(
            UserId::new(3).expect("id"),
            Username::new("carol").expect("name"),
            true,
        );
        let identity = Identity::from(&user);
        assert_eq!(User::from(identity), user);
    }
}
