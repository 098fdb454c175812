//! Driving port for login.
//!
//! Inbound adapters call it to exchange credentials for a signed session
//! without knowing the credential store or hashing backend.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials, User};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}
