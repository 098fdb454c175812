//! Driving port for account creation.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Hash the password and store a new user.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
