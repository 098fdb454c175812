//! Account registration and login.
//!
//! Hashing and verification run on the blocking pool. Login always performs
//! one password verification, using the hasher's dummy hash when the
//! username is unknown, so both failure paths cost the same.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginOutcome, LoginService, NewUserRecord, PasswordHashError, PasswordHasher,
    UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{
    Error, Identity, LoginCredentials, Registration, SessionAuthority, User, Username,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateUsername => Error::conflict("Username already exists")
            .with_details(json!({ "field": "username", "code": "duplicate_username" })),
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Service implementing [`LoginService`] and [`UserRegistration`].
#[derive(Clone)]
pub struct AuthService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    sessions: SessionAuthority,
}

impl<U, H> AuthService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, sessions: SessionAuthority) -> Self {
        Self {
            users,
            hasher,
            sessions,
        }
    }
}

impl<U, H> AuthService<U, H>
where
    H: PasswordHasher + 'static,
{
    async fn run_hasher<T, F>(&self, job: F) -> Result<T, Error>
    where
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
        T: Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || job(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U, H> LoginService for AuthService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let stored = match Username::new(credentials.username()) {
            Ok(username) => self
                .users
                .find_credentials_by_username(&username)
                .await
                .map_err(map_user_error)?,
            Err(_) => None,
        };

        let (user, stored_hash) = match stored {
            Some(stored) => (Some(stored.user), stored.password_hash),
            None => (None, self.hasher.dummy_hash()),
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let matched = self
            .run_hasher(move |hasher| hasher.verify(&password, &stored_hash))
            .await?;

        let user = match (matched, user) {
            (true, Some(user)) => user,
            _ => {
                debug!("login rejected");
                return Err(Error::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let token = self
            .sessions
            .issue(&Identity::from(&user))
            .map_err(|err| Error::internal(format!("failed to issue session token: {err}")))?;
        info!(user_id = %user.id(), "user logged in");
        Ok(LoginOutcome { user, token })
    }
}

#[async_trait]
impl<U, H> UserRegistration for AuthService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password = Zeroizing::new(registration.password().to_owned());
        let password_hash = self
            .run_hasher(move |hasher| hasher.hash(&password))
            .await?;

        let record = NewUserRecord {
            username: registration.username().clone(),
            password_hash,
            is_admin: registration.is_admin(),
        };
        let user = self.users.create(&record).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), is_admin = user.is_admin(), "user registered");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
