//! In-memory credential store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, Username};

/// Credential store keyed by exact username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, StoredCredentials>>,
    next_id: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredCredentials>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut users = self.lock();
        let key = record.username.as_ref().to_owned();
        if users.contains_key(&key) {
            return Err(UserPersistenceError::duplicate_username());
        }
        let raw_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = UserId::new(raw_id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let user = User::new(id, record.username.clone(), record.is_admin);
        users.insert(
            key,
            StoredCredentials {
                user: user.clone(),
                password_hash: record.password_hash.clone(),
            },
        );
        Ok(user)
    }

    async fn find_credentials_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self.lock().get(username.as_ref()).cloned())
    }
}
