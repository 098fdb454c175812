//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::Argon2;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use rand::RngCore as _;
use rand::rngs::OsRng;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

const SALT_LEN: usize = 16;
const DUMMY_PASSWORD: &str = "timing-equaliser-not-a-real-password";

/// Argon2id hasher producing PHC strings.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl Argon2PasswordHasher {
    /// Build the hasher with default Argon2id parameters.
    ///
    /// Hashes a throwaway password once so unknown-user logins can verify
    /// against it.
    pub fn new() -> Result<Self, PasswordHashError> {
        let argon2 = Argon2::default();
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD)?;
        Ok(Self { argon2, dummy_hash })
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, PasswordHashError> {
    let mut bytes = [0_u8; SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    let salt =
        SaltString::encode_b64(&bytes).map_err(|err| PasswordHashError::hash(err.to_string()))?;
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        hash_with(&self.argon2, password)
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }

    fn dummy_hash(&self) -> String {
        self.dummy_hash.clone()
    }
}
