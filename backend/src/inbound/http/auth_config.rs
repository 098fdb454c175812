//! Authentication configuration parsing and validation.
//!
//! Reads the token signing secret, the operator API key and the cookie
//! security toggle from the environment. Release builds refuse to start
//! with missing or weak values; debug builds fall back to ephemeral secrets
//! and log a warning.

use mockable::Env;
use rand::RngCore as _;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{AdminApiKey, SigningSecret};

/// Environment variable holding the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Environment variable holding the operator API key.
pub const ADMIN_API_KEY_ENV: &str = "ADMIN_API_KEY";
/// Environment variable toggling the `Secure` cookie attribute.
pub const COOKIE_SECURE_ENV: &str = "AUTH_COOKIE_SECURE";
/// Shortest signing secret accepted in release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing secrets and warn.
    Debug,
    /// Release builds require explicit, strong secrets.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use booking_backend::inbound::http::auth_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Credential settings consumed by the HTTP adapter.
#[derive(Debug)]
pub struct AuthSettings {
    /// Secret signing session tokens.
    pub signing_secret: SigningSecret,
    /// Operator key guarding catalogue mutations.
    pub admin_key: AdminApiKey,
    /// Whether the `auth` cookie is marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while validating authentication configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AuthConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        expected: &'static str,
    },
    /// The signing secret is too short for release builds.
    #[error("JWT_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// Build authentication settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use booking_backend::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     "ADMIN_API_KEY" => Some("operator-key".to_owned()),
///     "AUTH_COOKIE_SECURE" => Some("1".to_owned()),
///     _ => None,
/// });
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release).unwrap();
/// assert!(settings.cookie_secure);
/// assert!(settings.admin_key.matches("operator-key"));
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    Ok(AuthSettings {
        signing_secret: signing_secret_from_env(env, mode)?,
        admin_key: admin_key_from_env(env, mode)?,
        cookie_secure: cookie_secure_from_env(env, mode)?,
    })
}

fn random_bytes(len: usize) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0_u8; len]);
    OsRng.fill_bytes(bytes.as_mut_slice());
    bytes
}

fn debug_warn_or_error<T>(
    mode: BuildMode,
    fallback: impl FnOnce() -> Result<T, AuthConfigError>,
    error: AuthConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, AuthConfigError> {
    if mode.is_debug() {
        warn_fn();
        fallback()
    } else {
        Err(error)
    }
}

fn ephemeral_secret() -> Result<SigningSecret, AuthConfigError> {
    SigningSecret::new(random_bytes(EPHEMERAL_SECRET_LEN).to_vec()).map_err(|_| {
        AuthConfigError::InvalidEnv {
            name: JWT_SECRET_ENV,
            expected: "a non-empty secret",
        }
    })
}

fn signing_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningSecret, AuthConfigError> {
    let Some(raw) = env.string(JWT_SECRET_ENV).map(Zeroizing::new) else {
        return debug_warn_or_error(
            mode,
            ephemeral_secret,
            AuthConfigError::MissingEnv {
                name: JWT_SECRET_ENV,
            },
            || warn!("{JWT_SECRET_ENV} not set; using an ephemeral signing secret (dev only)"),
        );
    };

    let length = raw.len();
    if length < JWT_SECRET_MIN_LEN {
        if !mode.is_debug() {
            return Err(AuthConfigError::SecretTooShort {
                length,
                min_len: JWT_SECRET_MIN_LEN,
            });
        }
        warn!(
            length,
            min_len = JWT_SECRET_MIN_LEN,
            "{JWT_SECRET_ENV} is shorter than release builds accept"
        );
    }

    match SigningSecret::new(raw.as_bytes().to_vec()) {
        Ok(secret) => Ok(secret),
        Err(_) => debug_warn_or_error(
            mode,
            ephemeral_secret,
            AuthConfigError::InvalidEnv {
                name: JWT_SECRET_ENV,
                expected: "a non-empty secret",
            },
            || warn!("{JWT_SECRET_ENV} is empty; using an ephemeral signing secret (dev only)"),
        ),
    }
}

fn ephemeral_admin_key() -> Result<AdminApiKey, AuthConfigError> {
    AdminApiKey::new(hex::encode(random_bytes(EPHEMERAL_SECRET_LEN).as_slice())).map_err(|_| {
        AuthConfigError::InvalidEnv {
            name: ADMIN_API_KEY_ENV,
            expected: "a non-blank key",
        }
    })
}

fn admin_key_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AdminApiKey, AuthConfigError> {
    let Some(raw) = env.string(ADMIN_API_KEY_ENV) else {
        return debug_warn_or_error(
            mode,
            ephemeral_admin_key,
            AuthConfigError::MissingEnv {
                name: ADMIN_API_KEY_ENV,
            },
            || {
                warn!("{ADMIN_API_KEY_ENV} not set; catalogue mutations use a random key (dev only)")
            },
        );
    };
    match AdminApiKey::new(raw) {
        Ok(key) => Ok(key),
        Err(_) => debug_warn_or_error(
            mode,
            ephemeral_admin_key,
            AuthConfigError::InvalidEnv {
                name: ADMIN_API_KEY_ENV,
                expected: "a non-blank key",
            },
            || {
                warn!("{ADMIN_API_KEY_ENV} is blank; catalogue mutations use a random key (dev only)")
            },
        ),
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, AuthConfigError> {
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        return Ok(true);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => debug_warn_or_error(
            mode,
            || Ok(true),
            AuthConfigError::InvalidEnv {
                name: COOKIE_SECURE_ENV,
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %value, "invalid {COOKIE_SECURE_ENV}; defaulting to secure"),
        ),
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
