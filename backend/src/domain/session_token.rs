//! Signed session tokens.
//!
//! A session is an immutable value: identity claims plus an expiry, encoded
//! as a compact HS256 JWS (`header.payload.signature`, base64url without
//! padding). Verification is a pure signature and expiry check against the
//! configured secret and clock; there is no server-side session store.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::auth::Identity;
use super::user::{UserId, Username};

type HmacSha256 = Hmac<Sha256>;

/// Fixed validity window of an issued session.
pub const SESSION_TTL_HOURS: i64 = 24;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Reasons a token failed verification.
///
/// Inbound adapters collapse every variant into the same unauthenticated
/// response so callers cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token could not be encoded: {message}")]
    Encoding { message: String },
}

/// Errors raised when constructing a [`SigningSecret`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningSecretError {
    #[error("signing secret must not be empty")]
    Empty,
}

/// HMAC key used to sign session tokens. Zeroed on drop.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw key material.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SigningSecretError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(SigningSecretError::Empty);
        }
        Ok(Self(bytes))
    }

    /// Number of key bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short SHA-256 fingerprint safe to log for key rotation audits.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_slice());
        hex::encode(digest.get(..8).unwrap_or_default())
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.0.as_slice()).map_err(|err| TokenError::Encoding {
            message: err.to_string(),
        })
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&self.fingerprint())
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Token string plus the metadata needed to set a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Encoded token.
    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }

    /// Instant after which the token is rejected.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Consume and return the encoded token.
    pub fn into_string(self) -> String {
        self.token
    }
}

/// Issues and verifies session tokens.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use booking_backend::domain::{Identity, SessionAuthority, SigningSecret, UserId, Username};
/// use mockable::DefaultClock;
///
/// let authority = SessionAuthority::new(
///     SigningSecret::new(vec![7_u8; 32]).unwrap(),
///     Arc::new(DefaultClock),
/// );
/// let identity = Identity {
///     id: UserId::new(1).unwrap(),
///     username: Username::new("alice").unwrap(),
///     is_admin: false,
/// };
/// let issued = authority.issue(&identity).unwrap();
/// assert_eq!(authority.verify(issued.as_str()).unwrap(), identity);
/// ```
#[derive(Clone)]
pub struct SessionAuthority {
    secret: SigningSecret,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl SessionAuthority {
    /// Create an authority with the standard 24 hour validity window.
    pub fn new(secret: SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            clock,
            ttl: TimeDelta::hours(SESSION_TTL_HOURS),
        }
    }

    /// Validity window applied to newly issued tokens.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Sign a token for `identity`, valid from now until now + TTL.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = SessionClaims {
            id: identity.id.get(),
            username: identity.username.as_ref().to_owned(),
            is_admin: identity.is_admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let header = TokenHeader {
            alg: ALGORITHM.to_owned(),
            typ: Some(TOKEN_TYPE.to_owned()),
        };

        let signing_input = format!("{}.{}", encode_json(&header)?, encode_json(&claims)?);
        let mut mac = self.secret.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(IssuedToken {
            token: format!("{signing_input}.{signature}"),
            expires_at,
        })
    }

    /// Verify signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let token = token.trim();
        let (signing_input, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (header, payload) = signing_input
            .split_once('.')
            .ok_or(TokenError::Malformed)?;
        if payload.contains('.') {
            return Err(TokenError::Malformed);
        }

        let header: TokenHeader = decode_json(header)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.secret.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: SessionClaims = decode_json(payload)?;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(Identity {
            id: UserId::new(claims.id).map_err(|_| TokenError::Malformed)?,
            username: Username::new(&claims.username).map_err(|_| TokenError::Malformed)?,
            is_admin: claims.is_admin,
        })
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let bytes = serde_json::to_vec(value).map_err(|err| TokenError::Encoding {
        message: err.to_string(),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests;
