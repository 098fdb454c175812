//! Credential extractors used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential checks and identity derivation here. Handlers name what they
//! need in their signature:
//!
//! - [`AuthenticatedUser`] verifies the session token from the `auth` cookie
//!   or an `Authorization: Bearer` header.
//! - [`AdminAccess`] checks the `x-api-key` header against the operator key.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, Identity, IssuedToken, UserId};

use super::state::{HttpAuth, HttpState};

/// Cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth";
/// Header carrying the operator key for catalogue mutations.
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

const BEARER_PREFIX: &str = "Bearer ";
const UNAUTHENTICATED: &str = "Authentication required";

fn http_auth(req: &HttpRequest) -> Result<&HttpAuth, Error> {
    req.app_data::<web::Data<HttpState>>()
        .map(|state| &state.get_ref().auth)
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

fn presented_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(AUTH_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix(BEARER_PREFIX)
        .map(|token| token.trim().to_owned())
}

/// Identity of the caller, proven by a valid session token.
///
/// Missing, malformed, tampered and expired tokens all yield the same
/// `401 Unauthorized` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(Identity);

impl AuthenticatedUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn user_id(&self) -> UserId {
        self.0.id
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, Error> {
        let auth = http_auth(req)?;
        let Some(token) = presented_token(req) else {
            debug!("request carried no session token");
            return Err(Error::unauthorized(UNAUTHENTICATED));
        };
        auth.sessions.verify(&token).map(Self).map_err(|error| {
            debug!(%error, "session token rejected");
            Error::unauthorized(UNAUTHENTICATED)
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

/// Proof that the request presented the operator key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminAccess;

impl AdminAccess {
    fn from_http_request(req: &HttpRequest) -> Result<Self, Error> {
        let auth = http_auth(req)?;
        // Non-UTF-8 header bytes can never equal the key.
        let presented = req
            .headers()
            .get(ADMIN_KEY_HEADER)
            .map(|value| value.to_str().unwrap_or_default());
        auth.admin_key.authorize(presented).map(|()| Self)
    }
}

impl FromRequest for AdminAccess {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

/// Build the `auth` cookie for a freshly issued token.
///
/// The cookie lives exactly as long as the token.
pub fn session_cookie(token: &IssuedToken, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token.as_str().to_owned())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}
