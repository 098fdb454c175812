//! Account handlers.
//!
//! ```text
//! POST /api/register {"username":"ada","password":"correct horse","isAdmin":false}
//! POST /api/login {"username":"ada","password":"correct horse"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::session_cookie;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_validation_error, registration_validation_error, require,
};

/// Registration request body for `POST /api/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = crate::domain::Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let username = require(value.username, FieldName::new("username"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Self::try_from_parts(&username, &password, value.is_admin)
            .map_err(|err| registration_validation_error(&err))
    }
}

/// Login request body for `POST /api/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "correct horse")]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = crate::domain::Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let username = require(value.username, FieldName::new("username"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Self::try_from_parts(&username, &password).map_err(|err| login_validation_error(&err))
    }
}

/// `{success, user}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    #[schema(value_type = UserSchema)]
    pub user: User,
}

/// `{success, token, user}` envelope returned by login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    /// Session token; also set as the `auth` cookie.
    pub token: String,
    #[schema(value_type = UserSchema)]
    pub user: User,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already exists", body = ErrorSchema),
        (status = 503, description = "Credential store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.registration.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse {
        success: true,
        user,
    }))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "auth cookie carrying the token"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Credential store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let outcome = state.login.login(&credentials).await?;
    let cookie = session_cookie(
        &outcome.token,
        state.auth.sessions.ttl().num_seconds(),
        state.auth.cookie_secure,
    );
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        success: true,
        token: outcome.token.into_string(),
        user: outcome.user,
    }))
}
