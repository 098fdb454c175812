//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`api_scope`] mounts every handler under `/api` together with the
//! extractor configs that turn malformed input into the standard error body.

pub mod auth;
pub mod auth_config;
pub mod bookings;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trains;
pub mod users;
mod validation;

pub use error::ApiResult;

use actix_web::{HttpRequest, Scope, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// JSON body settings: undecodable payloads become `invalid_request`
/// errors with the standard error body instead of Actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            debug!(error = %err, "rejected request body");
            Error::invalid_request("Request body is not valid JSON for this endpoint")
                .with_details(json!({ "code": "malformed_body" }))
                .into()
        })
}

/// Query string settings mirroring [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        debug!(error = %err, "rejected query string");
        Error::invalid_request("Query string is invalid for this endpoint")
            .with_details(json!({ "code": "malformed_query" }))
            .into()
    })
}

/// Path parameter settings mirroring [`json_config`].
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        debug!(error = %err, "rejected path parameter");
        Error::invalid_request("Path parameter is invalid for this endpoint")
            .with_details(json!({ "code": "malformed_path" }))
            .into()
    })
}

/// The `/api` scope with all REST handlers and extractor configs.
///
/// Callers register [`state::HttpState`] as `web::Data` on the app.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(users::register)
        .service(users::login)
        .service(trains::create_train)
        .service(trains::availability)
        .service(bookings::create_booking)
        .service(bookings::get_booking)
}
