//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with stored state, such as a sold-out train.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is temporarily unavailable; the request may be retried.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "No seats available")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "trainId", "code": "..."}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[schema(rename_all = "camelCase")]
pub struct UserSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "ada")]
    username: String,
    is_admin: bool,
}

/// OpenAPI schema for [`crate::domain::Train`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Train)]
#[schema(rename_all = "camelCase")]
pub struct TrainSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "IC-101")]
    train_number: String,
    #[schema(example = "Oslo")]
    source: String,
    #[schema(example = "Bergen")]
    destination: String,
    #[schema(minimum = 1, example = 120)]
    total_seats: i32,
}

/// OpenAPI schema for [`crate::domain::TrainAvailability`].
///
/// A train plus the number of seats still free on it.
#[derive(ToSchema)]
#[schema(as = crate::domain::TrainAvailability)]
#[schema(rename_all = "camelCase")]
pub struct TrainAvailabilitySchema {
    id: i32,
    train_number: String,
    source: String,
    destination: String,
    total_seats: i32,
    #[schema(minimum = 1, example = 37)]
    available_seats: i32,
}

/// OpenAPI schema for [`crate::domain::Booking`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Booking)]
#[schema(rename_all = "camelCase")]
pub struct BookingSchema {
    id: i32,
    user_id: i32,
    train_id: i32,
    #[schema(minimum = 1, example = 3)]
    seat_number: i32,
    #[schema(value_type = String, format = DateTime)]
    booking_date: String,
}

/// OpenAPI schema for [`crate::domain::BookingDetails`].
///
/// A booking flattened together with its train's number and route.
#[derive(ToSchema)]
#[schema(as = crate::domain::BookingDetails)]
#[schema(rename_all = "camelCase")]
pub struct BookingDetailsSchema {
    id: i32,
    user_id: i32,
    train_id: i32,
    seat_number: i32,
    #[schema(value_type = String, format = DateTime)]
    booking_date: String,
    train_number: String,
    source: String,
    destination: String,
}
