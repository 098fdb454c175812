//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence adapters, and the services that implement driving ports.
//! Types are immutable once constructed; constructors validate raw input.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Train, Booking and their identifier types.
//! - SessionAuthority and AdminApiKey: credential checks.
//! - SeatMap / SeatAssignmentPolicy: the seat choice made under lock.
//! - AuthService, CatalogueService, SeatAllocationService.

pub mod admin_key;
pub mod auth;
mod auth_service;
pub mod booking;
mod catalogue_service;
pub mod error;
pub mod ports;
mod seat_allocation_service;
pub mod seat_policy;
pub mod session_token;
pub mod trace_id;
pub mod train;
pub mod user;

pub use self::admin_key::{AdminApiKey, AdminApiKeyError};
pub use self::auth::{
    Identity, LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, Registration,
    RegistrationValidationError,
};
pub use self::auth_service::AuthService;
pub use self::booking::{
    Booking, BookingDetails, BookingId, BookingValidationError, SeatNumber, TrainSummary,
};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::seat_allocation_service::SeatAllocationService;
pub use self::seat_policy::{SeatAssignmentPolicy, SeatMap, SoldOut, UnknownSeatPolicy};
pub use self::session_token::{
    IssuedToken, SESSION_TTL_HOURS, SessionAuthority, SessionClaims, SigningSecret,
    SigningSecretError, TokenError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::train::{
    NewTrain, RouteQuery, STATION_NAME_MAX, SeatCapacity, StationName, TRAIN_NUMBER_MAX, Train,
    TrainAvailability, TrainId, TrainNumber, TrainValidationError,
};
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use booking_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
