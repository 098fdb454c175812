//! Seat booking handlers.
//!
//! ```text
//! POST /api/bookings {"trainId":4}
//! GET  /api/bookings/17
//! ```
//!
//! Both routes require a session. The owner of a new booking is always the
//! authenticated caller, never a value from the body.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Booking, BookingDetails, BookingId, TrainId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{BookingDetailsSchema, BookingSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, booking_validation_error, require, train_validation_error,
};

/// Body of `POST /api/bookings`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[schema(minimum = 1, example = 4)]
    pub train_id: Option<i32>,
}

/// `{success, booking}` envelope for a new booking.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub success: bool,
    #[schema(value_type = BookingSchema)]
    pub booking: Booking,
}

/// `{success, booking}` envelope for a booking lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDetailsResponse {
    pub success: bool,
    #[schema(value_type = BookingDetailsSchema)]
    pub booking: BookingDetails,
}

/// Reserve the next free seat on a train for the caller.
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Seat reserved", body = BookingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Train not found", body = ErrorSchema),
        (status = 409, description = "No seats available", body = ErrorSchema),
        (status = 503, description = "Allocation busy; retry", body = ErrorSchema,
            headers(("Retry-After" = String, description = "Seconds to wait")))
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security(("SessionCookie" = []), ("BearerToken" = []))
)]
#[post("/bookings")]
pub async fn create_booking(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let raw = require(payload.into_inner().train_id, FieldName::new("trainId"))?;
    let train_id = TrainId::new(raw).map_err(|err| train_validation_error(&err))?;
    let booking = state.bookings.book_seat(train_id, user.user_id()).await?;
    Ok(HttpResponse::Created().json(BookingResponse {
        success: true,
        booking,
    }))
}

/// Fetch one of the caller's bookings with its train's route.
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = i32, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking", body = BookingDetailsResponse),
        (status = 400, description = "Invalid booking id", body = ErrorSchema),
        (status = 401, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking",
    security(("SessionCookie" = []), ("BearerToken" = []))
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<BookingDetailsResponse>> {
    let booking_id = BookingId::new(path.into_inner())
        .map_err(|err| booking_validation_error(&err, FieldName::new("id")))?;
    let booking = state
        .bookings_query
        .find_booking(booking_id, user.user_id())
        .await?;
    Ok(web::Json(BookingDetailsResponse {
        success: true,
        booking,
    }))
}
