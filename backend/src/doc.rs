//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler under `/api`, the health probes,
//! the domain schema wrappers from [`crate::inbound::http::schemas`] and the
//! three credentials the API accepts: the `auth` session cookie, the same
//! token as a bearer header, and the operator `x-api-key` header.
//!
//! Swagger UI serves the document in debug builds; `openapi-dump` prints it.

use crate::inbound::http::bookings::{BookingDetailsResponse, BookingResponse, CreateBookingRequest};
use crate::inbound::http::schemas::{
    BookingDetailsSchema, BookingSchema, ErrorCodeSchema, ErrorSchema, TrainAvailabilitySchema,
    TrainSchema, UserSchema,
};
use crate::inbound::http::trains::{AvailabilityResponse, CreateTrainRequest, TrainResponse};
use crate::inbound::http::users::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Register the credential schemes referenced by handler annotations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "auth",
                "Session token set by POST /api/login.",
            ))),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Session token returned by POST /api/login."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "AdminApiKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-api-key",
                "Operator key for catalogue changes.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Train seat booking API",
        description = "Accounts, train catalogue, availability search and seat booking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::trains::create_train,
        crate::inbound::http::trains::availability,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        TrainSchema,
        TrainAvailabilitySchema,
        BookingSchema,
        BookingDetailsSchema,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        LoginResponse,
        CreateTrainRequest,
        TrainResponse,
        AvailabilityResponse,
        CreateBookingRequest,
        BookingResponse,
        BookingDetailsResponse,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "trains", description = "Catalogue and availability"),
        (name = "bookings", description = "Seat reservations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
