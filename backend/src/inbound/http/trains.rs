//! Train catalogue handlers.
//!
//! ```text
//! POST /api/trains            (x-api-key) {"trainNumber":"IC-101","source":"Oslo","destination":"Bergen","totalSeats":120}
//! GET  /api/availability?source=Oslo&destination=Bergen
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{NewTrain, RouteQuery, Train, TrainAvailability};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminAccess;
use crate::inbound::http::schemas::{ErrorSchema, TrainAvailabilitySchema, TrainSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require, train_validation_error};

/// Catalogue entry submitted by an operator.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainRequest {
    #[schema(example = "IC-101")]
    pub train_number: Option<String>,
    #[schema(example = "Oslo")]
    pub source: Option<String>,
    #[schema(example = "Bergen")]
    pub destination: Option<String>,
    #[schema(minimum = 1, example = 120)]
    pub total_seats: Option<i32>,
}

impl TryFrom<CreateTrainRequest> for NewTrain {
    type Error = crate::domain::Error;

    fn try_from(value: CreateTrainRequest) -> Result<Self, Self::Error> {
        let train_number = require(value.train_number, FieldName::new("trainNumber"))?;
        let source = require(value.source, FieldName::new("source"))?;
        let destination = require(value.destination, FieldName::new("destination"))?;
        let total_seats = require(value.total_seats, FieldName::new("totalSeats"))?;
        Self::try_from_parts(&train_number, &source, &destination, total_seats)
            .map_err(|err| train_validation_error(&err))
    }
}

/// Route filter for `GET /api/availability`.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParams {
    /// Departure station, matched case-insensitively.
    pub source: Option<String>,
    /// Arrival station, matched case-insensitively.
    pub destination: Option<String>,
}

impl TryFrom<AvailabilityParams> for RouteQuery {
    type Error = crate::domain::Error;

    fn try_from(value: AvailabilityParams) -> Result<Self, Self::Error> {
        let source = require(value.source, FieldName::new("source"))?;
        let destination = require(value.destination, FieldName::new("destination"))?;
        Self::try_from_parts(&source, &destination).map_err(|err| train_validation_error(&err))
    }
}

/// `{success, train}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrainResponse {
    pub success: bool,
    #[schema(value_type = TrainSchema)]
    pub train: Train,
}

/// `{success, trains}` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub success: bool,
    #[schema(value_type = Vec<TrainAvailabilitySchema>)]
    pub trains: Vec<TrainAvailability>,
}

/// Add a train route to the catalogue.
#[utoipa::path(
    post,
    path = "/api/trains",
    request_body = CreateTrainRequest,
    responses(
        (status = 201, description = "Train created", body = TrainResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Admin API key missing", body = ErrorSchema),
        (status = 403, description = "Admin API key rejected", body = ErrorSchema),
        (status = 409, description = "Train number already exists", body = ErrorSchema)
    ),
    tags = ["trains"],
    operation_id = "createTrain",
    security(("AdminApiKey" = []))
)]
#[post("/trains")]
pub async fn create_train(
    _admin: AdminAccess,
    state: web::Data<HttpState>,
    payload: web::Json<CreateTrainRequest>,
) -> ApiResult<HttpResponse> {
    let new_train = NewTrain::try_from(payload.into_inner())?;
    let train = state.trains.create_train(new_train).await?;
    Ok(HttpResponse::Created().json(TrainResponse {
        success: true,
        train,
    }))
}

/// Trains on a route that still have free seats.
#[utoipa::path(
    get,
    path = "/api/availability",
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Trains with free seats", body = AvailabilityResponse),
        (status = 400, description = "Missing route parameters", body = ErrorSchema)
    ),
    tags = ["trains"],
    operation_id = "availability",
    security([])
)]
#[get("/availability")]
pub async fn availability(
    state: web::Data<HttpState>,
    params: web::Query<AvailabilityParams>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let route = RouteQuery::try_from(params.into_inner())?;
    let trains = state.availability.availability(route).await?;
    Ok(web::Json(AvailabilityResponse {
        success: true,
        trains,
    }))
}
