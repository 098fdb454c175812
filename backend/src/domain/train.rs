//! Train route records owned by the catalogue.
//!
//! A train is read-only from the seat allocator's point of view; only its
//! capacity matters there, and that value is read under the allocation lock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a train number.
pub const TRAIN_NUMBER_MAX: usize = 20;
/// Maximum length of a station name.
pub const STATION_NAME_MAX: usize = 100;

/// Validation errors for train values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrainValidationError {
    #[error("train id must be a positive integer")]
    NonPositiveId,
    #[error("train number must not be empty")]
    EmptyTrainNumber,
    #[error("train number must be at most {max} characters")]
    TrainNumberTooLong { max: usize },
    #[error("{field} must not be empty")]
    EmptyStation { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    StationTooLong { field: &'static str, max: usize },
    #[error("total seats must be at least 1")]
    NonPositiveCapacity,
}

impl TrainValidationError {
    /// Wire field name the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveId => "trainId",
            Self::EmptyTrainNumber | Self::TrainNumberTooLong { .. } => "trainNumber",
            Self::EmptyStation { field } | Self::StationTooLong { field, .. } => field,
            Self::NonPositiveCapacity => "totalSeats",
        }
    }
}

/// Catalogue identifier of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TrainId(i32);

impl TrainId {
    pub fn new(id: i32) -> Result<Self, TrainValidationError> {
        if id <= 0 {
            return Err(TrainValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for TrainId {
    type Error = TrainValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrainId> for i32 {
    fn from(value: TrainId) -> Self {
        value.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn bounded_text(
    raw: &str,
    max: usize,
    empty: TrainValidationError,
    too_long: TrainValidationError,
) -> Result<String, TrainValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Public, unique train number such as `"IC-101"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrainNumber(String);

impl TrainNumber {
    pub fn new(value: impl AsRef<str>) -> Result<Self, TrainValidationError> {
        bounded_text(
            value.as_ref(),
            TRAIN_NUMBER_MAX,
            TrainValidationError::EmptyTrainNumber,
            TrainValidationError::TrainNumberTooLong {
                max: TRAIN_NUMBER_MAX,
            },
        )
        .map(Self)
    }
}

impl TryFrom<String> for TrainNumber {
    type Error = TrainValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrainNumber> for String {
    fn from(value: TrainNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for TrainNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Origin or destination station name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String")]
pub struct StationName(String);

impl StationName {
    /// Validate a station name; `field` names the wire field for error reports.
    pub fn new(value: impl AsRef<str>, field: &'static str) -> Result<Self, TrainValidationError> {
        bounded_text(
            value.as_ref(),
            STATION_NAME_MAX,
            TrainValidationError::EmptyStation { field },
            TrainValidationError::StationTooLong {
                field,
                max: STATION_NAME_MAX,
            },
        )
        .map(Self)
    }
}

impl From<StationName> for String {
    fn from(value: StationName) -> Self {
        value.0
    }
}

impl AsRef<str> for StationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Total number of seats on a train. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct SeatCapacity(i32);

impl SeatCapacity {
    pub fn new(seats: i32) -> Result<Self, TrainValidationError> {
        if seats < 1 {
            return Err(TrainValidationError::NonPositiveCapacity);
        }
        Ok(Self(seats))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for SeatCapacity {
    type Error = TrainValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeatCapacity> for i32 {
    fn from(value: SeatCapacity) -> Self {
        value.0
    }
}

/// Validated request to add a train to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrain {
    pub train_number: TrainNumber,
    pub source: StationName,
    pub destination: StationName,
    pub total_seats: SeatCapacity,
}

impl NewTrain {
    /// Validate raw catalogue input.
    pub fn try_from_parts(
        train_number: &str,
        source: &str,
        destination: &str,
        total_seats: i32,
    ) -> Result<Self, TrainValidationError> {
        Ok(Self {
            train_number: TrainNumber::new(train_number)?,
            source: StationName::new(source, "source")?,
            destination: StationName::new(destination, "destination")?,
            total_seats: SeatCapacity::new(total_seats)?,
        })
    }
}

/// Catalogue train record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    pub id: TrainId,
    pub train_number: TrainNumber,
    pub source: StationName,
    pub destination: StationName,
    pub total_seats: SeatCapacity,
}

/// Route filter for availability reports. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub source: StationName,
    pub destination: StationName,
}

impl RouteQuery {
    pub fn try_from_parts(source: &str, destination: &str) -> Result<Self, TrainValidationError> {
        Ok(Self {
            source: StationName::new(source, "source")?,
            destination: StationName::new(destination, "destination")?,
        })
    }

    /// Whether `train` runs this route, ignoring case.
    #[must_use]
    pub fn matches(&self, train: &Train) -> bool {
        train
            .source
            .as_ref()
            .eq_ignore_ascii_case(self.source.as_ref())
            && train
                .destination
                .as_ref()
                .eq_ignore_ascii_case(self.destination.as_ref())
    }
}

/// A train with the number of seats still free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainAvailability {
    #[serde(flatten)]
    pub train: Train,
    pub available_seats: i32,
}

impl TrainAvailability {
    /// Compute availability from a booked-seat count, clamped at zero.
    #[must_use]
    pub fn from_booked(train: Train, booked: i64) -> Self {
        let capacity = i64::from(train.total_seats.get());
        let free = (capacity - booked).max(0);
        Self {
            train,
            available_seats: i32::try_from(free).unwrap_or(0),
        }
    }
}
