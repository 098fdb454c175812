//! Booking ledger entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::train::{StationName, TrainId, TrainNumber};
use super::user::UserId;

/// Validation errors for booking values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    #[error("booking id must be a positive integer")]
    NonPositiveId,
    #[error("seat number must be at least 1")]
    NonPositiveSeat,
}

/// Ledger identifier of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct BookingId(i32);

impl BookingId {
    pub fn new(id: i32) -> Result<Self, BookingValidationError> {
        if id <= 0 {
            return Err(BookingValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for BookingId {
    type Error = BookingValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookingId> for i32 {
    fn from(value: BookingId) -> Self {
        value.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-based seat position on a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct SeatNumber(i32);

impl SeatNumber {
    pub fn new(seat: i32) -> Result<Self, BookingValidationError> {
        if seat < 1 {
            return Err(BookingValidationError::NonPositiveSeat);
        }
        Ok(Self(seat))
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for SeatNumber {
    type Error = BookingValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeatNumber> for i32 {
    fn from(value: SeatNumber) -> Self {
        value.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Committed seat allocation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub train_id: TrainId,
    pub seat_number: SeatNumber,
    pub booking_date: DateTime<Utc>,
}

/// Route fields shown alongside a booking lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainSummary {
    pub train_number: TrainNumber,
    pub source: StationName,
    pub destination: StationName,
}

/// Booking joined with its train summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(flatten)]
    pub train: TrainSummary,
}
