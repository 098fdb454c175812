//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-run domain validation, so a row that violates an invariant
//! surfaces as a query error instead of a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::StoredCredentials;
use crate::domain::{
    Booking, BookingId, SeatCapacity, SeatNumber, StationName, Train, TrainId, TrainNumber, User,
    UserId, Username,
};

use super::schema::{bookings, trains, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        let id = UserId::new(self.id).map_err(|err| format!("users.id {}: {err}", self.id))?;
        let username =
            Username::new(&self.username).map_err(|err| format!("users.username: {err}"))?;
        Ok(User::new(id, username, self.is_admin))
    }

    pub(crate) fn into_credentials(self) -> Result<StoredCredentials, String> {
        let password_hash = self.password_hash.clone();
        Ok(StoredCredentials {
            user: self.into_user()?,
            password_hash,
        })
    }
}

/// Row struct for reading from the trains table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trains)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrainRow {
    pub id: i32,
    pub train_number: String,
    pub source: String,
    pub destination: String,
    pub total_seats: i32,
}

/// Insertable struct for creating new train records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trains)]
pub(crate) struct NewTrainRow<'a> {
    pub train_number: &'a str,
    pub source: &'a str,
    pub destination: &'a str,
    pub total_seats: i32,
}

impl TryFrom<TrainRow> for Train {
    type Error = String;

    fn try_from(row: TrainRow) -> Result<Self, Self::Error> {
        let invalid =
            |err: crate::domain::TrainValidationError| format!("trains.{}: {err}", err.field());
        Ok(Self {
            id: TrainId::new(row.id).map_err(invalid)?,
            train_number: TrainNumber::new(&row.train_number).map_err(invalid)?,
            source: StationName::new(&row.source, "source").map_err(invalid)?,
            destination: StationName::new(&row.destination, "destination").map_err(invalid)?,
            total_seats: SeatCapacity::new(row.total_seats).map_err(invalid)?,
        })
    }
}

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i32,
    pub user_id: i32,
    pub train_id: i32,
    pub seat_number: i32,
    pub booked_at: DateTime<Utc>,
}

/// Insertable struct for a new ledger entry.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow {
    pub user_id: i32,
    pub train_id: i32,
    pub seat_number: i32,
}

impl TryFrom<BookingRow> for Booking {
    type Error = String;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::new(row.id).map_err(|err| format!("bookings.id: {err}"))?,
            user_id: UserId::new(row.user_id).map_err(|err| format!("bookings.user_id: {err}"))?,
            train_id: TrainId::new(row.train_id)
                .map_err(|err| format!("bookings.train_id: {err}"))?,
            seat_number: SeatNumber::new(row.seat_number)
                .map_err(|err| format!("bookings.seat_number: {err}"))?,
            booking_date: row.booked_at,
        })
    }
}
