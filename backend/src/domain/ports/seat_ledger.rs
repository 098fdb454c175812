//! Port for the booking ledger and its seat-allocation transaction.
//!
//! `reserve_seat` is the only write path for bookings. An adapter must run
//! it as one unit of work that holds an exclusive per-train lock while it
//! reads capacity and taken seats, picks a seat with
//! [`crate::domain::SeatMap::next_free`], and inserts the booking. Nothing
//! may be written when the call fails.

use async_trait::async_trait;

use crate::domain::{Booking, BookingDetails, BookingId, SeatAssignmentPolicy, TrainId, UserId};

use super::define_port_error;

define_port_error! {
    /// Outcomes of a failed seat reservation or ledger read.
    pub enum SeatLedgerError {
        /// No train has the requested id.
        TrainNotFound => "train not found",
        /// Every seat on the train is booked.
        SoldOut => "no seats available",
        /// The storage uniqueness guard rejected the chosen seat.
        SeatTaken => "seat already taken",
        /// The per-train lock could not be acquired in time.
        Busy { message: String } => "seat ledger busy: {message}",
        /// Ledger connection could not be established.
        Connection { message: String } => "seat ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "seat ledger query failed: {message}",
    }
}

/// Input to one allocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatReservation {
    pub train_id: TrainId,
    pub user_id: UserId,
    pub policy: SeatAssignmentPolicy,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeatLedger: Send + Sync {
    /// Atomically reserve the next seat on a train.
    async fn reserve_seat(&self, request: SeatReservation) -> Result<Booking, SeatLedgerError>;

    /// Fetch a booking only when `owner` made it.
    async fn find_booking_for_owner(
        &self,
        booking_id: BookingId,
        owner: UserId,
    ) -> Result<Option<BookingDetails>, SeatLedgerError>;

    /// Number of bookings recorded for a train.
    async fn booking_count(&self, train_id: TrainId) -> Result<i64, SeatLedgerError>;
}
