//! Seat allocation and booking lookups.
//!
//! `book_seat` hands the reservation to the ledger on a spawned task. If the
//! caller's future is dropped (for example the client disconnects) the
//! transaction still runs to commit or rollback.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    BookingCommand, BookingQuery, SeatLedger, SeatLedgerError, SeatReservation,
};
use crate::domain::{
    Booking, BookingDetails, BookingId, Error, SeatAssignmentPolicy, TraceId, TrainId, UserId,
};

fn map_ledger_error(error: SeatLedgerError) -> Error {
    match error {
        SeatLedgerError::TrainNotFound => Error::not_found("Train not found")
            .with_details(json!({ "field": "trainId", "code": "train_not_found" })),
        SeatLedgerError::SoldOut | SeatLedgerError::SeatTaken => {
            Error::conflict("No seats available")
                .with_details(json!({ "field": "trainId", "code": "no_seats_available" }))
        }
        SeatLedgerError::Busy { .. } => {
            Error::service_unavailable("seat allocation is busy, retry")
        }
        SeatLedgerError::Connection { message } => {
            Error::service_unavailable(format!("seat ledger unavailable: {message}"))
        }
        SeatLedgerError::Query { message } => {
            Error::internal(format!("seat ledger error: {message}"))
        }
    }
}

/// Service implementing [`BookingCommand`] and [`BookingQuery`].
#[derive(Clone)]
pub struct SeatAllocationService<L> {
    ledger: Arc<L>,
    policy: SeatAssignmentPolicy,
}

impl<L> SeatAllocationService<L> {
    pub fn new(ledger: Arc<L>, policy: SeatAssignmentPolicy) -> Self {
        Self { ledger, policy }
    }

    pub fn policy(&self) -> SeatAssignmentPolicy {
        self.policy
    }
}

#[async_trait]
impl<L> BookingCommand for SeatAllocationService<L>
where
    L: SeatLedger + 'static,
{
    async fn book_seat(&self, train_id: TrainId, user_id: UserId) -> Result<Booking, Error> {
        let request = SeatReservation {
            train_id,
            user_id,
            policy: self.policy,
        };
        let ledger = Arc::clone(&self.ledger);
        let outcome = tokio::spawn(TraceId::propagate(async move {
            ledger.reserve_seat(request).await
        }))
        .await
        .map_err(|err| Error::internal(format!("seat allocation task failed: {err}")))?;

        match outcome {
            Ok(booking) => {
                info!(
                    train_id = %train_id,
                    user_id = %user_id,
                    seat_number = %booking.seat_number,
                    booking_id = %booking.id,
                    "seat allocated"
                );
                Ok(booking)
            }
            Err(error) => {
                match &error {
                    SeatLedgerError::Connection { .. } | SeatLedgerError::Query { .. } => {
                        warn!(
                            train_id = %train_id,
                            user_id = %user_id,
                            outcome = %error,
                            "seat allocation failed"
                        );
                    }
                    _ => {
                        info!(
                            train_id = %train_id,
                            user_id = %user_id,
                            outcome = %error,
                            "seat allocation rejected"
                        );
                    }
                }
                Err(map_ledger_error(error))
            }
        }
    }
}

#[async_trait]
impl<L> BookingQuery for SeatAllocationService<L>
where
    L: SeatLedger + 'static,
{
    async fn find_booking(
        &self,
        booking_id: BookingId,
        owner: UserId,
    ) -> Result<BookingDetails, Error> {
        self.ledger
            .find_booking_for_owner(booking_id, owner)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found("Booking not found"))
    }
}
