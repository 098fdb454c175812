//! PostgreSQL-backed booking ledger.
//!
//! `reserve_seat` runs one transaction per attempt:
//!
//! 1. `SET LOCAL lock_timeout` bounds the wait for the train lock.
//! 2. `SELECT total_seats FROM trains WHERE id = $1 FOR UPDATE` serialises
//!    every allocation on that train.
//! 3. The taken seat numbers are read and the domain seat policy picks the
//!    next seat.
//! 4. The booking is inserted and the transaction commits, releasing the
//!    lock.
//!
//! A unique violation on `(train_id, seat_number)` is reported as
//! `SeatTaken` and never retried.

use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{SeatLedger, SeatLedgerError, SeatReservation};
use crate::domain::{
    Booking, BookingDetails, BookingId, SeatCapacity, SeatMap, Train, TrainId, TrainSummary,
    UserId,
};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::{BookingRow, NewBookingRow, TrainRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, trains};

/// Default bound on waiting for a train's allocation lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Diesel-backed implementation of [`SeatLedger`].
#[derive(Clone)]
pub struct DieselSeatLedger {
    pool: DbPool,
    lock_timeout: Duration,
}

impl DieselSeatLedger {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override how long an allocation may wait for the train lock.
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

/// Transaction error: either a business rejection or a Diesel failure.
#[derive(Debug)]
enum ReserveError {
    Rejected(SeatLedgerError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for ReserveError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> SeatLedgerError {
    SeatLedgerError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> SeatLedgerError {
    match classify_diesel_error(error, operation) {
        DieselFailure::UniqueViolation { .. } => SeatLedgerError::seat_taken(),
        DieselFailure::LockTimeout => SeatLedgerError::busy("timed out waiting for train lock"),
        DieselFailure::Serialization => {
            SeatLedgerError::busy("transaction conflicted with a concurrent allocation")
        }
        DieselFailure::Connection(message) => SeatLedgerError::connection(message),
        DieselFailure::Query(message) => SeatLedgerError::query(message),
    }
}

/// `SET LOCAL` statement bounding lock waits. PostgreSQL treats zero as
/// "wait forever", so the value is at least one millisecond.
fn lock_timeout_statement(timeout: Duration) -> String {
    let millis = timeout.as_millis().clamp(1, u128::from(u32::MAX));
    format!("SET LOCAL lock_timeout = {millis}")
}

#[async_trait]
impl SeatLedger for DieselSeatLedger {
    async fn reserve_seat(&self, request: SeatReservation) -> Result<Booking, SeatLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let set_lock_timeout = lock_timeout_statement(self.lock_timeout);
        let train_id = request.train_id.get();

        let row: BookingRow = conn
            .transaction(|conn| {
                async move {
                    diesel::sql_query(set_lock_timeout).execute(conn).await?;

                    let capacity: Option<i32> = trains::table
                        .find(train_id)
                        .select(trains::total_seats)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let capacity = capacity
                        .ok_or(ReserveError::Rejected(SeatLedgerError::train_not_found()))?;
                    let capacity = SeatCapacity::new(capacity).map_err(|err| {
                        ReserveError::Rejected(SeatLedgerError::query(format!(
                            "trains.total_seats: {err}"
                        )))
                    })?;

                    let taken: Vec<i32> = bookings::table
                        .filter(bookings::train_id.eq(train_id))
                        .select(bookings::seat_number)
                        .load(conn)
                        .await?;
                    let seat = SeatMap::new(taken)
                        .next_free(capacity, request.policy)
                        .map_err(|_| ReserveError::Rejected(SeatLedgerError::sold_out()))?;

                    let inserted = diesel::insert_into(bookings::table)
                        .values(NewBookingRow {
                            user_id: request.user_id.get(),
                            train_id,
                            seat_number: seat.get(),
                        })
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<BookingRow, ReserveError>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match err {
                ReserveError::Rejected(rejection) => rejection,
                ReserveError::Diesel(error) => map_diesel_error(error, "reserve seat"),
            })?;

        Booking::try_from(row).map_err(SeatLedgerError::query)
    }

    async fn find_booking_for_owner(
        &self,
        booking_id: BookingId,
        owner: UserId,
    ) -> Result<Option<BookingDetails>, SeatLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(BookingRow, TrainRow)> = bookings::table
            .inner_join(trains::table)
            .filter(bookings::id.eq(booking_id.get()))
            .filter(bookings::user_id.eq(owner.get()))
            .select((BookingRow::as_select(), TrainRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "select booking"))?;

        row.map(|(booking_row, train_row)| {
            let booking = Booking::try_from(booking_row)?;
            let train = Train::try_from(train_row)?;
            Ok::<_, String>(BookingDetails {
                booking,
                train: TrainSummary {
                    train_number: train.train_number,
                    source: train.source,
                    destination: train.destination,
                },
            })
        })
        .transpose()
        .map_err(SeatLedgerError::query)
    }

    async fn booking_count(&self, train_id: TrainId) -> Result<i64, SeatLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        bookings::table
            .filter(bookings::train_id.eq(train_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count bookings"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_secs(5), "SET LOCAL lock_timeout = 5000")]
    #[case(Duration::from_millis(250), "SET LOCAL lock_timeout = 250")]
    #[case(Duration::ZERO, "SET LOCAL lock_timeout = 1")]
    fn lock_timeout_is_bounded_in_millis(#[case] timeout: Duration, #[case] expected: &str) {
        assert_eq!(lock_timeout_statement(timeout), expected);
    }

    #[rstest]
    fn unique_violation_is_seat_taken() {
        struct Info;
        impl diesel::result::DatabaseErrorInformation for Info {
            fn message(&self) -> &str {
                "duplicate key value violates unique constraint"
            }
            fn details(&self) -> Option<&str> {
                None
            }
            fn hint(&self) -> Option<&str> {
                None
            }
            fn table_name(&self) -> Option<&str> {
                Some("bookings")
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                Some("bookings_train_seat_unique")
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(Info),
        );
        assert_eq!(
            map_diesel_error(error, "reserve seat"),
            SeatLedgerError::SeatTaken
        );
    }
}
