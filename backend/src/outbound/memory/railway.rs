//! In-memory train catalogue and booking ledger.
//!
//! Each train owns a seat lane guarded by a Tokio mutex. `reserve_seat`
//! waits for the lane (bounded by the lock timeout), picks a seat with
//! [`SeatMap::next_free`] and appends the booking before releasing it, so
//! the lane plays the role of `SELECT ... FOR UPDATE`. Reads use counters
//! and an index that never touch the lane lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::Mutex;

use crate::domain::ports::{
    SeatLedger, SeatLedgerError, SeatReservation, TrainRepository, TrainRepositoryError,
};
use crate::domain::{
    Booking, BookingDetails, BookingId, NewTrain, RouteQuery, SeatMap, SeatNumber, Train,
    TrainAvailability, TrainId, TrainSummary, UserId,
};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

struct TrainEntry {
    train: Train,
    lane: Arc<Mutex<Vec<SeatNumber>>>,
    booked: Arc<AtomicI64>,
}

#[derive(Default)]
struct Inner {
    trains: RwLock<BTreeMap<i32, TrainEntry>>,
    bookings: RwLock<HashMap<i32, Booking>>,
    next_train_id: AtomicI32,
    next_booking_id: AtomicI32,
}

/// Train catalogue plus seat ledger held in process memory.
///
/// Cloning shares the same state.
#[derive(Clone)]
pub struct InMemoryRailway {
    inner: Arc<Inner>,
    clock: Arc<dyn Clock>,
    lock_timeout: Duration,
    hold: Duration,
}

impl Default for InMemoryRailway {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            clock: Arc::new(DefaultClock),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            hold: Duration::ZERO,
        }
    }
}

impl InMemoryRailway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp bookings with `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bound the wait for a train's lane.
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Sleep for `hold` while owning the lane, widening race windows in
    /// concurrency tests.
    pub fn with_lock_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    /// Seat numbers booked on a train, sorted. Waits for the lane lock.
    pub async fn seats_of(&self, train_id: TrainId) -> Vec<i32> {
        let lane = self
            .read_trains()
            .get(&train_id.get())
            .map(|entry| Arc::clone(&entry.lane));
        let Some(lane) = lane else {
            return Vec::new();
        };
        let mut seats: Vec<i32> = lane.lock().await.iter().map(|seat| seat.get()).collect();
        seats.sort_unstable();
        seats
    }

    fn read_trains(&self) -> RwLockReadGuard<'_, BTreeMap<i32, TrainEntry>> {
        self.inner
            .trains
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_trains(&self) -> RwLockWriteGuard<'_, BTreeMap<i32, TrainEntry>> {
        self.inner
            .trains
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_bookings(&self) -> RwLockReadGuard<'_, HashMap<i32, Booking>> {
        self.inner
            .bookings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_bookings(&self) -> RwLockWriteGuard<'_, HashMap<i32, Booking>> {
        self.inner
            .bookings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TrainRepository for InMemoryRailway {
    async fn create(&self, train: &NewTrain) -> Result<Train, TrainRepositoryError> {
        let mut trains = self.write_trains();
        if trains
            .values()
            .any(|entry| entry.train.train_number == train.train_number)
        {
            return Err(TrainRepositoryError::duplicate_train_number());
        }
        let raw_id = self.inner.next_train_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = TrainId::new(raw_id).map_err(|err| TrainRepositoryError::query(err.to_string()))?;
        let stored = Train {
            id,
            train_number: train.train_number.clone(),
            source: train.source.clone(),
            destination: train.destination.clone(),
            total_seats: train.total_seats,
        };
        trains.insert(
            raw_id,
            TrainEntry {
                train: stored.clone(),
                lane: Arc::new(Mutex::new(Vec::new())),
                booked: Arc::new(AtomicI64::new(0)),
            },
        );
        Ok(stored)
    }

    async fn find_by_id(&self, id: TrainId) -> Result<Option<Train>, TrainRepositoryError> {
        Ok(self
            .read_trains()
            .get(&id.get())
            .map(|entry| entry.train.clone()))
    }

    async fn availability(
        &self,
        route: &RouteQuery,
    ) -> Result<Vec<TrainAvailability>, TrainRepositoryError> {
        Ok(self
            .read_trains()
            .values()
            .filter(|entry| route.matches(&entry.train))
            .map(|entry| {
                TrainAvailability::from_booked(
                    entry.train.clone(),
                    entry.booked.load(Ordering::SeqCst),
                )
            })
            .filter(|availability| availability.available_seats > 0)
            .collect())
    }
}

#[async_trait]
impl SeatLedger for InMemoryRailway {
    async fn reserve_seat(&self, request: SeatReservation) -> Result<Booking, SeatLedgerError> {
        let (capacity, lane, booked) = {
            let trains = self.read_trains();
            let entry = trains
                .get(&request.train_id.get())
                .ok_or(SeatLedgerError::TrainNotFound)?;
            (
                entry.train.total_seats,
                Arc::clone(&entry.lane),
                Arc::clone(&entry.booked),
            )
        };

        let mut seats = tokio::time::timeout(self.lock_timeout, lane.lock_owned())
            .await
            .map_err(|_| SeatLedgerError::busy("timed out waiting for train lock"))?;
        if !self.hold.is_zero() {
            tokio::time::sleep(self.hold).await;
        }

        let seat = SeatMap::new(seats.iter().map(|seat| seat.get()))
            .next_free(capacity, request.policy)
            .map_err(|_| SeatLedgerError::SoldOut)?;
        if seats.contains(&seat) {
            return Err(SeatLedgerError::SeatTaken);
        }

        let raw_id = self.inner.next_booking_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = BookingId::new(raw_id).map_err(|err| SeatLedgerError::query(err.to_string()))?;
        let booking = Booking {
            id,
            user_id: request.user_id,
            train_id: request.train_id,
            seat_number: seat,
            booking_date: self.clock.utc(),
        };

        seats.push(seat);
        booked.fetch_add(1, Ordering::SeqCst);
        self.write_bookings().insert(raw_id, booking.clone());
        Ok(booking)
    }

    async fn find_booking_for_owner(
        &self,
        booking_id: BookingId,
        owner: UserId,
    ) -> Result<Option<BookingDetails>, SeatLedgerError> {
        let booking = self
            .read_bookings()
            .get(&booking_id.get())
            .filter(|booking| booking.user_id == owner)
            .cloned();
        let Some(booking) = booking else {
            return Ok(None);
        };
        let train = self
            .read_trains()
            .get(&booking.train_id.get())
            .map(|entry| entry.train.clone())
            .ok_or_else(|| SeatLedgerError::query("booking references a missing train"))?;
        Ok(Some(BookingDetails {
            booking,
            train: TrainSummary {
                train_number: train.train_number,
                source: train.source,
                destination: train.destination,
            },
        }))
    }

    async fn booking_count(&self, train_id: TrainId) -> Result<i64, SeatLedgerError> {
        Ok(self
            .read_trains()
            .get(&train_id.get())
            .map_or(0, |entry| entry.booked.load(Ordering::SeqCst)))
    }
}
