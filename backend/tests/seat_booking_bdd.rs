//! Behaviour tests for seat booking over the in-memory railway.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::sync::Arc;

use booking_backend::domain::ports::{
    AvailabilityQuery, BookingCommand, BookingQuery, TrainRepository,
};
use booking_backend::domain::{
    Booking, BookingDetails, CatalogueService, Error, ErrorCode, NewTrain, RouteQuery,
    SeatAllocationService, SeatAssignmentPolicy, Train, TrainId, UserId,
};
use booking_backend::outbound::memory::InMemoryRailway;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct SeatBookingWorld {
    runtime: Runtime,
    railway: Arc<InMemoryRailway>,
    allocator: Arc<SeatAllocationService<InMemoryRailway>>,
    catalogue: CatalogueService<InMemoryRailway>,
    train: RefCell<Option<Train>>,
    outcomes: RefCell<Vec<Result<Booking, Error>>>,
    latest: RefCell<Option<Booking>>,
    lookup: RefCell<Option<Result<BookingDetails, Error>>>,
}

impl SeatBookingWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .expect("runtime");
        let railway = Arc::new(InMemoryRailway::new());
        Self {
            runtime,
            allocator: Arc::new(SeatAllocationService::new(
                Arc::clone(&railway),
                SeatAssignmentPolicy::LowestFree,
            )),
            catalogue: CatalogueService::new(Arc::clone(&railway)),
            railway,
            train: RefCell::new(None),
            outcomes: RefCell::new(Vec::new()),
            latest: RefCell::new(None),
            lookup: RefCell::new(None),
        }
    }

    fn train(&self) -> Train {
        self.train.borrow().clone().expect("a train was created")
    }

    fn record(&self, outcome: Result<Booking, Error>) {
        if let Ok(booking) = &outcome {
            *self.latest.borrow_mut() = Some(booking.clone());
        }
        self.outcomes.borrow_mut().push(outcome);
    }

    fn book(&self, train_id: TrainId, rider: i32) {
        let user_id = UserId::new(rider).expect("rider id");
        let outcome = self
            .runtime
            .block_on(self.allocator.book_seat(train_id, user_id));
        self.record(outcome);
    }

    fn last_outcome_error(&self) -> Error {
        self.outcomes
            .borrow()
            .last()
            .expect("a booking was attempted")
            .clone()
            .expect_err("the latest booking should fail")
    }

    fn listed_seats(&self) -> Option<i32> {
        let train = self.train();
        let route = RouteQuery::try_from_parts(train.source.as_ref(), train.destination.as_ref())
            .expect("route");
        self.runtime
            .block_on(self.catalogue.availability(route))
            .expect("availability")
            .into_iter()
            .find(|entry| entry.train.id == train.id)
            .map(|entry| entry.available_seats)
    }

    fn rejections(&self, code: ErrorCode, message: &str) -> usize {
        self.outcomes
            .borrow()
            .iter()
            .filter(|outcome| {
                outcome
                    .as_ref()
                    .err()
                    .is_some_and(|error| error.code() == code && error.message() == message)
            })
            .count()
    }
}

#[fixture]
fn world() -> SeatBookingWorld {
    SeatBookingWorld::new()
}

#[given("a train with {seats} seats")]
fn a_train_with_seats(world: &SeatBookingWorld, seats: i32) {
    let new_train =
        NewTrain::try_from_parts("IC-700", "Oslo", "Bergen", seats).expect("valid train");
    let train = world
        .runtime
        .block_on(world.railway.create(&new_train))
        .expect("train created");
    *world.train.borrow_mut() = Some(train);
}

#[when("rider {rider} books a seat")]
fn rider_books_a_seat(world: &SeatBookingWorld, rider: i32) {
    world.book(world.train().id, rider);
}

#[when("rider {rider} books a seat on an unknown train")]
fn rider_books_an_unknown_train(world: &SeatBookingWorld, rider: i32) {
    let ghost = TrainId::new(world.train().id.get() + 1_000).expect("train id");
    world.book(ghost, rider);
}

#[when("{riders} riders book concurrently")]
fn riders_book_concurrently(world: &SeatBookingWorld, riders: i32) {
    let train_id = world.train().id;
    let outcomes = world.runtime.block_on(async {
        let handles: Vec<_> = (1..=riders)
            .map(|rider| {
                let allocator = Arc::clone(&world.allocator);
                let user_id = UserId::new(rider).expect("rider id");
                tokio::spawn(async move { allocator.book_seat(train_id, user_id).await })
            })
            .collect();
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.expect("booking task joined"));
        }
        outcomes
    });
    for outcome in outcomes {
        world.record(outcome);
    }
}

#[when("rider {rider} looks up the latest booking")]
fn rider_looks_up_the_latest_booking(world: &SeatBookingWorld, rider: i32) {
    let booking_id = world
        .latest
        .borrow()
        .as_ref()
        .expect("a booking succeeded")
        .id;
    let owner = UserId::new(rider).expect("rider id");
    let result = world
        .runtime
        .block_on(world.allocator.find_booking(booking_id, owner));
    *world.lookup.borrow_mut() = Some(result);
}

#[then("the latest booking holds seat {seat}")]
fn the_latest_booking_holds_seat(world: &SeatBookingWorld, seat: i32) {
    let latest = world.latest.borrow();
    let booking = latest.as_ref().expect("a booking succeeded");
    assert_eq!(booking.seat_number.get(), seat);
}

#[then("the train shows {count} available seats")]
fn the_train_shows_available_seats(world: &SeatBookingWorld, count: i32) {
    assert_eq!(world.listed_seats(), Some(count));
}

#[then("the train is not listed as available")]
fn the_train_is_not_listed(world: &SeatBookingWorld) {
    assert_eq!(world.listed_seats(), None);
}

#[then("the booking is rejected because no seats remain")]
fn the_booking_is_rejected_as_full(world: &SeatBookingWorld) {
    let error = world.last_outcome_error();
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "No seats available");
}

#[then("the booking is rejected because the train does not exist")]
fn the_booking_is_rejected_as_unknown(world: &SeatBookingWorld) {
    let error = world.last_outcome_error();
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Train not found");
}

#[then("{count} bookings succeed")]
fn bookings_succeed(world: &SeatBookingWorld, count: usize) {
    let succeeded = world
        .outcomes
        .borrow()
        .iter()
        .filter(|outcome| outcome.is_ok())
        .count();
    assert_eq!(succeeded, count);
}

#[then("{count} bookings are rejected because no seats remain")]
fn bookings_are_rejected(world: &SeatBookingWorld, count: usize) {
    assert_eq!(
        world.rejections(ErrorCode::Conflict, "No seats available"),
        count
    );
}

#[then("the allocated seats run from {first} to {last}")]
fn the_allocated_seats_run(world: &SeatBookingWorld, first: i32, last: i32) {
    let train_id = world.train().id;
    let seats = world.runtime.block_on(world.railway.seats_of(train_id));
    assert_eq!(seats, (first..=last).collect::<Vec<_>>());
}

#[then("the lookup reports the booking as not found")]
fn the_lookup_reports_not_found(world: &SeatBookingWorld) {
    let lookup = world.lookup.borrow();
    let error = match lookup.as_ref().expect("a lookup ran") {
        Ok(details) => panic!("expected no booking, got {details:?}"),
        Err(error) => error,
    };
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Booking not found");
}

#[then("the lookup returns seat {seat}")]
fn the_lookup_returns_seat(world: &SeatBookingWorld, seat: i32) {
    let lookup = world.lookup.borrow();
    let details = match lookup.as_ref().expect("a lookup ran") {
        Ok(details) => details,
        Err(error) => panic!("expected a booking, got {error:?}"),
    };
    assert_eq!(details.booking.seat_number.get(), seat);
    assert_eq!(details.train.train_number.as_ref(), "IC-700");
}

#[scenario(
    path = "tests/features/seat_booking.feature",
    name = "Sequential bookings receive ascending seats"
)]
fn sequential_bookings_receive_ascending_seats(world: SeatBookingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/seat_booking.feature",
    name = "A full train rejects further bookings"
)]
fn a_full_train_rejects_further_bookings(world: SeatBookingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/seat_booking.feature",
    name = "Concurrent riders never share a seat"
)]
fn concurrent_riders_never_share_a_seat(world: SeatBookingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/seat_booking.feature",
    name = "Bookings are private to the rider who made them"
)]
fn bookings_are_private_to_the_rider_who_made_them(world: SeatBookingWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/seat_booking.feature",
    name = "Booking an unknown train fails"
)]
fn booking_an_unknown_train_fails(world: SeatBookingWorld) {
    drop(world);
}
