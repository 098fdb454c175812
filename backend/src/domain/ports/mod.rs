//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`SeatLedger`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports (commands and queries)
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod availability_query;
mod booking_command;
mod booking_query;
mod login_service;
mod password_hasher;
mod seat_ledger;
mod train_catalogue_command;
mod train_repository;
mod user_registration;
mod user_repository;

#[cfg(test)]
pub use availability_query::MockAvailabilityQuery;
pub use availability_query::AvailabilityQuery;
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::BookingCommand;
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginOutcome, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use seat_ledger::MockSeatLedger;
pub use seat_ledger::{SeatLedger, SeatLedgerError, SeatReservation};
#[cfg(test)]
pub use train_catalogue_command::MockTrainCatalogueCommand;
pub use train_catalogue_command::TrainCatalogueCommand;
#[cfg(test)]
pub use train_repository::MockTrainRepository;
pub use train_repository::{TrainRepository, TrainRepositoryError};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository};
