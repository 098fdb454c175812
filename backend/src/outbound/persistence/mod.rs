//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations only translate between Diesel row structs and
//! domain types. Row structs (`models.rs`) and the table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool of `diesel-async` connections.
//!
//! # Example
//!
//! ```no_run
//! use booking_backend::outbound::persistence::{DbPool, DieselSeatLedger, PoolConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/booking")).await?;
//! let ledger = DieselSeatLedger::new(pool);
//! # let _ = ledger;
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_seat_ledger;
mod diesel_train_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_seat_ledger::{DEFAULT_LOCK_TIMEOUT, DieselSeatLedger};
pub use diesel_train_repository::DieselTrainRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations, run_migrations_blocking};
pub use pool::{DbPool, PoolConfig, PoolError};
