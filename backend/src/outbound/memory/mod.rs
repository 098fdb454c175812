//! In-process adapters for tests and local experiments.
//!
//! The railway adapter emulates PostgreSQL's per-train row lock with one
//! Tokio mutex per train, so allocation properties can be exercised without
//! a database.

mod railway;
mod users;

pub use railway::InMemoryRailway;
pub use users::InMemoryUserRepository;
