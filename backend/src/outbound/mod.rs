//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and the seat ledger (Diesel)
//! - **security**: Argon2id password hashing
//! - **memory**: in-process adapters for tests (`test-support` feature)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic; the seat choice itself
//! is made by the domain seat policy.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod persistence;
pub mod security;
