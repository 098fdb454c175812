//! Train seat booking backend.
//!
//! Hexagonal layout: [`domain`] holds value types, services and port
//! traits; [`inbound`] adapts HTTP requests onto driving ports; [`outbound`]
//! implements driven ports with PostgreSQL, Argon2 and (for tests) process
//! memory. Seat allocation serialises per train inside a storage
//! transaction, so any number of server instances may share one database.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
