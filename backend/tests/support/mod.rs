//! Shared helper utilities for backend integration tests.
//!
//! PostgreSQL-backed suites get one migrated database per test. By default
//! it is cloned from a template on a shared embedded cluster. Setting
//! `TEST_DATABASE_URL` to an administrative connection string uses that
//! server instead.

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod external_postgres;
pub mod pg_embed;

use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;
pub use external_postgres::ExternalDatabase;
pub use pg_embed::shared_cluster_handle;

/// Environment variable naming an external administrative PostgreSQL URL.
pub const TEST_DATABASE_URL_ENV: &str = "TEST_DATABASE_URL";

/// Render a `postgres` error with enough detail to be useful in CI logs.
///
/// The `postgres::Error` `Display` implementation often collapses database
/// errors to a generic `db error`, which hides the message and SQLSTATE.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// A migrated database owned by one test.
pub enum TestDatabase {
    Embedded(TemporaryDatabase),
    External(ExternalDatabase),
}

impl TestDatabase {
    pub fn url(&self) -> &str {
        match self {
            Self::Embedded(database) => database.url(),
            Self::External(database) => database.url(),
        }
    }

    /// Open a blocking client for seeding and assertions. Call it outside
    /// any Tokio runtime.
    pub fn client(&self) -> Client {
        Client::connect(self.url(), NoTls).unwrap_or_else(|err| {
            panic!("connect to test database: {}", format_postgres_error(&err))
        })
    }
}

fn external_database(admin_url: &str) -> TestDatabase {
    let database = ExternalDatabase::create(admin_url)
        .unwrap_or_else(|reason| panic!("test database setup failed: {reason}"));
    booking_backend::outbound::persistence::run_migrations_blocking(database.url())
        .unwrap_or_else(|err| panic!("test database migrations failed: {err}"));
    TestDatabase::External(database)
}

fn embedded_database() -> Option<TestDatabase> {
    let cluster = match shared_cluster_handle() {
        Ok(cluster) => cluster,
        Err(error) => return handle_cluster_setup_failure(error),
    };
    match provision_template_database(cluster) {
        Ok(database) => Some(TestDatabase::Embedded(database)),
        Err(error) => handle_cluster_setup_failure(error),
    }
}

/// Provision a migrated database for one test.
///
/// Returns `None` only when the embedded cluster cannot start and
/// `SKIP_TEST_CLUSTER` allows skipping.
///
/// # Panics
///
/// Panics when the database cannot be prepared and skipping is not allowed,
/// so CI breakage is not masked as a skip.
pub fn migrated_database() -> Option<TestDatabase> {
    match std::env::var(TEST_DATABASE_URL_ENV) {
        Ok(admin_url) => Some(external_database(&admin_url)),
        Err(_) => embedded_database(),
    }
}
