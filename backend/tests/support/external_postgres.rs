//! Throwaway databases on an externally managed PostgreSQL server.
//!
//! Used when `TEST_DATABASE_URL` names an administrative connection; each
//! test gets a database next to the one that URL points at.

use postgres::{Client, NoTls};
use url::Url;

use super::format_postgres_error;

/// Point a PostgreSQL URL at another database, keeping credentials and
/// query parameters.
pub fn with_database(admin_url: &str, database: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(admin_url)?;
    url.set_path(&format!("/{database}"));
    Ok(url.into())
}

/// A database created for one test and dropped when the guard goes away.
///
/// Construct and drop it outside any Tokio runtime: the blocking `postgres`
/// client drives its own executor.
pub struct ExternalDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl ExternalDatabase {
    /// Create an empty database next to the one `admin_url` points at.
    pub fn create(admin_url: &str) -> Result<Self, String> {
        let name = format!("booking_test_{}", uuid::Uuid::new_v4().simple());
        let url = with_database(admin_url, &name)
            .map_err(|err| format!("parse {admin_url:?}: {err}"))?;
        let mut client = Client::connect(admin_url, NoTls)
            .map_err(|err| format!("connect: {}", format_postgres_error(&err)))?;
        client
            .batch_execute(&format!("CREATE DATABASE \"{name}\""))
            .map_err(|err| format!("create database: {}", format_postgres_error(&err)))?;
        Ok(Self {
            admin_url: admin_url.to_owned(),
            name,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ExternalDatabase {
    fn drop(&mut self) {
        let Ok(mut client) = Client::connect(&self.admin_url, NoTls) else {
            eprintln!("could not reconnect to drop {}", self.name);
            return;
        };
        let statement = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.name);
        if let Err(err) = client.batch_execute(&statement) {
            eprintln!("drop {}: {}", self.name, format_postgres_error(&err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::with_database;
    use rstest::rstest;

    #[rstest]
    #[case("postgres://u:p@localhost:5432/postgres", "postgres://u:p@localhost:5432/t1")]
    #[case("postgres://localhost", "postgres://localhost/t1")]
    #[case(
        "postgres://localhost/postgres?sslmode=disable",
        "postgres://localhost/t1?sslmode=disable"
    )]
    fn database_name_is_replaced(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(with_database(url, "t1").expect("valid url"), expected);
    }

    #[rstest]
    fn unparseable_urls_are_reported() {
        assert!(with_database("not a url", "t1").is_err());
    }
}
