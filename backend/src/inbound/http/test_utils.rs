//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    MockAvailabilityQuery, MockBookingCommand, MockBookingQuery, MockLoginService,
    MockTrainCatalogueCommand, MockUserRegistration,
};
use crate::domain::{AdminApiKey, Identity, UserId, Username};
use crate::test_support::test_session_authority;

use super::state::{HttpAuth, HttpState, HttpStatePorts};

/// Operator key accepted by [`state_with_ports`].
pub const TEST_ADMIN_KEY: &str = "operator-key";

/// Mock driving ports; set expectations before building state.
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub registration: MockUserRegistration,
    pub trains: MockTrainCatalogueCommand,
    pub availability: MockAvailabilityQuery,
    pub bookings: MockBookingCommand,
    pub bookings_query: MockBookingQuery,
}

/// Mocks with no expectations; any port call fails the test.
pub fn test_ports() -> TestPorts {
    TestPorts::default()
}

/// Build handler state from mocks, using the shared test session authority.
///
/// Cookies are not marked `Secure` so plain HTTP test requests keep them.
pub fn state_with_ports(ports: TestPorts) -> HttpState {
    let admin_key = match AdminApiKey::new(TEST_ADMIN_KEY) {
        Ok(key) => key,
        Err(error) => panic!("fixed admin key rejected: {error}"),
    };
    HttpState::new(
        HttpStatePorts {
            login: Arc::new(ports.login),
            registration: Arc::new(ports.registration),
            trains: Arc::new(ports.trains),
            availability: Arc::new(ports.availability),
            bookings: Arc::new(ports.bookings),
            bookings_query: Arc::new(ports.bookings_query),
        },
        HttpAuth {
            sessions: test_session_authority(),
            admin_key,
            cookie_secure: false,
        },
    )
}

/// `Authorization` header value for a regular user with `id`.
pub fn bearer_for(id: i32) -> String {
    let identity = Identity {
        id: UserId::new(id).expect("positive id"),
        username: Username::new(format!("user{id}")).expect("username"),
        is_admin: false,
    };
    let token = test_session_authority()
        .issue(&identity)
        .expect("token issued");
    format!("Bearer {}", token.as_str())
}
