//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AvailabilityQuery, BookingCommand, BookingQuery, LoginService, TrainCatalogueCommand,
    UserRegistration,
};
use crate::domain::{AdminApiKey, SessionAuthority};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn UserRegistration>,
    pub trains: Arc<dyn TrainCatalogueCommand>,
    pub availability: Arc<dyn AvailabilityQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
}

/// Credential checks applied before a handler runs.
#[derive(Clone)]
pub struct HttpAuth {
    /// Verifies session tokens presented by the `auth` cookie or a bearer
    /// header.
    pub sessions: SessionAuthority,
    /// Shared secret required by catalogue mutations.
    pub admin_key: AdminApiKey,
    /// Whether the `auth` cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn UserRegistration>,
    pub trains: Arc<dyn TrainCatalogueCommand>,
    pub availability: Arc<dyn AvailabilityQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub auth: HttpAuth,
}

impl HttpState {
    /// Construct state from the ports bundle and credential settings.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use booking_backend::domain::{
    ///     AdminApiKey, AuthService, CatalogueService, SeatAllocationService,
    ///     SeatAssignmentPolicy, SessionAuthority, SigningSecret,
    /// };
    /// use booking_backend::inbound::http::state::{HttpAuth, HttpState, HttpStatePorts};
    /// use booking_backend::outbound::memory::{InMemoryRailway, InMemoryUserRepository};
    /// use booking_backend::outbound::security::Argon2PasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let sessions = SessionAuthority::new(
    ///     SigningSecret::new(vec![1_u8; 32]).unwrap(),
    ///     Arc::new(DefaultClock),
    /// );
    /// let railway = Arc::new(InMemoryRailway::new());
    /// let auth = Arc::new(AuthService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(Argon2PasswordHasher::new().unwrap()),
    ///     sessions.clone(),
    /// ));
    /// let catalogue = Arc::new(CatalogueService::new(railway.clone()));
    /// let seats = Arc::new(SeatAllocationService::new(
    ///     railway,
    ///     SeatAssignmentPolicy::LowestFree,
    /// ));
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         login: auth.clone(),
    ///         registration: auth,
    ///         trains: catalogue.clone(),
    ///         availability: catalogue,
    ///         bookings: seats.clone(),
    ///         bookings_query: seats,
    ///     },
    ///     HttpAuth {
    ///         sessions,
    ///         admin_key: AdminApiKey::new("operator-key").unwrap(),
    ///         cookie_secure: true,
    ///     },
    /// );
    /// assert!(state.auth.cookie_secure);
    /// ```
    pub fn new(ports: HttpStatePorts, auth: HttpAuth) -> Self {
        let HttpStatePorts {
            login,
            registration,
            trains,
            availability,
            bookings,
            bookings_query,
        } = ports;
        Self {
            login,
            registration,
            trains,
            availability,
            bookings,
            bookings_query,
            auth,
        }
    }
}
