//! Builders wiring driven adapters into the HTTP state.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;

use booking_backend::domain::ports::{PasswordHasher, SeatLedger, TrainRepository, UserRepository};
use booking_backend::domain::{
    AuthService, CatalogueService, SeatAllocationService, SeatAssignmentPolicy, SessionAuthority,
};
use booking_backend::inbound::http::auth_config::AuthSettings;
use booking_backend::inbound::http::state::{HttpAuth, HttpState, HttpStatePorts};
use booking_backend::outbound::persistence::{
    DbPool, DieselSeatLedger, DieselTrainRepository, DieselUserRepository,
};
use booking_backend::outbound::security::Argon2PasswordHasher;

/// Allocation behaviour chosen at startup.
#[derive(Debug, Clone, Copy)]
pub struct AllocationSettings {
    pub policy: SeatAssignmentPolicy,
    pub lock_timeout: Duration,
}

/// Driven adapters behind the HTTP state.
pub struct Adapters<U, H, T, L> {
    pub users: Arc<U>,
    pub hasher: Arc<H>,
    pub trains: Arc<T>,
    pub ledger: Arc<L>,
}

/// Build services over any adapter set and cast them to the port objects
/// the handlers use.
pub fn assemble_http_state<U, H, T, L>(
    adapters: Adapters<U, H, T, L>,
    auth: AuthSettings,
    policy: SeatAssignmentPolicy,
) -> HttpState
where
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    T: TrainRepository + 'static,
    L: SeatLedger + 'static,
{
    let Adapters {
        users,
        hasher,
        trains,
        ledger,
    } = adapters;
    let sessions = SessionAuthority::new(auth.signing_secret, Arc::new(DefaultClock));

    let accounts = Arc::new(AuthService::new(users, hasher, sessions.clone()));
    let catalogue = Arc::new(CatalogueService::new(trains));
    let allocator = Arc::new(SeatAllocationService::new(ledger, policy));

    HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            registration: accounts,
            trains: catalogue.clone(),
            availability: catalogue,
            bookings: allocator.clone(),
            bookings_query: allocator,
        },
        HttpAuth {
            sessions,
            admin_key: auth.admin_key,
            cookie_secure: auth.cookie_secure,
        },
    )
}

/// Wire the PostgreSQL adapters and the Argon2 hasher.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the password hasher cannot be built.
pub fn build_http_state(
    pool: &DbPool,
    auth: AuthSettings,
    allocation: AllocationSettings,
) -> std::io::Result<HttpState> {
    let hasher = Argon2PasswordHasher::new()
        .map_err(|err| std::io::Error::other(format!("password hasher setup failed: {err}")))?;
    let adapters = Adapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        hasher: Arc::new(hasher),
        trains: Arc::new(DieselTrainRepository::new(pool.clone())),
        ledger: Arc::new(
            DieselSeatLedger::new(pool.clone()).with_lock_timeout(allocation.lock_timeout),
        ),
    };
    Ok(assemble_http_state(adapters, auth, allocation.policy))
}
