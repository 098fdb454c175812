//! Backend entry-point: loads settings, prepares PostgreSQL and serves the
//! booking API.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use booking_backend::inbound::http::auth_config::{AuthSettings, BuildMode, auth_settings_from_env};
use booking_backend::inbound::http::health::HealthState;
use booking_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use booking_backend::settings::AppSettings;
use server::{AllocationSettings, ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_address().map_err(std::io::Error::other)?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;
    let allocation = AllocationSettings {
        policy: settings.seat_policy().map_err(std::io::Error::other)?,
        lock_timeout: settings.allocation_lock_timeout(),
    };

    let auth = load_auth_settings(BuildMode::from_debug_assertions())?;
    info!(
        secret_fingerprint = %auth.signing_secret.fingerprint(),
        cookie_secure = auth.cookie_secure,
        "authentication configured"
    );

    if settings.run_migrations() {
        run_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    }

    let pool_config = PoolConfig::new(database_url)
        .with_max_size(settings.db_max_connections().map_err(std::io::Error::other)?);
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;

    let http_state = build_http_state(&pool, auth, allocation)?;

    let config = ServerConfig::new(bind_addr);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("booking")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    info!(
        bind_addr = %config.bind_addr(),
        seat_policy = %allocation.policy,
        lock_timeout_ms = allocation.lock_timeout.as_millis(),
        "starting server"
    );
    let server = create_server(health_state, http_state, config)?;
    server.await
}

/// Read credentials from the process environment.
fn load_auth_settings(mode: BuildMode) -> std::io::Result<AuthSettings> {
    auth_settings_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)
}

/// Build Prometheus middleware, logging and continuing without it on error.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "Prometheus metrics disabled");
            None
        }
    }
}
