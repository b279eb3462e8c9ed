//! Errata error-reporting service host.
//!
//! Startup is a strict gate: the crypto environment is verified before the
//! listener opens, and the health scheduler only starts polling once the
//! public-key endpoint is reachable.

pub mod handlers;
pub mod monitor;
pub mod password;
pub mod state;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use errata_core::config::PUBLIC_KEY_ROUTE;
use errata_core::{Config, HealthRegistry, HealthScheduler};
use errata_crypto::{CryptoEnvironment, CryptoFilesHealthCheck, StartupError};

pub use monitor::{classify_served_key, PublicKeyIdentityMonitor, DECOY_KEY_FINGERPRINT};
pub use state::AppState;

pub const EXIT_RUNTIME: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_MISSING_RESOURCE: u8 = 3;
pub const EXIT_CRYPTO_VERIFICATION: u8 = 4;
pub const EXIT_PASSWORD: u8 = 5;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(PUBLIC_KEY_ROUTE, get(handlers::public_key))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Health checks every deployment runs.
pub fn default_health_registry(config: &Config, env: &CryptoEnvironment) -> HealthRegistry {
    let mut registry = HealthRegistry::with_timeout(config.health.timeout());
    registry.register(Arc::new(CryptoFilesHealthCheck::new(env.directory().clone())));
    registry.register(Arc::new(PublicKeyIdentityMonitor::new(
        config.public_key_url(),
        env.directory().base_dir(),
    )));
    registry
}

/// Serve on an already bound listener, then start the health scheduler.
pub async fn serve(
    listener: TcpListener,
    config: &Config,
    env: &CryptoEnvironment,
) -> anyhow::Result<()> {
    let registry = Arc::new(default_health_registry(config, env));
    let scheduler = HealthScheduler::new(registry, config.health.interval());

    let state = Arc::new(AppState::new(
        env.service_public_key().clone(),
        env.secrets(),
        scheduler.latest(),
    ));

    info!(addr = %listener.local_addr()?, "Errata service listening");
    let health = scheduler.spawn();

    let served = axum::serve(listener, router(state)).await;
    health.abort();
    served?;
    Ok(())
}

/// Process exit code for a failed startup.
pub fn startup_exit_code(err: &StartupError) -> u8 {
    match err {
        StartupError::MissingResource { .. } | StartupError::Io { .. } => EXIT_MISSING_RESOURCE,
        StartupError::Verification(_) => EXIT_CRYPTO_VERIFICATION,
        StartupError::Secrets(_) => EXIT_RUNTIME,
    }
}
