use std::sync::Arc;

use tracing::{error, info};

use transit_server::cache::{CacheConfig, CachedRoadDistance};
use transit_server::clock::SystemClock;
use transit_server::config::{ConfigError, ServerConfig};
use transit_server::fare::{DistanceError, OsrmClient, OsrmConfig};
use transit_server::logging;
use transit_server::schedule::{MemoryStore, StoreError};
use transit_server::traffic::{ConfirmationWorker, OverpassClient, OverpassConfig, ProximityError};
use transit_server::web::{AppState, create_router};

/// Reasons the server can fail to start or keep serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schedule(#[from] StoreError),

    #[error("road distance client: {0}")]
    Distance(#[from] DistanceError),

    #[error("road proximity client: {0}")]
    Proximity(#[from] ProximityError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(e) = run().await {
        error!(error = %e, "transit server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    let store = Arc::new(MemoryStore::load(&config.schedule_path)?);
    let (stops, buses, trips) = store.counts()?;
    info!(
        path = %config.schedule_path.display(),
        stops, buses, trips,
        "schedule loaded"
    );

    let osrm = OsrmClient::new(
        OsrmConfig::new()
            .with_base_url(config.osrm_url.as_str())
            .with_timeout(config.http_timeout_secs),
    )?;
    let distance = CachedRoadDistance::new(osrm, &CacheConfig::default());

    let overpass = OverpassClient::new(
        OverpassConfig::new()
            .with_url(config.overpass_url.as_str())
            .with_timeout(config.http_timeout_secs),
    )?;
    let (worker, confirmations) = ConfirmationWorker::new(
        store.clone(),
        store.clone(),
        Arc::new(overpass),
        config.confirmation_queue,
    );
    tokio::spawn(worker.with_max_concurrent(config.confirmation_concurrency).run());

    let state = AppState::new(
        store.clone(),
        store,
        Arc::new(SystemClock::new(config.timezone)),
        distance,
        confirmations,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, timezone = %config.timezone, "transit server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
