//! Gateway server setup
//!
//! Provides the main server configuration, routes, and startup wiring.

mod handler;
mod state;

pub use handler::live_handler;
pub use state::GatewayState;

use axum::{
    routing::{get, post},
    Router,
};
use ovation_common::{AppConfig, AppError, StoreBackend};
use ovation_core::EventStore;
use ovation_engine::{HubConfig, RoomHub};
use ovation_store::{MemoryEventStore, PgEventStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

/// How often idle rooms are swept
const EVICTION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/rooms/:room_id", get(handlers::get_room_snapshot))
        .route("/rooms/:room_id/reactions", post(handlers::submit_reaction))
        .route("/rooms/:room_id/live", get(live_handler))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let store: Arc<dyn EventStore> = match config.store {
        StoreBackend::Postgres => {
            let database = config
                .database
                .clone()
                .ok_or_else(|| AppError::Config("database configuration missing".to_string()))?;

            tracing::info!("Connecting to PostgreSQL...");
            let pool_config = ovation_store::DatabaseConfig {
                url: database.url,
                max_connections: database.max_connections,
                min_connections: database.min_connections,
                ..Default::default()
            };
            let pool = ovation_store::create_pool(&pool_config)
                .await
                .map_err(|e| AppError::Config(format!("Failed to connect to database: {e}")))?;

            ovation_store::run_migrations(&pool)
                .await
                .map_err(|e| AppError::Config(format!("Failed to run migrations: {e}")))?;
            tracing::info!("PostgreSQL connection established");

            Arc::new(PgEventStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory event store (counts do not survive restart)");
            Arc::new(MemoryEventStore::new())
        }
    };

    let hub = RoomHub::new_shared(
        store,
        HubConfig {
            subscriber_buffer: config.hub.subscriber_buffer,
            idle_ttl: config.hub.idle_ttl(),
        },
    );

    Ok(GatewayState::new(hub, config))
}

/// Spawn the periodic idle-room sweep
pub fn spawn_eviction_sweeper(hub: Arc<RoomHub>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut sweep = tokio::time::interval(EVICTION_SWEEP_INTERVAL);
        loop {
            sweep.tick().await;
            hub.evict_idle().await;
        }
    })
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on http://{addr} (live streams at /rooms/{{room_id}}/live)");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_gateway_state(config).await?;

    if state.config().hub.idle_ttl().is_some() {
        spawn_eviction_sweeper(state.hub_handle());
    }

    let app = create_app(state);
    run_server(app, addr).await
}
