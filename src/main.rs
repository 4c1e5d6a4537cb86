//! locanda-engine server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use locanda_engine::api;
use locanda_engine::app_state::AppState;
use locanda_engine::config::EngineConfig;
use locanda_engine::domain::EventBus;
use locanda_engine::persistence::PostgresBookingStore;
use locanda_engine::ports::{
    BookingStore, InMemoryBookingStore, LocalChannelManager, LocalPaymentGateway, LogNotifier,
};
use locanda_engine::service::{BookingService, SyncService};
use locanda_engine::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = EngineConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting locanda-engine");

    // Build the store
    let store: Arc<dyn BookingStore> = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        let store = PostgresBookingStore::new(pool);
        store.migrate().await?;
        tracing::info!("postgres persistence enabled");
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, using in-memory store");
        Arc::new(InMemoryBookingStore::new())
    };

    // Local collaborator implementations; real gateway/channel clients
    // are configured per deployment.
    let payments = Arc::new(LocalPaymentGateway);
    let channel = Arc::new(LocalChannelManager::new());
    let notifier = Arc::new(LogNotifier);

    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let booking_service = Arc::new(BookingService::new(
        Arc::clone(&store),
        payments,
        Arc::<LocalChannelManager>::clone(&channel),
        notifier,
        event_bus.clone(),
        config.policy,
        config.site_base_url.clone(),
    ));
    let sync_service = Arc::new(SyncService::new(
        Arc::clone(&store),
        channel,
        event_bus.clone(),
    ));

    // Build application state
    let app_state = AppState {
        booking_service,
        sync_service,
        event_bus,
        policy: config.policy,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
