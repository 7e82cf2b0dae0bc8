//! Pickup relay API server binary entrypoint.

use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pickup_common::config::AppConfig;
use pickup_engine::bootstrap::Clients;

use pickup_api::routes::create_router;
use pickup_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "pickup_api=debug,pickup_engine=debug,pickup_notifier=debug,tower_http=debug",
            )
        }))
        .init();

    tracing::info!("Starting pickup relay API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Credentials are loaded once; the dispatcher is handed to the handlers
    let clients = Clients::from_config(&config)?;
    let dispatcher = clients.dispatcher(&config);

    // Build application state
    let port = config.port;
    let state = AppState::new(dispatcher);

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Pickup relay running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    Ok(())
}
