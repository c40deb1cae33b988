//! Salon Supply CRM - Backend Server

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_supply_backend::external::platform::PlatformApi;
use salon_supply_backend::external::HttpPlatformApi;
use salon_supply_backend::services::SessionCache;
use salon_supply_backend::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "scrm_server=debug,salon_supply_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Salon Supply CRM Server");
    tracing::info!("Environment: {}", config.environment);

    // Wire up the external inventory platform client and session cache
    let platform: Arc<dyn PlatformApi> = Arc::new(HttpPlatformApi::new(&config.platform)?);
    let sessions = Arc::new(SessionCache::from_config(platform.clone(), &config.platform));

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        platform,
        sessions,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
