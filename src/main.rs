use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use argos_bridge::config::Config;
use argos_bridge::routes;
use argos_bridge::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("argos_bridge=debug,tower_http=debug")),
        )
        .init();

    let config_paths = Config::search_paths();

    // The bridge has to come up even with nothing configured.
    let config = match Config::discover(&config_paths) {
        Some((config, path)) => {
            info!("Loaded configuration from: {}", path);
            config
        }
        None => {
            warn!("No configuration found (tried {:?}); using defaults", config_paths);
            Config::default()
        }
    }
    .with_env_overrides();

    let app_state = AppState::new(config.clone());

    // Does not block the listener.
    app_state.spawn_startup_init();

    let app = routes::app(app_state);

    let system_config = &config.system_config;
    let listener =
        tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
