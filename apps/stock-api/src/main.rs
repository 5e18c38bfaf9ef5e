//! Stock API - inventory REST server

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let state = AppState::new(config);
    info!(
        seed_demo_data = state.config.seed_demo_data,
        unknown_movement = %state.config.unknown_movement,
        "Initialized in-memory stores"
    );

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting Stock API on port {}", state.config.server.port);

    create_production_app(app, &state.config.server, async {
        info!("Shutting down: in-memory stores are dropped with the process");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Stock API shutdown complete");
    Ok(())
}
