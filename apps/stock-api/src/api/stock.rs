//! Stock API routes

use axum::Router;
use domain_stock::{StockService, handlers};

use crate::state::AppState;

/// Create stock router
pub fn router(state: &AppState) -> Router {
    let service = StockService::new(state.stock.clone())
        .with_unknown_movement_policy(state.config.unknown_movement);
    handlers::router(service)
}
