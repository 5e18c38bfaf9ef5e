//! Readiness endpoint

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use domain_products::ProductRepository;
use domain_stock::StockRepository;

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "stock_store",
            Box::pin(async {
                state
                    .stock
                    .list()
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "product_store",
            Box::pin(async {
                state
                    .products
                    .list_active()
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }),
        ),
    ];

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
}
