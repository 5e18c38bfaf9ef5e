//! API routes module

pub mod health;
pub mod products;
pub mod stock;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/stock", stock::router(state))
        .nest("/products", products::router(state))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain_stock::UnknownMovementPolicy;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn state(seed_demo_data: bool) -> AppState {
        AppState::new(Config {
            app: core_config::app_info!(),
            server: Default::default(),
            environment: core_config::Environment::Development,
            unknown_movement: UnknownMovementPolicy::Ignore,
            seed_demo_data,
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_routes_are_nested() {
        let app = routes(&state(true));

        let (status, body) = get_json(app.clone(), "/stock/low-stock").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = get_json(app, "/products/sku/PROD002").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Accesorios");
    }

    #[tokio::test]
    async fn test_empty_state_without_seed() {
        let (status, body) = get_json(routes(&state(false)), "/stock").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_movement_policy_reaches_service() {
        let app = routes(&state(true));
        let request = Request::post("/stock/movement")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"productId":1,"quantity":5,"movementType":"transfer"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready() {
        let (status, body) = get_json(routes(&state(false)), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["stock_store"], "up");
    }
}
