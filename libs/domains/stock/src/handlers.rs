//! HTTP handlers for the Stock API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, BusinessRuleResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::StockResult;
use crate::models::{
    CreatedResponse, MessageResponse, MovementResponse, StockLevels, StockMovement, StockResponse,
};
use crate::repository::StockRepository;
use crate::service::StockService;

/// OpenAPI documentation for the Stock API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_stock,
        list_low_stock,
        get_stock,
        get_by_product,
        create_stock,
        update_stock,
        apply_movement,
        delete_stock,
    ),
    components(
        schemas(
            StockResponse, StockLevels, StockMovement, MovementResponse,
            CreatedResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BusinessRuleResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Stock", description = "Stock levels and movements")
    )
)]
pub struct ApiDoc;

/// Create the stock router with all HTTP endpoints
pub fn router<R: StockRepository + 'static>(service: StockService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_stock))
        .route("/low-stock", get(list_low_stock))
        .route("/movement", post(apply_movement))
        .route(
            "/product/{product_id}",
            get(get_by_product).post(create_stock),
        )
        .route(
            "/{id}",
            get(get_stock).put(update_stock).delete(delete_stock),
        )
        .with_state(shared_service)
}

fn to_responses(records: Vec<crate::models::StockRecord>) -> Vec<StockResponse> {
    records.into_iter().map(StockResponse::from).collect()
}

/// List every stock record
#[utoipa::path(
    get,
    path = "",
    tag = "Stock",
    responses(
        (status = 200, description = "All stock records", body = Vec<StockResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_stock<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
) -> StockResult<Json<Vec<StockResponse>>> {
    let records = service.list_stock().await?;
    Ok(Json(to_responses(records)))
}

/// List records whose available quantity is at or below the minimum
#[utoipa::path(
    get,
    path = "/low-stock",
    tag = "Stock",
    responses(
        (status = 200, description = "Low stock records", body = Vec<StockResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_low_stock<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
) -> StockResult<Json<Vec<StockResponse>>> {
    let records = service.list_low_stock().await?;
    Ok(Json(to_responses(records)))
}

/// Get a stock record by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Stock",
    params(
        ("id" = i64, Path, description = "Stock record ID")
    ),
    responses(
        (status = 200, description = "Stock record found", body = StockResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_stock<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
    IdPath(id): IdPath,
) -> StockResult<Json<StockResponse>> {
    let record = service.get_stock(id).await?;
    Ok(Json(record.into()))
}

/// Get the stock record of a product
#[utoipa::path(
    get,
    path = "/product/{product_id}",
    tag = "Stock",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Stock record found", body = StockResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_product<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
    IdPath(product_id): IdPath,
) -> Result<Json<StockResponse>, AppError> {
    let record = service
        .find_by_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No stock record for product {product_id}")))?;
    Ok(Json(record.into()))
}

/// Create a stock record for a product
#[utoipa::path(
    post,
    path = "/product/{product_id}",
    tag = "Stock",
    params(
        ("product_id" = i64, Path, description = "Product ID")
    ),
    request_body = StockLevels,
    responses(
        (status = 201, description = "Stock record created", body = CreatedResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_stock<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
    IdPath(product_id): IdPath,
    ValidatedJson(levels): ValidatedJson<StockLevels>,
) -> StockResult<impl IntoResponse> {
    let id = service.create_stock(product_id, levels).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Replace the quantities and location of a stock record
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Stock",
    params(
        ("id" = i64, Path, description = "Stock record ID")
    ),
    request_body = StockLevels,
    responses(
        (status = 200, description = "Stock record updated", body = StockResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_stock<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(levels): ValidatedJson<StockLevels>,
) -> StockResult<Json<StockResponse>> {
    let record = service.update_stock(id, levels).await?;
    Ok(Json(record.into()))
}

/// Apply an inflow (`entrada`), outflow (`salida`) or adjustment (`ajuste`)
#[utoipa::path(
    post,
    path = "/movement",
    tag = "Stock",
    request_body = StockMovement,
    responses(
        (status = 200, description = "Movement processed", body = MovementResponse),
        (status = 400, response = BusinessRuleResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn apply_movement<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
    ValidatedJson(movement): ValidatedJson<StockMovement>,
) -> StockResult<Json<MovementResponse>> {
    let outcome = service.apply_movement(movement).await?;
    Ok(Json(outcome.into()))
}

/// Delete a stock record
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Stock",
    params(
        ("id" = i64, Path, description = "Stock record ID")
    ),
    responses(
        (status = 200, description = "Stock record deleted", body = MessageResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_stock<R: StockRepository>(
    State(service): State<Arc<StockService<R>>>,
    IdPath(id): IdPath,
) -> StockResult<Json<MessageResponse>> {
    service.delete_stock(id).await?;
    Ok(Json(MessageResponse {
        message: format!("Stock record {id} deleted"),
    }))
}
