use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::models::{ProductId, StockId};

#[derive(Debug, Error)]
pub enum StockError {
    #[error("Stock record {0} not found")]
    NotFound(StockId),

    #[error("No stock record for product {0}")]
    NoStockForProduct(ProductId),

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Invalid movement type '{0}', expected entrada, salida or ajuste")]
    InvalidMovementType(String),

    #[error("Movement would overflow the stock quantity")]
    QuantityOverflow,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StockResult<T> = Result<T, StockError>;

/// Convert StockError to AppError for standardized error responses
impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::NotFound(_) => AppError::NotFound(err.to_string()),
            StockError::NoStockForProduct(_)
            | StockError::InsufficientStock { .. }
            | StockError::QuantityOverflow => AppError::BusinessRule(err.to_string()),
            StockError::InvalidMovementType(_) => AppError::BadRequest(err.to_string()),
            StockError::Validation(msg) => AppError::BadRequest(msg),
            StockError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for StockError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (StockError::NotFound(1), StatusCode::NOT_FOUND),
            (StockError::NoStockForProduct(9), StatusCode::BAD_REQUEST),
            (
                StockError::InsufficientStock {
                    available: 10,
                    requested: 20,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                StockError::InvalidMovementType("transfer".into()),
                StatusCode::BAD_REQUEST,
            ),
            (StockError::QuantityOverflow, StatusCode::BAD_REQUEST),
            (
                StockError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = StockError::InsufficientStock {
            available: 10,
            requested: 20,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: 10 available, 20 requested"
        );
    }
}
