//! Stock Domain
//!
//! Stock records per product and the movement rules that change them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Movement rules, per-record locking
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_stock::{handlers, InMemoryStockRepository, StockService, UnknownMovementPolicy};
//!
//! let repository = InMemoryStockRepository::new();
//! let service = StockService::new(repository)
//!     .with_unknown_movement_policy(UnknownMovementPolicy::Reject);
//!
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod locks;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{StockError, StockResult};
pub use handlers::ApiDoc;
pub use models::{
    CreatedResponse, MessageResponse, MovementOutcome, MovementResponse, MovementType, ProductId,
    StockId, StockLevels, StockMovement, StockRecord, StockResponse, UnknownMovementPolicy,
};
pub use repository::{InMemoryStockRepository, StockRepository};
pub use service::StockService;
