//! Products Domain
//!
//! Product catalog with soft delete, backed by an in-memory repository.
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let service = ProductService::new(InMemoryProductRepository::with_demo_data());
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, CreatedResponse, MessageResponse, Product, ProductId, UpdateProduct,
};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
