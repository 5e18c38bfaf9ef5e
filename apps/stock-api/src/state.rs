//! Application state management

use domain_products::InMemoryProductRepository;
use domain_stock::InMemoryStockRepository;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stock: InMemoryStockRepository,
    pub products: InMemoryProductRepository,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (stock, products) = if config.seed_demo_data {
            (
                InMemoryStockRepository::with_demo_data(),
                InMemoryProductRepository::with_demo_data(),
            )
        } else {
            (
                InMemoryStockRepository::new(),
                InMemoryProductRepository::new(),
            )
        };

        Self {
            config,
            stock,
            products,
        }
    }
}
