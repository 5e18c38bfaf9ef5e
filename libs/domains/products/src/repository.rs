use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductId};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Get a product by ID, active or not
    async fn get_by_id(&self, id: ProductId) -> ProductResult<Option<Product>>;

    /// Get a product by SKU, active or not
    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>>;

    /// Active products ordered by id
    async fn list_active(&self) -> ProductResult<Vec<Product>>;

    /// Active products in a category (exact match)
    async fn list_by_category(&self, category: &str) -> ProductResult<Vec<Product>>;

    /// Insert a new product and return its generated id
    async fn create(&self, input: CreateProduct) -> ProductResult<ProductId>;

    /// Replace the stored product with the same id. `false` if it does not exist.
    async fn update(&self, product: Product) -> ProductResult<bool>;

    /// Soft delete: mark the product inactive. `false` if it does not exist.
    async fn delete(&self, id: ProductId) -> ProductResult<bool>;

    /// Whether an active product with this id exists
    async fn exists(&self, id: ProductId) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Catalog pre-filled with the two demo products (ids 1 and 2)
    pub fn with_demo_data() -> Self {
        let seed = [
            CreateProduct {
                sku: "PROD001".to_string(),
                name: "Producto Ejemplo 1".to_string(),
                description: Some("Descripción del producto 1".to_string()),
                price: 9999,
                category: "Electrónica".to_string(),
            },
            CreateProduct {
                sku: "PROD002".to_string(),
                name: "Producto Ejemplo 2".to_string(),
                description: Some("Descripción del producto 2".to_string()),
                price: 14999,
                category: "Accesorios".to_string(),
            },
        ];

        let mut products = BTreeMap::new();
        let mut next_id = 1;
        for input in seed {
            products.insert(next_id, Product::new(next_id, input));
            next_id += 1;
        }

        Self {
            products: Arc::new(RwLock::new(products)),
            next_id: Arc::new(AtomicI64::new(next_id)),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_by_id(&self, id: ProductId) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.values().find(|p| p.sku == sku).cloned())
    }

    async fn list_active(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| p.is_active).cloned().collect())
    }

    async fn list_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.is_active && p.category == category)
            .cloned()
            .collect())
    }

    async fn create(&self, input: CreateProduct) -> ProductResult<ProductId> {
        let mut products = self.products.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let product = Product::new(id, input);
        tracing::info!(product_id = id, sku = %product.sku, "Created product");
        products.insert(id, product);

        Ok(id)
    }

    async fn update(&self, product: Product) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        match products.get_mut(&product.id) {
            Some(existing) => {
                tracing::info!(product_id = product.id, "Updated product");
                *existing = product;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ProductId) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        match products.get_mut(&id) {
            Some(product) => {
                product.is_active = false;
                tracing::info!(product_id = id, "Deactivated product");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, id: ProductId) -> ProductResult<bool> {
        let products = self.products.read().await;
        Ok(products.get(&id).is_some_and(|p| p.is_active))
    }
}
