use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::StockResult;
use crate::models::{ProductId, StockId, StockLevels, StockRecord};

/// Persistence contract for stock records.
///
/// Absence is reported through `Option`/`bool`; errors are reserved for
/// backend failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Get a record by its id
    async fn get_by_id(&self, id: StockId) -> StockResult<Option<StockRecord>>;

    /// Get the record for a product. With several matches the lowest id wins.
    async fn get_by_product_id(&self, product_id: ProductId) -> StockResult<Option<StockRecord>>;

    /// All records, ordered by id
    async fn list(&self) -> StockResult<Vec<StockRecord>>;

    /// Records whose available quantity is at or below their minimum
    async fn list_low_stock(&self) -> StockResult<Vec<StockRecord>>;

    /// Insert a new record and return its generated id
    async fn create(&self, product_id: ProductId, levels: StockLevels) -> StockResult<StockId>;

    /// Replace the stored record with the same id. `false` if it does not exist.
    async fn update(&self, record: StockRecord) -> StockResult<bool>;

    /// Remove a record. `false` if it does not exist.
    async fn delete(&self, id: StockId) -> StockResult<bool>;
}

/// In-memory implementation of StockRepository
#[derive(Debug, Clone)]
pub struct InMemoryStockRepository {
    records: Arc<RwLock<BTreeMap<StockId, StockRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryStockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStockRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Store pre-filled with two demo records (products 1 and 2, the second
    /// one below its minimum).
    pub fn with_demo_data() -> Self {
        let seed = [
            (
                1,
                StockLevels {
                    available_quantity: 50,
                    reserved_quantity: 10,
                    minimum_quantity: 20,
                    maximum_quantity: 200,
                    warehouse_location: Some("A1".to_string()),
                },
            ),
            (
                2,
                StockLevels {
                    available_quantity: 15,
                    reserved_quantity: 5,
                    minimum_quantity: 20,
                    maximum_quantity: 150,
                    warehouse_location: Some("B2".to_string()),
                },
            ),
        ];

        let mut records = BTreeMap::new();
        let mut next_id = 1;
        for (product_id, levels) in seed {
            records.insert(next_id, StockRecord::new(next_id, product_id, levels));
            next_id += 1;
        }

        Self {
            records: Arc::new(RwLock::new(records)),
            next_id: Arc::new(AtomicI64::new(next_id)),
        }
    }
}

#[async_trait]
impl StockRepository for InMemoryStockRepository {
    async fn get_by_id(&self, id: StockId) -> StockResult<Option<StockRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn get_by_product_id(&self, product_id: ProductId) -> StockResult<Option<StockRecord>> {
        let records = self.records.read().await;
        // BTreeMap iterates in id order
        Ok(records
            .values()
            .find(|r| r.product_id == product_id)
            .cloned())
    }

    async fn list(&self) -> StockResult<Vec<StockRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn list_low_stock(&self) -> StockResult<Vec<StockRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.is_low_stock())
            .cloned()
            .collect())
    }

    async fn create(&self, product_id: ProductId, levels: StockLevels) -> StockResult<StockId> {
        let mut records = self.records.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        records.insert(id, StockRecord::new(id, product_id, levels));

        tracing::info!(stock_id = id, product_id, "Created stock record");
        Ok(id)
    }

    async fn update(&self, record: StockRecord) -> StockResult<bool> {
        let mut records = self.records.write().await;

        match records.get_mut(&record.id) {
            Some(existing) => {
                tracing::debug!(stock_id = record.id, "Stored stock record");
                *existing = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: StockId) -> StockResult<bool> {
        let mut records = self.records.write().await;

        if records.remove(&id).is_some() {
            tracing::info!(stock_id = id, "Deleted stock record");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(available: i32, min: i32) -> StockLevels {
        StockLevels {
            available_quantity: available,
            reserved_quantity: 0,
            minimum_quantity: min,
            maximum_quantity: 100,
            warehouse_location: Some("C3".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_record() {
        let repo = InMemoryStockRepository::new();

        let id = repo.create(42, levels(10, 5)).await.unwrap();
        assert_eq!(id, 1);

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.product_id, 42);
        assert_eq!(fetched.available_quantity, 10);
        assert_eq!(fetched.warehouse_location.as_deref(), Some("C3"));

        let by_product = repo.get_by_product_id(42).await.unwrap().unwrap();
        assert_eq!(by_product.id, id);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryStockRepository::new();

        let first = repo.create(1, levels(1, 0)).await.unwrap();
        assert!(repo.delete(first).await.unwrap());
        let second = repo.create(1, levels(1, 0)).await.unwrap();

        assert!(second > first);
        assert!(repo.get_by_id(first).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_product_returns_lowest_id() {
        let repo = InMemoryStockRepository::new();

        let first = repo.create(7, levels(1, 0)).await.unwrap();
        repo.create(7, levels(2, 0)).await.unwrap();

        let found = repo.get_by_product_id(7).await.unwrap().unwrap();
        assert_eq!(found.id, first);
        assert!(repo.get_by_product_id(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_false() {
        let repo = InMemoryStockRepository::new();
        let ghost = StockRecord::new(99, 1, levels(1, 0));

        assert!(!repo.update(ghost).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repo = InMemoryStockRepository::new();
        assert!(!repo.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_low_stock_filters_at_read_time() {
        let repo = InMemoryStockRepository::new();
        let id = repo.create(1, levels(50, 20)).await.unwrap();
        repo.create(2, levels(20, 20)).await.unwrap();

        let low: Vec<_> = repo
            .list_low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.product_id)
            .collect();
        assert_eq!(low, vec![2]);

        let mut record = repo.get_by_id(id).await.unwrap().unwrap();
        record.available_quantity = 3;
        assert!(repo.update(record).await.unwrap());

        assert_eq!(repo.list_low_stock().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_demo_data() {
        let repo = InMemoryStockRepository::with_demo_data();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);

        let low = repo.list_low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].product_id, 2);

        let next = repo.create(3, levels(0, 0)).await.unwrap();
        assert_eq!(next, 3);
    }
}
