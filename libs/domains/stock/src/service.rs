//! Stock ledger - the quantity mutation rules

use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::instrument;
use validator::Validate;

use crate::error::{StockError, StockResult};
use crate::locks::RecordLocks;
use crate::models::{
    MovementOutcome, MovementType, ProductId, StockId, StockLevels, StockMovement, StockRecord,
    UnknownMovementPolicy,
};
use crate::repository::StockRepository;

/// Stock service owning the movement rules.
///
/// Every read-modify-write on a record (update, movement, delete) runs under
/// that record's lock, so concurrent calls on one record never lose writes.
pub struct StockService<R: StockRepository> {
    repository: Arc<R>,
    locks: RecordLocks,
    unknown_movement: UnknownMovementPolicy,
}

/// New available quantity after a recognized movement
pub fn next_available(
    available: i32,
    movement_type: MovementType,
    quantity: i32,
) -> StockResult<i32> {
    match movement_type {
        MovementType::Inflow | MovementType::Adjustment => available
            .checked_add(quantity)
            .ok_or(StockError::QuantityOverflow),
        MovementType::Outflow => {
            if available < quantity {
                return Err(StockError::InsufficientStock {
                    available,
                    requested: quantity,
                });
            }
            available
                .checked_sub(quantity)
                .ok_or(StockError::QuantityOverflow)
        }
    }
}

impl<R: StockRepository> StockService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            locks: RecordLocks::new(),
            unknown_movement: UnknownMovementPolicy::default(),
        }
    }

    /// Choose how unrecognized movement types are handled
    pub fn with_unknown_movement_policy(mut self, policy: UnknownMovementPolicy) -> Self {
        self.unknown_movement = policy;
        self
    }

    #[instrument(skip(self))]
    pub async fn get_stock(&self, id: StockId) -> StockResult<StockRecord> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(StockError::NotFound(id))
    }

    /// Record of a product, `None` when the product has no stock record
    #[instrument(skip(self))]
    pub async fn find_by_product(&self, product_id: ProductId) -> StockResult<Option<StockRecord>> {
        self.repository.get_by_product_id(product_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_stock(&self) -> StockResult<Vec<StockRecord>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> StockResult<Vec<StockRecord>> {
        self.repository.list_low_stock().await
    }

    /// Create a stock record for a product. Quantities are taken as given.
    #[instrument(skip(self, levels))]
    pub async fn create_stock(
        &self,
        product_id: ProductId,
        levels: StockLevels,
    ) -> StockResult<StockId> {
        levels
            .validate()
            .map_err(|e| StockError::Validation(e.to_string()))?;

        let available = levels.available_quantity;
        let id = self.repository.create(product_id, levels).await?;

        tracing::info!(stock_id = id, product_id, available, "Stock created");
        Ok(id)
    }

    /// Overwrite every mutable field of a record
    #[instrument(skip(self, levels))]
    pub async fn update_stock(&self, id: StockId, levels: StockLevels) -> StockResult<StockRecord> {
        levels
            .validate()
            .map_err(|e| StockError::Validation(e.to_string()))?;

        let (_guard, mut record) = self
            .lock_record(id)
            .await?
            .ok_or(StockError::NotFound(id))?;

        record.apply_levels(levels);
        if !self.repository.update(record.clone()).await? {
            return Err(StockError::NotFound(id));
        }

        tracing::info!(
            stock_id = id,
            available = record.available_quantity,
            reserved = record.reserved_quantity,
            "Stock updated"
        );
        Ok(record)
    }

    /// Apply an inflow, outflow or adjustment to the product's stock record.
    ///
    /// Nothing is written when the movement is refused.
    #[instrument(
        skip(self, movement),
        fields(
            product_id = movement.product_id,
            quantity = movement.quantity,
            movement_type = %movement.movement_type
        )
    )]
    pub async fn apply_movement(&self, movement: StockMovement) -> StockResult<MovementOutcome> {
        movement
            .validate()
            .map_err(|e| StockError::Validation(e.to_string()))?;

        let movement_type = match movement.movement_type.parse::<MovementType>() {
            Ok(movement_type) => Some(movement_type),
            Err(_) if self.unknown_movement == UnknownMovementPolicy::Ignore => None,
            Err(_) => {
                tracing::warn!("Rejected movement with unknown type");
                return Err(StockError::InvalidMovementType(movement.movement_type));
            }
        };

        let product_id = movement.product_id;
        let located = self
            .repository
            .get_by_product_id(product_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Rejected movement, product has no stock record");
                StockError::NoStockForProduct(product_id)
            })?;

        let (_guard, mut record) = self
            .lock_record(located.id)
            .await?
            .ok_or(StockError::NoStockForProduct(product_id))?;

        let outcome = match movement_type {
            Some(movement_type) => {
                record.available_quantity =
                    next_available(record.available_quantity, movement_type, movement.quantity)
                        .inspect_err(|e| tracing::warn!(error = %e, "Rejected movement"))?;
                record.touch();
                MovementOutcome::Applied(record)
            }
            None => {
                tracing::warn!("Ignoring movement with unknown type");
                record.touch();
                MovementOutcome::Unchanged(record)
            }
        };

        if !self.repository.update(outcome.record().clone()).await? {
            return Err(StockError::NoStockForProduct(product_id));
        }

        tracing::info!(
            stock_id = outcome.record().id,
            available = outcome.record().available_quantity,
            reference = %movement.reference,
            notes = movement.notes.as_deref().unwrap_or_default(),
            applied = outcome.is_applied(),
            "Stock movement processed"
        );
        Ok(outcome)
    }

    /// Hard delete a stock record
    #[instrument(skip(self))]
    pub async fn delete_stock(&self, id: StockId) -> StockResult<()> {
        let (guard, _) = self
            .lock_record(id)
            .await?
            .ok_or(StockError::NotFound(id))?;

        let deleted = self.repository.delete(id).await?;
        drop(guard);
        self.locks.remove(id).await;

        if !deleted {
            return Err(StockError::NotFound(id));
        }

        tracing::info!(stock_id = id, "Stock deleted");
        Ok(())
    }

    /// Take the record's lock and read it fresh. `None` if it does not exist.
    async fn lock_record(
        &self,
        id: StockId,
    ) -> StockResult<Option<(OwnedMutexGuard<()>, StockRecord)>> {
        // Avoid creating lock entries for ids that were never stored
        if self.repository.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let guard = self.locks.acquire(id).await;
        match self.repository.get_by_id(id).await? {
            Some(record) => Ok(Some((guard, record))),
            None => {
                drop(guard);
                self.locks.remove(id).await;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStockRepository, MockStockRepository};
    use std::time::Duration;

    fn levels(available: i32, reserved: i32, min: i32, max: i32) -> StockLevels {
        StockLevels {
            available_quantity: available,
            reserved_quantity: reserved,
            minimum_quantity: min,
            maximum_quantity: max,
            warehouse_location: Some("A1".to_string()),
        }
    }

    fn movement(product_id: ProductId, quantity: i32, movement_type: &str) -> StockMovement {
        StockMovement {
            product_id,
            quantity,
            movement_type: movement_type.to_string(),
            reference: "REF-1".to_string(),
            notes: None,
        }
    }

    async fn service_with(
        product_id: ProductId,
        stock: StockLevels,
    ) -> (StockService<InMemoryStockRepository>, StockId) {
        let service = StockService::new(InMemoryStockRepository::new());
        let id = service.create_stock(product_id, stock).await.unwrap();
        (service, id)
    }

    #[test]
    fn test_next_available_rules() {
        assert_eq!(next_available(10, MovementType::Inflow, 5).unwrap(), 15);
        assert_eq!(next_available(10, MovementType::Inflow, -15).unwrap(), -5);
        assert_eq!(next_available(10, MovementType::Adjustment, -15).unwrap(), -5);
        assert_eq!(next_available(10, MovementType::Outflow, 10).unwrap(), 0);
        assert!(matches!(
            next_available(10, MovementType::Outflow, 11),
            Err(StockError::InsufficientStock {
                available: 10,
                requested: 11
            })
        ));
        assert!(matches!(
            next_available(i32::MAX, MovementType::Inflow, 1),
            Err(StockError::QuantityOverflow)
        ));
        assert!(matches!(
            next_available(i32::MIN, MovementType::Adjustment, -1),
            Err(StockError::QuantityOverflow)
        ));
    }

    #[tokio::test]
    async fn test_inflow_scenario() {
        let (service, id) = service_with(1, levels(50, 10, 20, 200)).await;

        let outcome = service
            .apply_movement(movement(1, 20, "Entrada"))
            .await
            .unwrap();
        assert!(outcome.is_applied());

        let record = service.get_stock(id).await.unwrap();
        assert_eq!(record.available_quantity, 70);
        assert_eq!(record.total_quantity(), 80);
        assert!(!record.is_low_stock());
    }

    #[tokio::test]
    async fn test_outflow_within_available() {
        let (service, id) = service_with(1, levels(50, 0, 0, 100)).await;

        let outcome = service
            .apply_movement(movement(1, 20, "Salida"))
            .await
            .unwrap();
        assert!(outcome.is_applied());
        assert_eq!(service.get_stock(id).await.unwrap().available_quantity, 30);
    }

    #[tokio::test]
    async fn test_outflow_beyond_available_leaves_record_untouched() {
        let (service, id) = service_with(1, levels(10, 0, 0, 100)).await;
        let before = service.get_stock(id).await.unwrap();

        let err = service
            .apply_movement(movement(1, 20, "Salida"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StockError::InsufficientStock {
                available: 10,
                requested: 20
            }
        ));

        assert_eq!(service.get_stock(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_inflow_accepts_negative_quantity() {
        let (service, id) = service_with(1, levels(5, 0, 0, 100)).await;

        service
            .apply_movement(movement(1, -8, "entrada"))
            .await
            .unwrap();
        assert_eq!(service.get_stock(id).await.unwrap().available_quantity, -3);
    }

    #[tokio::test]
    async fn test_adjustment_has_no_floor() {
        let (service, id) = service_with(1, levels(5, 0, 0, 100)).await;

        service
            .apply_movement(movement(1, -10, "AJUSTE"))
            .await
            .unwrap();
        assert_eq!(service.get_stock(id).await.unwrap().available_quantity, -5);
    }

    #[tokio::test]
    async fn test_low_stock_listing() {
        let (service, id) = service_with(2, levels(15, 5, 20, 150)).await;
        service.create_stock(3, levels(80, 0, 20, 150)).await.unwrap();

        assert!(service.get_stock(id).await.unwrap().is_low_stock());

        let low = service.list_low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, id);
        assert_eq!(service.list_stock().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_empty_record_is_low_stock() {
        let (service, _) = service_with(9, levels(0, 0, 5, 100)).await;

        let record = service.find_by_product(9).await.unwrap().unwrap();
        assert_eq!(record.total_quantity(), 0);
        assert!(record.is_low_stock());
    }

    #[tokio::test]
    async fn test_create_accepts_negative_quantities() {
        let (service, id) = service_with(1, levels(-4, -1, 0, 0)).await;
        assert_eq!(service.get_stock(id).await.unwrap().total_quantity(), -5);
    }

    #[tokio::test]
    async fn test_movement_for_unknown_product() {
        let (service, id) = service_with(1, levels(10, 0, 0, 100)).await;
        let before = service.get_stock(id).await.unwrap();

        let err = service
            .apply_movement(movement(404, 1, "entrada"))
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::NoStockForProduct(404)));

        assert_eq!(service.list_stock().await.unwrap(), vec![before]);
    }

    #[tokio::test]
    async fn test_unknown_movement_rejected_by_default() {
        let (service, id) = service_with(1, levels(10, 0, 0, 100)).await;
        let before = service.get_stock(id).await.unwrap();

        let err = service
            .apply_movement(movement(1, 5, "transfer"))
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidMovementType(t) if t == "transfer"));
        assert_eq!(service.get_stock(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_movement_ignored_refreshes_timestamp() {
        let service = StockService::new(InMemoryStockRepository::new())
            .with_unknown_movement_policy(UnknownMovementPolicy::Ignore);
        let id = service
            .create_stock(1, levels(10, 0, 0, 100))
            .await
            .unwrap();
        let before = service.get_stock(id).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let outcome = service
            .apply_movement(movement(1, 5, "transfer"))
            .await
            .unwrap();
        assert!(!outcome.is_applied());

        let after = service.get_stock(id).await.unwrap();
        assert_eq!(after.available_quantity, 10);
        assert!(after.last_updated > before.last_updated);
        assert_eq!(outcome.into_record(), after);
    }

    #[tokio::test]
    async fn test_successful_movement_refreshes_timestamp() {
        let (service, id) = service_with(1, levels(10, 0, 0, 100)).await;
        let before = service.get_stock(id).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        service
            .apply_movement(movement(1, 1, "salida"))
            .await
            .unwrap();

        assert!(service.get_stock(id).await.unwrap().last_updated > before.last_updated);
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let (service, id) = service_with(1, levels(10, 2, 3, 100)).await;

        let updated = service
            .update_stock(
                id,
                StockLevels {
                    available_quantity: 1,
                    reserved_quantity: 0,
                    minimum_quantity: 5,
                    maximum_quantity: 50,
                    warehouse_location: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.available_quantity, 1);
        assert_eq!(updated.maximum_quantity, 50);
        assert_eq!(updated.warehouse_location, None);
        assert_eq!(updated.product_id, 1);
        assert_eq!(service.get_stock(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let service = StockService::new(InMemoryStockRepository::new());

        let err = service
            .update_stock(3, levels(1, 1, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::NotFound(3)));
    }

    #[tokio::test]
    async fn test_update_rejects_long_location() {
        let (service, id) = service_with(1, levels(1, 1, 1, 1)).await;
        let mut invalid = levels(1, 1, 1, 1);
        invalid.warehouse_location = Some("x".repeat(101));

        let err = service.update_stock(id, invalid).await.unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (service, id) = service_with(1, levels(1, 1, 1, 1)).await;

        service.delete_stock(id).await.unwrap();
        assert!(matches!(
            service.get_stock(id).await,
            Err(StockError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_stock(id).await,
            Err(StockError::NotFound(_))
        ));
        assert!(service.locks.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_outflows_never_oversell() {
        let (service, id) = service_with(1, levels(50, 0, 0, 100)).await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..80)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.apply_movement(movement(1, 1, "salida")).await })
            })
            .collect();

        let mut applied = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => applied += 1,
                Err(StockError::InsufficientStock { .. }) => refused += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(applied, 50);
        assert_eq!(refused, 30);
        assert_eq!(service.get_stock(id).await.unwrap().available_quantity, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mixed_movements_lose_no_writes() {
        let (service, id) = service_with(1, levels(1000, 0, 0, 5000)).await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let service = service.clone();
                let kind = if i % 2 == 0 { "entrada" } else { "salida" };
                tokio::spawn(async move { service.apply_movement(movement(1, 3, kind)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.get_stock(id).await.unwrap().available_quantity, 1000);
    }

    #[tokio::test]
    async fn test_refused_movement_never_writes() {
        let record = StockRecord::new(1, 7, levels(10, 0, 0, 100));
        let mut mock_repo = MockStockRepository::new();

        let located = record.clone();
        mock_repo
            .expect_get_by_product_id()
            .with(mockall::predicate::eq(7))
            .returning(move |_| Ok(Some(located.clone())));
        mock_repo
            .expect_get_by_id()
            .with(mockall::predicate::eq(1))
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo.expect_update().never();

        let service = StockService::new(mock_repo);
        let err = service
            .apply_movement(movement(7, 11, "salida"))
            .await
            .unwrap_err();

        assert!(matches!(err, StockError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn test_invalid_type_skips_lookup() {
        let mut mock_repo = MockStockRepository::new();
        mock_repo.expect_get_by_product_id().never();
        mock_repo.expect_update().never();

        let service = StockService::new(mock_repo);
        let err = service
            .apply_movement(movement(7, 1, "reserve"))
            .await
            .unwrap_err();

        assert!(matches!(err, StockError::InvalidMovementType(_)));
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut mock_repo = MockStockRepository::new();
        mock_repo
            .expect_list()
            .returning(|| Err(StockError::Internal("store offline".to_string())));

        let service = StockService::new(mock_repo);
        let err = service.list_stock().await.unwrap_err();

        assert!(matches!(err, StockError::Internal(msg) if msg == "store offline"));
    }
}
