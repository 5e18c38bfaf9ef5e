//! Per-record mutual exclusion for read-modify-write sequences.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::StockId;

/// Table of one async mutex per stock record id.
///
/// Operations on the same record serialize on its mutex; distinct records
/// never contend. The table lock is only held while looking up an entry.
#[derive(Debug, Clone, Default)]
pub struct RecordLocks {
    table: Arc<Mutex<HashMap<StockId, Arc<Mutex<()>>>>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn acquire(&self, id: StockId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().await;
            table.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the entry of a record that no longer exists
    pub async fn remove(&self, id: StockId) {
        self.table.lock().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
