use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Identifier of a stock record
pub type StockId = i64;

/// Identifier of a catalog product
pub type ProductId = i64;

/// Kind of stock movement.
///
/// Parsed case-insensitively from the wire names `entrada`, `salida` and
/// `ajuste`, or their English aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MovementType {
    /// Goods received: available quantity grows by the movement quantity
    #[strum(to_string = "entrada", serialize = "inflow")]
    Inflow,
    /// Goods issued: refused when it would drive available quantity below zero
    #[strum(to_string = "salida", serialize = "outflow")]
    Outflow,
    /// Signed correction, applied like an inflow with no floor
    #[strum(to_string = "ajuste", serialize = "adjustment")]
    Adjustment,
}

/// What to do with a movement whose type is not recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UnknownMovementPolicy {
    /// Fail with `InvalidMovementType`, nothing is written
    #[default]
    Reject,
    /// Succeed without touching quantities, only `last_updated` moves
    Ignore,
}

/// Stock record entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    pub id: StockId,
    pub product_id: ProductId,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
    pub minimum_quantity: i32,
    pub maximum_quantity: i32,
    pub warehouse_location: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl StockRecord {
    /// Build a record from caller-supplied levels, stamped with the current time
    pub fn new(id: StockId, product_id: ProductId, levels: StockLevels) -> Self {
        let mut record = Self {
            id,
            product_id,
            available_quantity: 0,
            reserved_quantity: 0,
            minimum_quantity: 0,
            maximum_quantity: 0,
            warehouse_location: None,
            last_updated: Utc::now(),
        };
        record.apply_levels(levels);
        record
    }

    /// Overwrite every mutable field. An absent location clears the stored one.
    pub fn apply_levels(&mut self, levels: StockLevels) {
        self.available_quantity = levels.available_quantity;
        self.reserved_quantity = levels.reserved_quantity;
        self.minimum_quantity = levels.minimum_quantity;
        self.maximum_quantity = levels.maximum_quantity;
        self.warehouse_location = levels.warehouse_location;
        self.last_updated = Utc::now();
    }

    /// Available plus reserved, widened so it cannot overflow
    pub fn total_quantity(&self) -> i64 {
        i64::from(self.available_quantity) + i64::from(self.reserved_quantity)
    }

    pub fn is_low_stock(&self) -> bool {
        self.available_quantity <= self.minimum_quantity
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Quantities and location supplied on create and on full update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevels {
    #[serde(default)]
    pub available_quantity: i32,
    #[serde(default)]
    pub reserved_quantity: i32,
    #[serde(default)]
    pub minimum_quantity: i32,
    #[serde(default)]
    pub maximum_quantity: i32,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub warehouse_location: Option<String>,
}

/// A transient instruction to change a product's available quantity.
///
/// Movements are applied and discarded; `reference` and `notes` only reach
/// the logs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub product_id: ProductId,
    pub quantity: i32,
    /// `entrada`, `salida` or `ajuste` (case-insensitive)
    #[schema(example = "entrada")]
    pub movement_type: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub reference: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Result of a successful movement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementOutcome {
    /// Quantities changed
    Applied(StockRecord),
    /// Type not recognized and ignored by policy; only the timestamp moved
    Unchanged(StockRecord),
}

impl MovementOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MovementOutcome::Applied(_))
    }

    pub fn record(&self) -> &StockRecord {
        match self {
            MovementOutcome::Applied(record) | MovementOutcome::Unchanged(record) => record,
        }
    }

    pub fn into_record(self) -> StockRecord {
        match self {
            MovementOutcome::Applied(record) | MovementOutcome::Unchanged(record) => record,
        }
    }
}

/// Stock record as returned over HTTP, with derived fields computed on the way out
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    pub id: StockId,
    pub product_id: ProductId,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
    /// availableQuantity + reservedQuantity
    pub total_quantity: i64,
    pub minimum_quantity: i32,
    pub maximum_quantity: i32,
    pub warehouse_location: Option<String>,
    pub last_updated: DateTime<Utc>,
    /// availableQuantity <= minimumQuantity
    pub is_low_stock: bool,
}

impl From<StockRecord> for StockResponse {
    fn from(record: StockRecord) -> Self {
        Self {
            total_quantity: record.total_quantity(),
            is_low_stock: record.is_low_stock(),
            id: record.id,
            product_id: record.product_id,
            available_quantity: record.available_quantity,
            reserved_quantity: record.reserved_quantity,
            minimum_quantity: record.minimum_quantity,
            maximum_quantity: record.maximum_quantity,
            warehouse_location: record.warehouse_location,
            last_updated: record.last_updated,
        }
    }
}

/// Response body of `POST /movement`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementResponse {
    /// false when the movement type was ignored and quantities are untouched
    pub applied: bool,
    pub stock: StockResponse,
}

impl From<MovementOutcome> for MovementResponse {
    fn from(outcome: MovementOutcome) -> Self {
        Self {
            applied: outcome.is_applied(),
            stock: outcome.into_record().into(),
        }
    }
}

/// Response body of a create call
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: StockId,
}

/// Response body of a delete call
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
