use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Identifier of a catalog product
pub type ProductId = i64;

/// Product entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// Stock Keeping Unit, intended unique but not enforced
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in integer cents, e.g. 99.99 is 9999
    #[schema(example = 9999)]
    pub price: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// false once soft-deleted
    pub is_active: bool,
}

impl Product {
    pub fn new(id: ProductId, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            sku: input.sku,
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    /// Apply a partial update.
    ///
    /// Empty strings leave the field as is, the price only changes when
    /// positive. `updated_at` always moves.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name.filter(|s| !s.is_empty()) {
            self.name = name;
        }
        if let Some(description) = update.description.filter(|s| !s.is_empty()) {
            self.description = Some(description);
        }
        if let Some(price) = update.price.filter(|p| *p > 0) {
            self.price = price;
        }
        if let Some(category) = update.category.filter(|s| !s.is_empty()) {
            self.category = category;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 50))]
    pub sku: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Price in integer cents, e.g. 99.99 is 9999
    #[schema(example = 9999)]
    #[validate(range(min = 0))]
    pub price: i64,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub category: String,
}

/// DTO for a partial product update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// Price in integer cents, ignored unless positive
    #[schema(example = 9999)]
    pub price: Option<i64>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

/// Response body of a create call
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: ProductId,
}

/// Response body of update and delete calls
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
