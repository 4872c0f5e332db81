//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::Money;

/// A catalog product with a non-negative stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: Money,
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub collection_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-wise update for `PUT /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<u32>,
    pub images: Option<Vec<String>>,
    pub collection_ids: Option<Vec<String>>,
}

impl Product {
    /// Applies a patch in place, bumping the update timestamp.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.stock {
            self.stock = v;
        }
        if let Some(v) = patch.images {
            self.images = v;
        }
        if let Some(v) = patch.collection_ids {
            self.collection_ids = v;
        }
        self.updated_at = now;
    }

    /// True if the product belongs to the given collection.
    pub fn in_collection(&self, collection_id: &str) -> bool {
        self.collection_ids.iter().any(|c| c == collection_id)
    }
}
