//! Promotional collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a collection is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Active,
    Expired,
}

/// A time-boxed promotional collection of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub discount: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub limited_products: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Generates an identifier for a collection created without one.
    pub fn generate_id() -> String {
        format!("collection_{}", Uuid::new_v4().simple())
    }

    /// Status is derived from the end date, never stored.
    pub fn status(&self, now: DateTime<Utc>) -> CollectionStatus {
        if now < self.end_date {
            CollectionStatus::Active
        } else {
            CollectionStatus::Expired
        }
    }
}

/// Field-wise update for `PUT /collections`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub discount: Option<u32>,
    pub icon: Option<String>,
    pub features: Option<Vec<String>>,
    pub limited_products: Option<Vec<String>>,
}

impl Collection {
    /// Applies a patch in place, bumping the update timestamp.
    pub fn apply(&mut self, patch: CollectionPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.discount {
            self.discount = v;
        }
        if let Some(v) = patch.icon {
            self.icon = v;
        }
        if let Some(v) = patch.features {
            self.features = v;
        }
        if let Some(v) = patch.limited_products {
            self.limited_products = v;
        }
        self.updated_at = now;
    }
}
