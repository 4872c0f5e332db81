//! Apparel color swatches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Garment category a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    Shirt,
    Trouser,
}

impl ColorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCategory::Shirt => "shirt",
            ColorCategory::Trouser => "trouser",
        }
    }

    pub fn parse(s: &str) -> Option<ColorCategory> {
        match s {
            "shirt" => Some(ColorCategory::Shirt),
            "trouser" => Some(ColorCategory::Trouser),
            _ => None,
        }
    }
}

impl std::fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fabric color offered for made-to-order apparel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub id: String,
    pub name: String,
    pub hex_code: String,
    pub category: ColorCategory,
    #[serde(default)]
    pub quantity: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Color {
    /// Generates a category-prefixed identifier.
    pub fn generate_id(category: ColorCategory) -> String {
        format!("{}_{}", category.as_str(), Uuid::new_v4().simple())
    }
}

/// Field-wise update for `PUT /colors/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorPatch {
    pub name: Option<String>,
    pub hex_code: Option<String>,
    pub category: Option<ColorCategory>,
    pub quantity: Option<u32>,
    pub is_active: Option<bool>,
}

impl Color {
    /// Applies a patch in place.
    pub fn apply(&mut self, patch: ColorPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.hex_code {
            self.hex_code = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.quantity {
            self.quantity = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
    }
}
