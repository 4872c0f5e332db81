//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use crate::status::OrderStatus;

/// Category of a line item for stock purposes.
///
/// Apparel is made to order and carries no stock concept; everything
/// else is a stocked good. Unknown categories on the wire deserialize
/// as stocked, so new catalog types are stock-tracked by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[serde(alias = "clothing")]
    Apparel,
    #[default]
    #[serde(other)]
    Stocked,
}

impl ItemKind {
    /// True if items of this kind are exempt from stock tracking.
    pub fn is_apparel(&self) -> bool {
        matches!(self, ItemKind::Apparel)
    }
}

fn default_quantity() -> u32 {
    1
}

/// One product/quantity/price entry within an order.
///
/// Wire field names follow the submission format: `id`, `type`,
/// `quantity`, `price`. Quantity defaults to 1 when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,

    #[serde(rename = "type", default)]
    pub kind: ItemKind,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(rename = "price", default)]
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(
        product_id: impl Into<ProductId>,
        kind: ItemKind,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            kind,
            quantity,
            unit_price,
        }
    }
}

/// A persisted order row.
///
/// Customer fields are denormalized copies of the submission, not a
/// foreign key into the customers table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_address: String,
    pub items: Vec<LineItem>,
    pub total: Money,
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field-wise update for `PUT /orders`. Absent fields are left as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub total: Option<Money>,
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
}

impl Order {
    /// Applies a patch in place, bumping the update timestamp.
    pub fn apply(&mut self, patch: OrderPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.customer_name {
            self.customer_name = v;
        }
        if let Some(v) = patch.customer_phone {
            self.customer_phone = v;
        }
        if let Some(v) = patch.customer_email {
            self.customer_email = v;
        }
        if let Some(v) = patch.customer_address {
            self.customer_address = v;
        }
        if let Some(v) = patch.items {
            self.items = v;
        }
        if let Some(v) = patch.total {
            self.total = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_defaults() {
        let item: LineItem = serde_json::from_str(r#"{"id": "P1"}"#).unwrap();
        assert_eq!(item.product_id.as_str(), "P1");
        assert_eq!(item.kind, ItemKind::Stocked);
        assert_eq!(item.quantity, 1);
        assert!(item.unit_price.is_zero());
    }

    #[test]
    fn unknown_item_type_is_stocked() {
        let item: LineItem =
            serde_json::from_str(r#"{"id": "H1", "type": "hair", "quantity": 3}"#).unwrap();
        assert_eq!(item.kind, ItemKind::Stocked);
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn legacy_clothing_type_is_apparel() {
        let item: LineItem = serde_json::from_str(r#"{"id": "C1", "type": "clothing"}"#).unwrap();
        assert!(item.kind.is_apparel());

        let item: LineItem = serde_json::from_str(r#"{"id": "C2", "type": "apparel"}"#).unwrap();
        assert!(item.kind.is_apparel());
    }

    #[test]
    fn patch_updates_only_present_fields() {
        let now = Utc::now();
        let mut order = Order {
            id: OrderId::new("LG1"),
            customer_name: "An".to_string(),
            customer_phone: "090".to_string(),
            customer_email: String::new(),
            customer_address: String::new(),
            items: vec![],
            total: Money::from_cents(100),
            status: OrderStatus::New,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };

        let later = now + chrono::Duration::seconds(5);
        order.apply(
            OrderPatch {
                status: Some(OrderStatus::Cancelled),
                notes: Some("changed mind".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.notes, "changed mind");
        assert_eq!(order.customer_name, "An");
        assert_eq!(order.total.cents(), 100);
        assert_eq!(order.updated_at, later);
    }
}
