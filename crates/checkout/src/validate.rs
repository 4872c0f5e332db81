//! Stock validation.

use datastore::{Datastore, StoreError};
use domain::LineItem;

/// Outcome of validating a submission's line items against stock.
///
/// Errors accumulate rather than failing fast, so the caller sees
/// every shortfall at once.
#[derive(Debug, Default)]
pub struct StockReport {
    errors: Vec<String>,
}

impl StockReport {
    /// True only if no error accumulated.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The accumulated error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consumes the report, yielding the error messages.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Checks every stocked line item against the product's current stock.
///
/// Apparel items carry no stock concept and are skipped entirely.
/// Missing products and shortfalls are both recorded; only a store
/// failure aborts the scan.
pub async fn validate_stock<S: Datastore>(
    store: &S,
    items: &[LineItem],
) -> Result<StockReport, StoreError> {
    let mut report = StockReport::default();

    for item in items {
        if item.kind.is_apparel() {
            continue;
        }

        let Some(product) = store.get_product(&item.product_id).await? else {
            report
                .errors
                .push(format!("Product {} not found", item.product_id));
            continue;
        };

        if product.stock < item.quantity {
            report.errors.push(format!(
                "Insufficient stock for {}. Available: {}, Requested: {}",
                product.name, product.stock, item.quantity
            ));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use datastore::MemoryStore;
    use domain::{ItemKind, Money, Product, ProductId};

    fn product(id: &str, stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "hair".to_string(),
            price: Money::from_cents(1000),
            stock,
            images: vec![],
            collection_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn sufficient_stock_is_valid() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 5)).await.unwrap();

        let items = vec![LineItem::new("P1", ItemKind::Stocked, 2, Money::zero())];
        let report = validate_stock(&store, &items).await.unwrap();
        assert!(report.is_valid());
    }

    #[tokio::test]
    async fn shortfall_names_product_and_quantities() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 1)).await.unwrap();

        let items = vec![LineItem::new("P1", ItemKind::Stocked, 3, Money::zero())];
        let report = validate_stock(&store, &items).await.unwrap();
        assert!(!report.is_valid());
        assert_eq!(
            report.errors(),
            &["Insufficient stock for Product P1. Available: 1, Requested: 3".to_string()]
        );
    }

    #[tokio::test]
    async fn all_errors_accumulate() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 0)).await.unwrap();

        let items = vec![
            LineItem::new("P1", ItemKind::Stocked, 1, Money::zero()),
            LineItem::new("P2", ItemKind::Stocked, 1, Money::zero()),
        ];
        let report = validate_stock(&store, &items).await.unwrap();
        assert_eq!(report.errors().len(), 2);
        assert!(report.errors()[1].contains("Product P2 not found"));
    }

    #[tokio::test]
    async fn apparel_is_never_checked() {
        // No products seeded at all: an apparel-only submission must
        // still validate, proving no lookup happened.
        let store = MemoryStore::new();
        let items = vec![LineItem::new("S1", ItemKind::Apparel, 10, Money::zero())];
        let report = validate_stock(&store, &items).await.unwrap();
        assert!(report.is_valid());
    }
}
