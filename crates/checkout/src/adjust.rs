//! Stock adjustment.

use chrono::{DateTime, Utc};
use datastore::{Datastore, StoreError};
use domain::{LineItem, ProductId, StockDirection};

/// One stock write that actually happened, with before/after values.
///
/// Keeping both sides makes compensation exact: after clamping at
/// zero, the applied delta can be smaller than the requested quantity.
#[derive(Debug, Clone)]
pub struct AppliedAdjustment {
    pub product_id: ProductId,
    pub previous: u32,
    pub current: u32,
}

/// Record of a pass over a submission's line items.
#[derive(Debug, Default)]
pub struct AdjustReport {
    /// Adjustments committed to the store, in item order.
    pub applied: Vec<AppliedAdjustment>,
    /// Stocked items whose product no longer exists.
    pub missing: Vec<ProductId>,
}

/// Adjusts stock for every stocked line item, one row at a time.
///
/// Each write clamps the result at zero and stamps `updated_at`.
/// Items whose product lookup fails are skipped but recorded in the
/// report (and logged), so data-integrity holes stay visible. The
/// report accumulates in place: on a store error mid-pass, writes
/// already applied remain recorded for the caller to compensate.
pub async fn adjust_stock<S: Datastore>(
    store: &S,
    items: &[LineItem],
    direction: StockDirection,
    now: DateTime<Utc>,
    report: &mut AdjustReport,
) -> Result<(), StoreError> {
    for item in items {
        if item.kind.is_apparel() {
            continue;
        }

        let Some(mut product) = store.get_product(&item.product_id).await? else {
            tracing::warn!(product_id = %item.product_id, "stock adjustment skipped: product missing");
            report.missing.push(item.product_id.clone());
            continue;
        };

        let previous = product.stock;
        let current = match direction {
            StockDirection::Decrease => previous.saturating_sub(item.quantity),
            StockDirection::Increase => previous.saturating_add(item.quantity),
        };

        product.stock = current;
        product.updated_at = now;
        store.update_product(product).await?;

        report.applied.push(AppliedAdjustment {
            product_id: item.product_id.clone(),
            previous,
            current,
        });
    }

    Ok(())
}

/// Undoes the applied adjustments of a report, newest first.
///
/// Re-reads each product and reapplies the recorded delta rather than
/// blindly restoring the old value, so a concurrent writer's update is
/// not clobbered.
pub async fn revert<S: Datastore>(
    store: &S,
    report: &AdjustReport,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    for adjustment in report.applied.iter().rev() {
        let Some(mut product) = store.get_product(&adjustment.product_id).await? else {
            tracing::warn!(product_id = %adjustment.product_id, "compensation skipped: product missing");
            continue;
        };

        let delta = adjustment.previous as i64 - adjustment.current as i64;
        let restored = (product.stock as i64 + delta).max(0) as u32;

        product.stock = restored;
        product.updated_at = now;
        store.update_product(product).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::MemoryStore;
    use domain::{ItemKind, Money, Product};

    fn product(id: &str, stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            category: "hair".to_string(),
            price: Money::from_cents(1000),
            stock,
            images: vec![],
            collection_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    async fn stock_of(store: &MemoryStore, id: &str) -> u32 {
        store
            .get_product(&ProductId::new(id))
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn decrease_clamps_at_zero() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 2)).await.unwrap();

        let items = vec![LineItem::new("P1", ItemKind::Stocked, 5, Money::zero())];
        let mut report = AdjustReport::default();
        adjust_stock(&store, &items, StockDirection::Decrease, Utc::now(), &mut report)
            .await
            .unwrap();

        assert_eq!(stock_of(&store, "P1").await, 0);
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.applied[0].previous, 2);
        assert_eq!(report.applied[0].current, 0);
    }

    #[tokio::test]
    async fn increase_restores() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 3)).await.unwrap();

        let items = vec![LineItem::new("P1", ItemKind::Stocked, 2, Money::zero())];
        let mut report = AdjustReport::default();
        adjust_stock(&store, &items, StockDirection::Increase, Utc::now(), &mut report)
            .await
            .unwrap();

        assert_eq!(stock_of(&store, "P1").await, 5);
    }

    #[tokio::test]
    async fn missing_products_are_reported_not_fatal() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 5)).await.unwrap();

        let items = vec![
            LineItem::new("GONE", ItemKind::Stocked, 1, Money::zero()),
            LineItem::new("P1", ItemKind::Stocked, 1, Money::zero()),
        ];
        let mut report = AdjustReport::default();
        adjust_stock(&store, &items, StockDirection::Decrease, Utc::now(), &mut report)
            .await
            .unwrap();

        assert_eq!(report.missing, vec![ProductId::new("GONE")]);
        assert_eq!(stock_of(&store, "P1").await, 4);
    }

    #[tokio::test]
    async fn apparel_is_never_touched() {
        let store = MemoryStore::new();
        store.insert_product(product("S1", 5)).await.unwrap();

        // Same id as a real product, but the apparel kind exempts it.
        let items = vec![LineItem::new("S1", ItemKind::Apparel, 3, Money::zero())];
        let mut report = AdjustReport::default();
        adjust_stock(&store, &items, StockDirection::Decrease, Utc::now(), &mut report)
            .await
            .unwrap();

        assert_eq!(stock_of(&store, "S1").await, 5);
        assert!(report.applied.is_empty());
    }

    #[tokio::test]
    async fn revert_reapplies_the_exact_delta() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", 2)).await.unwrap();

        // Clamped decrease: requested 5, actually applied 2.
        let items = vec![LineItem::new("P1", ItemKind::Stocked, 5, Money::zero())];
        let mut report = AdjustReport::default();
        adjust_stock(&store, &items, StockDirection::Decrease, Utc::now(), &mut report)
            .await
            .unwrap();
        assert_eq!(stock_of(&store, "P1").await, 0);

        revert(&store, &report, Utc::now()).await.unwrap();
        assert_eq!(stock_of(&store, "P1").await, 2);
    }
}
