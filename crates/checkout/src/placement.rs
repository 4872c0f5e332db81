//! The order placement coordinator.

use chrono::Utc;
use datastore::Datastore;
use domain::{CustomerInfo, LineItem, Money, Order, OrderId, OrderPatch, OrderStatus, StockDirection};
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::adjust::{self, AdjustReport};
use crate::customer::{self, CustomerOutcome};
use crate::error::{CheckoutError, Result};
use crate::{stats, validate};

/// An order submission as it arrives on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default)]
    pub customer_info: CustomerInfo,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total: Money,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub notes: String,
}

/// Drives the multi-write sequence behind order placement and the
/// stock side effects of status changes.
///
/// The store writes span several tables with no shared transaction.
/// Placement therefore compensates: if a write after the order insert
/// fails, everything already applied is undone in reverse before the
/// error is surfaced.
#[derive(Clone)]
pub struct CheckoutCoordinator<S> {
    store: S,
}

impl<S: Datastore> CheckoutCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and places an order.
    ///
    /// Sequence: stock validation, order insert, stock decrement,
    /// customer aggregation, daily statistics. Validation rejects with
    /// every shortfall at once and nothing written.
    #[tracing::instrument(skip(self, submission), fields(total = submission.total.cents()))]
    pub async fn place_order(&self, submission: NewOrder) -> Result<Order> {
        let started = std::time::Instant::now();

        let report = validate::validate_stock(&self.store, &submission.items).await?;
        if !report.is_valid() {
            counter!("orders_rejected_total").increment(1);
            return Err(CheckoutError::InsufficientStock {
                details: report.into_errors(),
            });
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            customer_name: submission.customer_info.name.clone(),
            customer_phone: submission.customer_info.phone.clone(),
            customer_email: submission.customer_info.email.clone(),
            customer_address: submission.customer_info.address.clone(),
            items: submission.items,
            total: submission.total,
            status: submission.status.unwrap_or_default(),
            notes: submission.notes,
            created_at: now,
            updated_at: now,
        };

        let order_id = order.id.clone();
        let order = self.store.insert_order(order).await.map_err(|err| {
            if err.is_unique_violation() {
                CheckoutError::DuplicateOrder(order_id)
            } else {
                CheckoutError::Store(err)
            }
        })?;

        match self.finish_placement(&order, &submission.customer_info).await {
            Ok(()) => {
                counter!("orders_placed_total").increment(1);
                histogram!("order_placement_seconds").record(started.elapsed().as_secs_f64());
                tracing::info!(order_id = %order.id, "order placed");
                Ok(order)
            }
            Err(err) => {
                counter!("orders_rejected_total").increment(1);
                Err(err)
            }
        }
    }

    /// The writes after the order insert, with reverse compensation.
    async fn finish_placement(&self, order: &Order, info: &CustomerInfo) -> Result<()> {
        let now = order.created_at;
        let mut stock = AdjustReport::default();

        if let Err(err) =
            adjust::adjust_stock(&self.store, &order.items, StockDirection::Decrease, now, &mut stock)
                .await
        {
            self.compensate(order, &stock, None).await;
            return Err(err.into());
        }

        let outcome = match customer::record_customer_order(&self.store, info, &order.id, now).await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.compensate(order, &stock, None).await;
                return Err(err.into());
            }
        };

        if let Err(err) =
            stats::record_daily_sale(&self.store, now.date_naive(), order.total).await
        {
            self.compensate(order, &stock, Some(&outcome)).await;
            return Err(err.into());
        }

        Ok(())
    }

    /// Undoes completed placement writes in reverse order.
    ///
    /// Compensation is best effort: a failing undo is logged and the
    /// remaining steps still run, so as much as possible is restored.
    async fn compensate(&self, order: &Order, stock: &AdjustReport, outcome: Option<&CustomerOutcome>) {
        tracing::warn!(order_id = %order.id, "placement failed, compensating");
        let now = Utc::now();

        if let Some(outcome) = outcome {
            if let Err(err) =
                customer::revert_customer_order(&self.store, outcome, &order.id, now).await
            {
                tracing::error!(order_id = %order.id, error = %err, "customer compensation failed");
            }
        }

        if let Err(err) = adjust::revert(&self.store, stock, now).await {
            tracing::error!(order_id = %order.id, error = %err, "stock compensation failed");
        }

        if let Err(err) = self.store.delete_order(&order.id).await {
            tracing::error!(order_id = %order.id, error = %err, "order removal failed");
        }
    }

    /// Applies a field-wise update, with stock side effects on status
    /// transitions.
    ///
    /// Moving into cancelled or refunded restocks the order's items;
    /// moving out of them re-reserves. The adjustment uses the items
    /// as stored before the patch, since those are what was reserved.
    #[tracing::instrument(skip(self, patch), fields(order_id = %id))]
    pub async fn update_order(&self, id: &OrderId, patch: OrderPatch) -> Result<Order> {
        let Some(mut order) = self.store.get_order(id).await? else {
            return Err(CheckoutError::OrderNotFound(id.clone()));
        };

        let now = Utc::now();
        let direction = patch
            .status
            .and_then(|next| OrderStatus::stock_change(order.status, next));
        let reserved_items = order.items.clone();

        order.apply(patch, now);
        let order = self.store.update_order(order).await?;

        if let Some(direction) = direction {
            let mut report = AdjustReport::default();
            adjust::adjust_stock(&self.store, &reserved_items, direction, now, &mut report).await?;
            for missing in &report.missing {
                tracing::warn!(order_id = %order.id, product_id = %missing, "status change skipped a missing product");
            }
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::{MemoryStore, ProductFilter};
    use domain::{Customer, CustomerKey, ItemKind, Product, ProductId};

    fn coordinator() -> (CheckoutCoordinator<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (CheckoutCoordinator::new(store.clone()), store)
    }

    fn product(id: &str, stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "hair".to_string(),
            price: Money::from_cents(5_000),
            stock,
            images: vec![],
            collection_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(items: Vec<LineItem>, total: i64) -> NewOrder {
        NewOrder {
            customer_info: CustomerInfo {
                name: "An".to_string(),
                phone: "0901234567".to_string(),
                email: "an@example.com".to_string(),
                address: "Hanoi".to_string(),
            },
            items,
            total: Money::from_cents(total),
            status: None,
            notes: String::new(),
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

    async fn customer_of(store: &MemoryStore, key: &str) -> Customer {
        store
            .get_customer(&CustomerKey::new(key))
            .await
            .unwrap()
            .unwrap()
    }

    #[test]
    fn submission_parses_the_wire_format() {
        let submission: NewOrder = serde_json::from_str(
            r#"{
                "customerInfo": { "name": "An", "phone": "0901234567" },
                "items": [{ "id": "H1", "type": "hair", "quantity": 2, "price": 5000 }],
                "total": 10000
            }"#,
        )
        .unwrap();

        assert_eq!(submission.customer_info.phone, "0901234567");
        assert_eq!(submission.items[0].quantity, 2);
        assert_eq!(submission.total.cents(), 10_000);
        assert!(submission.status.is_none());
        assert!(submission.notes.is_empty());
    }

    #[tokio::test]
    async fn placement_writes_all_four_tables() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 3, Money::from_cents(5_000))];
        let order = coordinator
            .place_order(submission(items, 15_000))
            .await
            .unwrap();

        assert!(order.id.as_str().starts_with("LG"));
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(stock_of(&store, "H1").await, 7);

        let customer = customer_of(&store, "0901234567").await;
        assert_eq!(customer.orders, vec![order.id.clone()]);

        let stat = store
            .get_daily_stat(order.created_at.date_naive())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stat.orders, 1);
        assert_eq!(stat.revenue.cents(), 15_000);
    }

    #[tokio::test]
    async fn shortfall_rejects_with_zero_writes() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 1)).await.unwrap();

        let items = vec![
            LineItem::new("H1", ItemKind::Stocked, 5, Money::zero()),
            LineItem::new("GONE", ItemKind::Stocked, 1, Money::zero()),
        ];
        let err = coordinator
            .place_order(submission(items, 0))
            .await
            .unwrap_err();

        let CheckoutError::InsufficientStock { details } = err else {
            panic!("expected a stock rejection");
        };
        assert_eq!(details.len(), 2);
        assert!(details[0].contains("Insufficient stock for Product H1"));
        assert!(details[1].contains("Product GONE not found"));

        assert_eq!(stock_of(&store, "H1").await, 1);
        assert!(store.list_orders().await.unwrap().is_empty());
        assert!(store.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apparel_places_without_touching_stock() {
        let (coordinator, store) = coordinator();

        let items = vec![LineItem::new("SHIRT-1", ItemKind::Apparel, 4, Money::from_cents(8_000))];
        let order = coordinator
            .place_order(submission(items, 32_000))
            .await
            .unwrap();

        assert_eq!(order.items[0].quantity, 4);
        assert!(store
            .list_products(ProductFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn two_orders_same_phone_share_one_customer() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 1, Money::zero())];
        let first = coordinator
            .place_order(submission(items.clone(), 5_000))
            .await
            .unwrap();
        let second = coordinator
            .place_order(submission(items, 5_000))
            .await
            .unwrap();

        let customer = customer_of(&store, "0901234567").await;
        assert_eq!(customer.total_orders, 2);
        assert_eq!(customer.orders, vec![first.id, second.id]);
        assert_eq!(store.list_customers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_day_orders_fold_into_one_stat_row() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 1, Money::zero())];
        coordinator
            .place_order(submission(items.clone(), 10_000))
            .await
            .unwrap();
        coordinator
            .place_order(submission(items, 2_500))
            .await
            .unwrap();

        let stat = store
            .get_daily_stat(Utc::now().date_naive())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stat.orders, 2);
        assert_eq!(stat.revenue.cents(), 12_500);
    }

    // The original pipeline stopped dead on a mid-sequence failure and
    // left the earlier writes in place. Here the coordinator undoes
    // them instead, so a failed placement leaves no trace.
    #[tokio::test]
    async fn failed_stats_write_compensates_everything() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();
        store.set_fail_writes_to("daily_stats", true).await;

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 3, Money::zero())];
        let err = coordinator
            .place_order(submission(items, 15_000))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Store(_)));

        assert_eq!(stock_of(&store, "H1").await, 10);
        assert!(store.list_orders().await.unwrap().is_empty());
        assert!(store.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_customer_write_restores_stock_and_order() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();
        store.set_fail_writes_to("customers", true).await;

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 2, Money::zero())];
        coordinator
            .place_order(submission(items, 10_000))
            .await
            .unwrap_err();

        assert_eq!(stock_of(&store, "H1").await, 10);
        assert!(store.list_orders().await.unwrap().is_empty());
        assert!(store
            .get_daily_stat(Utc::now().date_naive())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn cancelling_restocks_and_reactivating_re_reserves() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 4, Money::zero())];
        let order = coordinator
            .place_order(submission(items, 20_000))
            .await
            .unwrap();
        assert_eq!(stock_of(&store, "H1").await, 6);

        let cancelled = coordinator
            .update_order(
                &order.id,
                OrderPatch {
                    status: Some(OrderStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(stock_of(&store, "H1").await, 10);

        coordinator
            .update_order(
                &order.id,
                OrderPatch {
                    status: Some(OrderStatus::Processing),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(stock_of(&store, "H1").await, 6);
    }

    #[tokio::test]
    async fn status_equal_update_leaves_stock_alone() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 2, Money::zero())];
        let order = coordinator
            .place_order(submission(items, 10_000))
            .await
            .unwrap();

        let updated = coordinator
            .update_order(
                &order.id,
                OrderPatch {
                    status: Some(OrderStatus::New),
                    notes: Some("leave at the door".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes, "leave at the door");
        assert_eq!(stock_of(&store, "H1").await, 8);
    }

    #[tokio::test]
    async fn active_to_active_transition_has_no_stock_effect() {
        let (coordinator, store) = coordinator();
        store.insert_product(product("H1", 10)).await.unwrap();

        let items = vec![LineItem::new("H1", ItemKind::Stocked, 2, Money::zero())];
        let order = coordinator
            .place_order(submission(items, 10_000))
            .await
            .unwrap();

        coordinator
            .update_order(
                &order.id,
                OrderPatch {
                    status: Some(OrderStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(stock_of(&store, "H1").await, 8);
    }

    #[tokio::test]
    async fn updating_a_missing_order_is_not_found() {
        let (coordinator, _store) = coordinator();
        let err = coordinator
            .update_order(&OrderId::new("LGmissing"), OrderPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::OrderNotFound(_)));
    }
}
