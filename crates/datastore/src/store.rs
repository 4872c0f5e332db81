//! The `Datastore` trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    Collection, Color, Customer, CustomerKey, DailyStat, Order, OrderId, Product, ProductId,
};

use crate::error::Result;

/// Equality filters for product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub collection_id: Option<String>,
}

/// Client interface to the hosted relational store.
///
/// Every method is one remote table operation; single-row inserts,
/// updates and deletes are atomic, but nothing here spans tables.
/// Inserts fail with [`StoreError::UniqueViolation`] on duplicate
/// keys; updates and single-row selects keyed by identifier fail with
/// [`StoreError::RowNotFound`] when the row is absent.
///
/// [`StoreError::UniqueViolation`]: crate::StoreError::UniqueViolation
/// [`StoreError::RowNotFound`]: crate::StoreError::RowNotFound
#[async_trait]
pub trait Datastore: Send + Sync {
    // -- orders --

    async fn insert_order(&self, order: Order) -> Result<Order>;
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>>;
    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>>;
    /// Orders created in `[from, to)`, newest first.
    async fn list_orders_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>>;
    /// Replaces the row with the same id.
    async fn update_order(&self, order: Order) -> Result<Order>;
    async fn delete_order(&self, id: &OrderId) -> Result<()>;

    // -- products --

    async fn insert_product(&self, product: Product) -> Result<Product>;
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>>;
    /// Products matching the filter, sorted by category then name.
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>>;
    async fn update_product(&self, product: Product) -> Result<Product>;
    async fn delete_product(&self, id: &ProductId) -> Result<()>;
    async fn count_out_of_stock(&self) -> Result<u64>;

    // -- customers --

    async fn insert_customer(&self, customer: Customer) -> Result<Customer>;
    async fn get_customer(&self, id: &CustomerKey) -> Result<Option<Customer>>;
    /// All customers, most recent order first; never-ordered last.
    async fn list_customers(&self) -> Result<Vec<Customer>>;
    async fn update_customer(&self, customer: Customer) -> Result<Customer>;
    async fn delete_customer(&self, id: &CustomerKey) -> Result<()>;
    async fn count_customers_since(&self, since: DateTime<Utc>) -> Result<u64>;

    // -- collections --

    async fn insert_collection(&self, collection: Collection) -> Result<Collection>;
    async fn get_collection(&self, id: &str) -> Result<Option<Collection>>;
    /// All collections, latest end date first.
    async fn list_collections(&self) -> Result<Vec<Collection>>;
    async fn update_collection(&self, collection: Collection) -> Result<Collection>;
    async fn delete_collection(&self, id: &str) -> Result<()>;

    // -- colors --

    async fn insert_color(&self, color: Color) -> Result<Color>;
    /// Any color by id, active or not.
    async fn get_color(&self, id: &str) -> Result<Option<Color>>;
    /// Active colors, oldest first, optionally filtered by category.
    async fn list_colors(&self, category: Option<&str>) -> Result<Vec<Color>>;
    async fn update_color(&self, color: Color) -> Result<Color>;
    async fn delete_color(&self, id: &str) -> Result<()>;

    // -- daily statistics --

    async fn get_daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>>;
    async fn insert_daily_stat(&self, stat: DailyStat) -> Result<DailyStat>;
    async fn update_daily_stat(&self, stat: DailyStat) -> Result<DailyStat>;
}
