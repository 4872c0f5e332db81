use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    Collection, Color, Customer, CustomerKey, DailyStat, Order, OrderId, Product, ProductId,
};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::{Datastore, ProductFilter};

#[derive(Debug, Default)]
struct Inner {
    orders: HashMap<String, Order>,
    products: HashMap<String, Product>,
    customers: HashMap<String, Customer>,
    collections: HashMap<String, Collection>,
    colors: HashMap<String, Color>,
    daily_stats: HashMap<NaiveDate, DailyStat>,
    fail_writes_to: HashSet<&'static str>,
}

/// In-memory store implementation.
///
/// Provides the same interface as the PostgreSQL implementation; used
/// by the test suites and as the zero-config default backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures writes to the named table to fail with a backend
    /// error, for exercising partial-failure paths.
    pub async fn set_fail_writes_to(&self, table: &'static str, fail: bool) {
        let mut inner = self.inner.write().await;
        if fail {
            inner.fail_writes_to.insert(table);
        } else {
            inner.fail_writes_to.remove(table);
        }
    }

    /// Clears all rows.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = Inner::default();
    }
}

impl Inner {
    fn check_writable(&self, table: &'static str) -> Result<()> {
        if self.fail_writes_to.contains(table) {
            return Err(StoreError::Backend(format!(
                "injected write failure on {table}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn insert_order(&self, order: Order) -> Result<Order> {
        let mut inner = self.inner.write().await;
        inner.check_writable("orders")?;
        let key = order.id.as_str().to_string();
        if inner.orders.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                table: "orders",
                id: key,
            });
        }
        inner.orders.insert(key, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.get(id.as_str()).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<_> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_orders_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<_> = inner
            .orders
            .values()
            .filter(|o| o.created_at >= from && o.created_at < to)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order(&self, order: Order) -> Result<Order> {
        let mut inner = self.inner.write().await;
        inner.check_writable("orders")?;
        let key = order.id.as_str().to_string();
        if !inner.orders.contains_key(&key) {
            return Err(StoreError::RowNotFound {
                table: "orders",
                id: key,
            });
        }
        inner.orders.insert(key, order.clone());
        Ok(order)
    }

    async fn delete_order(&self, id: &OrderId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.check_writable("orders")?;
        inner.orders.remove(id.as_str());
        Ok(())
    }

    async fn insert_product(&self, product: Product) -> Result<Product> {
        let mut inner = self.inner.write().await;
        inner.check_writable("products")?;
        let key = product.id.as_str().to_string();
        if inner.products.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                table: "products",
                id: key,
            });
        }
        inner.products.insert(key, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.products.get(id.as_str()).cloned())
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let inner = self.inner.read().await;
        let mut products: Vec<_> = inner
            .products
            .values()
            .filter(|p| {
                if let Some(ref category) = filter.category
                    && &p.category != category
                {
                    return false;
                }
                if let Some(ref collection_id) = filter.collection_id
                    && !p.in_collection(collection_id)
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(products)
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        let mut inner = self.inner.write().await;
        inner.check_writable("products")?;
        let key = product.id.as_str().to_string();
        if !inner.products.contains_key(&key) {
            return Err(StoreError::RowNotFound {
                table: "products",
                id: key,
            });
        }
        inner.products.insert(key, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.check_writable("products")?;
        inner.products.remove(id.as_str());
        Ok(())
    }

    async fn count_out_of_stock(&self) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner.products.values().filter(|p| p.stock == 0).count() as u64)
    }

    async fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        let mut inner = self.inner.write().await;
        inner.check_writable("customers")?;
        let key = customer.id.as_str().to_string();
        if inner.customers.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                table: "customers",
                id: key,
            });
        }
        inner.customers.insert(key, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: &CustomerKey) -> Result<Option<Customer>> {
        let inner = self.inner.read().await;
        Ok(inner.customers.get(id.as_str()).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let inner = self.inner.read().await;
        let mut customers: Vec<_> = inner.customers.values().cloned().collect();
        // last_order desc, customers without orders at the end
        customers.sort_by(|a, b| b.last_order.cmp(&a.last_order));
        Ok(customers)
    }

    async fn update_customer(&self, customer: Customer) -> Result<Customer> {
        let mut inner = self.inner.write().await;
        inner.check_writable("customers")?;
        let key = customer.id.as_str().to_string();
        if !inner.customers.contains_key(&key) {
            return Err(StoreError::RowNotFound {
                table: "customers",
                id: key,
            });
        }
        inner.customers.insert(key, customer.clone());
        Ok(customer)
    }

    async fn delete_customer(&self, id: &CustomerKey) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.check_writable("customers")?;
        inner.customers.remove(id.as_str());
        Ok(())
    }

    async fn count_customers_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .values()
            .filter(|c| c.created_at >= since)
            .count() as u64)
    }

    async fn insert_collection(&self, collection: Collection) -> Result<Collection> {
        let mut inner = self.inner.write().await;
        inner.check_writable("collections")?;
        let key = collection.id.clone();
        if inner.collections.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                table: "collections",
                id: key,
            });
        }
        inner.collections.insert(key, collection.clone());
        Ok(collection)
    }

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>> {
        let inner = self.inner.read().await;
        Ok(inner.collections.get(id).cloned())
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let inner = self.inner.read().await;
        let mut collections: Vec<_> = inner.collections.values().cloned().collect();
        collections.sort_by(|a, b| b.end_date.cmp(&a.end_date));
        Ok(collections)
    }

    async fn update_collection(&self, collection: Collection) -> Result<Collection> {
        let mut inner = self.inner.write().await;
        inner.check_writable("collections")?;
        let key = collection.id.clone();
        if !inner.collections.contains_key(&key) {
            return Err(StoreError::RowNotFound {
                table: "collections",
                id: key,
            });
        }
        inner.collections.insert(key, collection.clone());
        Ok(collection)
    }

    async fn delete_collection(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.check_writable("collections")?;
        inner.collections.remove(id);
        Ok(())
    }

    async fn insert_color(&self, color: Color) -> Result<Color> {
        let mut inner = self.inner.write().await;
        inner.check_writable("colors")?;
        let key = color.id.clone();
        if inner.colors.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                table: "colors",
                id: key,
            });
        }
        inner.colors.insert(key, color.clone());
        Ok(color)
    }

    async fn get_color(&self, id: &str) -> Result<Option<Color>> {
        let inner = self.inner.read().await;
        Ok(inner.colors.get(id).cloned())
    }

    async fn list_colors(&self, category: Option<&str>) -> Result<Vec<Color>> {
        let inner = self.inner.read().await;
        let mut colors: Vec<_> = inner
            .colors
            .values()
            .filter(|c| c.is_active)
            .filter(|c| category.is_none_or(|cat| c.category.as_str() == cat))
            .cloned()
            .collect();
        colors.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(colors)
    }

    async fn update_color(&self, color: Color) -> Result<Color> {
        let mut inner = self.inner.write().await;
        inner.check_writable("colors")?;
        let key = color.id.clone();
        if !inner.colors.contains_key(&key) {
            return Err(StoreError::RowNotFound {
                table: "colors",
                id: key,
            });
        }
        inner.colors.insert(key, color.clone());
        Ok(color)
    }

    async fn delete_color(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.check_writable("colors")?;
        inner.colors.remove(id);
        Ok(())
    }

    async fn get_daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>> {
        let inner = self.inner.read().await;
        Ok(inner.daily_stats.get(&date).cloned())
    }

    async fn insert_daily_stat(&self, stat: DailyStat) -> Result<DailyStat> {
        let mut inner = self.inner.write().await;
        inner.check_writable("daily_stats")?;
        if inner.daily_stats.contains_key(&stat.date) {
            return Err(StoreError::UniqueViolation {
                table: "daily_stats",
                id: stat.date.to_string(),
            });
        }
        inner.daily_stats.insert(stat.date, stat.clone());
        Ok(stat)
    }

    async fn update_daily_stat(&self, stat: DailyStat) -> Result<DailyStat> {
        let mut inner = self.inner.write().await;
        inner.check_writable("daily_stats")?;
        if !inner.daily_stats.contains_key(&stat.date) {
            return Err(StoreError::RowNotFound {
                table: "daily_stats",
                id: stat.date.to_string(),
            });
        }
        inner.daily_stats.insert(stat.date, stat.clone());
        Ok(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ItemKind, LineItem, Money, OrderStatus};

    fn product(id: &str, category: &str, stock: u32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            category: category.to_string(),
            price: Money::from_cents(1000),
            stock,
            images: vec![],
            collection_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn order(id: &str) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new(id),
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_email: String::new(),
            customer_address: String::new(),
            items: vec![LineItem::new("P1", ItemKind::Stocked, 1, Money::zero())],
            total: Money::from_cents(1000),
            status: OrderStatus::New,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_duplicate_order_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert_order(order("LG1")).await.unwrap();

        let err = store.insert_order(order("LG1")).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update_product(product("P9", "hair", 1)).await.unwrap_err();
        assert!(err.is_row_not_found());
    }

    #[tokio::test]
    async fn product_filter_matches_category_and_collection() {
        let store = MemoryStore::new();
        let mut in_collection = product("P1", "hair", 5);
        in_collection.collection_ids = vec!["summer".to_string()];
        store.insert_product(in_collection).await.unwrap();
        store.insert_product(product("P2", "wig", 5)).await.unwrap();

        let hair = store
            .list_products(ProductFilter {
                category: Some("hair".to_string()),
                collection_id: None,
            })
            .await
            .unwrap();
        assert_eq!(hair.len(), 1);
        assert_eq!(hair[0].id.as_str(), "P1");

        let summer = store
            .list_products(ProductFilter {
                category: None,
                collection_id: Some("summer".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(summer.len(), 1);
    }

    #[tokio::test]
    async fn out_of_stock_count() {
        let store = MemoryStore::new();
        store.insert_product(product("P1", "hair", 0)).await.unwrap();
        store.insert_product(product("P2", "hair", 3)).await.unwrap();
        assert_eq!(store.count_out_of_stock().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn injected_write_failure_only_hits_named_table() {
        let store = MemoryStore::new();
        store.set_fail_writes_to("daily_stats", true).await;

        store.insert_order(order("LG1")).await.unwrap();

        let date = Utc::now().date_naive();
        let err = store
            .insert_daily_stat(DailyStat::first_sale(date, Money::from_cents(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        store.set_fail_writes_to("daily_stats", false).await;
        store
            .insert_daily_stat(DailyStat::first_sale(date, Money::from_cents(100)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn inactive_colors_are_hidden() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_color(Color {
                id: "shirt_1".to_string(),
                name: "Navy".to_string(),
                hex_code: "#000080".to_string(),
                category: domain::ColorCategory::Shirt,
                quantity: 2,
                is_active: true,
                created_at: now,
            })
            .await
            .unwrap();
        store
            .insert_color(Color {
                id: "shirt_2".to_string(),
                name: "Gone".to_string(),
                hex_code: "#ffffff".to_string(),
                category: domain::ColorCategory::Shirt,
                quantity: 0,
                is_active: false,
                created_at: now,
            })
            .await
            .unwrap();

        let colors = store.list_colors(Some("shirt")).await.unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].name, "Navy");
    }
}
