use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{
    Collection, Color, ColorCategory, Customer, CustomerKey, DailyStat, LineItem, Order, OrderId,
    OrderStatus, Product, ProductId,
};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{Result, StoreError};
use crate::store::{Datastore, ProductFilter};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        tracing::info!("running database migrations");
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn map_insert_error(e: sqlx::Error, table: &'static str, id: &str) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.code().as_deref() == Some("23505")
        {
            return StoreError::UniqueViolation {
                table,
                id: id.to_string(),
            };
        }
        StoreError::Database(e)
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<LineItem> = serde_json::from_value(items_json)?;
        let status_str: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_str)
            .ok_or_else(|| StoreError::Backend(format!("unknown order status: {status_str}")))?;

        Ok(Order {
            id: OrderId::new(row.try_get::<String, _>("id")?),
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_email: row.try_get("customer_email")?,
            customer_address: row.try_get("customer_address")?,
            items,
            total: domain::Money::from_cents(row.try_get("total_cents")?),
            status,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get::<String, _>("id")?),
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            price: domain::Money::from_cents(row.try_get("price_cents")?),
            stock: row.try_get::<i64, _>("stock")?.max(0) as u32,
            images: row.try_get("images")?,
            collection_ids: row.try_get("collection_ids")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        let order_ids: Vec<String> = row.try_get("orders")?;
        Ok(Customer {
            id: CustomerKey::new(row.try_get::<String, _>("id")?),
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
            orders: order_ids.into_iter().map(OrderId::new).collect(),
            total_orders: row.try_get::<i64, _>("total_orders")?.max(0) as u32,
            first_order: row.try_get("first_order")?,
            last_order: row.try_get("last_order")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_collection(row: PgRow) -> Result<Collection> {
        Ok(Collection {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            end_date: row.try_get("end_date")?,
            discount: row.try_get::<i64, _>("discount")?.max(0) as u32,
            icon: row.try_get("icon")?,
            features: row.try_get("features")?,
            limited_products: row.try_get("limited_products")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_color(row: PgRow) -> Result<Color> {
        let category_str: String = row.try_get("category")?;
        let category = ColorCategory::parse(&category_str)
            .ok_or_else(|| StoreError::Backend(format!("unknown color category: {category_str}")))?;
        Ok(Color {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            hex_code: row.try_get("hex_code")?,
            category,
            quantity: row.try_get::<i64, _>("quantity")?.max(0) as u32,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_stat(row: PgRow) -> Result<DailyStat> {
        Ok(DailyStat {
            date: row.try_get("date")?,
            orders: row.try_get::<i64, _>("orders")?.max(0) as u64,
            revenue: domain::Money::from_cents(row.try_get("revenue_cents")?),
        })
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn insert_order(&self, order: Order) -> Result<Order> {
        let items = serde_json::to_value(&order.items)?;
        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_name, customer_phone, customer_email,
                customer_address, items, total_cents, status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(order.id.as_str())
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.customer_email)
        .bind(&order.customer_address)
        .bind(&items)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, "orders", order.id.as_str()))?;
        Ok(order)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_order).transpose()
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_orders_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT * FROM orders WHERE created_at >= $1 AND created_at < $2 ORDER BY created_at DESC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn update_order(&self, order: Order) -> Result<Order> {
        let items = serde_json::to_value(&order.items)?;
        let result = sqlx::query(
            r#"
            UPDATE orders SET customer_name = $2, customer_phone = $3, customer_email = $4,
                customer_address = $5, items = $6, total_cents = $7, status = $8, notes = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(order.id.as_str())
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.customer_email)
        .bind(&order.customer_address)
        .bind(&items)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(&order.notes)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "orders",
                id: order.id.as_str().to_string(),
            });
        }
        Ok(order)
    }

    async fn delete_order(&self, id: &OrderId) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_product(&self, product: Product) -> Result<Product> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price_cents, stock, images,
                collection_ids, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price.cents())
        .bind(product.stock as i64)
        .bind(&product.images)
        .bind(&product.collection_ids)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, "products", product.id.as_str()))?;
        Ok(product)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_product).transpose()
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM products WHERE 1=1");
        let mut param = 0;
        if filter.category.is_some() {
            param += 1;
            sql.push_str(&format!(" AND category = ${param}"));
        }
        if filter.collection_id.is_some() {
            param += 1;
            sql.push_str(&format!(" AND ${param} = ANY(collection_ids)"));
        }
        sql.push_str(" ORDER BY category, name");

        let mut query = sqlx::query(&sql);
        if let Some(category) = filter.category {
            query = query.bind(category);
        }
        if let Some(collection_id) = filter.collection_id {
            query = query.bind(collection_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        let result = sqlx::query(
            r#"
            UPDATE products SET name = $2, category = $3, price_cents = $4, stock = $5,
                images = $6, collection_ids = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price.cents())
        .bind(product.stock as i64)
        .bind(&product.images)
        .bind(&product.collection_ids)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "products",
                id: product.id.as_str().to_string(),
            });
        }
        Ok(product)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_out_of_stock(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        let order_ids: Vec<&str> = customer.orders.iter().map(|o| o.as_str()).collect();
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, email, address, orders, total_orders,
                first_order, last_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(customer.id.as_str())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&order_ids)
        .bind(customer.total_orders as i64)
        .bind(customer.first_order)
        .bind(customer.last_order)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, "customers", customer.id.as_str()))?;
        Ok(customer)
    }

    async fn get_customer(&self, id: &CustomerKey) -> Result<Option<Customer>> {
        let row = sqlx::query("SELECT * FROM customers WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_customer).transpose()
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query("SELECT * FROM customers ORDER BY last_order DESC NULLS LAST")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_customer).collect()
    }

    async fn update_customer(&self, customer: Customer) -> Result<Customer> {
        let order_ids: Vec<&str> = customer.orders.iter().map(|o| o.as_str()).collect();
        let result = sqlx::query(
            r#"
            UPDATE customers SET name = $2, phone = $3, email = $4, address = $5, orders = $6,
                total_orders = $7, first_order = $8, last_order = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(customer.id.as_str())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&order_ids)
        .bind(customer.total_orders as i64)
        .bind(customer.first_order)
        .bind(customer.last_order)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "customers",
                id: customer.id.as_str().to_string(),
            });
        }
        Ok(customer)
    }

    async fn delete_customer(&self, id: &CustomerKey) -> Result<()> {
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_customers_since(&self, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_collection(&self, collection: Collection) -> Result<Collection> {
        sqlx::query(
            r#"
            INSERT INTO collections (id, name, description, end_date, discount, icon,
                features, limited_products, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&collection.id)
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(collection.end_date)
        .bind(collection.discount as i64)
        .bind(&collection.icon)
        .bind(&collection.features)
        .bind(&collection.limited_products)
        .bind(collection.created_at)
        .bind(collection.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, "collections", &collection.id))?;
        Ok(collection)
    }

    async fn get_collection(&self, id: &str) -> Result<Option<Collection>> {
        let row = sqlx::query("SELECT * FROM collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_collection).transpose()
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let rows = sqlx::query("SELECT * FROM collections ORDER BY end_date DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_collection).collect()
    }

    async fn update_collection(&self, collection: Collection) -> Result<Collection> {
        let result = sqlx::query(
            r#"
            UPDATE collections SET name = $2, description = $3, end_date = $4, discount = $5,
                icon = $6, features = $7, limited_products = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(&collection.id)
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(collection.end_date)
        .bind(collection.discount as i64)
        .bind(&collection.icon)
        .bind(&collection.features)
        .bind(&collection.limited_products)
        .bind(collection.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "collections",
                id: collection.id.clone(),
            });
        }
        Ok(collection)
    }

    async fn delete_collection(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_color(&self, color: Color) -> Result<Color> {
        sqlx::query(
            r#"
            INSERT INTO colors (id, name, hex_code, category, quantity, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&color.id)
        .bind(&color.name)
        .bind(&color.hex_code)
        .bind(color.category.as_str())
        .bind(color.quantity as i64)
        .bind(color.is_active)
        .bind(color.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_insert_error(e, "colors", &color.id))?;
        Ok(color)
    }

    async fn get_color(&self, id: &str) -> Result<Option<Color>> {
        let row = sqlx::query("SELECT * FROM colors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_color).transpose()
    }

    async fn list_colors(&self, category: Option<&str>) -> Result<Vec<Color>> {
        let rows = match category {
            Some(category) => {
                sqlx::query(
                    "SELECT * FROM colors WHERE is_active AND category = $1 ORDER BY created_at",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM colors WHERE is_active ORDER BY created_at")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.into_iter().map(Self::row_to_color).collect()
    }

    async fn update_color(&self, color: Color) -> Result<Color> {
        let result = sqlx::query(
            r#"
            UPDATE colors SET name = $2, hex_code = $3, category = $4, quantity = $5,
                is_active = $6
            WHERE id = $1
            "#,
        )
        .bind(&color.id)
        .bind(&color.name)
        .bind(&color.hex_code)
        .bind(color.category.as_str())
        .bind(color.quantity as i64)
        .bind(color.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "colors",
                id: color.id.clone(),
            });
        }
        Ok(color)
    }

    async fn delete_color(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM colors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>> {
        let row = sqlx::query("SELECT * FROM daily_stats WHERE date = $1")
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_stat).transpose()
    }

    async fn insert_daily_stat(&self, stat: DailyStat) -> Result<DailyStat> {
        sqlx::query("INSERT INTO daily_stats (date, orders, revenue_cents) VALUES ($1, $2, $3)")
            .bind(stat.date)
            .bind(stat.orders as i64)
            .bind(stat.revenue.cents())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_insert_error(e, "daily_stats", &stat.date.to_string()))?;
        Ok(stat)
    }

    async fn update_daily_stat(&self, stat: DailyStat) -> Result<DailyStat> {
        let result = sqlx::query("UPDATE daily_stats SET orders = $2, revenue_cents = $3 WHERE date = $1")
            .bind(stat.date)
            .bind(stat.orders as i64)
            .bind(stat.revenue.cents())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowNotFound {
                table: "daily_stats",
                id: stat.date.to_string(),
            });
        }
        Ok(stat)
    }
}
