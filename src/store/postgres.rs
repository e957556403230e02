//! Postgres-backed store

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::domain::aggregates::{NewOrder, NewOrderLine, Order, OrderLine, PaymentMethod, Product};
use crate::domain::value_objects::{Quantity, ReceiptCode};
use crate::store::{CatalogReader, OrderFilter, OrderPage, OrderStore, OrderUnit};
use crate::Result;

const PRODUCT_COLUMNS: &str = "id, sku, name, stock, price, image, category_id";
const ORDER_COLUMNS: &str =
    "o.id, o.user_id, o.payment_id, o.name, o.total_price, o.total_paid, o.total_return, o.receipt_code, o.created_at, o.updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
    pub fn pool(&self) -> &PgPool { &self.pool }
}

#[async_trait]
impl CatalogReader for PgStore {
    async fn product(&self, id: i64) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        Ok(sqlx::query_as::<_, Product>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn payment_method(&self, id: i64) -> Result<Option<PaymentMethod>> {
        Ok(sqlx::query_as::<_, PaymentMethod>("SELECT id, name, type, logo FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn products(&self, ids: &[i64]) -> Result<Vec<Product>> {
        if ids.is_empty() { return Ok(Vec::new()); }
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id");
        Ok(sqlx::query_as::<_, Product>(&sql).bind(ids).fetch_all(&self.pool).await?)
    }

    async fn payment_methods(&self, ids: &[i64]) -> Result<Vec<PaymentMethod>> {
        if ids.is_empty() { return Ok(Vec::new()); }
        Ok(sqlx::query_as::<_, PaymentMethod>("SELECT id, name, type, logo FROM payments WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnit { tx }))
    }

    async fn order(&self, id: i64) -> Result<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = $1");
        Ok(sqlx::query_as::<_, Order>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn orders(&self, filter: &OrderFilter) -> Result<OrderPage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders o");
        push_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut page = QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM orders o"));
        push_filters(&mut page, filter);
        page.push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);
        let orders = page.build_query_as::<Order>().fetch_all(&self.pool).await?;

        Ok(OrderPage { orders, total })
    }

    async fn lines_for(&self, order_ids: &[i64]) -> Result<Vec<OrderLine>> {
        if order_ids.is_empty() { return Ok(Vec::new()); }
        Ok(sqlx::query_as::<_, OrderLine>(
            "SELECT id, order_id, product_id, qty, total_price, created_at, updated_at FROM order_products WHERE order_id = ANY($1) ORDER BY order_id, id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?)
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    qb.push(" WHERE 1=1");
    if let Some(search) = filter.search.as_deref() {
        qb.push(" AND o.name ILIKE ").push_bind(format!("%{}%", escape_like(search)));
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND EXISTS (SELECT 1 FROM order_products op JOIN products p ON p.id = op.product_id WHERE op.order_id = o.id AND p.category_id = ")
            .push_bind(category_id)
            .push(")");
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') { escaped.push('\\'); }
        escaped.push(c);
    }
    escaped
}

/// Transaction-backed unit; rolled back by sqlx when dropped uncommitted.
struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderUnit for PgUnit {
    async fn decrement_stock(&mut self, product_id: i64, qty: Quantity) -> Result<Option<i32>> {
        Ok(sqlx::query_scalar::<_, i32>(
            "UPDATE products SET stock = stock - $2, updated_at = NOW() WHERE id = $1 AND stock >= $2 RETURNING stock",
        )
        .bind(product_id)
        .bind(qty.value())
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn insert_order(&mut self, order: &NewOrder, receipt: &ReceiptCode) -> Result<Option<Order>> {
        Ok(sqlx::query_as::<_, Order>(
            "INSERT INTO orders (user_id, payment_id, name, total_price, total_paid, total_return, receipt_code, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             ON CONFLICT (receipt_code) DO NOTHING \
             RETURNING id, user_id, payment_id, name, total_price, total_paid, total_return, receipt_code, created_at, updated_at",
        )
        .bind(order.user_id)
        .bind(order.payment_id)
        .bind(&order.name)
        .bind(order.total_price.amount())
        .bind(order.total_paid.amount())
        .bind(order.total_return.amount())
        .bind(receipt.as_str())
        .bind(order.created_at)
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLine> {
        Ok(sqlx::query_as::<_, OrderLine>(
            "INSERT INTO order_products (order_id, product_id, qty, total_price, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING id, order_id, product_id, qty, total_price, created_at, updated_at",
        )
        .bind(line.order_id)
        .bind(line.product_id)
        .bind(line.qty)
        .bind(line.total_price.amount())
        .bind(line.created_at)
        .fetch_one(&mut *self.tx)
        .await?)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
