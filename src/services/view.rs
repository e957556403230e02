//! Order view assembly.
//!
//! Views are rebuilt from committed rows. Lines carry the price captured at
//! order time (`unit_price`, `total_price`) next to the product as it exists
//! now. Lists fetch every nested entity of a page in one batch per type.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Order, OrderLine, PaymentMethod, Product};
use crate::services::writer::CommittedOrder;
use crate::store::{OrderFilter, OrderStore};
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub user_id: i64,
    pub payment_type_id: i64,
    pub total_price: i64,
    pub total_paid: i64,
    pub total_return: i64,
    pub receipt_id: String,
    pub products: Vec<LineView>,
    pub payment_type: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub qty: i32,
    pub unit_price: i64,
    pub total_price: i64,
    pub product: Option<Product>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderListView {
    pub meta: PageMeta,
    pub orders: Vec<OrderView>,
    pub products: Vec<Product>,
    pub payments: Vec<PaymentMethod>,
}

impl OrderView {
    fn assemble(
        order: Order,
        lines: Vec<OrderLine>,
        products: &HashMap<i64, Product>,
        payment: Option<PaymentMethod>,
    ) -> Self {
        let products = lines
            .into_iter()
            .map(|line| LineView {
                unit_price: line.unit_price(),
                product: products.get(&line.product_id).cloned(),
                id: line.id,
                order_id: line.order_id,
                product_id: line.product_id,
                qty: line.qty,
                total_price: line.total_price,
            })
            .collect();
        Self {
            id: order.id,
            user_id: order.user_id,
            payment_type_id: order.payment_id,
            total_price: order.total_price,
            total_paid: order.total_paid,
            total_return: order.total_return,
            receipt_id: order.receipt_code,
            products,
            payment_type: payment,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

impl From<CommittedOrder> for OrderView {
    fn from(committed: CommittedOrder) -> Self {
        let mut products = HashMap::with_capacity(committed.lines.len());
        let mut lines = Vec::with_capacity(committed.lines.len());
        for c in committed.lines {
            products.insert(c.product.id, c.product);
            lines.push(c.line);
        }
        Self::assemble(committed.order, lines, &products, Some(committed.payment))
    }
}

pub struct OrderViewAssembler {
    store: Arc<dyn OrderStore>,
}

impl OrderViewAssembler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self { Self { store } }

    #[tracing::instrument(skip(self))]
    pub async fn detail(&self, order_id: i64) -> Result<OrderView> {
        let order = self.store.order(order_id).await?.ok_or(Error::OrderNotFound(order_id))?;
        let lines = self.store.lines_for(&[order.id]).await?;
        let product_ids: Vec<i64> = distinct(lines.iter().map(|l| l.product_id));
        let products = index_products(self.store.products(&product_ids).await?);
        let payment = self.store.payment_method(order.payment_id).await?;
        if payment.is_none() {
            tracing::warn!(order_id, payment_id = order.payment_id, "order references a missing payment method");
        }
        Ok(OrderView::assemble(order, lines, &products, payment))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: &OrderFilter) -> Result<OrderListView> {
        let page = self.store.orders(filter).await?;

        let order_ids: Vec<i64> = page.orders.iter().map(|o| o.id).collect();
        let lines = self.store.lines_for(&order_ids).await?;
        let product_ids = distinct(lines.iter().map(|l| l.product_id));
        let payment_ids = distinct(page.orders.iter().map(|o| o.payment_id));
        let products = self.store.products(&product_ids).await?;
        let payments = self.store.payment_methods(&payment_ids).await?;

        let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        for line in lines {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }
        let product_index = index_products(products.iter().cloned());
        let payment_index: HashMap<i64, PaymentMethod> = payments.iter().map(|p| (p.id, p.clone())).collect();

        let orders = page
            .orders
            .into_iter()
            .map(|order| {
                let lines = lines_by_order.remove(&order.id).unwrap_or_default();
                let payment = payment_index.get(&order.payment_id).cloned();
                OrderView::assemble(order, lines, &product_index, payment)
            })
            .collect();

        Ok(OrderListView {
            meta: PageMeta { total: page.total, limit: filter.limit, skip: filter.skip },
            orders,
            products,
            payments,
        })
    }
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

fn index_products(products: impl IntoIterator<Item = Product>) -> HashMap<i64, Product> {
    products.into_iter().map(|p| (p.id, p)).collect()
}
