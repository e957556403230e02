//! In-memory store for tests and local runs.
//!
//! A unit holds the store lock from `begin` until it is committed or dropped
//! and writes to a staged copy, so uncommitted work is never visible and is
//! discarded wholesale on drop.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::aggregates::{NewOrder, NewOrderLine, Order, OrderLine, PaymentMethod, Product};
use crate::domain::value_objects::{Quantity, ReceiptCode};
use crate::store::{CatalogReader, OrderFilter, OrderPage, OrderStore, OrderUnit};
use crate::{Error, Result};

#[derive(Clone, Debug, Default)]
struct State {
    products: BTreeMap<i64, Product>,
    payments: BTreeMap<i64, PaymentMethod>,
    orders: BTreeMap<i64, Order>,
    lines: BTreeMap<i64, OrderLine>,
    next_order_id: i64,
    next_line_id: i64,
    fail_line_inserts: bool,
}

impl State {
    fn receipt_taken(&self, code: &str) -> bool {
        self.orders.values().any(|o| o.receipt_code == code)
    }

    fn matches(&self, order: &Order, filter: &OrderFilter) -> bool {
        if let Some(search) = filter.search.as_deref() {
            if !order.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(category_id) = filter.category_id {
            let in_category = self.lines.values().filter(|l| l.order_id == order.id).any(|l| {
                self.products.get(&l.product_id).and_then(|p| p.category_id) == Some(category_id)
            });
            if !in_category {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self { Self::default() }

    pub async fn add_product(&self, product: Product) {
        self.state.lock().await.products.insert(product.id, product);
    }

    pub async fn add_payment_method(&self, payment: PaymentMethod) {
        self.state.lock().await.payments.insert(payment.id, payment);
    }

    /// Stores an already-committed order as is, e.g. to occupy a receipt code.
    pub async fn add_order(&self, order: Order) {
        let mut state = self.state.lock().await;
        state.next_order_id = state.next_order_id.max(order.id);
        state.orders.insert(order.id, order);
    }

    pub async fn stock_of(&self, product_id: i64) -> Option<i32> {
        self.state.lock().await.products.get(&product_id).map(|p| p.stock)
    }

    pub async fn order_count(&self) -> usize { self.state.lock().await.orders.len() }

    pub async fn line_count(&self) -> usize { self.state.lock().await.lines.len() }

    pub async fn receipt_codes(&self) -> Vec<String> {
        self.state.lock().await.orders.values().map(|o| o.receipt_code.clone()).collect()
    }

    /// Makes every subsequent line insert fail, to exercise rollback.
    pub async fn fail_line_inserts(&self, fail: bool) {
        self.state.lock().await.fail_line_inserts = fail;
    }
}

#[async_trait]
impl CatalogReader for InMemoryStore {
    async fn product(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn payment_method(&self, id: i64) -> Result<Option<PaymentMethod>> {
        Ok(self.state.lock().await.payments.get(&id).cloned())
    }

    async fn products(&self, ids: &[i64]) -> Result<Vec<Product>> {
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        let state = self.state.lock().await;
        Ok(wanted.iter().filter_map(|id| state.products.get(id).cloned()).collect())
    }

    async fn payment_methods(&self, ids: &[i64]) -> Result<Vec<PaymentMethod>> {
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        let state = self.state.lock().await;
        Ok(wanted.iter().filter_map(|id| state.payments.get(id).cloned()).collect())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnit { guard, staged }))
    }

    async fn order(&self, id: i64) -> Result<Option<Order>> {
        Ok(self.state.lock().await.orders.get(&id).cloned())
    }

    async fn orders(&self, filter: &OrderFilter) -> Result<OrderPage> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Order> = state.orders.values().filter(|o| state.matches(o, filter)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matching.len() as i64;
        let orders = matching
            .into_iter()
            .skip(filter.skip.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(OrderPage { orders, total })
    }

    async fn lines_for(&self, order_ids: &[i64]) -> Result<Vec<OrderLine>> {
        let wanted: BTreeSet<i64> = order_ids.iter().copied().collect();
        let state = self.state.lock().await;
        let mut lines: Vec<OrderLine> = state.lines.values().filter(|l| wanted.contains(&l.order_id)).cloned().collect();
        lines.sort_by_key(|l| (l.order_id, l.id));
        Ok(lines)
    }
}

struct MemoryUnit {
    guard: OwnedMutexGuard<State>,
    staged: State,
}

#[async_trait]
impl OrderUnit for MemoryUnit {
    async fn decrement_stock(&mut self, product_id: i64, qty: Quantity) -> Result<Option<i32>> {
        let Some(product) = self.staged.products.get_mut(&product_id) else {
            return Ok(None);
        };
        if !qty.fits_in(product.stock) {
            return Ok(None);
        }
        product.stock -= qty.value();
        Ok(Some(product.stock))
    }

    async fn insert_order(&mut self, order: &NewOrder, receipt: &ReceiptCode) -> Result<Option<Order>> {
        if self.staged.receipt_taken(receipt.as_str()) {
            return Ok(None);
        }
        self.staged.next_order_id += 1;
        let row = Order {
            id: self.staged.next_order_id,
            user_id: order.user_id,
            payment_id: order.payment_id,
            name: order.name.clone(),
            total_price: order.total_price.amount(),
            total_paid: order.total_paid.amount(),
            total_return: order.total_return.amount(),
            receipt_code: receipt.as_str().to_string(),
            created_at: order.created_at,
            updated_at: order.created_at,
        };
        self.staged.orders.insert(row.id, row.clone());
        Ok(Some(row))
    }

    async fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLine> {
        if self.staged.fail_line_inserts {
            return Err(Error::Persistence(sqlx::Error::Protocol("line insert rejected".into())));
        }
        if !self.staged.orders.contains_key(&line.order_id) {
            return Err(Error::Persistence(sqlx::Error::Protocol(format!("order {} does not exist", line.order_id))));
        }
        self.staged.next_line_id += 1;
        let row = OrderLine {
            id: self.staged.next_line_id,
            order_id: line.order_id,
            product_id: line.product_id,
            qty: line.qty,
            total_price: line.total_price.amount(),
            created_at: line.created_at,
            updated_at: line.created_at,
        };
        self.staged.lines.insert(row.id, row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryUnit { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
