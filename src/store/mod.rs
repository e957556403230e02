//! Storage seams for the order core.
//!
//! The relational store is the only synchronization point: components receive
//! an injected store and never share in-process mutable state. Writes that
//! must succeed or fail together go through an [`OrderUnit`], obtained from
//! [`OrderStore::begin`]. Dropping a unit without calling
//! [`OrderUnit::commit`] discards every write it made.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::aggregates::{NewOrder, NewOrderLine, Order, OrderLine, PaymentMethod, Product};
use crate::domain::value_objects::{Quantity, ReceiptCode};
use crate::Result;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Read-only catalog lookups.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn product(&self, id: i64) -> Result<Option<Product>>;
    async fn payment_method(&self, id: i64) -> Result<Option<PaymentMethod>>;
    /// Batched lookup; ids that do not resolve are simply absent.
    async fn products(&self, ids: &[i64]) -> Result<Vec<Product>>;
    async fn payment_methods(&self, ids: &[i64]) -> Result<Vec<PaymentMethod>>;
}

/// Filters and window for the order list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub limit: i64,
    pub skip: i64,
    /// Case-insensitive substring of the customer name snapshot.
    pub search: Option<String>,
    /// Orders holding at least one product of this category.
    pub category_id: Option<i64>,
}

/// One page of orders plus the number of orders matching the filter.
#[derive(Clone, Debug, Default)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
}

#[async_trait]
pub trait OrderStore: CatalogReader {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>>;
    async fn order(&self, id: i64) -> Result<Option<Order>>;
    async fn orders(&self, filter: &OrderFilter) -> Result<OrderPage>;
    /// All lines of the given orders, ordered by order id then line id.
    async fn lines_for(&self, order_ids: &[i64]) -> Result<Vec<OrderLine>>;
}

/// Atomic write unit for placing one order.
#[async_trait]
pub trait OrderUnit: Send {
    /// Decrements stock only if at least `qty` is on hand. Returns the
    /// remaining stock, or `None` when the product is missing or short.
    async fn decrement_stock(&mut self, product_id: i64, qty: Quantity) -> Result<Option<i32>>;

    /// Inserts the order unless `receipt` is already taken, in which case
    /// nothing is written and `None` is returned.
    async fn insert_order(&mut self, order: &NewOrder, receipt: &ReceiptCode) -> Result<Option<Order>>;

    async fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLine>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
