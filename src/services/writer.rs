//! Atomic order placement.

use std::sync::Arc;

use crate::domain::aggregates::{NewOrder, NewOrderLine, Order, OrderLine, PaymentMethod, PricedCart, Product};
use crate::domain::value_objects::Money;
use crate::domain::Identity;
use crate::services::receipt::ReceiptGenerator;
use crate::store::OrderStore;
use crate::{Error, Result};

/// Everything written by one committed unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedOrder {
    pub order: Order,
    pub payment: PaymentMethod,
    pub lines: Vec<CommittedLine>,
}

/// A stored line with its product as left by the unit (stock already decremented).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedLine {
    pub line: OrderLine,
    pub product: Product,
}

pub struct OrderWriter {
    store: Arc<dyn OrderStore>,
    receipts: ReceiptGenerator,
}

impl OrderWriter {
    pub fn new(store: Arc<dyn OrderStore>, receipts: ReceiptGenerator) -> Self { Self { store, receipts } }

    /// Decrements stock, inserts the order and its lines, and commits; or
    /// writes nothing at all. A tender below the total is rejected before the
    /// unit is opened.
    #[tracing::instrument(skip(self, identity, cart), fields(user_id = identity.user_id, total_price = %cart.total_price))]
    pub async fn place(&self, identity: &Identity, cart: &PricedCart, total_paid: Money) -> Result<CommittedOrder> {
        let header = NewOrder::for_cart(identity, cart, total_paid)?;

        let mut unit = self.store.begin().await?;

        // Lock rows in id order so overlapping carts cannot deadlock.
        let mut order_of_decrement: Vec<usize> = (0..cart.lines.len()).collect();
        order_of_decrement.sort_by_key(|&i| cart.lines[i].product.id);
        let mut remaining = vec![0; cart.lines.len()];
        for i in order_of_decrement {
            let line = &cart.lines[i];
            match unit.decrement_stock(line.product.id, line.qty).await? {
                Some(stock) => remaining[i] = stock,
                None => {
                    tracing::warn!(product_id = line.product.id, requested = line.qty.value(), "stock changed before write, rolling back");
                    return Err(Error::InsufficientStock { product_id: line.product.id, requested: line.qty.value() });
                }
            }
        }

        let order = self.receipts.insert_order(unit.as_mut(), &header).await?;

        let mut lines = Vec::with_capacity(cart.lines.len());
        for (priced, stock) in cart.lines.iter().zip(remaining) {
            let line = unit
                .insert_line(&NewOrderLine {
                    order_id: order.id,
                    product_id: priced.product.id,
                    qty: priced.qty.value(),
                    total_price: priced.line_total,
                    created_at: order.created_at,
                })
                .await?;
            lines.push(CommittedLine { line, product: Product { stock, ..priced.product.clone() } });
        }

        unit.commit().await?;
        tracing::info!(order_id = order.id, receipt = %order.receipt_code, lines = lines.len(), "order committed");

        Ok(CommittedOrder { order, payment: cart.payment.clone(), lines })
    }
}
