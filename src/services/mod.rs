//! Order core services
pub mod pricing;
pub mod receipt;
pub mod view;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use crate::domain::aggregates::Cart;
use crate::domain::events::{OrderEvent, PlacedLine};
use crate::domain::value_objects::Money;
use crate::domain::Identity;
use crate::messaging::EventPublisher;
use crate::store::{OrderFilter, OrderStore};
use crate::{Error, Result};

pub use pricing::PricingValidator;
pub use receipt::ReceiptGenerator;
pub use view::{LineView, OrderListView, OrderView, OrderViewAssembler, PageMeta};
pub use writer::{CommittedLine, CommittedOrder, OrderWriter};

/// Entry point for the three order operations.
pub struct OrderService {
    pricing: PricingValidator,
    writer: OrderWriter,
    views: OrderViewAssembler,
    events: Arc<dyn EventPublisher>,
}

impl OrderService {
    pub fn new<S: OrderStore + 'static>(store: Arc<S>, events: Arc<dyn EventPublisher>, receipts: ReceiptGenerator) -> Self {
        Self {
            pricing: PricingValidator::new(store.clone()),
            writer: OrderWriter::new(store.clone(), receipts),
            views: OrderViewAssembler::new(store),
            events,
        }
    }

    /// Prices `cart`, persists the order atomically and returns its view.
    #[tracing::instrument(skip(self, identity, cart), fields(user_id = identity.user_id))]
    pub async fn place_order(&self, identity: &Identity, payment_id: i64, cart: Cart, total_paid: Money) -> Result<OrderView> {
        if identity.display_name.trim().is_empty() {
            return Err(Error::Validation("display name must not be empty".into()));
        }
        if total_paid.is_negative() {
            return Err(Error::Validation("total_paid must not be negative".into()));
        }

        let priced = self.pricing.price(&cart, payment_id).await?;
        let committed = self.writer.place(identity, &priced, total_paid).await?;

        let event = OrderEvent::placed(
            &committed.order,
            committed.lines.iter().map(|c| PlacedLine { product_id: c.line.product_id, qty: c.line.qty }),
        );
        if let Err(e) = self.events.publish(&event).await {
            tracing::warn!(order_id = committed.order.id, error = %e, "failed to publish order event");
        }

        Ok(OrderView::from(committed))
    }

    pub async fn order_detail(&self, order_id: i64) -> Result<OrderView> {
        self.views.detail(order_id).await
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderListView> {
        self.views.list(filter).await
    }
}
