//! Domain events
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::aggregates::Order;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed {
        order_id: i64,
        user_id: i64,
        receipt_code: String,
        total_price: i64,
        lines: Vec<PlacedLine>,
        placed_at: DateTime<Utc>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedLine {
    pub product_id: i64,
    pub qty: i32,
}

impl OrderEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Placed { .. } => "orders.placed",
        }
    }

    pub fn placed(order: &Order, lines: impl IntoIterator<Item = PlacedLine>) -> Self {
        Self::Placed {
            order_id: order.id,
            user_id: order.user_id,
            receipt_code: order.receipt_code.clone(),
            total_price: order.total_price,
            lines: lines.into_iter().collect(),
            placed_at: order.created_at,
        }
    }
}
