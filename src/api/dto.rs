//! Request bodies and query parameters

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::aggregates::{Cart, CartLine};
use crate::domain::value_objects::{Money, Quantity};
use crate::store::OrderFilter;
use crate::{Error, Result};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub payment_id: i64,
    pub total_paid: i64,
    #[validate(length(min = 1, max = 200, message = "products must hold between 1 and 200 lines"))]
    pub products: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub qty: i32,
}

/// Validated order request, ready for the service.
#[derive(Debug)]
pub struct OrderCommand {
    pub payment_id: i64,
    pub cart: Cart,
    pub total_paid: Money,
}

impl CreateOrderRequest {
    pub fn into_command(self) -> Result<OrderCommand> {
        self.validate()?;
        if self.payment_id <= 0 {
            return Err(Error::Validation("payment_id must be a positive id".into()));
        }
        if self.total_paid < 0 {
            return Err(Error::Validation("total_paid must not be negative".into()));
        }
        for item in &self.products {
            item.validate()?;
            if item.product_id <= 0 {
                return Err(Error::Validation("product_id must be a positive id".into()));
            }
        }
        let lines = self
            .products
            .iter()
            .map(|item| Ok(CartLine { product_id: item.product_id, qty: Quantity::new(item.qty)? }))
            .collect::<Result<Vec<_>>>()?;
        Ok(OrderCommand { payment_id: self.payment_id, cart: Cart::new(lines)?, total_paid: Money::new(self.total_paid) })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
    pub q: Option<String>,
}

impl ListParams {
    pub fn into_filter(self) -> Result<OrderFilter> {
        let skip = self.skip.unwrap_or(0);
        if skip < 0 {
            return Err(Error::Validation("skip must not be negative".into()));
        }
        Ok(OrderFilter {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            skip,
            search: self.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            category_id: self.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let command = request(serde_json::json!({
            "payment_id": 1, "total_paid": 400, "products": [{"product_id": 3, "qty": 2}, {"product_id": 3, "qty": 1}]
        }))
        .into_command()
        .unwrap();
        assert_eq!(command.cart.len(), 1);
        assert_eq!(command.cart.lines()[0].qty.value(), 3);
        assert_eq!(command.total_paid, Money::new(400));
    }

    #[test]
    fn test_invalid_requests() {
        let empty = request(serde_json::json!({"payment_id": 1, "total_paid": 0, "products": []}));
        assert!(matches!(empty.into_command(), Err(Error::Validation(_))));
        let zero_qty = request(serde_json::json!({"payment_id": 1, "total_paid": 0, "products": [{"product_id": 1, "qty": 0}]}));
        assert!(matches!(zero_qty.into_command(), Err(Error::Validation(_))));
        let negative_paid = request(serde_json::json!({"payment_id": 1, "total_paid": -5, "products": [{"product_id": 1, "qty": 1}]}));
        assert!(matches!(negative_paid.into_command(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_oversized_cart_rejected() {
        let lines: Vec<_> = (1..=201).map(|id| serde_json::json!({"product_id": id, "qty": 1})).collect();
        let oversized = request(serde_json::json!({"payment_id": 1, "total_paid": 0, "products": lines}));
        assert!(matches!(oversized.into_command(), Err(Error::Validation(_))));

        let lines: Vec<_> = (1..=200).map(|id| serde_json::json!({"product_id": id, "qty": 1})).collect();
        let at_limit = request(serde_json::json!({"payment_id": 1, "total_paid": 0, "products": lines}));
        assert_eq!(at_limit.into_command().unwrap().cart.len(), Cart::MAX_LINES);
    }

    #[test]
    fn test_list_params() {
        let filter = ListParams::default().into_filter().unwrap();
        assert_eq!((filter.limit, filter.skip), (DEFAULT_LIMIT, 0));

        let filter = ListParams { limit: Some(1000), q: Some("  ".into()), ..Default::default() }.into_filter().unwrap();
        assert_eq!(filter.limit, MAX_LIMIT);
        assert!(filter.search.is_none());

        assert!(ListParams { skip: Some(-1), ..Default::default() }.into_filter().is_err());
    }
}
