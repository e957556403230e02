//! Order and order line records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::PricedCart;
use crate::domain::value_objects::Money;
use crate::domain::Identity;
use crate::{Error, Result};

/// Committed order row. Never mutated after commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub payment_id: i64,
    pub name: String,
    pub total_price: i64,
    pub total_paid: i64,
    pub total_return: i64,
    pub receipt_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Committed line item row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub qty: i32,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderLine {
    /// Unit price captured at order time.
    pub fn unit_price(&self) -> i64 {
        if self.qty == 0 { 0 } else { self.total_price / i64::from(self.qty) }
    }
}

/// Order header about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: i64,
    pub name: String,
    pub payment_id: i64,
    pub total_price: Money,
    pub total_paid: Money,
    pub total_return: Money,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Derives the header from a priced cart; rejects tenders below the total.
    pub fn for_cart(identity: &Identity, cart: &PricedCart, total_paid: Money) -> Result<Self> {
        let total_return = total_paid.subtract(cart.total_price)?;
        if total_return.is_negative() {
            return Err(Error::InsufficientPayment {
                total_price: cart.total_price.amount(),
                total_paid: total_paid.amount(),
            });
        }
        Ok(Self {
            user_id: identity.user_id,
            name: identity.display_name.clone(),
            payment_id: cart.payment.id,
            total_price: cart.total_price,
            total_paid,
            total_return,
            created_at: Utc::now(),
        })
    }
}

/// Line item about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrderLine {
    pub order_id: i64,
    pub product_id: i64,
    pub qty: i32,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{PaymentMethod, PricedLine, Product};
    use crate::domain::value_objects::Quantity;

    fn priced(price: i64, qty: i32) -> PricedCart {
        let product = Product { id: 1, sku: "SKU-1".into(), name: "Kopi".into(), stock: 10, price, image: None, category_id: None };
        let qty = Quantity::new(qty).unwrap();
        let line_total = product.unit_price().multiply(qty).unwrap();
        let payment = PaymentMethod { id: 1, name: "Cash".into(), kind: "CASH".into(), logo: None };
        PricedCart::new(payment, vec![PricedLine { product, qty, line_total }]).unwrap()
    }

    fn cashier() -> Identity { Identity { user_id: 7, display_name: "siti".into() } }

    #[test]
    fn test_change_is_computed() {
        let order = NewOrder::for_cart(&cashier(), &priced(100, 3), Money::new(400)).unwrap();
        assert_eq!(order.total_price, Money::new(300));
        assert_eq!(order.total_return, Money::new(100));
        assert_eq!(order.name, "siti");
    }

    #[test]
    fn test_exact_tender_accepted() {
        let order = NewOrder::for_cart(&cashier(), &priced(100, 3), Money::new(300)).unwrap();
        assert_eq!(order.total_return, Money::ZERO);
    }

    #[test]
    fn test_short_tender_rejected() {
        let err = NewOrder::for_cart(&cashier(), &priced(100, 3), Money::new(299)).unwrap_err();
        assert!(matches!(err, Error::InsufficientPayment { total_price: 300, total_paid: 299 }));
    }

    #[test]
    fn test_unit_price_from_line_total() {
        let now = Utc::now();
        let line = OrderLine { id: 1, order_id: 1, product_id: 1, qty: 4, total_price: 1000, created_at: now, updated_at: now };
        assert_eq!(line.unit_price(), 250);
    }
}
