//! Cart pricing against live catalog stock.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::aggregates::{Cart, PricedCart, PricedLine};
use crate::store::CatalogReader;
use crate::{Error, Result};

/// Resolves every cart line, checks it against the stock on hand and prices it.
/// Read-only: nothing is reserved, the writer re-checks stock under its unit.
pub struct PricingValidator {
    catalog: Arc<dyn CatalogReader>,
}

impl PricingValidator {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self { Self { catalog } }

    #[tracing::instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn price(&self, cart: &Cart, payment_id: i64) -> Result<PricedCart> {
        let payment = self
            .catalog
            .payment_method(payment_id)
            .await?
            .ok_or(Error::PaymentMethodNotFound(payment_id))?;

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product_id).collect();
        let mut products: HashMap<i64, _> =
            self.catalog.products(&ids).await?.into_iter().map(|p| (p.id, p)).collect();

        // Cart lines are unique per product, so each row is taken once.
        let mut lines = Vec::with_capacity(cart.len());
        for line in cart.lines() {
            let product = products.remove(&line.product_id).ok_or(Error::ProductNotFound(line.product_id))?;
            if !line.qty.fits_in(product.stock) {
                tracing::warn!(product_id = product.id, requested = line.qty.value(), stock = product.stock, "cart exceeds stock");
                return Err(Error::InsufficientStock { product_id: product.id, requested: line.qty.value() });
            }
            let line_total = product.unit_price().multiply(line.qty)?;
            lines.push(PricedLine { product, qty: line.qty, line_total });
        }

        PricedCart::new(payment, lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::CartLine;
    use crate::domain::value_objects::{Money, Quantity};
    use crate::services::test_support::{seeded_store, CASH, KOPI, TEH};

    fn cart(lines: &[(i64, i32)]) -> Cart {
        Cart::new(lines.iter().map(|&(product_id, qty)| CartLine { product_id, qty: Quantity::new(qty).unwrap() })).unwrap()
    }

    #[tokio::test]
    async fn test_prices_each_line() {
        let validator = PricingValidator::new(Arc::new(seeded_store().await));
        let priced = validator.price(&cart(&[(KOPI, 3), (TEH, 2)]), CASH).await.unwrap();
        assert_eq!(priced.lines[0].line_total, Money::new(300));
        assert_eq!(priced.lines[1].line_total, Money::new(100));
        assert_eq!(priced.total_price, Money::new(400));
        assert_eq!(priced.payment.id, CASH);
    }

    #[tokio::test]
    async fn test_unknown_payment() {
        let validator = PricingValidator::new(Arc::new(seeded_store().await));
        let err = validator.price(&cart(&[(KOPI, 1)]), 9999).await.unwrap_err();
        assert!(matches!(err, Error::PaymentMethodNotFound(9999)));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let validator = PricingValidator::new(Arc::new(seeded_store().await));
        let err = validator.price(&cart(&[(KOPI, 1), (404, 1)]), CASH).await.unwrap_err();
        assert!(matches!(err, Error::ProductNotFound(404)));
    }

    #[tokio::test]
    async fn test_first_short_line_reported() {
        let validator = PricingValidator::new(Arc::new(seeded_store().await));
        let err = validator.price(&cart(&[(KOPI, 11), (TEH, 999)]), CASH).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { product_id: KOPI, requested: 11 }));
    }

    #[tokio::test]
    async fn test_failures_reported_in_cart_order() {
        let validator = PricingValidator::new(Arc::new(seeded_store().await));
        let err = validator.price(&cart(&[(KOPI, 11), (404, 1)]), CASH).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { product_id: KOPI, requested: 11 }));

        let err = validator.price(&cart(&[(404, 1), (KOPI, 11)]), CASH).await.unwrap_err();
        assert!(matches!(err, Error::ProductNotFound(404)));
    }

    #[tokio::test]
    async fn test_merged_lines_checked_together() {
        let validator = PricingValidator::new(Arc::new(seeded_store().await));
        let err = validator.price(&cart(&[(KOPI, 6), (KOPI, 5)]), CASH).await.unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { product_id: KOPI, requested: 11 }));
    }
}
