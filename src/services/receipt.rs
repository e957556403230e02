//! Receipt code generation.

use rand::Rng;

use crate::domain::aggregates::{NewOrder, Order};
use crate::domain::value_objects::ReceiptCode;
use crate::store::OrderUnit;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct ReceiptGenerator {
    max_attempts: u32,
}

impl Default for ReceiptGenerator {
    fn default() -> Self { Self::new(Self::DEFAULT_ATTEMPTS) }
}

impl ReceiptGenerator {
    pub const DEFAULT_ATTEMPTS: u32 = 5;

    pub fn new(max_attempts: u32) -> Self { Self { max_attempts: max_attempts.max(1) } }

    pub fn max_attempts(&self) -> u32 { self.max_attempts }

    pub fn random_number() -> u16 {
        rand::thread_rng().gen_range(ReceiptCode::MIN_NUMBER..=ReceiptCode::MAX_NUMBER)
    }

    /// Inserts `order` under a freshly drawn receipt code.
    pub async fn insert_order(&self, unit: &mut dyn OrderUnit, order: &NewOrder) -> Result<Order> {
        self.insert_order_with(unit, order, Self::random_number).await
    }

    /// Draws numbers from `next_number` until the unit accepts a code or the
    /// attempt budget runs out. The unit performs the uniqueness check and the
    /// insert as one step.
    pub async fn insert_order_with<F>(&self, unit: &mut dyn OrderUnit, order: &NewOrder, mut next_number: F) -> Result<Order>
    where
        F: FnMut() -> u16 + Send,
    {
        for attempt in 1..=self.max_attempts {
            let code = ReceiptCode::compose(&order.name, next_number())?;
            match unit.insert_order(order, &code).await? {
                Some(row) => return Ok(row),
                None => tracing::warn!(%code, attempt, "receipt code already taken"),
            }
        }
        Err(Error::ReceiptGenerationExhausted { attempts: self.max_attempts })
    }
}
