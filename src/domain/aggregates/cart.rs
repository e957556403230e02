//! Cart and priced cart

use std::collections::HashMap;

use crate::domain::aggregates::{PaymentMethod, Product};
use crate::domain::value_objects::{Money, Quantity};
use crate::{Error, Result};

/// Caller-submitted cart: product ids and quantities, no prices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: i64,
    pub qty: Quantity,
}

impl Cart {
    /// Most distinct products one order may hold.
    pub const MAX_LINES: usize = 200;

    /// Builds a cart, merging repeated product ids into one line.
    pub fn new(lines: impl IntoIterator<Item = CartLine>) -> Result<Self> {
        let mut merged: Vec<CartLine> = Vec::new();
        let mut position: HashMap<i64, usize> = HashMap::new();
        for line in lines {
            if let Some(&i) = position.get(&line.product_id) {
                merged[i].qty = merged[i].qty.add(line.qty)?;
                continue;
            }
            if merged.len() == Self::MAX_LINES {
                return Err(Error::Validation(format!("cart may hold at most {} products", Self::MAX_LINES)));
            }
            position.insert(line.product_id, merged.len());
            merged.push(line);
        }
        if merged.is_empty() {
            return Err(Error::Validation("cart must contain at least one product".into()));
        }
        Ok(Self { lines: merged })
    }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn len(&self) -> usize { self.lines.len() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

/// One cart line after pricing against the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricedLine {
    pub product: Product,
    pub qty: Quantity,
    pub line_total: Money,
}

/// Cart whose every line resolved, fit the stock seen and was priced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricedCart {
    pub payment: PaymentMethod,
    pub lines: Vec<PricedLine>,
    pub total_price: Money,
}

impl PricedCart {
    pub fn new(payment: PaymentMethod, lines: Vec<PricedLine>) -> Result<Self> {
        let total_price = lines.iter().try_fold(Money::ZERO, |acc, l| acc.add(l.line_total))?;
        Ok(Self { payment, lines, total_price })
    }
}
