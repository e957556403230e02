//! Catalog records read by the order core

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

/// Product as it currently exists in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub stock: i32,
    pub price: i64,
    pub image: Option<String>,
    pub category_id: Option<i64>,
}

impl Product {
    pub fn unit_price(&self) -> Money { Money::new(self.price) }
}

/// Payment method an order was settled with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentMethod {
    #[serde(rename = "payment_id")]
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub logo: Option<String>,
}
