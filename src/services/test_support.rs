//! Shared fixtures for service tests.

use crate::domain::aggregates::{PaymentMethod, Product};
use crate::domain::Identity;
use crate::store::InMemoryStore;

pub const KOPI: i64 = 1;
pub const TEH: i64 = 2;
pub const ROTI: i64 = 3;
pub const CASH: i64 = 1;
pub const QRIS: i64 = 2;

pub fn cashier() -> Identity {
    Identity { user_id: 7, display_name: "siti".into() }
}

pub fn product(id: i64, name: &str, stock: i32, price: i64, category_id: i64) -> Product {
    Product {
        id,
        sku: format!("SKU-{id:03}"),
        name: name.into(),
        stock,
        price,
        image: Some(format!("https://cdn.example.com/{id}.png")),
        category_id: Some(category_id),
    }
}

/// Kopi (10 @ 100), Teh (20 @ 50), Roti (50 @ 75); Cash and QRIS.
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.add_product(product(KOPI, "Kopi Susu", 10, 100, 1)).await;
    store.add_product(product(TEH, "Teh Manis", 20, 50, 1)).await;
    store.add_product(product(ROTI, "Roti Bakar", 50, 75, 2)).await;
    store.add_payment_method(PaymentMethod { id: CASH, name: "Cash".into(), kind: "CASH".into(), logo: None }).await;
    store
        .add_payment_method(PaymentMethod { id: QRIS, name: "QRIS".into(), kind: "E-WALLET".into(), logo: Some("https://cdn.example.com/qris.png".into()) })
        .await;
    store
}
