#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use opensase_pos_orders::api::{self, auth::GatewayHeaders, AppState};
use opensase_pos_orders::messaging::NoopPublisher;
use opensase_pos_orders::services::{OrderService, ReceiptGenerator};
use opensase_pos_orders::store::InMemoryStore;
use opensase_pos_orders::{PaymentMethod, Product};

pub const COFFEE: i64 = 1;
pub const BREAD: i64 = 2;
pub const CASH: i64 = 1;
pub const CARD: i64 = 2;

pub async fn store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .add_product(Product { id: COFFEE, sku: "BEV-001".into(), name: "Coffee".into(), stock: 10, price: 100, image: Some("https://cdn.example.com/coffee.png".into()), category_id: Some(1) })
        .await;
    store
        .add_product(Product { id: BREAD, sku: "BAK-001".into(), name: "Bread".into(), stock: 5, price: 250, image: None, category_id: Some(2) })
        .await;
    store.add_payment_method(PaymentMethod { id: CASH, name: "Cash".into(), kind: "CASH".into(), logo: None }).await;
    store.add_payment_method(PaymentMethod { id: CARD, name: "Debit".into(), kind: "CARD".into(), logo: None }).await;
    store
}

pub fn app(store: &InMemoryStore) -> Router {
    let orders = OrderService::new(Arc::new(store.clone()), Arc::new(NoopPublisher), ReceiptGenerator::new(20));
    api::router(AppState { orders: Arc::new(orders), auth: Arc::new(GatewayHeaders::default()) })
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).header("x-user-id", "7").header("x-user-name", "siti").body(Body::empty()).unwrap()
}

pub fn post_order(body: Value) -> Request<Body> {
    Request::post("/api/v1/orders")
        .header("content-type", "application/json")
        .header("x-user-id", "7")
        .header("x-user-name", "siti")
        .body(Body::from(body.to_string()))
        .unwrap()
}
