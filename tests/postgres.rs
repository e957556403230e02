//! Runs against a scratch Postgres database:
//! `DATABASE_URL=postgres://... cargo test --test postgres -- --ignored`

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use opensase_pos_orders::domain::aggregates::{Cart, CartLine};
use opensase_pos_orders::domain::value_objects::{Money, Quantity};
use opensase_pos_orders::domain::Identity;
use opensase_pos_orders::messaging::NoopPublisher;
use opensase_pos_orders::services::{OrderService, ReceiptGenerator};
use opensase_pos_orders::store::{OrderFilter, PgStore};
use opensase_pos_orders::Error;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a scratch database");
    let pool = PgPoolOptions::new().max_connections(8).connect(&url).await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

async fn seed(pool: &PgPool, stock: i32, price: i64) -> (i64, i64) {
    let product: i64 = sqlx::query_scalar("INSERT INTO products (sku, name, stock, price) VALUES ('PG-TEST', 'Pg Test', $1, $2) RETURNING id")
        .bind(stock)
        .bind(price)
        .fetch_one(pool)
        .await
        .unwrap();
    let payment: i64 = sqlx::query_scalar("INSERT INTO payments (name, type) VALUES ('Cash', 'CASH') RETURNING id")
        .fetch_one(pool)
        .await
        .unwrap();
    (product, payment)
}

fn cart(product_id: i64, qty: i32) -> Cart {
    Cart::new([CartLine { product_id, qty: Quantity::new(qty).unwrap() }]).unwrap()
}

async fn stock(pool: &PgPool, product_id: i64) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1").bind(product_id).fetch_one(pool).await.unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn places_and_reads_back_an_order() {
    let pool = pool().await;
    let (product, payment) = seed(&pool, 10, 100).await;
    let service = OrderService::new(Arc::new(PgStore::new(pool.clone())), Arc::new(NoopPublisher), ReceiptGenerator::default());
    let who = Identity { user_id: 1, display_name: "tester".into() };

    let view = service.place_order(&who, payment, cart(product, 3), Money::new(400)).await.unwrap();

    assert_eq!((view.total_price, view.total_return), (300, 100));
    assert_eq!(stock(&pool, product).await, 7);
    assert_eq!(service.order_detail(view.id).await.unwrap(), view);

    let search = OrderFilter { limit: 100, skip: 0, search: Some("TESTER".into()), category_id: None };
    let list = service.list_orders(&search).await.unwrap();
    assert!(list.orders.iter().any(|o| o.id == view.id));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_last_units_commit_once() {
    let pool = pool().await;
    let (product, payment) = seed(&pool, 5, 100).await;
    let service = Arc::new(OrderService::new(Arc::new(PgStore::new(pool.clone())), Arc::new(NoopPublisher), ReceiptGenerator::default()));

    let attempts = (0..2).map(|i| {
        let service = service.clone();
        tokio::spawn(async move {
            let who = Identity { user_id: i, display_name: "racer".into() };
            service.place_order(&who, payment, cart(product, 5), Money::new(1_000)).await
        })
    });
    let mut committed = 0;
    for attempt in attempts.collect::<Vec<_>>() {
        match attempt.await.unwrap() {
            Ok(_) => committed += 1,
            Err(Error::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(committed, 1);
    assert_eq!(stock(&pool, product).await, 0);
}
