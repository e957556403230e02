//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{PaymentMethod, Product};
pub use order::{NewOrder, NewOrderLine, Order, OrderLine};
pub use cart::{Cart, CartLine, PricedCart, PricedLine};
