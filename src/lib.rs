//! OpenSASE POS Orders
//!
//! Order placement and order views for a point-of-sale catalog.
//!
//! ## Features
//! - Cart pricing against live stock
//! - Atomic order placement without oversell
//! - Unique short receipt codes
//! - Batched order detail and order list views

pub mod api;
pub mod config;
pub mod domain;
pub mod messaging;
pub mod services;
pub mod store;

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Product with id {0} not found")]
    ProductNotFound(i64),

    #[error("Payment method with id {0} not found")]
    PaymentMethodNotFound(i64),

    #[error("Order with id {0} not found")]
    OrderNotFound(i64),

    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock { product_id: i64, requested: i32 },

    #[error("Amount paid {total_paid} is less than total price {total_price}")]
    InsufficientPayment { total_price: i64, total_paid: i64 },

    #[error("Could not generate a unique receipt code after {attempts} attempts")]
    ReceiptGenerationExhausted { attempts: u32 },

    #[error("Storage error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Status classification every error is reported under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal_error",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InsufficientPayment { .. } => ErrorKind::Validation,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::ProductNotFound(_) | Self::PaymentMethodNotFound(_) | Self::OrderNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InsufficientStock { .. } => ErrorKind::Conflict,
            Self::ReceiptGenerationExhausted { .. } | Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub use domain::aggregates::{Cart, CartLine, Order, OrderLine, PaymentMethod, PricedCart, PricedLine, Product};
pub use domain::value_objects::{Money, Quantity, ReceiptCode};
pub use services::OrderService;
