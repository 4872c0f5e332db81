//! Checkout error types.

use datastore::StoreError;
use domain::OrderId;
use thiserror::Error;

/// Errors that can occur while placing or updating an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Stock validation found shortfalls or missing products.
    #[error("Insufficient stock")]
    InsufficientStock { details: Vec<String> },

    /// No order exists with the given identifier.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The generated order identifier collided with an existing row.
    #[error("Order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// A remote table operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
