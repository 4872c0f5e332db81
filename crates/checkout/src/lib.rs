//! Order placement workflow.
//!
//! The [`CheckoutCoordinator`] drives the multi-write sequence behind
//! `POST /orders`: stock validation gates everything, then the order
//! insert, stock decrement, customer aggregation and daily-statistics
//! bump run strictly in order. The post-insert writes are compensated
//! in reverse if one of them fails, so a request never leaves an order
//! row without its stock decrement.

pub mod adjust;
pub mod customer;
pub mod error;
pub mod placement;
pub mod stats;
pub mod validate;

pub use adjust::{AdjustReport, AppliedAdjustment};
pub use customer::CustomerOutcome;
pub use error::{CheckoutError, Result};
pub use placement::{CheckoutCoordinator, NewOrder};
pub use validate::StockReport;
