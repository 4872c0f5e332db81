//! Remote table client for the storefront backend.
//!
//! The hosted relational store is modelled as the [`Datastore`] trait:
//! per logical table, a filtered select, insert-with-return,
//! update-with-return and delete, each individually atomic. Two
//! implementations ship: [`MemoryStore`] for tests and zero-config
//! runs, and [`PgStore`] backed by PostgreSQL via sqlx.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Datastore, ProductFilter};
