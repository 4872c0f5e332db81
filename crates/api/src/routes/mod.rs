pub mod collections;
pub mod colors;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod stats;
pub mod upload;
