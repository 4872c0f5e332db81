//! Data model for the storefront backend.
//!
//! Plain records mirroring the remote tables (orders, products,
//! customers, collections, colors, daily statistics) plus the typed
//! identifiers and the order status state machine.

pub mod collection;
pub mod color;
pub mod customer;
pub mod ids;
pub mod money;
pub mod order;
pub mod product;
pub mod stats;
pub mod status;

pub use collection::{Collection, CollectionPatch, CollectionStatus};
pub use color::{Color, ColorCategory, ColorPatch};
pub use customer::{Customer, CustomerInfo, CustomerPatch};
pub use ids::{CustomerKey, OrderId, ProductId};
pub use money::Money;
pub use order::{ItemKind, LineItem, Order, OrderPatch};
pub use product::{Product, ProductPatch};
pub use stats::DailyStat;
pub use status::{OrderStatus, StockDirection};
