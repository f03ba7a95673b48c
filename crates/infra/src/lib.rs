//! Infrastructure layer: in-memory stores, configuration, notification
//! delivery.
//!
//! Everything here implements the port traits from `storefront-checkout`.
//! The in-memory stores are the tests/dev backend; a SQL backend would
//! slot in behind the same traits.

pub mod config;
pub mod memory;
pub mod notifier;

#[cfg(test)]
mod integration_tests;

pub use config::ShopConfig;
pub use memory::{InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore};
pub use notifier::NotificationWorker;
