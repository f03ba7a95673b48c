//! Orders domain module.
//!
//! An order is an immutable record of a completed checkout: the total paid
//! and the per-line snapshots of product, quantity, and unit price at
//! purchase time.

pub mod order;

pub use order::{Order, OrderItem};
