//! In-memory store implementations.
//!
//! Intended for tests/dev. Not optimized for performance, but the locking
//! semantics are real: the product store hands out genuinely exclusive
//! per-row guards, so the concurrency behavior under test matches what a
//! row-locking database would do.

pub mod carts;
pub mod orders;
pub mod products;

pub use carts::InMemoryCartStore;
pub use orders::InMemoryOrderStore;
pub use products::InMemoryProductStore;
