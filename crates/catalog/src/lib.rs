//! Product catalog domain module.
//!
//! This crate contains the `Product` entity and its stock predicates,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod product;

pub use product::Product;
