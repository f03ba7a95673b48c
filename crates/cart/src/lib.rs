//! Shopping cart domain module.
//!
//! The cart aggregate holds one user's pending selections with
//! quantity-merge semantics. Pure state: stock checks and persistence live
//! at the service boundary.

pub mod cart;

pub use cart::{Cart, CartItem};
