//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;
use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. These are
/// the expected, user-correctable outcomes of cart and checkout operations;
/// infrastructure faults belong to the storage layer's error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Requested quantity exceeds the currently available stock.
    ///
    /// Carries the offending product and both quantities so callers can
    /// render a precise message; no state mutation has happened when this
    /// is returned.
    #[error("insufficient stock for product '{name}': requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        requested: u32,
        available: u32,
    },

    /// Checkout was attempted with no cart or an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A value failed validation (e.g. malformed input, zero quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn insufficient_stock(
        product_id: ProductId,
        name: impl Into<String>,
        requested: u32,
        available: u32,
    ) -> Self {
        Self::InsufficientStock {
            product_id,
            name: name.into(),
            requested,
            available,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Convenience for money-related validation messages in one place.
    pub fn total_mismatch(expected: Money, found: Money) -> Self {
        Self::Validation(format!(
            "order total {found} does not match sum of line totals {expected}"
        ))
    }
}
