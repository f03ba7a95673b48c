//! Service-level error composition.

use thiserror::Error;

use storefront_core::DomainError;

use crate::store::StoreError;

/// Result type for cart and checkout operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by the cart and checkout services.
///
/// Domain failures (`InsufficientStock`, `EmptyCart`, validation) are
/// expected, user-facing, and recoverable: nothing was mutated and the
/// caller re-renders with a message. Store failures are infrastructure
/// faults: the transaction has been rolled back and the error is surfaced
/// for operators. Domain errors pass through unchanged so no detail about
/// the offending product or quantities is lost on the way up.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
