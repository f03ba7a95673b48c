//! The stock ledger: exclusive-access reservation/decrement over product
//! stock counters.
//!
//! Stock is the one resource shared across concurrent checkouts, and the
//! check-then-decrement must happen under mutual exclusion or two buyers
//! can both observe "enough" and oversell between them. The ledger models
//! that as a **reservation**: a unit of work that acquires per-product row
//! locks (pessimistic, not optimistic retry), decrements under them, and
//! either commits or rolls every decrement back before the locks release.
//! No partial decrement is ever visible outside the reservation.

use storefront_catalog::Product;
use storefront_core::{DomainError, ProductId};

use crate::error::ServiceResult;
use crate::store::{ProductGuard, ProductStore, StoreError};

/// Reservation/decrement facade over a [`ProductStore`].
#[derive(Debug)]
pub struct StockLedger<P> {
    products: P,
}

impl<P> StockLedger<P>
where
    P: ProductStore,
{
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Open a reservation: the transactional scope for one checkout's
    /// stock movements.
    pub fn begin(&self) -> StockReservation<'_> {
        StockReservation {
            products: &self.products,
            reserved: Vec::new(),
            committed: false,
        }
    }
}

struct Reserved {
    product_id: ProductId,
    quantity: u32,
    guard: Box<dyn ProductGuard>,
}

/// An open set of locked, decremented product rows.
///
/// Locks are held from the moment a product is reserved until the
/// reservation is committed or dropped, which is what serializes
/// concurrent checkouts touching the same product. Dropping without
/// committing restores every decrement through the still-held guards, so
/// rollback is atomic too.
pub struct StockReservation<'a> {
    products: &'a dyn ProductStore,
    reserved: Vec<Reserved>,
    committed: bool,
}

impl StockReservation<'_> {
    /// Lock the product row, verify sufficiency, and decrement.
    ///
    /// Returns the post-decrement product state so the caller can evaluate
    /// low-stock thresholds (and read the current unit price) without a
    /// second read. On `InsufficientStock` no decrement occurs and the
    /// row's lock is released immediately.
    ///
    /// Products must be reserved in ascending `ProductId` order — the
    /// fixed global order that keeps two multi-item checkouts from locking
    /// the same pair of rows in opposite directions.
    pub fn reserve_and_decrement(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<Product> {
        if let Some(last) = self.reserved.last() {
            if product_id <= last.product_id {
                return Err(StoreError::LockOrder(format!(
                    "product {product_id} requested after {}",
                    last.product_id
                ))
                .into());
            }
        }

        let mut guard = self.products.lock_for_update(product_id)?;

        let current = guard.product();
        if current.stock() < quantity {
            tracing::debug!(
                %product_id,
                requested = quantity,
                available = current.stock(),
                "reservation refused"
            );
            return Err(DomainError::insufficient_stock(
                product_id,
                current.name(),
                quantity,
                current.stock(),
            )
            .into());
        }

        guard.product_mut().decrement_stock(quantity)?;
        let updated = guard.product().clone();

        self.reserved.push(Reserved {
            product_id,
            quantity,
            guard,
        });

        Ok(updated)
    }

    /// Number of rows currently held by this reservation.
    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }

    /// Keep the decrements and release all row locks.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for StockReservation<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        // Roll back before the guards drop: every restock happens while
        // the row is still exclusively held, so other checkouts never see
        // the intermediate decrements.
        for reserved in &mut self.reserved {
            reserved.guard.product_mut().restock(reserved.quantity);
        }

        if !self.reserved.is_empty() {
            tracing::debug!(rows = self.reserved.len(), "stock reservation rolled back");
        }
    }
}
