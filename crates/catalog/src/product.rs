use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity, Money, ProductId};

/// A sellable catalog product.
///
/// The stock counter is a `u32`, so it is non-negative by construction.
/// Outside this crate it is only ever mutated through the stock ledger's
/// decrement (and the matching rollback restock) — never assigned from
/// client-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Money,
    stock: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        stock: u32,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }

        Ok(Self {
            id,
            name,
            unit_price,
            stock,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Catalog display predicate: some stock left, but less than `threshold`.
    ///
    /// Checkout's low-stock alerting compares the post-decrement quantity
    /// against the threshold directly (a sold-out product still alerts);
    /// this predicate is the storefront listing's "only N left" badge.
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock > 0 && self.stock < threshold
    }

    /// Reprice the product. Historical orders are unaffected: order lines
    /// snapshot the unit price at purchase time.
    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
    }

    /// Remove `quantity` units from stock.
    ///
    /// Callers must have verified sufficiency under an exclusive row lock;
    /// this is the stock ledger's single mutation point.
    pub fn decrement_stock(&mut self, quantity: u32) -> Result<(), DomainError> {
        match self.stock.checked_sub(quantity) {
            Some(remaining) => {
                self.stock = remaining;
                Ok(())
            }
            None => Err(DomainError::insufficient_stock(
                self.id,
                self.name.clone(),
                quantity,
                self.stock,
            )),
        }
    }

    /// Return `quantity` units to stock (reservation rollback, restocking).
    pub fn restock(&mut self, quantity: u32) {
        self.stock = self.stock.saturating_add(quantity);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product::new(ProductId::new(), "Widget", Money::from_cents(2500), stock).unwrap()
    }

    #[test]
    fn rejects_empty_name() {
        let err = Product::new(ProductId::new(), "   ", Money::from_cents(100), 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn in_stock_predicate() {
        assert!(product(1).is_in_stock());
        assert!(!product(0).is_in_stock());
    }

    #[test]
    fn low_stock_is_strictly_below_threshold_and_above_zero() {
        assert!(product(4).is_low_stock(5));
        assert!(!product(5).is_low_stock(5));
        assert!(!product(0).is_low_stock(5));
    }

    #[test]
    fn decrement_reduces_stock() {
        let mut p = product(10);
        p.decrement_stock(3).unwrap();
        assert_eq!(p.stock(), 7);
    }

    #[test]
    fn decrement_past_available_fails_without_mutation() {
        let mut p = product(2);
        let err = p.decrement_stock(5).unwrap_err();
        match err {
            DomainError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 5);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(p.stock(), 2);
    }

    #[test]
    fn restock_reverses_decrement() {
        let mut p = product(6);
        p.decrement_stock(6).unwrap();
        p.restock(6);
        assert_eq!(p.stock(), 6);
    }

    #[test]
    fn repricing_leaves_stock_alone() {
        let mut p = product(6);
        p.set_unit_price(Money::from_cents(9900));
        assert_eq!(p.unit_price(), Money::from_cents(9900));
        assert_eq!(p.stock(), 6);
    }
}
