use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity, Money, OrderId, ProductId, UserId};

/// Order line: a snapshot of product, quantity, and unit price taken at
/// purchase time.
///
/// The price is captured, not re-derived — later catalog repricing never
/// changes what a historical order says was paid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// A placed order. Immutable once constructed: no mutators exist, and
/// construction validates the books balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    total: Money,
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from accumulated checkout state.
    ///
    /// Invariants checked here rather than trusted from the caller:
    /// at least one line, every quantity ≥ 1, and the stated total equal
    /// to the sum of line totals.
    pub fn new(
        id: OrderId,
        user_id: UserId,
        total: Money,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }
        if items.iter().any(|item| item.quantity == 0) {
            return Err(DomainError::validation("order line quantity must be positive"));
        }

        let line_sum: Money = items.iter().map(OrderItem::line_total).sum();
        if line_sum != total {
            return Err(DomainError::total_mismatch(line_sum, total));
        }

        Ok(Self {
            id,
            user_id,
            total,
            items,
            created_at,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
