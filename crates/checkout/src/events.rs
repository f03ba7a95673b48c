//! Side-effect intents produced by a committed checkout.
//!
//! Ephemeral value objects, never persisted: the orchestrator queues them
//! during the transaction and the dispatcher publishes them only after
//! commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_events::Event;
use storefront_orders::Order;

/// A checkout committed and this order now exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    order: Order,
    occurred_at: DateTime<Utc>,
}

impl OrderPlacedEvent {
    pub fn new(order: Order, occurred_at: DateTime<Utc>) -> Self {
        Self { order, occurred_at }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }
}

/// A decrement left this product below the configured threshold.
///
/// Carries the post-decrement snapshot, so consumers see exactly the state
/// the alert was raised for even if stock moves again afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockEvent {
    product: Product,
    occurred_at: DateTime<Utc>,
}

impl LowStockEvent {
    pub fn new(product: Product, occurred_at: DateTime<Utc>) -> Self {
        Self {
            product,
            occurred_at,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn remaining(&self) -> u32 {
        self.product.stock()
    }
}

/// Everything a committed checkout can ask the outside world to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    OrderPlaced(OrderPlacedEvent),
    LowStock(LowStockEvent),
}

impl Event for SideEffect {
    fn event_type(&self) -> &'static str {
        match self {
            SideEffect::OrderPlaced(_) => "checkout.order.placed",
            SideEffect::LowStock(_) => "catalog.stock.low",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SideEffect::OrderPlaced(e) => e.occurred_at,
            SideEffect::LowStock(e) => e.occurred_at,
        }
    }
}
