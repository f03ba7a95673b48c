//! The checkout orchestrator.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{DomainError, Money, OrderId, UserId};
use storefront_events::EventBus;
use storefront_orders::{Order, OrderItem};

use crate::dispatcher::SideEffectDispatcher;
use crate::error::ServiceResult;
use crate::events::{LowStockEvent, OrderPlacedEvent, SideEffect};
use crate::ledger::StockLedger;
use crate::store::{CartStore, OrderStore, ProductStore};

/// What a successful checkout hands back: the persisted order plus the
/// post-decrement product snapshots, so callers can render the
/// confirmation without re-reading the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub products: Vec<Product>,
}

/// Coordinates one checkout as a single atomic unit of work.
///
/// The pipeline is linear and has no persisted intermediate states: load
/// the cart, reserve-and-decrement every line under row locks (ascending
/// product id), persist the order, clear the cart, commit, and only then
/// dispatch side effects. Any failure before commit rolls the whole thing
/// back — no partial orders, no partial decrements, no side effects.
#[derive(Debug)]
pub struct CheckoutService<P, C, O, B> {
    ledger: StockLedger<P>,
    carts: C,
    orders: O,
    dispatcher: SideEffectDispatcher<B>,
    low_stock_threshold: u32,
}

impl<P, C, O, B> CheckoutService<P, C, O, B>
where
    P: ProductStore,
    C: CartStore,
    O: OrderStore,
    B: EventBus<SideEffect>,
{
    /// `low_stock_threshold` comes from configuration (`ShopConfig`); the
    /// engine itself never reads the environment.
    pub fn new(products: P, carts: C, orders: O, bus: B, low_stock_threshold: u32) -> Self {
        Self {
            ledger: StockLedger::new(products),
            carts,
            orders,
            dispatcher: SideEffectDispatcher::new(bus),
            low_stock_threshold,
        }
    }

    pub fn process_checkout(&self, user: UserId) -> ServiceResult<CheckoutReceipt> {
        // Cheap fail-fast before any lock or transaction is opened.
        let cart = self
            .carts
            .load(user)?
            .filter(|cart| !cart.is_empty())
            .ok_or(DomainError::EmptyCart)?;

        tracing::debug!(%user, lines = cart.len(), "checkout started");

        let now = Utc::now();
        let mut reservation = self.ledger.begin();
        let mut total = Money::ZERO;
        let mut lines = Vec::with_capacity(cart.len());
        let mut snapshots = Vec::with_capacity(cart.len());
        let mut low_stock = Vec::new();

        // Cart items iterate in ascending product id order, which is also
        // the ledger's required lock order. An insufficient line aborts
        // here; the reservation's drop restores every prior decrement.
        for item in cart.items() {
            let updated = reservation.reserve_and_decrement(item.product_id(), item.quantity())?;

            // Price is read fresh from the locked row, not from the cart:
            // checkout charges current pricing, not cart-time pricing.
            let unit_price = updated.unit_price();
            total += unit_price * item.quantity();
            lines.push(OrderItem::new(item.product_id(), item.quantity(), unit_price));

            if updated.stock() < self.low_stock_threshold {
                low_stock.push(LowStockEvent::new(updated.clone(), now));
            }

            snapshots.push(updated);
        }

        let order = Order::new(OrderId::new(), user, total, lines, now)?;
        let order = self.orders.create(order)?;

        if let Err(err) = self.carts.clear(cart.id_typed()) {
            // The order row already exists; compensate it before the
            // reservation rolls the stock back on drop.
            if let Err(delete_err) = self.orders.delete(order.id_typed()) {
                tracing::error!(
                    order_id = %order.id_typed(),
                    ?delete_err,
                    "failed to compensate order while aborting checkout"
                );
            }
            return Err(err.into());
        }

        reservation.commit();

        tracing::info!(
            order_id = %order.id_typed(),
            %user,
            total = %order.total(),
            low_stock_alerts = low_stock.len(),
            "checkout committed"
        );

        // Side effects strictly after commit: they must never fire for a
        // checkout that rolls back.
        self.dispatcher
            .dispatch(SideEffect::OrderPlaced(OrderPlacedEvent::new(
                order.clone(),
                now,
            )));
        self.dispatcher
            .dispatch_all(low_stock.into_iter().map(SideEffect::LowStock));

        Ok(CheckoutReceipt {
            order,
            products: snapshots,
        })
    }
}
