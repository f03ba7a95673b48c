//! The checkout/inventory-consistency engine.
//!
//! Turning a cart into an order is the one sequence in the shop with real
//! correctness hazards: concurrent stock decrements, partial-failure
//! rollback, and side effects that must only fire once the whole thing has
//! committed. This crate owns that sequence:
//!
//! - [`store`] — the port traits the engine runs against (product rows
//!   with exclusive locking, carts, orders).
//! - [`ledger`] — the stock ledger: reservation-scoped, pessimistically
//!   locked check-then-decrement with rollback on drop.
//! - [`service`] — the checkout orchestrator.
//! - [`cart_service`] — the cart boundary (validation + early stock
//!   checks + derived reads).
//! - [`events`] / [`dispatcher`] — side-effect intents and their
//!   post-commit, fire-and-forget delivery.
//! - [`report`] — daily sales aggregation over the order store.

pub mod cart_service;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod ledger;
pub mod report;
pub mod service;
pub mod store;

pub use cart_service::CartService;
pub use dispatcher::SideEffectDispatcher;
pub use error::{ServiceError, ServiceResult};
pub use events::{LowStockEvent, OrderPlacedEvent, SideEffect};
pub use ledger::{StockLedger, StockReservation};
pub use report::{DailySalesReport, daily_sales_report};
pub use service::{CheckoutReceipt, CheckoutService};
pub use store::{CartStore, OrderStore, ProductGuard, ProductStore, StoreError};
