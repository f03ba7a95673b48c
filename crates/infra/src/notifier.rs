//! Notification delivery worker.
//!
//! Stands in for the mail senders: consumes side-effect intents from a bus
//! subscription on its own thread and renders them as structured log
//! lines. A real deployment would swap the log calls for a mail/queue
//! client; the consuming loop is the same either way.

use std::thread::{self, JoinHandle};

use storefront_checkout::SideEffect;
use storefront_events::Subscription;

use crate::config::ShopConfig;

/// Background consumer of checkout side effects.
///
/// Runs until the publishing side of the bus is dropped. Failures in here
/// are the delivery mechanism's problem: the checkout that queued the
/// intent has long since committed.
#[derive(Debug)]
pub struct NotificationWorker {
    handle: JoinHandle<()>,
}

impl NotificationWorker {
    pub fn spawn(
        subscription: Subscription<SideEffect>,
        config: ShopConfig,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("notification-worker".to_string())
            .spawn(move || run(subscription, config))?;

        Ok(Self { handle })
    }

    /// Wait for the worker to drain and exit. Call after the last bus
    /// handle is dropped.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

fn run(subscription: Subscription<SideEffect>, config: ShopConfig) {
    while let Ok(effect) = subscription.recv() {
        match effect {
            SideEffect::OrderPlaced(event) => {
                let order = event.order();
                tracing::info!(
                    order_id = %order.id_typed(),
                    buyer = %order.user_id(),
                    total = %order.total(),
                    cc = %config.admin_email,
                    "order confirmation queued"
                );
            }
            SideEffect::LowStock(event) => {
                tracing::warn!(
                    recipient = %config.admin_email,
                    product = %event.product().name(),
                    product_id = %event.product().id_typed(),
                    remaining = event.remaining(),
                    "low stock alert queued"
                );
            }
        }
    }
}
