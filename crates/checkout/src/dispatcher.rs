//! Post-commit side-effect delivery.

use storefront_events::{Event, EventBus};

use crate::events::SideEffect;

/// Hands committed side-effect intents to the delivery transport.
///
/// Fire-and-forget from the orchestrator's perspective: by the time
/// anything reaches this type the checkout has already committed, so a
/// delivery failure is logged and left to the transport's own retry
/// policy. It must never unwind the checkout, and therefore never returns
/// an error.
#[derive(Debug)]
pub struct SideEffectDispatcher<B> {
    bus: B,
}

impl<B> SideEffectDispatcher<B>
where
    B: EventBus<SideEffect>,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn dispatch(&self, effect: SideEffect) {
        let event_type = effect.event_type();
        if let Err(err) = self.bus.publish(effect) {
            tracing::error!(
                ?err,
                event_type,
                "side-effect delivery failed; the committed checkout stands"
            );
        }
    }

    pub fn dispatch_all(&self, effects: impl IntoIterator<Item = SideEffect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }
}
