//! Event mechanics: the `Event` trait and a transport-agnostic pub/sub bus.
//!
//! This crate is domain-agnostic. Concrete side-effect payloads (order
//! placed, low stock) live with the checkout engine; this crate only knows
//! how to describe and distribute them.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
