//! `threadswap-events` — outbound event plumbing.
//!
//! The exchange engine announces committed offer transitions through the
//! [`EventBus`] seam. Delivery (mail, push, whatever the product grows) is a
//! downstream concern: publication is best-effort and consumers must treat
//! duplicates as harmless.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
