//! Clothing item domain module.
//!
//! Items carry the availability status the offer workflow leans on: an item
//! is reserved (`Unavailable`) the instant an offer references it, released
//! back to `Available` when the offer dies, and retired to `Exchanged` when
//! an offer completes and ownership swaps.

pub mod item;
pub mod registry;

pub use item::{ClothingItem, ItemDraft, ItemStatus};
pub use registry::ItemRegistry;
