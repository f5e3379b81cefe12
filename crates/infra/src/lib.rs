//! `threadswap-infra` — storage implementations for the exchange core.
//!
//! The only backend today is the in-memory transactional store, which is
//! what the engine's tests run against and what a real database adapter
//! would replace.

pub mod in_memory;

pub use in_memory::InMemoryStore;
