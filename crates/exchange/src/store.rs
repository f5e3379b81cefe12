//! Persistence seam the lifecycle engine runs against.
//!
//! Three record contracts (offers here, items and members in their own
//! crates) plus the transaction boundary that composes them. The stores
//! enforce no business rules; every precondition check lives in the engine
//! and the offer state machine.

use threadswap_core::{ItemId, MemberId, OfferId};
use threadswap_items::ItemRegistry;
use threadswap_members::MemberDirectory;

use crate::error::ExchangeError;
use crate::offer::ExchangeOffer;

/// Which side of an offer a member is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferRole {
    Offering,
    Receiving,
}

/// Record store for exchange offers.
///
/// Offers are never deleted; terminal rows are retained as history.
pub trait OfferStore {
    /// Persist a new offer. Fails on id collision.
    fn create(&mut self, offer: ExchangeOffer) -> Result<(), ExchangeError>;

    fn find_by_id(&self, id: OfferId) -> Option<ExchangeOffer>;

    /// Overwrite an existing offer record (status patch).
    fn update(&mut self, offer: &ExchangeOffer) -> Result<(), ExchangeError>;

    /// All offers where the member plays the given role, newest first.
    fn find_by_member(&self, member_id: MemberId, role: OfferRole) -> Vec<ExchangeOffer>;

    /// The pending offer pairing these two items, in either direction.
    fn find_pending_for_pair(&self, a: ItemId, b: ItemId) -> Option<ExchangeOffer>;
}

/// One transaction's view over all three record stores.
pub trait StoreTx {
    fn items(&mut self) -> &mut dyn ItemRegistry;
    fn members(&mut self) -> &mut dyn MemberDirectory;
    fn offers(&mut self) -> &mut dyn OfferStore;
}

/// Transaction boundary over the record stores.
///
/// `transaction` runs the closure atomically and serializably with respect
/// to every other transaction on the same store: the full read-validate-write
/// sequence of one lifecycle operation happens inside one call, so two racing
/// operations on the same offer resolve in some serial order and the loser
/// re-reads the winner's committed status. An `Err` from the closure commits
/// nothing; readers never observe a half-updated item pair.
pub trait ExchangeStore: Send + Sync {
    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut dyn StoreTx) -> Result<T, ExchangeError>,
    ) -> Result<T, ExchangeError>;
}

impl<S> ExchangeStore for std::sync::Arc<S>
where
    S: ExchangeStore + ?Sized,
{
    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut dyn StoreTx) -> Result<T, ExchangeError>,
    ) -> Result<T, ExchangeError> {
        (**self).transaction(f)
    }
}
