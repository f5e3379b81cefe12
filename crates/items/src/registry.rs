//! Item persistence contract consumed by the exchange core.

use threadswap_core::{DomainError, ItemId, MemberId};

use crate::item::{ClothingItem, ItemStatus};

/// Record store for clothing items.
///
/// Each operation is atomic at the single-record (or batch) level; the
/// exchange engine composes them into consistent multi-record updates inside
/// one store transaction. No business rules live here.
pub trait ItemRegistry {
    fn find_by_id(&self, id: ItemId) -> Option<ClothingItem>;

    /// All items currently owned by a member (the inventory view).
    fn find_by_owner(&self, owner_id: MemberId) -> Vec<ClothingItem>;

    /// Insert a freshly registered item.
    fn insert(&mut self, item: ClothingItem) -> Result<(), DomainError>;

    /// Overwrite one item's availability status.
    fn update_status(&mut self, id: ItemId, status: ItemStatus) -> Result<(), DomainError>;

    /// Overwrite the availability status of several items at once.
    fn update_status_batch(
        &mut self,
        ids: &[ItemId],
        status: ItemStatus,
    ) -> Result<(), DomainError>;

    /// Reassign ownership and status in one step (the completion swap).
    fn transfer_ownership_and_status(
        &mut self,
        id: ItemId,
        new_owner: MemberId,
        status: ItemStatus,
    ) -> Result<(), DomainError>;
}
