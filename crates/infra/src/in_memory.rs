//! In-memory transactional record store.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use threadswap_core::{DomainError, ItemId, MemberId, OfferId, UserId};
use threadswap_exchange::{
    ExchangeError, ExchangeOffer, ExchangeStore, OfferRole, OfferStatus, OfferStore, StoreTx,
};
use threadswap_items::{ClothingItem, ItemRegistry, ItemStatus};
use threadswap_members::{Member, MemberDirectory};

#[derive(Debug, Clone, Default)]
struct ItemTable {
    rows: HashMap<ItemId, ClothingItem>,
}

impl ItemRegistry for ItemTable {
    fn find_by_id(&self, id: ItemId) -> Option<ClothingItem> {
        self.rows.get(&id).cloned()
    }

    fn find_by_owner(&self, owner_id: MemberId) -> Vec<ClothingItem> {
        let mut items: Vec<_> = self
            .rows
            .values()
            .filter(|item| item.owner_id() == owner_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| std::cmp::Reverse(item.created()));
        items
    }

    fn insert(&mut self, item: ClothingItem) -> Result<(), DomainError> {
        if self.rows.contains_key(&item.id_typed()) {
            return Err(DomainError::conflict("item already exists"));
        }
        self.rows.insert(item.id_typed(), item);
        Ok(())
    }

    fn update_status(&mut self, id: ItemId, status: ItemStatus) -> Result<(), DomainError> {
        let item = self.rows.get_mut(&id).ok_or(DomainError::NotFound)?;
        item.set_status(status, Utc::now());
        Ok(())
    }

    fn update_status_batch(
        &mut self,
        ids: &[ItemId],
        status: ItemStatus,
    ) -> Result<(), DomainError> {
        // Validate the whole batch before touching any row.
        for id in ids {
            if !self.rows.contains_key(id) {
                return Err(DomainError::NotFound);
            }
        }
        let now = Utc::now();
        for id in ids {
            if let Some(item) = self.rows.get_mut(id) {
                item.set_status(status, now);
            }
        }
        Ok(())
    }

    fn transfer_ownership_and_status(
        &mut self,
        id: ItemId,
        new_owner: MemberId,
        status: ItemStatus,
    ) -> Result<(), DomainError> {
        let item = self.rows.get_mut(&id).ok_or(DomainError::NotFound)?;
        item.transfer(new_owner, status, Utc::now());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct MemberTable {
    rows: HashMap<MemberId, Member>,
}

impl MemberDirectory for MemberTable {
    fn member_by_user_id(&self, user_id: UserId) -> Option<Member> {
        self.rows
            .values()
            .find(|member| member.user_id() == user_id)
            .cloned()
    }

    fn member_by_id(&self, id: MemberId) -> Option<Member> {
        self.rows.get(&id).cloned()
    }

    fn insert(&mut self, member: Member) -> Result<(), DomainError> {
        if self.rows.contains_key(&member.id_typed()) {
            return Err(DomainError::conflict("member already exists"));
        }
        if self.member_by_user_id(member.user_id()).is_some() {
            return Err(DomainError::conflict("user already has a member profile"));
        }
        self.rows.insert(member.id_typed(), member);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct OfferTable {
    rows: HashMap<OfferId, ExchangeOffer>,
}

impl OfferStore for OfferTable {
    fn create(&mut self, offer: ExchangeOffer) -> Result<(), ExchangeError> {
        if self.rows.contains_key(&offer.id_typed()) {
            return Err(ExchangeError::store("offer id collision"));
        }
        self.rows.insert(offer.id_typed(), offer);
        Ok(())
    }

    fn find_by_id(&self, id: OfferId) -> Option<ExchangeOffer> {
        self.rows.get(&id).cloned()
    }

    fn update(&mut self, offer: &ExchangeOffer) -> Result<(), ExchangeError> {
        let row = self
            .rows
            .get_mut(&offer.id_typed())
            .ok_or_else(|| ExchangeError::store("offer vanished mid-transaction"))?;
        *row = offer.clone();
        Ok(())
    }

    fn find_by_member(&self, member_id: MemberId, role: OfferRole) -> Vec<ExchangeOffer> {
        let mut offers: Vec<_> = self
            .rows
            .values()
            .filter(|offer| match role {
                OfferRole::Offering => offer.offering_member_id() == member_id,
                OfferRole::Receiving => offer.receiving_member_id() == member_id,
            })
            .cloned()
            .collect();
        offers.sort_by_key(|offer| std::cmp::Reverse(offer.created()));
        offers
    }

    fn find_pending_for_pair(&self, a: ItemId, b: ItemId) -> Option<ExchangeOffer> {
        self.rows
            .values()
            .find(|offer| offer.status() == OfferStatus::Pending && offer.pairs(a, b))
            .cloned()
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    items: ItemTable,
    members: MemberTable,
    offers: OfferTable,
}

impl StoreTx for Tables {
    fn items(&mut self) -> &mut dyn ItemRegistry {
        &mut self.items
    }

    fn members(&mut self) -> &mut dyn MemberDirectory {
        &mut self.members
    }

    fn offers(&mut self) -> &mut dyn OfferStore {
        &mut self.offers
    }
}

/// In-memory record store with serializable transactions.
///
/// One write lock covers all three tables for the duration of a
/// transaction, so each lifecycle operation's read-validate-write sequence
/// executes without interleaving. The closure runs against a scratch copy of
/// the tables that only replaces the live ones on `Ok`; an `Err` commits
/// nothing, and readers never observe a half-updated item pair.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a member record (profile CRUD lives outside the core).
    pub fn insert_member(&self, member: Member) -> Result<(), ExchangeError> {
        self.transaction(|tx| tx.members().insert(member).map_err(ExchangeError::from))
    }

    /// Seed an item record directly, bypassing the registration flow.
    pub fn insert_item(&self, item: ClothingItem) -> Result<(), ExchangeError> {
        self.transaction(|tx| tx.items().insert(item).map_err(ExchangeError::from))
    }

    /// Drop an item record. Test/dev counterpart of [`Self::insert_item`].
    pub fn remove_item(&self, id: ItemId) -> Result<(), ExchangeError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| ExchangeError::store("store lock poisoned"))?;
        tables.items.rows.remove(&id);
        Ok(())
    }

    /// Drop a member record. Test/dev counterpart of [`Self::insert_member`].
    pub fn remove_member(&self, id: MemberId) -> Result<(), ExchangeError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| ExchangeError::store("store lock poisoned"))?;
        tables.members.rows.remove(&id);
        Ok(())
    }

    /// Read one item outside any transaction (test/dev convenience).
    pub fn item(&self, id: ItemId) -> Option<ClothingItem> {
        self.tables.read().ok()?.items.find_by_id(id)
    }

    /// Read one offer outside any transaction (test/dev convenience).
    pub fn offer(&self, id: OfferId) -> Option<ExchangeOffer> {
        self.tables.read().ok()?.offers.find_by_id(id)
    }
}

impl ExchangeStore for InMemoryStore {
    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut dyn StoreTx) -> Result<T, ExchangeError>,
    ) -> Result<T, ExchangeError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| ExchangeError::store("store lock poisoned"))?;

        let mut scratch = tables.clone();
        let value = f(&mut scratch)?;
        *tables = scratch;

        Ok(value)
    }
}
