use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadswap_core::{Entity, ItemId, MemberId, OfferId};

use crate::error::ExchangeError;

/// Exchange offer status lifecycle.
///
/// Pending → {Accepted, Rejected, Canceled}; Accepted → Completed.
/// Rejected, Canceled and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Canceled,
    Completed,
}

impl OfferStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OfferStatus::Rejected | OfferStatus::Canceled | OfferStatus::Completed
        )
    }

    /// Whether the offer still reserves its two items.
    pub fn holds_reservation(&self) -> bool {
        matches!(self, OfferStatus::Pending | OfferStatus::Accepted)
    }
}

impl core::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Canceled => "canceled",
            OfferStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// The closed set of lifecycle actions a party can take on an offer.
///
/// One variant per operation, each with its own role and status
/// precondition; no generic "is this allowed" string dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferAction {
    Accept,
    Reject,
    Cancel,
    Complete,
}

impl core::fmt::Display for OfferAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OfferAction::Accept => "accept",
            OfferAction::Reject => "reject",
            OfferAction::Cancel => "cancel",
            OfferAction::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// A proposed one-for-one swap between two items owned by two members.
///
/// The two member fields are **snapshots taken at creation time**. The
/// requested item's ownership can only change through this very workflow, so
/// in practice they stay accurate while the offer is open. Current ownership
/// is always re-read from the item registry, never inferred from these
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOffer {
    id: OfferId,
    offering_member_id: MemberId,
    receiving_member_id: MemberId,
    offered_item_id: ItemId,
    requested_item_id: ItemId,
    status: OfferStatus,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl ExchangeOffer {
    /// Open a new pending offer.
    ///
    /// Guards the record-level invariants only; ownership and availability
    /// preconditions belong to the engine, which sees the live items.
    pub fn open(
        id: OfferId,
        offering_member_id: MemberId,
        receiving_member_id: MemberId,
        offered_item_id: ItemId,
        requested_item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Self, ExchangeError> {
        if offered_item_id == requested_item_id {
            return Err(ExchangeError::validation(
                "an offer must reference two different items",
            ));
        }
        if offering_member_id == receiving_member_id {
            return Err(ExchangeError::validation(
                "an offer must involve two different members",
            ));
        }

        Ok(Self {
            id,
            offering_member_id,
            receiving_member_id,
            offered_item_id,
            requested_item_id,
            status: OfferStatus::Pending,
            created: now,
            updated: now,
        })
    }

    pub fn id_typed(&self) -> OfferId {
        self.id
    }

    pub fn offering_member_id(&self) -> MemberId {
        self.offering_member_id
    }

    pub fn receiving_member_id(&self) -> MemberId {
        self.receiving_member_id
    }

    pub fn offered_item_id(&self) -> ItemId {
        self.offered_item_id
    }

    pub fn requested_item_id(&self) -> ItemId {
        self.requested_item_id
    }

    pub fn status(&self) -> OfferStatus {
        self.status
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Both reserved item ids, offered first.
    pub fn item_ids(&self) -> [ItemId; 2] {
        [self.offered_item_id, self.requested_item_id]
    }

    /// Whether a member is one of the two snapshot participants.
    pub fn involves(&self, member_id: MemberId) -> bool {
        self.offering_member_id == member_id || self.receiving_member_id == member_id
    }

    /// Whether the unordered pair {a, b} matches this offer's items.
    pub fn pairs(&self, a: ItemId, b: ItemId) -> bool {
        (self.offered_item_id == a && self.requested_item_id == b)
            || (self.offered_item_id == b && self.requested_item_id == a)
    }

    fn ensure_status(&self, required: OfferStatus, action: OfferAction) -> Result<(), ExchangeError> {
        if self.status != required {
            return Err(ExchangeError::InvalidStateTransition {
                action,
                status: self.status,
            });
        }
        Ok(())
    }

    fn with_status(&self, status: OfferStatus, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.status = status;
        next.updated = now;
        next
    }

    /// Recipient accepts a pending offer.
    ///
    /// Does not mutate; returns the accepted copy for the store to persist.
    pub fn accept(&self, actor: MemberId, now: DateTime<Utc>) -> Result<Self, ExchangeError> {
        if self.receiving_member_id != actor {
            return Err(ExchangeError::ownership(
                "only the receiving member can accept this offer",
            ));
        }
        self.ensure_status(OfferStatus::Pending, OfferAction::Accept)?;
        Ok(self.with_status(OfferStatus::Accepted, now))
    }

    /// Recipient declines a pending offer.
    pub fn reject(&self, actor: MemberId, now: DateTime<Utc>) -> Result<Self, ExchangeError> {
        if self.receiving_member_id != actor {
            return Err(ExchangeError::ownership(
                "only the receiving member can reject this offer",
            ));
        }
        self.ensure_status(OfferStatus::Pending, OfferAction::Reject)?;
        Ok(self.with_status(OfferStatus::Rejected, now))
    }

    /// Initiator withdraws a pending offer.
    pub fn cancel(&self, actor: MemberId, now: DateTime<Utc>) -> Result<Self, ExchangeError> {
        if self.offering_member_id != actor {
            return Err(ExchangeError::ownership(
                "only the offering member can cancel this offer",
            ));
        }
        self.ensure_status(OfferStatus::Pending, OfferAction::Cancel)?;
        Ok(self.with_status(OfferStatus::Canceled, now))
    }

    /// Either party marks an accepted offer as carried out.
    pub fn complete(&self, actor: MemberId, now: DateTime<Utc>) -> Result<Self, ExchangeError> {
        if !self.involves(actor) {
            return Err(ExchangeError::ownership(
                "only a member involved in this offer can complete it",
            ));
        }
        self.ensure_status(OfferStatus::Accepted, OfferAction::Complete)?;
        Ok(self.with_status(OfferStatus::Completed, now))
    }
}

impl Entity for ExchangeOffer {
    type Id = OfferId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
