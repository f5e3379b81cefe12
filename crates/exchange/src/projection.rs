//! Read-side projections returned by the engine.
//!
//! Lifecycle operations and queries hand back the offer hydrated with item
//! and member summaries, so the delivery layer never has to chase ids.

use serde::{Deserialize, Serialize};

use threadswap_core::{ItemId, MemberId, UserId};
use threadswap_items::{ClothingItem, ItemStatus};
use threadswap_members::Member;

use crate::offer::ExchangeOffer;

/// Item fields shown on offer lists and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub image_url: Option<String>,
    pub status: ItemStatus,
}

impl From<&ClothingItem> for ItemSummary {
    fn from(item: &ClothingItem) -> Self {
        Self {
            id: item.id_typed(),
            name: item.name().to_string(),
            image_url: item.image_url().map(str::to_string),
            status: item.status(),
        }
    }
}

/// Member fields shown alongside an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: MemberId,
    pub user_id: UserId,
    pub name: String,
    pub city: String,
    pub country: String,
    pub image: Option<String>,
}

impl From<&Member> for MemberSummary {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id_typed(),
            user_id: member.user_id(),
            name: member.name().to_string(),
            city: member.city().to_string(),
            country: member.country().to_string(),
            image: member.image().map(str::to_string),
        }
    }
}

/// An offer hydrated with both item and both member summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferProjection {
    pub offer: ExchangeOffer,
    pub offered_item: ItemSummary,
    pub requested_item: ItemSummary,
    pub offering_member: MemberSummary,
    pub receiving_member: MemberSummary,
}

/// A member's offers split by the role they play in them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentAndReceived {
    pub sent: Vec<OfferProjection>,
    pub received: Vec<OfferProjection>,
}

impl SentAndReceived {
    pub fn total_sent(&self) -> usize {
        self.sent.len()
    }

    pub fn total_received(&self) -> usize {
        self.received.len()
    }
}
