//! Outbound offer events.
//!
//! Published by the engine strictly after a lifecycle transition commits.
//! Offer creation deliberately emits nothing; the counterparty learns about
//! it when they list their received offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadswap_core::{ItemId, MemberId, OfferId};
use threadswap_events::Event;

use crate::offer::{ExchangeOffer, OfferStatus};

/// Event: OfferAccepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferAccepted {
    pub offer_id: OfferId,
    pub offering_member_id: MemberId,
    pub receiving_member_id: MemberId,
    pub offered_item_id: ItemId,
    pub requested_item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OfferRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRejected {
    pub offer_id: OfferId,
    pub offering_member_id: MemberId,
    pub receiving_member_id: MemberId,
    pub offered_item_id: ItemId,
    pub requested_item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OfferCanceled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCanceled {
    pub offer_id: OfferId,
    pub offering_member_id: MemberId,
    pub receiving_member_id: MemberId,
    pub offered_item_id: ItemId,
    pub requested_item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OfferCompleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCompleted {
    pub offer_id: OfferId,
    pub offering_member_id: MemberId,
    pub receiving_member_id: MemberId,
    pub offered_item_id: ItemId,
    pub requested_item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferEvent {
    OfferAccepted(OfferAccepted),
    OfferRejected(OfferRejected),
    OfferCanceled(OfferCanceled),
    OfferCompleted(OfferCompleted),
}

impl OfferEvent {
    /// Build the event matching an offer's freshly committed status.
    ///
    /// Returns `None` for `Pending`; creation is not announced.
    pub fn for_committed(offer: &ExchangeOffer, occurred_at: DateTime<Utc>) -> Option<Self> {
        let offer_id = offer.id_typed();
        let offering_member_id = offer.offering_member_id();
        let receiving_member_id = offer.receiving_member_id();
        let offered_item_id = offer.offered_item_id();
        let requested_item_id = offer.requested_item_id();

        match offer.status() {
            OfferStatus::Pending => None,
            OfferStatus::Accepted => Some(OfferEvent::OfferAccepted(OfferAccepted {
                offer_id,
                offering_member_id,
                receiving_member_id,
                offered_item_id,
                requested_item_id,
                occurred_at,
            })),
            OfferStatus::Rejected => Some(OfferEvent::OfferRejected(OfferRejected {
                offer_id,
                offering_member_id,
                receiving_member_id,
                offered_item_id,
                requested_item_id,
                occurred_at,
            })),
            OfferStatus::Canceled => Some(OfferEvent::OfferCanceled(OfferCanceled {
                offer_id,
                offering_member_id,
                receiving_member_id,
                offered_item_id,
                requested_item_id,
                occurred_at,
            })),
            OfferStatus::Completed => Some(OfferEvent::OfferCompleted(OfferCompleted {
                offer_id,
                offering_member_id,
                receiving_member_id,
                offered_item_id,
                requested_item_id,
                occurred_at,
            })),
        }
    }

    pub fn offer_id(&self) -> OfferId {
        match self {
            OfferEvent::OfferAccepted(e) => e.offer_id,
            OfferEvent::OfferRejected(e) => e.offer_id,
            OfferEvent::OfferCanceled(e) => e.offer_id,
            OfferEvent::OfferCompleted(e) => e.offer_id,
        }
    }
}

impl Event for OfferEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OfferEvent::OfferAccepted(_) => "exchange.offer.accepted",
            OfferEvent::OfferRejected(_) => "exchange.offer.rejected",
            OfferEvent::OfferCanceled(_) => "exchange.offer.canceled",
            OfferEvent::OfferCompleted(_) => "exchange.offer.completed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OfferEvent::OfferAccepted(e) => e.occurred_at,
            OfferEvent::OfferRejected(e) => e.occurred_at,
            OfferEvent::OfferCanceled(e) => e.occurred_at,
            OfferEvent::OfferCompleted(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> ExchangeOffer {
        ExchangeOffer::open(
            OfferId::new(),
            MemberId::new(),
            MemberId::new(),
            ItemId::new(),
            ItemId::new(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn pending_offers_emit_nothing() {
        assert!(OfferEvent::for_committed(&pending(), Utc::now()).is_none());
    }

    #[test]
    fn committed_transitions_map_to_event_types() {
        let offer = pending();
        let now = Utc::now();
        let accepted = offer.accept(offer.receiving_member_id(), now).unwrap();

        let ev = OfferEvent::for_committed(&accepted, now).unwrap();
        assert_eq!(ev.event_type(), "exchange.offer.accepted");
        assert_eq!(ev.offer_id(), offer.id_typed());
        assert_eq!(ev.occurred_at(), now);

        let completed = accepted
            .complete(offer.offering_member_id(), now)
            .unwrap();
        let ev = OfferEvent::for_committed(&completed, now).unwrap();
        assert_eq!(ev.event_type(), "exchange.offer.completed");

        let rejected = offer.reject(offer.receiving_member_id(), now).unwrap();
        let ev = OfferEvent::for_committed(&rejected, now).unwrap();
        assert_eq!(ev.event_type(), "exchange.offer.rejected");

        let canceled = offer.cancel(offer.offering_member_id(), now).unwrap();
        let ev = OfferEvent::for_committed(&canceled, now).unwrap();
        assert_eq!(ev.event_type(), "exchange.offer.canceled");
    }
}
