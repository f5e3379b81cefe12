//! Offer lifecycle engine.
//!
//! One public method per workflow step; multi-step flows (create → accept →
//! complete) are always separate calls and the engine holds no state between
//! them. Every method resolves the acting member, runs the full
//! read-validate-write sequence inside a single store transaction, and only
//! then announces the transition on the event bus.

use chrono::Utc;
use tracing::{info, warn};

use threadswap_core::{ItemId, MemberId, OfferId, UserId};
use threadswap_events::{Event, EventBus};
use threadswap_items::{ClothingItem, ItemDraft, ItemStatus};
use threadswap_members::Member;

use crate::error::ExchangeError;
use crate::event::OfferEvent;
use crate::offer::ExchangeOffer;
use crate::projection::{ItemSummary, MemberSummary, OfferProjection, SentAndReceived};
use crate::store::{ExchangeStore, OfferRole, StoreTx};

/// The offer lifecycle engine.
///
/// Generic over the transactional record store and the outbound event bus so
/// tests run against in-memory implementations and a real backend can slot in
/// without touching the workflow.
#[derive(Debug)]
pub struct ExchangeService<S, B> {
    store: S,
    bus: B,
}

impl<S, B> ExchangeService<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self { store, bus }
    }

    pub fn into_parts(self) -> (S, B) {
        (self.store, self.bus)
    }
}

impl<S, B> ExchangeService<S, B>
where
    S: ExchangeStore,
    B: EventBus<OfferEvent>,
{
    /// Open a new offer: `actor` offers their `offered_item_id` against
    /// another member's `requested_item_id`.
    ///
    /// Both items are reserved (`Unavailable`) the instant the offer is
    /// created, not on acceptance: an item can only ever be promised to one
    /// live negotiation.
    pub fn initiate_offer(
        &self,
        offered_item_id: ItemId,
        requested_item_id: ItemId,
        actor: Option<UserId>,
    ) -> Result<OfferProjection, ExchangeError> {
        let now = Utc::now();

        let projection = self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;

            if offered_item_id == requested_item_id {
                return Err(ExchangeError::validation(
                    "an offer must reference two different items",
                ));
            }

            let offered = find_item(tx, offered_item_id)?;
            let requested = find_item(tx, requested_item_id)?;

            if offered.owner_id() != member.id_typed() {
                return Err(ExchangeError::ownership(
                    "the item you are offering is not in your inventory",
                ));
            }
            if requested.owner_id() == member.id_typed() {
                return Err(ExchangeError::ownership(
                    "you cannot request an item you already own",
                ));
            }
            // The pair check runs before the availability check so a
            // counter-offer over the same two items reads as the duplicate it
            // is, not as a reservation conflict.
            if tx
                .offers()
                .find_pending_for_pair(offered_item_id, requested_item_id)
                .is_some()
            {
                return Err(ExchangeError::DuplicateOffer);
            }
            if !offered.is_available() {
                return Err(ExchangeError::ItemUnavailable(offered_item_id));
            }
            if !requested.is_available() {
                return Err(ExchangeError::ItemUnavailable(requested_item_id));
            }

            let offer = ExchangeOffer::open(
                OfferId::new(),
                member.id_typed(),
                requested.owner_id(),
                offered_item_id,
                requested_item_id,
                now,
            )?;

            tx.offers().create(offer.clone())?;
            tx.items()
                .update_status_batch(&offer.item_ids(), ItemStatus::Unavailable)?;

            project(tx, &offer)
        })?;

        info!(
            offer_id = %projection.offer.id_typed(),
            offered_item = %offered_item_id,
            requested_item = %requested_item_id,
            "exchange offer initiated"
        );

        Ok(projection)
    }

    /// Recipient accepts a pending offer.
    ///
    /// The item re-check here is deliberately tolerant: `Available` as well
    /// as the expected `Unavailable` pass (initiation already reserved both,
    /// so this is a defensive re-check, not a new reservation); only
    /// `Exchanged` fails. Both items are then forced `Unavailable` again,
    /// an idempotent re-assertion.
    pub fn accept_offer(
        &self,
        offer_id: OfferId,
        actor: Option<UserId>,
    ) -> Result<OfferProjection, ExchangeError> {
        let now = Utc::now();

        let (projection, event) = self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;
            let offer = find_offer(tx, offer_id)?;
            let updated = offer.accept(member.id_typed(), now)?;

            for item_id in updated.item_ids() {
                let item = find_item(tx, item_id)?;
                if item.status() == ItemStatus::Exchanged {
                    return Err(ExchangeError::ItemUnavailable(item_id));
                }
            }

            tx.offers().update(&updated)?;
            tx.items()
                .update_status_batch(&updated.item_ids(), ItemStatus::Unavailable)?;

            let projection = project(tx, &updated)?;
            Ok((projection, OfferEvent::for_committed(&updated, now)))
        })?;

        info!(offer_id = %offer_id, "exchange offer accepted");
        self.announce(event);

        Ok(projection)
    }

    /// Recipient declines a pending offer; both items are released.
    pub fn reject_offer(
        &self,
        offer_id: OfferId,
        actor: Option<UserId>,
    ) -> Result<OfferProjection, ExchangeError> {
        let now = Utc::now();

        let (projection, event) = self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;
            let offer = find_offer(tx, offer_id)?;
            let updated = offer.reject(member.id_typed(), now)?;

            tx.offers().update(&updated)?;
            tx.items()
                .update_status_batch(&updated.item_ids(), ItemStatus::Available)?;

            let projection = project(tx, &updated)?;
            Ok((projection, OfferEvent::for_committed(&updated, now)))
        })?;

        info!(offer_id = %offer_id, "exchange offer rejected");
        self.announce(event);

        Ok(projection)
    }

    /// Initiator withdraws a pending offer; both items are released.
    pub fn cancel_offer(
        &self,
        offer_id: OfferId,
        actor: Option<UserId>,
    ) -> Result<OfferProjection, ExchangeError> {
        let now = Utc::now();

        let (projection, event) = self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;
            let offer = find_offer(tx, offer_id)?;
            let updated = offer.cancel(member.id_typed(), now)?;

            tx.offers().update(&updated)?;
            tx.items()
                .update_status_batch(&updated.item_ids(), ItemStatus::Available)?;

            let projection = project(tx, &updated)?;
            Ok((projection, OfferEvent::for_committed(&updated, now)))
        })?;

        info!(offer_id = %offer_id, "exchange offer canceled");
        self.announce(event);

        Ok(projection)
    }

    /// Either party marks an accepted offer as carried out: the ownership
    /// swap.
    ///
    /// The offered item goes to the receiving member, the requested item to
    /// the offering member, both retired as `Exchanged`. The two member
    /// records are re-resolved from the directory first: the offer's member
    /// fields are creation-time snapshots, and a swap must not proceed
    /// against a vanished profile.
    pub fn complete_offer(
        &self,
        offer_id: OfferId,
        actor: Option<UserId>,
    ) -> Result<OfferProjection, ExchangeError> {
        let now = Utc::now();

        let (projection, event) = self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;
            let offer = find_offer(tx, offer_id)?;
            let updated = offer.complete(member.id_typed(), now)?;

            let receiving = tx
                .members()
                .member_by_id(updated.receiving_member_id())
                .ok_or(ExchangeError::OwnerResolutionFailure(
                    updated.receiving_member_id(),
                ))?;
            let offering = tx
                .members()
                .member_by_id(updated.offering_member_id())
                .ok_or(ExchangeError::OwnerResolutionFailure(
                    updated.offering_member_id(),
                ))?;

            tx.items().transfer_ownership_and_status(
                updated.offered_item_id(),
                receiving.id_typed(),
                ItemStatus::Exchanged,
            )?;
            tx.items().transfer_ownership_and_status(
                updated.requested_item_id(),
                offering.id_typed(),
                ItemStatus::Exchanged,
            )?;
            tx.offers().update(&updated)?;

            let projection = project(tx, &updated)?;
            Ok((projection, OfferEvent::for_committed(&updated, now)))
        })?;

        info!(offer_id = %offer_id, "exchange offer completed");
        self.announce(event);

        Ok(projection)
    }

    /// Register a new clothing item for the acting member.
    pub fn register_item(
        &self,
        draft: ItemDraft,
        actor: Option<UserId>,
    ) -> Result<ClothingItem, ExchangeError> {
        let now = Utc::now();

        let item = self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;
            let item = ClothingItem::register(ItemId::new(), member.id_typed(), draft, now)?;
            tx.items().insert(item.clone())?;
            Ok(item)
        })?;

        info!(item_id = %item.id_typed(), "clothing item registered");

        Ok(item)
    }

    /// All items currently owned by the acting member.
    pub fn inventory(&self, actor: Option<UserId>) -> Result<Vec<ClothingItem>, ExchangeError> {
        self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;
            Ok(tx.items().find_by_owner(member.id_typed()))
        })
    }

    /// The acting member's offers, split into sent and received, newest
    /// first.
    pub fn offers_for_member(
        &self,
        actor: Option<UserId>,
    ) -> Result<SentAndReceived, ExchangeError> {
        self.store.transaction(|tx| {
            let member = resolve_actor(tx, actor)?;

            let sent = tx
                .offers()
                .find_by_member(member.id_typed(), OfferRole::Offering);
            let received = tx
                .offers()
                .find_by_member(member.id_typed(), OfferRole::Receiving);

            Ok(SentAndReceived {
                sent: hydrate_all(tx, sent)?,
                received: hydrate_all(tx, received)?,
            })
        })
    }

    /// A single offer, fully hydrated.
    pub fn offer_details(&self, offer_id: OfferId) -> Result<OfferProjection, ExchangeError> {
        self.store.transaction(|tx| {
            let offer = find_offer(tx, offer_id)?;
            project(tx, &offer)
        })
    }

    /// Fire-and-forget notification publish; a lost event never fails the
    /// already committed operation.
    fn announce(&self, event: Option<OfferEvent>) {
        let Some(event) = event else { return };
        if let Err(err) = self.bus.publish(event.clone()) {
            warn!(
                event_type = event.event_type(),
                offer_id = %event.offer_id(),
                error = ?err,
                "offer notification dropped"
            );
        }
    }
}

fn resolve_actor(tx: &mut dyn StoreTx, actor: Option<UserId>) -> Result<Member, ExchangeError> {
    let user_id = actor.ok_or(ExchangeError::NotAuthenticated)?;
    tx.members()
        .member_by_user_id(user_id)
        .ok_or(ExchangeError::MemberProfileMissing)
}

fn find_item(tx: &mut dyn StoreTx, id: ItemId) -> Result<ClothingItem, ExchangeError> {
    tx.items()
        .find_by_id(id)
        .ok_or(ExchangeError::ItemNotFound(id))
}

fn find_offer(tx: &mut dyn StoreTx, id: OfferId) -> Result<ExchangeOffer, ExchangeError> {
    tx.offers()
        .find_by_id(id)
        .ok_or(ExchangeError::OfferNotFound(id))
}

fn find_member_summary(
    tx: &mut dyn StoreTx,
    id: MemberId,
) -> Result<MemberSummary, ExchangeError> {
    let member = tx
        .members()
        .member_by_id(id)
        .ok_or_else(|| ExchangeError::store(format!("offer references missing member {id}")))?;
    Ok(MemberSummary::from(&member))
}

/// Hydrate an offer with its item and member summaries.
fn project(tx: &mut dyn StoreTx, offer: &ExchangeOffer) -> Result<OfferProjection, ExchangeError> {
    let offered_item = ItemSummary::from(&find_item(tx, offer.offered_item_id())?);
    let requested_item = ItemSummary::from(&find_item(tx, offer.requested_item_id())?);
    let offering_member = find_member_summary(tx, offer.offering_member_id())?;
    let receiving_member = find_member_summary(tx, offer.receiving_member_id())?;

    Ok(OfferProjection {
        offer: offer.clone(),
        offered_item,
        requested_item,
        offering_member,
        receiving_member,
    })
}

fn hydrate_all(
    tx: &mut dyn StoreTx,
    offers: Vec<ExchangeOffer>,
) -> Result<Vec<OfferProjection>, ExchangeError> {
    offers.iter().map(|offer| project(tx, offer)).collect()
}
