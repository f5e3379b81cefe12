//! Property tests: no interleaving of lifecycle actions may break the
//! offer/item consistency invariants or escape the state diagram.

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;

use threadswap_core::{ItemId, MemberId, UserId};
use threadswap_events::InMemoryEventBus;
use threadswap_exchange::{ExchangeService, OfferEvent, OfferStatus};
use threadswap_infra::InMemoryStore;
use threadswap_items::{ClothingItem, ItemDraft, ItemStatus};
use threadswap_members::Member;

type Service = ExchangeService<Arc<InMemoryStore>, Arc<InMemoryEventBus<OfferEvent>>>;

#[derive(Debug, Clone, Copy)]
enum Actor {
    Offering,
    Receiving,
    Outsider,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Accept,
    Reject,
    Cancel,
    Complete,
}

fn actor_strategy() -> impl Strategy<Value = Actor> {
    prop_oneof![
        Just(Actor::Offering),
        Just(Actor::Receiving),
        Just(Actor::Outsider),
    ]
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Accept),
        Just(Action::Reject),
        Just(Action::Cancel),
        Just(Action::Complete),
    ]
}

struct World {
    store: Arc<InMemoryStore>,
    service: Service,
    offering_user: UserId,
    offering_member: MemberId,
    receiving_user: UserId,
    receiving_member: MemberId,
    outsider_user: UserId,
    offered_item: ItemId,
    requested_item: ItemId,
}

fn seed_member(store: &InMemoryStore, name: &str) -> (UserId, MemberId) {
    let user_id = UserId::new();
    let member_id = MemberId::new();
    let member = Member::new(
        member_id,
        user_id,
        name,
        "Porto",
        "Portugal",
        None,
        Utc::now(),
    )
    .unwrap();
    store.insert_member(member).unwrap();
    (user_id, member_id)
}

fn seed_item(store: &InMemoryStore, owner: MemberId, name: &str) -> ItemId {
    let item = ClothingItem::register(
        ItemId::new(),
        owner,
        ItemDraft {
            name: name.to_string(),
            category: "Jacket".to_string(),
            size: "M".to_string(),
            condition: None,
            image_url: None,
        },
        Utc::now(),
    )
    .unwrap();
    let id = item.id_typed();
    store.insert_item(item).unwrap();
    id
}

fn world() -> World {
    let store = Arc::new(InMemoryStore::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let service = ExchangeService::new(store.clone(), bus);

    let (offering_user, offering_member) = seed_member(&store, "Anna");
    let (receiving_user, receiving_member) = seed_member(&store, "Ben");
    let (outsider_user, _) = seed_member(&store, "Carla");
    let offered_item = seed_item(&store, offering_member, "Denim jacket");
    let requested_item = seed_item(&store, receiving_member, "Wool coat");

    World {
        store,
        service,
        offering_user,
        offering_member,
        receiving_user,
        receiving_member,
        outsider_user,
        offered_item,
        requested_item,
    }
}

fn transition_is_legal(prev: OfferStatus, next: OfferStatus) -> bool {
    if prev == next {
        return true;
    }
    matches!(
        (prev, next),
        (
            OfferStatus::Pending,
            OfferStatus::Accepted | OfferStatus::Rejected | OfferStatus::Canceled
        ) | (OfferStatus::Accepted, OfferStatus::Completed)
    )
}

fn assert_consistent(w: &World, status: OfferStatus) {
    let offered = w.store.item(w.offered_item).unwrap();
    let requested = w.store.item(w.requested_item).unwrap();

    match status {
        OfferStatus::Pending | OfferStatus::Accepted => {
            assert_eq!(offered.status(), ItemStatus::Unavailable);
            assert_eq!(requested.status(), ItemStatus::Unavailable);
            assert_eq!(offered.owner_id(), w.offering_member);
            assert_eq!(requested.owner_id(), w.receiving_member);
        }
        OfferStatus::Rejected | OfferStatus::Canceled => {
            assert_eq!(offered.status(), ItemStatus::Available);
            assert_eq!(requested.status(), ItemStatus::Available);
            assert_eq!(offered.owner_id(), w.offering_member);
            assert_eq!(requested.owner_id(), w.receiving_member);
        }
        OfferStatus::Completed => {
            assert_eq!(offered.status(), ItemStatus::Exchanged);
            assert_eq!(requested.status(), ItemStatus::Exchanged);
            assert_eq!(offered.owner_id(), w.receiving_member);
            assert_eq!(requested.owner_id(), w.offering_member);
        }
    }
}

proptest! {
    #[test]
    fn lifecycle_actions_preserve_invariants(
        steps in proptest::collection::vec((action_strategy(), actor_strategy()), 0..12)
    ) {
        let w = world();

        let offer_id = w
            .service
            .initiate_offer(w.offered_item, w.requested_item, Some(w.offering_user))
            .unwrap()
            .offer
            .id_typed();

        let mut prev = OfferStatus::Pending;
        assert_consistent(&w, prev);

        for (action, actor) in steps {
            let user = match actor {
                Actor::Offering => w.offering_user,
                Actor::Receiving => w.receiving_user,
                Actor::Outsider => w.outsider_user,
            };

            // Failures are expected constantly; the point is that neither
            // success nor failure may leave the records inconsistent.
            let _ = match action {
                Action::Accept => w.service.accept_offer(offer_id, Some(user)),
                Action::Reject => w.service.reject_offer(offer_id, Some(user)),
                Action::Cancel => w.service.cancel_offer(offer_id, Some(user)),
                Action::Complete => w.service.complete_offer(offer_id, Some(user)),
            };

            let status = w.store.offer(offer_id).unwrap().status();
            prop_assert!(
                transition_is_legal(prev, status),
                "illegal transition {} -> {}",
                prev,
                status
            );
            if prev.is_terminal() {
                prop_assert_eq!(prev, status, "terminal state was left");
            }
            assert_consistent(&w, status);
            prev = status;
        }
    }
}
