use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadswap_core::{DomainError, Entity, ItemId, MemberId};

/// Availability status of a clothing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Free to be offered or requested.
    Available,
    /// Reserved by a live offer.
    Unavailable,
    /// Swapped to a new owner; permanently out of circulation.
    Exchanged,
}

/// Descriptive fields supplied at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub size: String,
    pub condition: Option<String>,
    pub image_url: Option<String>,
}

/// A clothing item owned by a member.
///
/// Ownership changes only as a side effect of a completed offer; status
/// changes only through the registry primitives below, driven by the
/// exchange engine (plus the initial `Available` at registration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    id: ItemId,
    owner_id: MemberId,
    name: String,
    category: String,
    size: String,
    condition: Option<String>,
    image_url: Option<String>,
    status: ItemStatus,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl ClothingItem {
    /// Register a new item for `owner_id`, validating the descriptive fields.
    ///
    /// Field rules match the registration form: name 3–50 characters after
    /// trimming, category and size non-empty. New items start `Available`.
    pub fn register(
        id: ItemId,
        owner_id: MemberId,
        draft: ItemDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = draft.name.trim().to_string();
        if name.len() < 3 {
            return Err(DomainError::validation("name must be at least 3 characters"));
        }
        if name.len() > 50 {
            return Err(DomainError::validation("name cannot exceed 50 characters"));
        }
        if draft.category.trim().is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if draft.size.trim().is_empty() {
            return Err(DomainError::validation("size is required"));
        }

        Ok(Self {
            id,
            owner_id,
            name,
            category: draft.category,
            size: draft.size,
            condition: draft.condition,
            image_url: draft.image_url,
            status: ItemStatus::Available,
            created: now,
            updated: now,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn owner_id(&self) -> MemberId {
        self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Whether the item can enter a new offer.
    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }

    /// Registry primitive: overwrite the availability status.
    ///
    /// Callers go through the exchange engine; this performs no precondition
    /// checks of its own.
    pub fn set_status(&mut self, status: ItemStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated = now;
    }

    /// Registry primitive: hand the item to a new owner with a new status.
    pub fn transfer(&mut self, new_owner: MemberId, status: ItemStatus, now: DateTime<Utc>) {
        self.owner_id = new_owner;
        self.status = status;
        self.updated = now;
    }
}

impl Entity for ClothingItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            category: "Jacket".to_string(),
            size: "M".to_string(),
            condition: Some("Like new".to_string()),
            image_url: None,
        }
    }

    #[test]
    fn register_starts_available_and_owned() {
        let owner = MemberId::new();
        let item =
            ClothingItem::register(ItemId::new(), owner, draft("Denim jacket"), test_time())
                .unwrap();

        assert_eq!(item.owner_id(), owner);
        assert_eq!(item.status(), ItemStatus::Available);
        assert!(item.is_available());
        assert_eq!(item.name(), "Denim jacket");
    }

    #[test]
    fn register_trims_and_rejects_short_name() {
        let err = ClothingItem::register(
            ItemId::new(),
            MemberId::new(),
            draft("  ab  "),
            test_time(),
        )
        .unwrap_err();

        match err {
            DomainError::Validation(msg) => assert!(msg.contains("at least 3")),
            _ => panic!("Expected Validation error for short name"),
        }
    }

    #[test]
    fn register_rejects_oversized_name() {
        let long = "x".repeat(51);
        let err =
            ClothingItem::register(ItemId::new(), MemberId::new(), draft(&long), test_time())
                .unwrap_err();

        match err {
            DomainError::Validation(msg) => assert!(msg.contains("50")),
            _ => panic!("Expected Validation error for oversized name"),
        }
    }

    #[test]
    fn register_rejects_blank_category_and_size() {
        let mut no_category = draft("Denim jacket");
        no_category.category = "  ".to_string();
        assert!(matches!(
            ClothingItem::register(ItemId::new(), MemberId::new(), no_category, test_time()),
            Err(DomainError::Validation(_))
        ));

        let mut no_size = draft("Denim jacket");
        no_size.size = String::new();
        assert!(matches!(
            ClothingItem::register(ItemId::new(), MemberId::new(), no_size, test_time()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn set_status_moves_through_reservation_states() {
        let mut item =
            ClothingItem::register(ItemId::new(), MemberId::new(), draft("Denim jacket"), test_time())
                .unwrap();

        item.set_status(ItemStatus::Unavailable, test_time());
        assert_eq!(item.status(), ItemStatus::Unavailable);
        assert!(!item.is_available());

        item.set_status(ItemStatus::Available, test_time());
        assert!(item.is_available());
    }

    #[test]
    fn transfer_changes_owner_and_status_together() {
        let first_owner = MemberId::new();
        let mut item =
            ClothingItem::register(ItemId::new(), first_owner, draft("Denim jacket"), test_time())
                .unwrap();

        let new_owner = MemberId::new();
        item.transfer(new_owner, ItemStatus::Exchanged, test_time());

        assert_eq!(item.owner_id(), new_owner);
        assert_eq!(item.status(), ItemStatus::Exchanged);
    }
}
