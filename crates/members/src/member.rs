use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadswap_core::{DomainError, Entity, MemberId, UserId};

/// A member profile.
///
/// One-to-one with an authenticated user (`user_id`). Offers snapshot member
/// identities at creation time; item ownership points at members directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    user_id: UserId,
    name: String,
    city: String,
    country: String,
    image: Option<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Member {
    /// Build a member profile record.
    ///
    /// The directory is read-only from the exchange core's perspective; this
    /// constructor exists for seeding and for the registration flow that
    /// lives outside the core.
    pub fn new(
        id: MemberId,
        user_id: UserId,
        name: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        image: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id,
            user_id,
            name,
            city: city.into(),
            country: country.into(),
            image,
            created: now,
            updated: now,
        })
    }

    pub fn id_typed(&self) -> MemberId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Record member activity (bumps `updated`).
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated = now;
    }
}

impl Entity for Member {
    type Id = MemberId;

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

    #[test]
    fn new_member_carries_profile_fields() {
        let id = MemberId::new();
        let user_id = UserId::new();
        let member = Member::new(
            id,
            user_id,
            "Lisa",
            "Lisbon",
            "Portugal",
            Some("lisa.png".to_string()),
            test_time(),
        )
        .unwrap();

        assert_eq!(member.id_typed(), id);
        assert_eq!(member.user_id(), user_id);
        assert_eq!(member.name(), "Lisa");
        assert_eq!(member.city(), "Lisbon");
        assert_eq!(member.country(), "Portugal");
        assert_eq!(member.image(), Some("lisa.png"));
        assert_eq!(member.created(), member.updated());
    }

    #[test]
    fn new_member_rejects_blank_name() {
        let err = Member::new(
            MemberId::new(),
            UserId::new(),
            "   ",
            "Lisbon",
            "Portugal",
            None,
            test_time(),
        )
        .unwrap_err();

        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank name"),
        }
    }

    #[test]
    fn touch_bumps_updated_only() {
        let created = test_time();
        let mut member = Member::new(
            MemberId::new(),
            UserId::new(),
            "Lisa",
            "Lisbon",
            "Portugal",
            None,
            created,
        )
        .unwrap();

        let later = created + chrono::Duration::seconds(30);
        member.touch(later);

        assert_eq!(member.created(), created);
        assert_eq!(member.updated(), later);
    }
}
