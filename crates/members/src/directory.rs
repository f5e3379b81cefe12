//! Member lookup contract consumed by the exchange core.

use threadswap_core::{DomainError, MemberId, UserId};

use crate::member::Member;

/// Read-side directory of member profiles.
///
/// The exchange core resolves an authenticated identity to a member before
/// every lifecycle operation, and re-resolves both parties at completion
/// time. Implementations enforce no business rules.
pub trait MemberDirectory {
    /// Resolve an authenticated user to their member profile.
    fn member_by_user_id(&self, user_id: UserId) -> Option<Member>;

    /// Look up a member by its own identifier.
    fn member_by_id(&self, id: MemberId) -> Option<Member>;

    /// Insert a member record (seeding; profile CRUD is out of scope).
    fn insert(&mut self, member: Member) -> Result<(), DomainError>;
}
