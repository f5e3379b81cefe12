//! Caller-facing error taxonomy of the offer lifecycle.

use thiserror::Error;

use threadswap_core::{DomainError, ItemId, MemberId, OfferId};

use crate::offer::{OfferAction, OfferStatus};

/// Everything an offer lifecycle operation can fail with.
///
/// Each variant is a terminal, user-displayable business failure scoped to
/// one request; none aborts the process. A failed operation commits nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// No actor identity was supplied with the call.
    #[error("you must be signed in to do this")]
    NotAuthenticated,

    /// The authenticated user has no member profile yet.
    #[error("no member profile found for your account")]
    MemberProfileMissing,

    /// One of the referenced items does not exist.
    #[error("clothing item not found: {0}")]
    ItemNotFound(ItemId),

    /// The referenced offer does not exist.
    #[error("exchange offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The actor is acting on an item or offer they are not entitled to.
    #[error("not authorized: {0}")]
    OwnershipViolation(String),

    /// An item is not in a state that permits the operation.
    #[error("item is no longer available for exchange: {0}")]
    ItemUnavailable(ItemId),

    /// A pending offer already pairs these two items (either direction).
    #[error("a pending offer already exists for these items")]
    DuplicateOffer,

    /// The offer is not in the status the requested action needs.
    ///
    /// Also the error a request loses a race with: the winner commits first
    /// and the loser re-reads a status its precondition no longer matches.
    #[error("cannot {action} an offer that is {status}")]
    InvalidStateTransition {
        action: OfferAction,
        status: OfferStatus,
    },

    /// A snapshot participant's member record vanished before completion.
    #[error("could not resolve the new owner: member {0} is missing")]
    OwnerResolutionFailure(MemberId),

    /// Malformed input (registration field rules, degenerate item pairs).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The record store failed (lock poisoning, backend fault).
    #[error("storage failure: {0}")]
    Store(String),
}

impl ExchangeError {
    pub fn ownership(msg: impl Into<String>) -> Self {
        Self::OwnershipViolation(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

impl From<DomainError> for ExchangeError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ExchangeError::Validation(msg),
            DomainError::InvariantViolation(msg) => ExchangeError::Validation(msg),
            DomainError::InvalidId(msg) => ExchangeError::Validation(msg),
            // A record the engine just read disappearing mid-transaction is a
            // store fault, not a business failure.
            DomainError::NotFound => ExchangeError::store("record vanished mid-transaction"),
            DomainError::Conflict(msg) => ExchangeError::Store(msg),
        }
    }
}
