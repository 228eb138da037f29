//! # Error Types
//!
//! All precondition-violation and not-found conditions of the peer-help
//! ledger. Every error is terminal for its call: no partial effects, no
//! silent recovery.

use crate::domain::value_objects::{AccountId, MatchId, OfferId, RequestId};
use thiserror::Error;

/// Errors returned by peer-help operations.
///
/// Precondition violations name the caller/state mismatch; not-found
/// variants name the missing entity. None are retried by the core; the
/// idempotence flags (`reward_claimed`, `mentor_addresses`, voter sets)
/// exist so blind client-side retries are safe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeerHelpError {
    // -------------------------------------------------------------------------
    // Profile preconditions
    // -------------------------------------------------------------------------
    /// The caller must create a profile before this operation.
    #[error("no profile exists for caller {0}")]
    ProfileRequired(AccountId),

    /// At most one profile per identity.
    #[error("profile already exists for {0}")]
    ProfileAlreadyExists(AccountId),

    /// The identity provider has no verified handle for the caller.
    #[error("identity not verified for {0}")]
    IdentityUnverified(AccountId),

    // -------------------------------------------------------------------------
    // Request lifecycle preconditions
    // -------------------------------------------------------------------------
    /// The request is no longer accepting this operation.
    #[error("request {0} is not open")]
    RequestNotOpen(RequestId),

    /// The request has not been matched yet.
    #[error("request {0} is not matched")]
    RequestNotMatched(RequestId),

    /// Difficulty votes must be within 1-5.
    #[error("invalid difficulty vote {vote}, expected 1-5")]
    InvalidVote {
        /// The rejected vote value.
        vote: u8,
    },

    /// A requester cannot vote on their own request's difficulty.
    #[error("requester cannot vote on own request {0}")]
    SelfVoteForbidden(RequestId),

    /// Each identity votes at most once per request.
    #[error("{voter} already voted on request {request_id}")]
    AlreadyVoted {
        /// The repeat voter.
        voter: AccountId,
        /// The request already voted on.
        request_id: RequestId,
    },

    // -------------------------------------------------------------------------
    // Offer preconditions
    // -------------------------------------------------------------------------
    /// A requester cannot offer help on their own request.
    #[error("requester cannot offer on own request {0}")]
    SelfOfferForbidden(RequestId),

    /// Exactly one offer per (request, mentor) pair.
    #[error("{mentor} already offered on request {request_id}")]
    DuplicateOffer {
        /// The mentor with an existing offer.
        mentor: AccountId,
        /// The request offered on.
        request_id: RequestId,
    },

    /// Only the requester may decide on offers.
    #[error("caller {caller} does not own request {request_id}")]
    NotRequestOwner {
        /// The unauthorized caller.
        caller: AccountId,
        /// The request in question.
        request_id: RequestId,
    },

    /// The offer has already been decided.
    #[error("offer {0} is not pending")]
    OfferNotPending(OfferId),

    // -------------------------------------------------------------------------
    // Completion preconditions
    // -------------------------------------------------------------------------
    /// Only the match's mentee may confirm or reject completion.
    #[error("caller {caller} is not the mentee of match {match_id}")]
    NotMentee {
        /// The unauthorized caller.
        caller: AccountId,
        /// The match in question.
        match_id: MatchId,
    },

    /// The match already reached its terminal state.
    #[error("match {0} is already completed")]
    AlreadyCompleted(MatchId),

    // -------------------------------------------------------------------------
    // Reward preconditions
    // -------------------------------------------------------------------------
    /// Only the match's mentor may claim the reward.
    #[error("caller {caller} is not the mentor of match {match_id}")]
    NotMentor {
        /// The unauthorized caller.
        caller: AccountId,
        /// The match in question.
        match_id: MatchId,
    },

    /// The reward for this request was already paid out.
    #[error("reward for request {0} already claimed")]
    AlreadyClaimed(RequestId),

    /// The match must be completed before the reward can be claimed.
    #[error("match {0} is not completed")]
    MatchNotCompleted(MatchId),

    /// The mentee never confirmed a successful completion.
    #[error("mentee has not confirmed completion of match {0}")]
    MenteeNotConfirmed(MatchId),

    // -------------------------------------------------------------------------
    // Input validation
    // -------------------------------------------------------------------------
    /// A typed argument failed validation.
    #[error("validation failed for {field}: {reason}")]
    ValidationError {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Not-found conditions
    // -------------------------------------------------------------------------
    /// No profile exists for the given identity.
    #[error("profile not found for {0}")]
    ProfileNotFound(AccountId),

    /// No request exists with the given id.
    #[error("request {0} not found")]
    RequestNotFound(RequestId),

    /// No offer exists with the given id.
    #[error("offer {0} not found")]
    OfferNotFound(OfferId),

    /// No match record exists with the given id.
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
}

impl PeerHelpError {
    /// Returns true for not-found conditions (a referenced entity id does
    /// not exist), as opposed to precondition violations on live entities.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound(_)
                | Self::RequestNotFound(_)
                | Self::OfferNotFound(_)
                | Self::MatchNotFound(_)
        )
    }

    /// Returns true for authorization failures (caller is not the entity
    /// owner the operation requires).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::NotRequestOwner { .. } | Self::NotMentee { .. } | Self::NotMentor { .. }
        )
    }

    /// Validation helper for string fields: rejects empty input and input
    /// longer than `max_len` bytes.
    pub(crate) fn check_text(
        field: &'static str,
        value: &str,
        max_len: usize,
        allow_empty: bool,
    ) -> Result<(), PeerHelpError> {
        if !allow_empty && value.trim().is_empty() {
            return Err(PeerHelpError::ValidationError {
                field,
                reason: "must not be empty".to_string(),
            });
        }
        if value.len() > max_len {
            return Err(PeerHelpError::ValidationError {
                field,
                reason: format!("exceeds {max_len} bytes"),
            });
        }
        Ok(())
    }

    /// Validation helper for 1-5 scale fields.
    pub(crate) fn check_scale(field: &'static str, value: u8) -> Result<(), PeerHelpError> {
        if !(1..=5).contains(&value) {
            return Err(PeerHelpError::ValidationError {
                field,
                reason: format!("{value} outside 1-5"),
            });
        }
        Ok(())
    }
}
