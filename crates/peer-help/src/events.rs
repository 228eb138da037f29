//! # Event Schema
//!
//! One event per committed transition, carrying the touched entity ids, the
//! relevant addresses, and enough changed fields for an external observer to
//! reconstruct state without re-reading entities. Events are the seam an
//! asynchronous poller replays instead of diffing snapshots.
//!
//! | Event | Emitted by |
//! |-------|------------|
//! | `ProfileCreated` | `create_profile` |
//! | `HelpRequestCreated` | `create_request` |
//! | `DifficultyVoted` | `vote_difficulty` |
//! | `HelpOfferCreated` | `create_offer` |
//! | `OfferRejected` | `accept_offer` (one per batch-rejected offer) |
//! | `MatchCreated` | `accept_offer` |
//! | `HelpCompleted` | `mentee_confirm_completion` / `mentee_reject_completion` |
//! | `MentorRewardPending` | `mentee_confirm_completion` only |
//! | `RewardClaimed` | `mentor_claim_reward` |
//! | `TierBadgeMinted` | `mentor_claim_reward` on threshold crossing |

use crate::domain::value_objects::{
    AccountId, BadgeId, MatchId, OfferId, RequestId, Tier, Timestamp, Topic,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version of the event record schema. Bumped on any breaking field change.
pub const SCHEMA_VERSION: u32 = 1;

// =============================================================================
// EVENT PAYLOADS
// =============================================================================

/// A committed state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PeerHelpEvent {
    /// A new participant profile exists.
    ProfileCreated {
        /// Profile owner.
        owner: AccountId,
        /// Resolved display name.
        display_name: String,
        /// Verified external handle.
        external_login: String,
    },

    /// A help request opened.
    HelpRequestCreated {
        /// New request id.
        request_id: RequestId,
        /// Identity that opened it.
        requester: AccountId,
        /// Curriculum area.
        topic: Topic,
        /// Request title.
        title: String,
        /// Difficulty the requester seeded the running average with.
        initial_difficulty: u8,
    },

    /// A community difficulty vote was recorded.
    DifficultyVoted {
        /// Voted request.
        request_id: RequestId,
        /// Voting identity.
        voter: AccountId,
        /// The vote, 1-5.
        vote: u8,
        /// Running average after this vote.
        community_difficulty: u8,
        /// Community votes cast so far.
        difficulty_vote_count: u64,
        /// True once the vote quorum is reached. Informational only.
        difficulty_trusted: bool,
    },

    /// A mentor offered help.
    HelpOfferCreated {
        /// New offer id.
        offer_id: OfferId,
        /// Target request.
        request_id: RequestId,
        /// Offering mentor.
        mentor: AccountId,
        /// Self-declared competency, 1-5.
        competency_level: u8,
        /// Mentor's confirmed helps at offer time.
        past_helps_on_topic: u64,
    },

    /// A pending offer was rejected.
    OfferRejected {
        /// Rejected offer.
        offer_id: OfferId,
        /// Its request.
        request_id: RequestId,
        /// The mentor whose offer was rejected.
        mentor: AccountId,
    },

    /// An offer was accepted and a match record created.
    MatchCreated {
        /// New match id.
        match_id: MatchId,
        /// Matched request.
        request_id: RequestId,
        /// The accepted mentor.
        helper: AccountId,
        /// The requester being helped.
        mentee: AccountId,
    },

    /// A match reached its terminal state.
    HelpCompleted {
        /// Completed match.
        match_id: MatchId,
        /// Its request.
        request_id: RequestId,
        /// The mentor.
        mentor: AccountId,
        /// The mentee.
        mentee: AccountId,
        /// True if the mentee confirmed success, false if they rejected.
        confirmed: bool,
    },

    /// A confirmed completion has an unclaimed mentor reward.
    MentorRewardPending {
        /// The completed match.
        match_id: MatchId,
        /// Its request.
        request_id: RequestId,
        /// The mentor entitled to claim.
        mentor: AccountId,
    },

    /// The mentor converted a confirmed completion into XP.
    RewardClaimed {
        /// The paid-out request.
        request_id: RequestId,
        /// The completed match.
        match_id: MatchId,
        /// The claiming mentor.
        mentor: AccountId,
        /// XP granted by this claim.
        xp_awarded: u64,
        /// Mentor's XP after the claim.
        total_xp: u64,
        /// Mentor's confirmed helps after the claim.
        helps_given: u64,
    },

    /// A tier badge was minted on a threshold crossing.
    TierBadgeMinted {
        /// New badge id.
        badge_id: BadgeId,
        /// Badge owner.
        owner: AccountId,
        /// Certified tier.
        tier: Tier,
        /// Tier display name at mint time.
        tier_name: String,
        /// Owner's `helps_given` at mint time.
        helps_given_at_mint: u64,
    },
}

impl PeerHelpEvent {
    /// Short kebab-case name of the event kind, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProfileCreated { .. } => "profile-created",
            Self::HelpRequestCreated { .. } => "help-request-created",
            Self::DifficultyVoted { .. } => "difficulty-voted",
            Self::HelpOfferCreated { .. } => "help-offer-created",
            Self::OfferRejected { .. } => "offer-rejected",
            Self::MatchCreated { .. } => "match-created",
            Self::HelpCompleted { .. } => "help-completed",
            Self::MentorRewardPending { .. } => "mentor-reward-pending",
            Self::RewardClaimed { .. } => "reward-claimed",
            Self::TierBadgeMinted { .. } => "tier-badge-minted",
        }
    }
}

// =============================================================================
// EVENT RECORD
// =============================================================================

/// Versioned envelope around a committed event.
///
/// Records are published in commit order; `schema_version` lets consumers
/// reject records written by an incompatible producer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique record id.
    pub id: Uuid,
    /// Schema version of `event`.
    pub schema_version: u32,
    /// Commit time of the transition.
    pub emitted_at: Timestamp,
    /// The transition itself.
    pub event: PeerHelpEvent,
}

impl EventRecord {
    /// Wraps an event in a fresh record.
    #[must_use]
    pub fn new(event: PeerHelpEvent, emitted_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_version: SCHEMA_VERSION,
            emitted_at,
            event,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
