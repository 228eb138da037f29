//! # Core Domain Entities
//!
//! Main business entities of the peer-help ledger: student profiles, help
//! requests, offers, match records, and tier badges.
//!
//! Status fields only ever move forward:
//!
//! ```text
//! HelpRequest:  [OPEN] ──accept_offer──→ [MATCHED] ──confirm/reject──→ [COMPLETED]
//! HelpOffer:    [PENDING] ──accept──→ [ACCEPTED]
//!                   └────── batch reject ──→ [REJECTED]
//! MatchRecord:  [ACTIVE] ──confirm/reject──→ [COMPLETED]
//! ```

use crate::domain::value_objects::{
    AccountId, BadgeId, MatchId, OfferId, RequestId, Tier, Timestamp, Topic,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// STATUS ENUMS
// =============================================================================

/// Lifecycle status of a help request. Monotonically non-decreasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RequestStatus {
    /// Accepting offers.
    #[default]
    Open = 0,
    /// An offer was accepted; a match record exists.
    Matched = 1,
    /// Terminal. Reached through mentee confirmation or rejection.
    Completed = 2,
}

/// Status of a help offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum OfferStatus {
    /// Awaiting the requester's decision.
    #[default]
    Pending = 0,
    /// Accepted by the requester. At most one offer per request ever reaches
    /// this status.
    Accepted = 1,
    /// Rejected, either explicitly or as part of the acceptance batch.
    Rejected = 2,
}

/// Status of a match record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MatchStatus {
    /// Mentoring in progress.
    #[default]
    Active = 0,
    /// Terminal. Set by mentee confirmation or rejection.
    Completed = 1,
}

// =============================================================================
// STUDENT PROFILE
// =============================================================================

/// One profile per participant identity, created on first `create_profile`.
///
/// Mutated only by profile creation and the reward engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Owning identity.
    pub owner: AccountId,
    /// Display name resolved through the identity provider.
    pub display_name: String,
    /// Verified external login handle.
    pub external_login: String,
    /// Completed, confirmed helps as a mentor.
    pub helps_given: u64,
    /// Confirmed completions received as a mentee.
    pub helps_received: u64,
    /// Cumulative XP earned from reward claims.
    pub total_xp: u64,
    /// Current reputation tier, a pure function of `helps_given`.
    pub tier: Tier,
    /// Reserved aggregate; written only at creation.
    pub avg_feedback_score: u64,
    /// Cumulative rewards earned (XP-denominated).
    pub total_rewards_earned: u64,
    /// Reserved aggregate; written only at creation.
    pub success_ratio: u64,
    /// Creation time.
    pub created_at: Timestamp,
}

impl StudentProfile {
    /// Creates a fresh profile with zeroed aggregates.
    #[must_use]
    pub fn new(
        owner: AccountId,
        display_name: String,
        external_login: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            owner,
            display_name,
            external_login,
            helps_given: 0,
            helps_received: 0,
            total_xp: 0,
            tier: Tier::Newcomer,
            avg_feedback_score: 0,
            total_rewards_earned: 0,
            success_ratio: 0,
            created_at,
        }
    }
}

// =============================================================================
// HELP REQUEST
// =============================================================================

/// A student's request for help on one topic.
///
/// `mentor_addresses` mirrors the mentors behind `offers` and is the
/// authoritative O(1) duplicate-offer check; it is appended in the same
/// mutation that records the offer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HelpRequest {
    /// Request id.
    pub id: RequestId,
    /// Identity that created the request (the mentee once matched).
    pub requester: AccountId,
    /// Curriculum area.
    pub topic: Topic,
    /// Short title.
    pub title: String,
    /// Problem description.
    pub description: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Lifecycle status. Never regresses.
    pub status: RequestStatus,
    /// Number of community difficulty votes cast (the initial difficulty is
    /// not counted here).
    pub difficulty_vote_count: u64,
    /// Floor-rounded running average difficulty, 1-5.
    pub community_difficulty: u8,
    /// Match record reference, set exactly once on acceptance.
    pub match_id: Option<MatchId>,
    /// Offers received, in arrival order.
    pub offers: Vec<OfferId>,
    /// Mentors that have offered on this request.
    pub mentor_addresses: Vec<AccountId>,
    /// Idempotence barrier for the reward engine. false -> true exactly once.
    pub reward_claimed: bool,
}

impl HelpRequest {
    /// Creates an open request with no offers.
    #[must_use]
    pub fn new(
        id: RequestId,
        requester: AccountId,
        topic: Topic,
        title: String,
        description: String,
        initial_difficulty: u8,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            requester,
            topic,
            title,
            description,
            created_at,
            status: RequestStatus::Open,
            difficulty_vote_count: 0,
            community_difficulty: initial_difficulty,
            match_id: None,
            offers: Vec::new(),
            mentor_addresses: Vec::new(),
            reward_claimed: false,
        }
    }

    /// Returns true while the request is accepting offers.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }

    /// Returns true once an offer has been accepted.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.status == RequestStatus::Matched
    }

    /// Returns true once the request reached its terminal state.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == RequestStatus::Completed
    }

    /// Returns true if `mentor` has already offered on this request.
    #[must_use]
    pub fn has_offer_from(&self, mentor: &AccountId) -> bool {
        self.mentor_addresses.contains(mentor)
    }
}

// =============================================================================
// HELP OFFER
// =============================================================================

/// A mentor's offer against one open request.
///
/// Exactly one offer per (request, mentor) pair can ever exist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HelpOffer {
    /// Offer id.
    pub id: OfferId,
    /// Request this offer targets.
    pub request_id: RequestId,
    /// Offering mentor (owner).
    pub mentor: AccountId,
    /// Free-form pitch to the requester.
    pub message: String,
    /// Self-declared competency, 1-5.
    pub competency_level: u8,
    /// Snapshot of the mentor's `helps_given` at offer creation.
    pub past_helps_on_topic: u64,
    /// Offer status.
    pub status: OfferStatus,
    /// Creation time.
    pub created_at: Timestamp,
}

impl HelpOffer {
    /// Creates a pending offer.
    #[must_use]
    pub fn new(
        id: OfferId,
        request_id: RequestId,
        mentor: AccountId,
        message: String,
        competency_level: u8,
        past_helps_on_topic: u64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            request_id,
            mentor,
            message,
            competency_level,
            past_helps_on_topic,
            status: OfferStatus::Pending,
            created_at,
        }
    }

    /// Returns true while the offer awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OfferStatus::Pending
    }

    /// Marks the offer rejected. Idempotent; never overwrites `Accepted`.
    pub fn reject(&mut self) {
        if self.status == OfferStatus::Pending {
            self.status = OfferStatus::Rejected;
        }
    }
}

// =============================================================================
// MATCH RECORD
// =============================================================================

/// Pairing of one mentor with one mentee, created exactly once per request
/// when an offer is accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match id.
    pub id: MatchId,
    /// Request this match settles. Uniquely identifies the match.
    pub request_id: RequestId,
    /// The helping mentor.
    pub mentor: AccountId,
    /// The requester being helped.
    pub mentee: AccountId,
    /// Match status.
    pub status: MatchStatus,
    /// Set when the mentee confirms a successful completion. A rejected
    /// completion leaves this false forever, which is what bars the reward.
    pub mentee_confirmed: bool,
    /// Creation time.
    pub created_at: Timestamp,
}

impl MatchRecord {
    /// Creates an active, unconfirmed match.
    #[must_use]
    pub fn new(
        id: MatchId,
        request_id: RequestId,
        mentor: AccountId,
        mentee: AccountId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            request_id,
            mentor,
            mentee,
            status: MatchStatus::Active,
            mentee_confirmed: false,
            created_at,
        }
    }

    /// Returns true once the match reached its terminal state.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }
}

// =============================================================================
// TIER BADGE
// =============================================================================

/// Badge minted to a mentor when `helps_given` crosses a tier threshold.
///
/// Immutable once minted; the per-identity collection is append-only and
/// never contains the same tier twice.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierBadge {
    /// Badge id.
    pub id: BadgeId,
    /// Identity the badge was minted to.
    pub owner: AccountId,
    /// Tier this badge certifies.
    pub tier: Tier,
    /// Display name of the tier at mint time.
    pub tier_name: String,
    /// Mint time.
    pub minted_at: Timestamp,
    /// The owner's `helps_given` when the badge was minted.
    pub helps_given_at_mint: u64,
}

impl TierBadge {
    /// Mints a badge for `tier`.
    #[must_use]
    pub fn new(
        id: BadgeId,
        owner: AccountId,
        tier: Tier,
        minted_at: Timestamp,
        helps_given_at_mint: u64,
    ) -> Self {
        Self {
            id,
            owner,
            tier,
            tier_name: tier.name().to_string(),
            minted_at,
            helps_given_at_mint,
        }
    }
}

// =============================================================================
// REGISTRY STATS
// =============================================================================

/// Snapshot of the Registry's aggregate counters.
///
/// Counters are monotonic: exactly one increment per qualifying transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Requests ever created.
    pub total_requests: u64,
    /// Matches ever created.
    pub total_matches: u64,
    /// Completions ever confirmed or rejected.
    pub total_completions: u64,
}

// =============================================================================
// TESTS
// =============================================================================
