//! # Peer-Help - Mentorship Matching & Reward Ledger
//!
//! Off-chain implementation of the peer-help marketplace state machine:
//! students open help requests, mentors offer, requesters accept exactly one
//! offer, mentees confirm or reject completion, and confirmed completions
//! convert into XP, tiers, and badges exactly once.
//!
//! ## State machine
//!
//! ```text
//! [OPEN] ──accept_offer──→ [MATCHED] ──confirm──→ [COMPLETED] ──claim──→ reward paid
//!                               │                      ↑
//!                               └────── reject ────────┘  (no reward, terminal)
//! ```
//!
//! ## Domain invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Request status never regresses | `domain/matching.rs` single-writer transitions |
//! | One offer per (request, mentor) pair | `domain/offers.rs` dedup against `mentor_addresses` |
//! | At most one accepted offer per request | `domain/matching.rs` batch rejection |
//! | Reward pays out at most once | `domain/rewards.rs` `reward_claimed` barrier |
//! | One badge per tier per identity | `domain/rewards.rs` stored-tier guard |
//! | Counters move once per transition | `domain/registry.rs` counter hooks |
//!
//! Audited at runtime by [`domain::invariants::check_all_invariants`].
//!
//! ## Concurrency
//!
//! The service holds the registry write lock across each call's whole
//! validate -> mutate -> emit unit. Precondition failures return before the
//! first field write, so an `Err` leaves the registry unchanged under any
//! interleaving. No operation blocks on another; retries belong to callers,
//! and the idempotence flags make blind retries safe.
//!
//! ## Usage example
//!
//! ```ignore
//! use peer_help::prelude::*;
//!
//! let (service, events) = create_test_service(directory);
//!
//! service.create_profile(student).await?;
//! let request_id = service
//!     .create_request(student, Topic::Minishell, title, description, 3)
//!     .await?;
//! let offer_id = service.create_offer(mentor, request_id, pitch, 4).await?;
//! let match_id = service.accept_offer(student, request_id, offer_id).await?;
//! service.mentee_confirm_completion(student, match_id, request_id).await?;
//! let receipt = service.mentor_claim_reward(mentor, match_id, request_id).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Value objects
    pub use crate::domain::value_objects::{
        AccountId, BadgeId, MatchId, OfferId, RequestId, Tier, Timestamp, Topic,
    };

    // Domain entities
    pub use crate::domain::entities::{
        HelpOffer, HelpRequest, MatchRecord, MatchStatus, OfferStatus, RegistryStats,
        RequestStatus, StudentProfile, TierBadge,
    };

    // Registry and invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };
    pub use crate::domain::registry::Registry;

    // Errors
    pub use crate::domain::errors::PeerHelpError;

    // Events
    pub use crate::events::{EventRecord, PeerHelpEvent, SCHEMA_VERSION};

    // Ports
    pub use crate::ports::inbound::PeerHelpApi;
    pub use crate::ports::outbound::{Clock, EventSink, IdentityProvider, VerifiedIdentity};

    // Adapters
    pub use crate::adapters::{
        FixedClock, InMemoryEventSink, StaticIdentityProvider, SystemClock,
    };

    // Config and service
    pub use crate::config::PeerHelpConfig;
    pub use crate::service::{
        create_test_service, PeerHelpService, RewardReceipt, ServiceStats, TestService,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
