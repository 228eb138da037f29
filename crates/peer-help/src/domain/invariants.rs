//! # Domain Invariants
//!
//! Audit checks over a whole `Registry`. Each check is pure; tests run them
//! after every operation batch to prove no interleaving of calls can bend
//! the data model.
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | At most one accepted offer per request | [`check_single_accepted_offer`] |
//! | Matched/completed requests carry a consistent match record | [`check_match_consistency`] |
//! | Counters equal observed transitions | [`check_counters`] |
//! | Badge tiers strictly increase per owner and fit the stored tier | [`check_badges`] |
//! | `community_difficulty` stays within 1-5 | [`check_difficulty_bounds`] |
//! | `reward_claimed` only on completed requests | [`check_reward_flags`] |

use crate::domain::entities::{MatchStatus, OfferStatus, RequestStatus};
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, RequestId, Tier};

/// A detected invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// More than one offer on a request reached Accepted.
    MultipleAcceptedOffers {
        /// The offending request.
        request_id: RequestId,
        /// How many offers are accepted.
        accepted: usize,
    },
    /// A matched request is missing or disagrees with its match record.
    InconsistentMatch {
        /// The offending request.
        request_id: RequestId,
        /// What disagreed.
        detail: String,
    },
    /// An aggregate counter does not equal the observed transition count.
    CounterMismatch {
        /// Which counter.
        counter: &'static str,
        /// Stored value.
        stored: u64,
        /// Value recomputed from entities.
        observed: u64,
    },
    /// A badge collection repeats a tier or is out of order.
    BadgeOrderViolation {
        /// The badge owner.
        owner: AccountId,
        /// What disagreed.
        detail: String,
    },
    /// A request's running difficulty left the 1-5 scale.
    DifficultyOutOfBounds {
        /// The offending request.
        request_id: RequestId,
        /// The out-of-range value.
        value: u8,
    },
    /// `reward_claimed` is set on a request that never completed.
    RewardFlagOnLiveRequest {
        /// The offending request.
        request_id: RequestId,
    },
}

/// Result of a full invariant sweep.
#[derive(Clone, Debug, Default)]
pub struct InvariantCheckResult {
    /// Everything found, empty when the registry is sound.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// True when no violation was found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// At most one offer per request ever reaches Accepted.
#[must_use]
pub fn check_single_accepted_offer(registry: &Registry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for request in registry.requests() {
        let accepted = registry
            .offers_for_request(request.id)
            .iter()
            .filter(|o| o.status == OfferStatus::Accepted)
            .count();
        if accepted > 1 {
            violations.push(InvariantViolation::MultipleAcceptedOffers {
                request_id: request.id,
                accepted,
            });
        }
    }
    violations
}

/// Matched and completed requests agree with their match record; open
/// requests have none. Acceptance also leaves no pending offers behind.
#[must_use]
pub fn check_match_consistency(registry: &Registry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    for request in registry.requests() {
        match request.status {
            RequestStatus::Open => {
                if request.match_id.is_some() {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: "open request holds a match reference".to_string(),
                    });
                }
            }
            RequestStatus::Matched | RequestStatus::Completed => {
                let Some(match_id) = request.match_id else {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: "no match reference".to_string(),
                    });
                    continue;
                };
                let Some(record) = registry.match_record(match_id) else {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: format!("dangling match reference {match_id}"),
                    });
                    continue;
                };
                if record.request_id != request.id {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: "match record points at a different request".to_string(),
                    });
                }
                if request.status == RequestStatus::Matched
                    && record.status != MatchStatus::Active
                {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: "matched request with terminated match".to_string(),
                    });
                }
                if request.status == RequestStatus::Completed
                    && record.status != MatchStatus::Completed
                {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: "completed request with live match".to_string(),
                    });
                }
                let pending_left = registry
                    .offers_for_request(request.id)
                    .iter()
                    .filter(|o| o.status == OfferStatus::Pending)
                    .count();
                if pending_left > 0 {
                    violations.push(InvariantViolation::InconsistentMatch {
                        request_id: request.id,
                        detail: format!("{pending_left} pending offers after acceptance"),
                    });
                }
            }
        }
    }
    violations
}

/// Counters equal the transition counts recomputed from entities.
#[must_use]
pub fn check_counters(registry: &Registry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let stats = registry.stats();

    let requests = registry.requests().count() as u64;
    if stats.total_requests != requests {
        violations.push(InvariantViolation::CounterMismatch {
            counter: "total_requests",
            stored: stats.total_requests,
            observed: requests,
        });
    }

    let matches = registry.matches().count() as u64;
    if stats.total_matches != matches {
        violations.push(InvariantViolation::CounterMismatch {
            counter: "total_matches",
            stored: stats.total_matches,
            observed: matches,
        });
    }

    let completions = registry
        .matches()
        .filter(|m| m.status == MatchStatus::Completed)
        .count() as u64;
    if stats.total_completions != completions {
        violations.push(InvariantViolation::CounterMismatch {
            counter: "total_completions",
            stored: stats.total_completions,
            observed: completions,
        });
    }

    violations
}

/// Badge tiers per owner strictly increase, never repeat, and never exceed
/// the owner's stored tier.
#[must_use]
pub fn check_badges(registry: &Registry) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let owners: Vec<AccountId> = registry
        .matches()
        .map(|m| m.mentor)
        .chain(registry.requests().map(|r| r.requester))
        .collect();

    for owner in owners {
        let badges = registry.badges(&owner);
        let mut last: Option<Tier> = None;
        for badge in badges {
            if let Some(prev) = last {
                if badge.tier <= prev {
                    violations.push(InvariantViolation::BadgeOrderViolation {
                        owner,
                        detail: format!("tier {} minted after {}", badge.tier, prev),
                    });
                }
            }
            last = Some(badge.tier);
        }
        if let (Some(top), Some(profile)) = (last, registry.profile(&owner)) {
            if top > profile.tier {
                violations.push(InvariantViolation::BadgeOrderViolation {
                    owner,
                    detail: format!(
                        "badge tier {top} above stored tier {}",
                        profile.tier
                    ),
                });
            }
        }
    }
    violations
}

/// The running difficulty average never leaves the vote scale.
#[must_use]
pub fn check_difficulty_bounds(registry: &Registry) -> Vec<InvariantViolation> {
    registry
        .requests()
        .filter(|r| !(1..=5).contains(&r.community_difficulty))
        .map(|r| InvariantViolation::DifficultyOutOfBounds {
            request_id: r.id,
            value: r.community_difficulty,
        })
        .collect()
}

/// `reward_claimed` only ever appears on completed requests.
#[must_use]
pub fn check_reward_flags(registry: &Registry) -> Vec<InvariantViolation> {
    registry
        .requests()
        .filter(|r| r.reward_claimed && r.status != RequestStatus::Completed)
        .map(|r| InvariantViolation::RewardFlagOnLiveRequest { request_id: r.id })
        .collect()
}

/// Runs every check.
#[must_use]
pub fn check_all_invariants(registry: &Registry) -> InvariantCheckResult {
    let mut violations = Vec::new();
    violations.extend(check_single_accepted_offer(registry));
    violations.extend(check_match_consistency(registry));
    violations.extend(check_counters(registry));
    violations.extend(check_badges(registry));
    violations.extend(check_difficulty_bounds(registry));
    violations.extend(check_reward_flags(registry));
    InvariantCheckResult { violations }
}

// =============================================================================
// TESTS
// =============================================================================
