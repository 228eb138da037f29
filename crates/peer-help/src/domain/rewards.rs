//! # Reward/Tier Engine
//!
//! Converts a confirmed completion into XP exactly once, recomputes the
//! mentor's tier, and mints tier badges on threshold crossings.
//!
//! `request.reward_claimed` is the sole source of truth for "has this
//! request already paid out"; it flips in the same unit as the XP award, so
//! a retried or concurrent claim can never double-pay.

use crate::config::PeerHelpConfig;
use crate::domain::entities::TierBadge;
use crate::domain::errors::PeerHelpError;
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, MatchId, RequestId, Tier, Timestamp};
use crate::events::PeerHelpEvent;

/// Outcome of a successful reward claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardOutcome {
    /// XP granted by this claim.
    pub xp_awarded: u64,
    /// Tier newly reached by this claim, if any.
    pub tier_advanced_to: Option<Tier>,
}

/// Claims the mentor reward for a confirmed, completed match.
///
/// XP is `community_difficulty * xp_per_difficulty`. If the incremented
/// `helps_given` crosses a tier threshold, the profile tier advances and
/// one badge is minted; a tier already held never re-mints.
///
/// # Errors
/// - `NotMentor` if the caller is not the match's mentor
/// - `AlreadyClaimed` if the request already paid out (or was closed as
///   failed)
/// - `MatchNotCompleted` if the match is still active
/// - `MenteeNotConfirmed` if completion was never confirmed
pub fn mentor_claim_reward(
    registry: &mut Registry,
    config: &PeerHelpConfig,
    match_id: MatchId,
    request_id: RequestId,
    caller: AccountId,
    now: Timestamp,
) -> Result<(RewardOutcome, Vec<PeerHelpEvent>), PeerHelpError> {
    let record = registry.match_or_err(match_id)?;
    let request = registry.request_or_err(request_id)?;

    if record.request_id != request_id {
        return Err(PeerHelpError::ValidationError {
            field: "match",
            reason: format!("match {match_id} does not settle request {request_id}"),
        });
    }
    if record.mentor != caller {
        return Err(PeerHelpError::NotMentor { caller, match_id });
    }
    if request.reward_claimed {
        return Err(PeerHelpError::AlreadyClaimed(request_id));
    }
    if !record.is_completed() {
        return Err(PeerHelpError::MatchNotCompleted(match_id));
    }
    if !record.mentee_confirmed {
        return Err(PeerHelpError::MenteeNotConfirmed(match_id));
    }
    // The profile lookup is also a precondition: fail before any write.
    registry.profile_or_err(&caller)?;

    let xp_awarded = u64::from(request.community_difficulty) * config.xp_per_difficulty;

    // All preconditions hold; award and flip the idempotence barrier in the
    // same unit.
    registry.request_mut_or_err(request_id)?.reward_claimed = true;

    let profile = registry.profile_mut_or_err(&caller)?;
    profile.total_xp += xp_awarded;
    profile.helps_given += 1;
    profile.total_rewards_earned += xp_awarded;

    let helps_given = profile.helps_given;
    let total_xp = profile.total_xp;
    let held_tier = profile.tier;

    let mut events = vec![PeerHelpEvent::RewardClaimed {
        request_id,
        match_id,
        mentor: caller,
        xp_awarded,
        total_xp,
        helps_given,
    }];

    let new_tier = Tier::for_helps_given(helps_given);
    let mut tier_advanced_to = None;
    if new_tier > held_tier {
        registry.profile_mut_or_err(&caller)?.tier = new_tier;
        events.push(mint_badge(registry, caller, new_tier, helps_given, now));
        tier_advanced_to = Some(new_tier);
    }

    Ok((
        RewardOutcome {
            xp_awarded,
            tier_advanced_to,
        },
        events,
    ))
}

/// Mints one badge for a newly reached tier.
///
/// Re-minting is guarded by the caller's stored-tier comparison; the
/// assert below pins the resulting invariant: a per-identity collection
/// never holds the same tier twice.
fn mint_badge(
    registry: &mut Registry,
    owner: AccountId,
    tier: Tier,
    helps_given: u64,
    now: Timestamp,
) -> PeerHelpEvent {
    debug_assert!(
        !registry.badges(&owner).iter().any(|b| b.tier == tier),
        "tier {tier} already minted for {owner}"
    );

    let badge_id = registry.allocate_badge_id();
    let badge = TierBadge::new(badge_id, owner, tier, now, helps_given);
    let event = PeerHelpEvent::TierBadgeMinted {
        badge_id,
        owner,
        tier,
        tier_name: badge.tier_name.clone(),
        helps_given_at_mint: helps_given,
    };
    registry.append_badge(badge);
    event
}

// =============================================================================
// TESTS
// =============================================================================
