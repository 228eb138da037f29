//! # Property Tests
//!
//! Random valid (and invalid) operation sequences against the domain
//! engines. After every call the whole registry is audited with
//! `check_all_invariants`, and request statuses are tracked to prove they
//! never move backward.

#[cfg(test)]
mod tests {
    use crate::integration::account;
    use peer_help::domain::{lifecycle, matching, offers, profiles, rewards};
    use peer_help::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    const ACCOUNTS: u8 = 6;
    const OPS_PER_RUN: usize = 600;

    /// Drives one random operation against the registry. Errors are normal
    /// outcomes here; what matters is that nothing bends the data model.
    fn random_op(rng: &mut StdRng, reg: &mut Registry, config: &PeerHelpConfig, now: u64) {
        let caller = account(rng.gen_range(0..ACCOUNTS));
        let request_ids: Vec<RequestId> = reg.requests().map(|r| r.id).collect();
        let offer_ids: Vec<OfferId> = reg.offers().map(|o| o.id).collect();
        let match_ids: Vec<MatchId> = reg.matches().map(|m| m.id).collect();

        let pick_request = |rng: &mut StdRng| {
            if request_ids.is_empty() {
                RequestId(1)
            } else {
                request_ids[rng.gen_range(0..request_ids.len())]
            }
        };
        let pick_offer = |rng: &mut StdRng| {
            if offer_ids.is_empty() {
                OfferId(1)
            } else {
                offer_ids[rng.gen_range(0..offer_ids.len())]
            }
        };
        let pick_match = |rng: &mut StdRng| {
            if match_ids.is_empty() {
                MatchId(1)
            } else {
                match_ids[rng.gen_range(0..match_ids.len())]
            }
        };

        match rng.gen_range(0..8u8) {
            0 => {
                let _ = profiles::create_profile(
                    reg,
                    caller,
                    "student".into(),
                    "login".into(),
                    now,
                );
            }
            1 => {
                let topic = Topic::from_tag(rng.gen_range(0..14)).unwrap();
                let _ = lifecycle::create_request(
                    reg,
                    config,
                    caller,
                    topic,
                    "title".into(),
                    "description".into(),
                    rng.gen_range(0..7),
                    now,
                );
            }
            2 => {
                let request_id = pick_request(rng);
                let _ = lifecycle::vote_difficulty(
                    reg,
                    config,
                    request_id,
                    caller,
                    rng.gen_range(0..7),
                );
            }
            3 => {
                let request_id = pick_request(rng);
                let _ = offers::create_offer(
                    reg,
                    config,
                    request_id,
                    caller,
                    String::new(),
                    rng.gen_range(0..7),
                    now,
                );
            }
            4 => {
                let request_id = pick_request(rng);
                let offer_id = pick_offer(rng);
                let _ = matching::accept_offer(reg, request_id, offer_id, caller, now);
            }
            5 => {
                let match_id = pick_match(rng);
                let request_id = pick_request(rng);
                let _ = matching::mentee_confirm_completion(reg, match_id, request_id, caller);
            }
            6 => {
                let match_id = pick_match(rng);
                let request_id = pick_request(rng);
                let _ = matching::mentee_reject_completion(reg, match_id, request_id, caller);
            }
            _ => {
                let match_id = pick_match(rng);
                let request_id = pick_request(rng);
                let _ = rewards::mentor_claim_reward(
                    reg,
                    config,
                    match_id,
                    request_id,
                    caller,
                    now,
                );
            }
        }
    }

    fn run_sequence(seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut reg = Registry::new();
        let config = PeerHelpConfig::default();
        let mut last_status: HashMap<RequestId, RequestStatus> = HashMap::new();
        let mut claimed: HashMap<RequestId, bool> = HashMap::new();

        for step in 0..OPS_PER_RUN {
            let now = 1_000 + step as u64;
            random_op(&mut rng, &mut reg, &config, now);

            let audit = check_all_invariants(&reg);
            assert!(
                audit.is_ok(),
                "seed {seed} step {step}: violations {:?}",
                audit.violations
            );

            for request in reg.requests() {
                // Statuses only ever move forward.
                if let Some(prev) = last_status.get(&request.id) {
                    assert!(
                        request.status >= *prev,
                        "seed {seed} step {step}: request {} regressed {prev:?} -> {:?}",
                        request.id,
                        request.status
                    );
                }
                last_status.insert(request.id, request.status);

                // reward_claimed flips false -> true at most once.
                if let Some(prev) = claimed.get(&request.id) {
                    assert!(
                        !(*prev && !request.reward_claimed),
                        "seed {seed} step {step}: reward flag reset on {}",
                        request.id
                    );
                }
                claimed.insert(request.id, request.reward_claimed);
            }
        }
    }

    #[test]
    fn test_random_sequences_never_break_invariants() {
        for seed in [7, 42, 1337, 0xDEAD_BEEF] {
            run_sequence(seed);
        }
    }

    /// The dedup guarantee stated directly: for every (request, mentor)
    /// pair a second create_offer fails, whatever state the sequence left
    /// the pair in.
    #[test]
    fn test_offer_dedup_holds_across_random_sequences() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut reg = Registry::new();
        let config = PeerHelpConfig::default();

        for step in 0..OPS_PER_RUN {
            random_op(&mut rng, &mut reg, &config, 1_000 + step as u64);
        }

        let pairs: Vec<(RequestId, AccountId)> = reg
            .offers()
            .map(|offer| (offer.request_id, offer.mentor))
            .collect();
        for (request_id, mentor) in pairs {
            let err = offers::create_offer(
                &mut reg,
                &config,
                request_id,
                mentor,
                String::new(),
                3,
                99_999,
            )
            .unwrap_err();
            assert!(
                matches!(
                    err,
                    PeerHelpError::DuplicateOffer { .. } | PeerHelpError::RequestNotOpen(_)
                ),
                "unexpected error {err:?}"
            );
        }
    }

    /// XP bookkeeping stays internally consistent however the sequence
    /// interleaves: per profile, total_xp == total_rewards_earned and the
    /// stored tier matches helps_given.
    #[test]
    fn test_reward_bookkeeping_consistent_after_random_sequences() {
        let mut rng = StdRng::seed_from_u64(4242);
        let mut reg = Registry::new();
        let config = PeerHelpConfig::default();

        for step in 0..OPS_PER_RUN {
            random_op(&mut rng, &mut reg, &config, 1_000 + step as u64);
        }

        for byte in 0..ACCOUNTS {
            let who = account(byte);
            if let Some(profile) = reg.profile(&who) {
                assert_eq!(profile.total_xp, profile.total_rewards_earned);
                assert_eq!(profile.tier, Tier::for_helps_given(profile.helps_given));
                let badge_count = reg.badges(&who).len() as u8;
                assert_eq!(badge_count, profile.tier.ordinal());
            }
        }
    }
}
