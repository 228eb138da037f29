//! # End-to-End Choreography Tests
//!
//! Drives the whole peer-help flow through the service API:
//!
//! ```text
//! create_profile ──→ create_request ──→ create_offer (xN)
//!                                             │
//!                                       accept_offer
//!                                        │        │
//!                                  MatchCreated  OfferRejected (others)
//!                                             │
//!                              mentee_confirm / mentee_reject
//!                                             │
//!                                    mentor_claim_reward
//! ```
//!
//! Assertions run against read accessors AND against the published event
//! trail, proving an observer can reconstruct state without re-reading
//! entities.

#[cfg(test)]
mod tests {
    use crate::integration::{account, directory};
    use peer_help::prelude::*;
    use std::collections::HashMap;

    /// The end-to-end scenario: R posts, M1 and M2 offer, R accepts M1,
    /// confirms completion, M1 claims once.
    #[tokio::test]
    async fn test_full_help_cycle() {
        crate::integration::init_tracing();
        let (service, sink) = create_test_service(directory(&[0xAA, 0xB1, 0xB2]));
        let requester = account(0xAA);
        let m1 = account(0xB1);
        let m2 = account(0xB2);

        for who in [requester, m1, m2] {
            service.create_profile(who).await.unwrap();
        }

        let request_id = service
            .create_request(
                requester,
                Topic::GetNextLine,
                "help".into(),
                "stuck".into(),
                3,
            )
            .await
            .unwrap();

        let offer1 = service
            .create_offer(m1, request_id, "did it last year".into(), 4)
            .await
            .unwrap();
        let offer2 = service
            .create_offer(m2, request_id, String::new(), 3)
            .await
            .unwrap();

        let match_id = service
            .accept_offer(requester, request_id, offer1)
            .await
            .unwrap();

        // M1 accepted, M2 rejected, request matched.
        assert_eq!(
            service.offer(offer1).await.unwrap().status,
            OfferStatus::Accepted
        );
        assert_eq!(
            service.offer(offer2).await.unwrap().status,
            OfferStatus::Rejected
        );
        let request = service.request(request_id).await.unwrap();
        assert_eq!(request.status, RequestStatus::Matched);
        assert_eq!(request.match_id, Some(match_id));

        let record = service.match_record(match_id).await.unwrap();
        assert_eq!(record.mentor, m1);
        assert_eq!(record.mentee, requester);

        service
            .mentee_confirm_completion(requester, match_id, request_id)
            .await
            .unwrap();
        let request = service.request(request_id).await.unwrap();
        assert_eq!(request.status, RequestStatus::Completed);
        assert!(service.match_record(match_id).await.unwrap().mentee_confirmed);

        let receipt = service
            .mentor_claim_reward(m1, match_id, request_id)
            .await
            .unwrap();
        assert_eq!(receipt.xp_awarded, 30);

        let mentor_profile = service.profile(m1).await.unwrap();
        assert_eq!(mentor_profile.helps_given, 1);
        assert_eq!(mentor_profile.total_xp, 30);
        assert_eq!(mentor_profile.total_rewards_earned, 30);
        let mentee_profile = service.profile(requester).await.unwrap();
        assert_eq!(mentee_profile.helps_received, 1);

        assert!(service.request(request_id).await.unwrap().reward_claimed);
        let err = service
            .mentor_claim_reward(m1, match_id, request_id)
            .await
            .unwrap_err();
        assert_eq!(err, PeerHelpError::AlreadyClaimed(request_id));

        let stats = service.registry_stats().await;
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.total_matches, 1);
        assert_eq!(stats.total_completions, 1);

        // The losing mentor shows up exactly once in the rejection trail.
        let rejected: Vec<AccountId> = sink
            .records()
            .await
            .iter()
            .filter_map(|r| match &r.event {
                PeerHelpEvent::OfferRejected { mentor, .. } => Some(*mentor),
                _ => None,
            })
            .collect();
        assert_eq!(rejected, vec![m2]);
    }

    #[tokio::test]
    async fn test_self_offer_changes_nothing() {
        let (service, sink) = create_test_service(directory(&[0xAA]));
        let requester = account(0xAA);
        service.create_profile(requester).await.unwrap();
        let request_id = service
            .create_request(requester, Topic::Shell, "t".into(), "d".into(), 3)
            .await
            .unwrap();
        let published = sink.len().await;

        let err = service
            .create_offer(requester, request_id, String::new(), 3)
            .await
            .unwrap_err();
        assert_eq!(err, PeerHelpError::SelfOfferForbidden(request_id));

        let request = service.request(request_id).await.unwrap();
        assert!(request.offers.is_empty());
        assert!(request.mentor_addresses.is_empty());
        assert_eq!(sink.len().await, published);
    }

    #[tokio::test]
    async fn test_reject_path_pays_nothing() {
        let (service, _) = create_test_service(directory(&[0xAA, 0xBB]));
        let requester = account(0xAA);
        let mentor = account(0xBB);
        service.create_profile(requester).await.unwrap();
        service.create_profile(mentor).await.unwrap();

        let request_id = service
            .create_request(requester, Topic::Born2beroot, "lvm".into(), "halp".into(), 4)
            .await
            .unwrap();
        let offer_id = service
            .create_offer(mentor, request_id, String::new(), 2)
            .await
            .unwrap();
        let match_id = service
            .accept_offer(requester, request_id, offer_id)
            .await
            .unwrap();

        service
            .mentee_reject_completion(requester, match_id, request_id)
            .await
            .unwrap();

        let request = service.request(request_id).await.unwrap();
        assert_eq!(request.status, RequestStatus::Completed);
        assert!(request.reward_claimed);
        let record = service.match_record(match_id).await.unwrap();
        assert_eq!(record.status, MatchStatus::Completed);
        assert!(!record.mentee_confirmed);

        // Completion counted, reputation untouched, claim foreclosed.
        assert_eq!(service.registry_stats().await.total_completions, 1);
        assert_eq!(service.profile(mentor).await.unwrap().total_xp, 0);
        assert_eq!(service.profile(requester).await.unwrap().helps_received, 0);
        assert!(service
            .mentor_claim_reward(mentor, match_id, request_id)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_votes_reshape_reward() {
        let (service, _) = create_test_service(directory(&[0xAA, 0xBB, 0xC1, 0xC2]));
        let requester = account(0xAA);
        let mentor = account(0xBB);
        for who in [requester, mentor, account(0xC1), account(0xC2)] {
            service.create_profile(who).await.unwrap();
        }

        let request_id = service
            .create_request(requester, Topic::Philosophers, "t".into(), "d".into(), 3)
            .await
            .unwrap();

        // Community pushes the difficulty up before the match.
        assert_eq!(
            service.vote_difficulty(account(0xC1), request_id, 5).await.unwrap(),
            4
        );
        assert_eq!(
            service.vote_difficulty(account(0xC2), request_id, 5).await.unwrap(),
            4
        );

        let offer_id = service
            .create_offer(mentor, request_id, String::new(), 5)
            .await
            .unwrap();
        let match_id = service
            .accept_offer(requester, request_id, offer_id)
            .await
            .unwrap();
        service
            .mentee_confirm_completion(requester, match_id, request_id)
            .await
            .unwrap();

        let receipt = service
            .mentor_claim_reward(mentor, match_id, request_id)
            .await
            .unwrap();
        assert_eq!(receipt.xp_awarded, 40);
    }

    #[tokio::test]
    async fn test_bronze_badge_after_five_confirmed_helps() {
        let (service, sink) = create_test_service(directory(&[0xAA, 0xBB]));
        let requester = account(0xAA);
        let mentor = account(0xBB);
        service.create_profile(requester).await.unwrap();
        service.create_profile(mentor).await.unwrap();

        for round in 0..5u8 {
            let request_id = service
                .create_request(
                    requester,
                    Topic::PushSwap,
                    format!("round {round}"),
                    "d".into(),
                    3,
                )
                .await
                .unwrap();
            let offer_id = service
                .create_offer(mentor, request_id, String::new(), 3)
                .await
                .unwrap();
            let match_id = service
                .accept_offer(requester, request_id, offer_id)
                .await
                .unwrap();
            service
                .mentee_confirm_completion(requester, match_id, request_id)
                .await
                .unwrap();
            let receipt = service
                .mentor_claim_reward(mentor, match_id, request_id)
                .await
                .unwrap();

            if round < 4 {
                assert_eq!(receipt.tier_advanced_to, None);
            } else {
                assert_eq!(receipt.tier_advanced_to, Some(Tier::Bronze));
            }
        }

        let profile = service.profile(mentor).await.unwrap();
        assert_eq!(profile.helps_given, 5);
        assert_eq!(profile.tier, Tier::Bronze);
        assert_eq!(profile.total_xp, 150);

        let badges = service.badges(mentor).await;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].tier, Tier::Bronze);
        assert_eq!(badges[0].tier_name, "Bronze");
        assert_eq!(badges[0].helps_given_at_mint, 5);

        let minted: usize = sink
            .records()
            .await
            .iter()
            .filter(|r| matches!(r.event, PeerHelpEvent::TierBadgeMinted { .. }))
            .count();
        assert_eq!(minted, 1);
    }

    /// Replays the event trail alone and reconstructs every request's final
    /// status, then compares against the read accessors.
    #[tokio::test]
    async fn test_event_replay_reconstructs_request_state() {
        let (service, sink) = create_test_service(directory(&[0xAA, 0xB1, 0xB2]));
        let requester = account(0xAA);
        let m1 = account(0xB1);
        let m2 = account(0xB2);
        for who in [requester, m1, m2] {
            service.create_profile(who).await.unwrap();
        }

        // Three requests ending in three different states.
        let open = service
            .create_request(requester, Topic::Webserv, "a".into(), "d".into(), 3)
            .await
            .unwrap();

        let matched = service
            .create_request(requester, Topic::Minitalk, "b".into(), "d".into(), 3)
            .await
            .unwrap();
        let offer_m = service
            .create_offer(m1, matched, String::new(), 3)
            .await
            .unwrap();
        service.accept_offer(requester, matched, offer_m).await.unwrap();

        let completed = service
            .create_request(requester, Topic::Cub3d, "c".into(), "d".into(), 3)
            .await
            .unwrap();
        let offer_c = service
            .create_offer(m2, completed, String::new(), 3)
            .await
            .unwrap();
        let match_c = service
            .accept_offer(requester, completed, offer_c)
            .await
            .unwrap();
        service
            .mentee_confirm_completion(requester, match_c, completed)
            .await
            .unwrap();

        // Replay: no entity reads, only records.
        let mut replayed: HashMap<RequestId, RequestStatus> = HashMap::new();
        for record in sink.records().await {
            assert_eq!(record.schema_version, SCHEMA_VERSION);
            match record.event {
                PeerHelpEvent::HelpRequestCreated { request_id, .. } => {
                    replayed.insert(request_id, RequestStatus::Open);
                }
                PeerHelpEvent::MatchCreated { request_id, .. } => {
                    replayed.insert(request_id, RequestStatus::Matched);
                }
                PeerHelpEvent::HelpCompleted { request_id, .. } => {
                    replayed.insert(request_id, RequestStatus::Completed);
                }
                _ => {}
            }
        }

        for id in [open, matched, completed] {
            let actual = service.request(id).await.unwrap().status;
            assert_eq!(replayed[&id], actual, "replay diverged for {id}");
        }
    }

    #[tokio::test]
    async fn test_two_registries_are_independent() {
        let (a, _) = create_test_service(directory(&[0xAA, 0xBB]));
        let (b, _) = create_test_service(directory(&[0xAA, 0xBB]));

        a.create_profile(account(0xAA)).await.unwrap();
        a.create_profile(account(0xBB)).await.unwrap();
        b.create_profile(account(0xAA)).await.unwrap();

        let request_a = a
            .create_request(account(0xAA), Topic::Libft, "t".into(), "d".into(), 3)
            .await
            .unwrap();
        a.create_offer(account(0xBB), request_a, String::new(), 3)
            .await
            .unwrap();

        assert_eq!(a.registry_stats().await.total_requests, 1);
        assert_eq!(b.registry_stats().await.total_requests, 0);
        assert!(b.request(request_a).await.is_none());
        // B never saw BB's profile either.
        assert!(b.profile(account(0xBB)).await.is_none());
    }
}
