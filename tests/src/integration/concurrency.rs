//! # Concurrency Tests
//!
//! Races many callers against one entity and proves the at-most-once
//! guarantees hold under arbitrary interleaving: one accepted offer per
//! request, one offer per (request, mentor), one reward per request, one
//! vote per (request, voter), and exact aggregate counters.

#[cfg(test)]
mod tests {
    use crate::integration::{account, directory};
    use peer_help::prelude::*;
    use std::sync::Arc;

    async fn service_with_profiles(bytes: &[u8]) -> Arc<TestService> {
        let (service, _) = create_test_service(directory(bytes));
        let service = Arc::new(service);
        for byte in bytes {
            service.create_profile(account(*byte)).await.unwrap();
        }
        service
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_offers_single_success() {
        let service = service_with_profiles(&[0xAA, 0xBB]).await;
        let request_id = service
            .create_request(account(0xAA), Topic::Minishell, "t".into(), "d".into(), 3)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create_offer(account(0xBB), request_id, String::new(), 3)
                    .await
            }));
        }

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(PeerHelpError::DuplicateOffer { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(duplicates, 15);

        let request = service.request(request_id).await.unwrap();
        assert_eq!(request.offers.len(), 1);
        assert_eq!(request.mentor_addresses.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_pay_once() {
        let service = service_with_profiles(&[0xAA, 0xBB]).await;
        let requester = account(0xAA);
        let mentor = account(0xBB);

        let request_id = service
            .create_request(requester, Topic::FtPrintf, "t".into(), "d".into(), 5)
            .await
            .unwrap();
        let offer_id = service
            .create_offer(mentor, request_id, String::new(), 4)
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

        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.mentor_claim_reward(mentor, match_id, request_id).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => {
                    successes += 1;
                    assert_eq!(receipt.xp_awarded, 50);
                }
                Err(PeerHelpError::AlreadyClaimed(id)) => assert_eq!(id, request_id),
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
        assert_eq!(successes, 1);

        // XP moved exactly one award's worth over the whole history.
        let profile = service.profile(mentor).await.unwrap();
        assert_eq!(profile.total_xp, 50);
        assert_eq!(profile.total_rewards_earned, 50);
        assert_eq!(profile.helps_given, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_accepts_create_one_match() {
        let service = service_with_profiles(&[0xAA, 0xB1, 0xB2, 0xB3, 0xB4]).await;
        let requester = account(0xAA);

        let request_id = service
            .create_request(requester, Topic::CppModules, "t".into(), "d".into(), 3)
            .await
            .unwrap();
        let mut offer_ids = Vec::new();
        for byte in [0xB1, 0xB2, 0xB3, 0xB4] {
            offer_ids.push(
                service
                    .create_offer(account(byte), request_id, String::new(), 3)
                    .await
                    .unwrap(),
            );
        }

        // The requester races acceptances of different offers.
        let mut handles = Vec::new();
        for offer_id in offer_ids.clone() {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.accept_offer(requester, request_id, offer_id).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(PeerHelpError::RequestNotOpen(_) | PeerHelpError::OfferNotPending(_)) => {}
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(service.registry_stats().await.total_matches, 1);

        let mut accepted = 0;
        for offer_id in offer_ids {
            if service.offer(offer_id).await.unwrap().status == OfferStatus::Accepted {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_from_one_voter_count_once() {
        let service = service_with_profiles(&[0xAA, 0xCC]).await;
        let request_id = service
            .create_request(account(0xAA), Topic::MiniRt, "t".into(), "d".into(), 3)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.vote_difficulty(account(0xCC), request_id, 5).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(PeerHelpError::AlreadyVoted { .. }) => {}
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(
            service.request(request_id).await.unwrap().difficulty_vote_count,
            1
        );
    }

    /// Many independent mentee/mentor pairs complete full cycles in
    /// parallel; every aggregate counter lands on the exact total.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_counters_exact_under_parallel_cycles() {
        const PAIRS: u8 = 8;

        let bytes: Vec<u8> = (0..PAIRS).flat_map(|i| [0x10 + i, 0x80 + i]).collect();
        let service = service_with_profiles(&bytes).await;

        let mut handles = Vec::new();
        for i in 0..PAIRS {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let mentee = account(0x10 + i);
                let mentor = account(0x80 + i);
                let request_id = service
                    .create_request(mentee, Topic::Shell, format!("r{i}"), "d".into(), 2)
                    .await
                    .unwrap();
                let offer_id = service
                    .create_offer(mentor, request_id, String::new(), 3)
                    .await
                    .unwrap();
                let match_id = service
                    .accept_offer(mentee, request_id, offer_id)
                    .await
                    .unwrap();
                service
                    .mentee_confirm_completion(mentee, match_id, request_id)
                    .await
                    .unwrap();
                service
                    .mentor_claim_reward(mentor, match_id, request_id)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = service.registry_stats().await;
        assert_eq!(stats.total_requests, u64::from(PAIRS));
        assert_eq!(stats.total_matches, u64::from(PAIRS));
        assert_eq!(stats.total_completions, u64::from(PAIRS));

        for i in 0..PAIRS {
            let profile = service.profile(account(0x80 + i)).await.unwrap();
            assert_eq!(profile.helps_given, 1);
            assert_eq!(profile.total_xp, 20);
        }
    }
}
