//! # Peer-Help Service
//!
//! Wires the domain engines to the outbound ports and enforces the
//! concurrency contract: every mutating call holds the registry write lock
//! for its whole validate -> mutate -> emit unit, so a concurrent reader
//! never observes a transition mid-flight and two racing duplicate offers
//! or reward claims cannot both pass their checks.
//!
//! Event records are published before the lock is released; record order is
//! commit order.

use crate::adapters::{FixedClock, InMemoryEventSink, StaticIdentityProvider};
use crate::config::PeerHelpConfig;
use crate::domain::entities::{
    HelpOffer, HelpRequest, MatchRecord, RegistryStats, StudentProfile, TierBadge,
};
use crate::domain::errors::PeerHelpError;
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, MatchId, OfferId, RequestId, Timestamp, Topic};
use crate::domain::{lifecycle, matching, offers, profiles, rewards};
use crate::events::{EventRecord, PeerHelpEvent};
use crate::ports::inbound::PeerHelpApi;
use crate::ports::outbound::{Clock, EventSink, IdentityProvider};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

pub use crate::domain::rewards::RewardOutcome as RewardReceipt;

// =============================================================================
// SERVICE STATS
// =============================================================================

/// Call counters for the service, readable via [`PeerHelpService::stats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStats {
    /// Profiles created.
    pub profiles_created: u64,
    /// Requests opened.
    pub requests_created: u64,
    /// Difficulty votes recorded.
    pub votes_cast: u64,
    /// Offers created.
    pub offers_created: u64,
    /// Matches created.
    pub matches_created: u64,
    /// Completions confirmed by mentees.
    pub completions_confirmed: u64,
    /// Completions rejected by mentees.
    pub completions_rejected: u64,
    /// Rewards paid out.
    pub rewards_claimed: u64,
    /// Tier badges minted.
    pub badges_minted: u64,
    /// Calls rejected with a precondition or not-found error.
    pub failed_calls: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The peer-help ledger service.
///
/// Generic over the outbound ports so deployments swap the event transport,
/// clock, and identity directory without touching the core.
pub struct PeerHelpService<E: EventSink, C: Clock, I: IdentityProvider> {
    config: PeerHelpConfig,
    registry: Arc<RwLock<Registry>>,
    events: Arc<E>,
    clock: Arc<C>,
    identity: Arc<I>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<E: EventSink, C: Clock, I: IdentityProvider> PeerHelpService<E, C, I> {
    /// Creates a service over a fresh registry.
    pub fn new(config: PeerHelpConfig, events: Arc<E>, clock: Arc<C>, identity: Arc<I>) -> Self {
        Self {
            config,
            registry: Arc::new(RwLock::new(Registry::new())),
            events,
            clock,
            identity,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Current call counters.
    pub async fn stats(&self) -> ServiceStats {
        *self.stats.read().await
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PeerHelpConfig {
        &self.config
    }

    /// Wraps and publishes committed events, in order.
    async fn publish_all(&self, events: Vec<PeerHelpEvent>, now: Timestamp) {
        for event in events {
            debug!(kind = event.kind(), "publishing event");
            self.events.publish(EventRecord::new(event, now)).await;
        }
    }

    /// Counts a rejected call and passes the error through.
    async fn reject<T>(&self, err: PeerHelpError) -> Result<T, PeerHelpError> {
        self.stats.write().await.failed_calls += 1;
        debug!(error = %err, "call rejected");
        Err(err)
    }
}

#[async_trait]
impl<E, C, I> PeerHelpApi for PeerHelpService<E, C, I>
where
    E: EventSink,
    C: Clock,
    I: IdentityProvider,
{
    #[instrument(skip(self), fields(caller = %caller))]
    async fn create_profile(&self, caller: AccountId) -> Result<StudentProfile, PeerHelpError> {
        // Resolve outside the lock; uniqueness is still checked under it.
        let Some(identity) = self.identity.resolve(&caller).await else {
            warn!("identity provider has no verified handle for caller");
            return self.reject(PeerHelpError::IdentityUnverified(caller)).await;
        };

        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match profiles::create_profile(
            &mut registry,
            caller,
            identity.display_name,
            identity.external_login,
            now,
        ) {
            Ok(event) => {
                let profile = registry
                    .profile(&caller)
                    .cloned()
                    .expect("profile inserted by create_profile");
                self.publish_all(vec![event], now).await;
                drop(registry);
                self.stats.write().await.profiles_created += 1;
                info!(login = %profile.external_login, "profile created");
                Ok(profile)
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self, title, description), fields(caller = %caller, topic = %topic))]
    async fn create_request(
        &self,
        caller: AccountId,
        topic: Topic,
        title: String,
        description: String,
        initial_difficulty: u8,
    ) -> Result<RequestId, PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match lifecycle::create_request(
            &mut registry,
            &self.config,
            caller,
            topic,
            title,
            description,
            initial_difficulty,
            now,
        ) {
            Ok((id, event)) => {
                self.publish_all(vec![event], now).await;
                drop(registry);
                self.stats.write().await.requests_created += 1;
                info!(request_id = %id, "help request created");
                Ok(id)
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, request_id = %request_id))]
    async fn vote_difficulty(
        &self,
        caller: AccountId,
        request_id: RequestId,
        vote: u8,
    ) -> Result<u8, PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match lifecycle::vote_difficulty(&mut registry, &self.config, request_id, caller, vote) {
            Ok(event) => {
                let average = match &event {
                    PeerHelpEvent::DifficultyVoted {
                        community_difficulty,
                        ..
                    } => *community_difficulty,
                    _ => unreachable!("vote_difficulty emits DifficultyVoted"),
                };
                self.publish_all(vec![event], now).await;
                drop(registry);
                self.stats.write().await.votes_cast += 1;
                info!(vote, average, "difficulty vote recorded");
                Ok(average)
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self, message), fields(caller = %caller, request_id = %request_id))]
    async fn create_offer(
        &self,
        caller: AccountId,
        request_id: RequestId,
        message: String,
        competency_level: u8,
    ) -> Result<OfferId, PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match offers::create_offer(
            &mut registry,
            &self.config,
            request_id,
            caller,
            message,
            competency_level,
            now,
        ) {
            Ok((id, event)) => {
                self.publish_all(vec![event], now).await;
                drop(registry);
                self.stats.write().await.offers_created += 1;
                info!(offer_id = %id, "help offer created");
                Ok(id)
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, request_id = %request_id, offer_id = %offer_id))]
    async fn accept_offer(
        &self,
        caller: AccountId,
        request_id: RequestId,
        offer_id: OfferId,
    ) -> Result<MatchId, PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match matching::accept_offer(&mut registry, request_id, offer_id, caller, now) {
            Ok((match_id, events)) => {
                let rejected = events.len() - 1;
                self.publish_all(events, now).await;
                drop(registry);
                self.stats.write().await.matches_created += 1;
                info!(match_id = %match_id, rejected, "offer accepted, match created");
                Ok(match_id)
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, match_id = %match_id))]
    async fn mentee_confirm_completion(
        &self,
        caller: AccountId,
        match_id: MatchId,
        request_id: RequestId,
    ) -> Result<(), PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match matching::mentee_confirm_completion(&mut registry, match_id, request_id, caller) {
            Ok(events) => {
                self.publish_all(events, now).await;
                drop(registry);
                self.stats.write().await.completions_confirmed += 1;
                info!("completion confirmed, mentor reward pending");
                Ok(())
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, match_id = %match_id))]
    async fn mentee_reject_completion(
        &self,
        caller: AccountId,
        match_id: MatchId,
        request_id: RequestId,
    ) -> Result<(), PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match matching::mentee_reject_completion(&mut registry, match_id, request_id, caller) {
            Ok(events) => {
                self.publish_all(events, now).await;
                drop(registry);
                self.stats.write().await.completions_rejected += 1;
                info!("completion rejected, request closed without reward");
                Ok(())
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    #[instrument(skip(self), fields(caller = %caller, match_id = %match_id, request_id = %request_id))]
    async fn mentor_claim_reward(
        &self,
        caller: AccountId,
        match_id: MatchId,
        request_id: RequestId,
    ) -> Result<RewardReceipt, PeerHelpError> {
        let now = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        match rewards::mentor_claim_reward(
            &mut registry,
            &self.config,
            match_id,
            request_id,
            caller,
            now,
        ) {
            Ok((outcome, events)) => {
                let minted = events
                    .iter()
                    .filter(|e| matches!(e, PeerHelpEvent::TierBadgeMinted { .. }))
                    .count() as u64;
                self.publish_all(events, now).await;
                drop(registry);
                {
                    let mut stats = self.stats.write().await;
                    stats.rewards_claimed += 1;
                    stats.badges_minted += minted;
                }
                info!(
                    xp = outcome.xp_awarded,
                    tier = ?outcome.tier_advanced_to,
                    "mentor reward claimed"
                );
                Ok(outcome)
            }
            Err(err) => {
                drop(registry);
                self.reject(err).await
            }
        }
    }

    // -------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------

    async fn registry_stats(&self) -> RegistryStats {
        self.registry.read().await.stats()
    }

    async fn profile(&self, account: AccountId) -> Option<StudentProfile> {
        self.registry.read().await.profile(&account).cloned()
    }

    async fn request(&self, id: RequestId) -> Option<HelpRequest> {
        self.registry.read().await.request(id).cloned()
    }

    async fn offer(&self, id: OfferId) -> Option<HelpOffer> {
        self.registry.read().await.offer(id).cloned()
    }

    async fn match_record(&self, id: MatchId) -> Option<MatchRecord> {
        self.registry.read().await.match_record(id).cloned()
    }

    async fn badges(&self, account: AccountId) -> Vec<TierBadge> {
        self.registry.read().await.badges(&account).to_vec()
    }

    async fn open_requests(&self) -> Vec<HelpRequest> {
        self.registry
            .read()
            .await
            .open_requests()
            .into_iter()
            .cloned()
            .collect()
    }

    async fn offers_for_request(&self, id: RequestId) -> Vec<HelpOffer> {
        self.registry
            .read()
            .await
            .offers_for_request(id)
            .into_iter()
            .cloned()
            .collect()
    }
}

// =============================================================================
// TEST WIRING
// =============================================================================

/// Service wired to the in-memory adapters, plus the sink handle for event
/// assertions.
pub type TestService = PeerHelpService<InMemoryEventSink, FixedClock, StaticIdentityProvider>;

/// Creates a test service over the given identity directory.
///
/// Uses the default config, a deterministic clock starting at 1_000, and an
/// in-memory sink whose handle is returned alongside the service.
#[must_use]
pub fn create_test_service(
    identity: StaticIdentityProvider,
) -> (TestService, Arc<InMemoryEventSink>) {
    let sink = Arc::new(InMemoryEventSink::new());
    let service = PeerHelpService::new(
        PeerHelpConfig::default(),
        Arc::clone(&sink),
        Arc::new(FixedClock::new(1_000)),
        Arc::new(identity),
    );
    (service, sink)
}

// =============================================================================
// TESTS
// =============================================================================
