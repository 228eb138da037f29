//! # Driving Ports (Inbound)
//!
//! The API this subsystem offers its clients. Every mutating call is
//! attributed to a caller identity, commits atomically or fails with a
//! typed error and no effects, and emits event records through the
//! outbound sink on success.

use crate::domain::entities::{
    HelpOffer, HelpRequest, MatchRecord, RegistryStats, StudentProfile, TierBadge,
};
use crate::domain::errors::PeerHelpError;
use crate::domain::value_objects::{AccountId, MatchId, OfferId, RequestId, Topic};
use crate::service::RewardReceipt;
use async_trait::async_trait;

/// The peer-help ledger API.
///
/// Read accessors return owned snapshots; they are pure and never observe a
/// transition mid-flight.
#[async_trait]
pub trait PeerHelpApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Mutating calls
    // -------------------------------------------------------------------------

    /// Creates the caller's profile from its verified external identity.
    async fn create_profile(&self, caller: AccountId)
        -> Result<StudentProfile, PeerHelpError>;

    /// Opens a help request.
    async fn create_request(
        &self,
        caller: AccountId,
        topic: Topic,
        title: String,
        description: String,
        initial_difficulty: u8,
    ) -> Result<RequestId, PeerHelpError>;

    /// Casts a community difficulty vote; returns the new running average.
    async fn vote_difficulty(
        &self,
        caller: AccountId,
        request_id: RequestId,
        vote: u8,
    ) -> Result<u8, PeerHelpError>;

    /// Offers help on an open request.
    async fn create_offer(
        &self,
        caller: AccountId,
        request_id: RequestId,
        message: String,
        competency_level: u8,
    ) -> Result<OfferId, PeerHelpError>;

    /// Accepts one pending offer, rejecting every other pending offer on
    /// the request in the same unit.
    async fn accept_offer(
        &self,
        caller: AccountId,
        request_id: RequestId,
        offer_id: OfferId,
    ) -> Result<MatchId, PeerHelpError>;

    /// Confirms a successful completion as the mentee.
    async fn mentee_confirm_completion(
        &self,
        caller: AccountId,
        match_id: MatchId,
        request_id: RequestId,
    ) -> Result<(), PeerHelpError>;

    /// Closes the request as failed as the mentee. Terminal; forecloses the
    /// mentor reward.
    async fn mentee_reject_completion(
        &self,
        caller: AccountId,
        match_id: MatchId,
        request_id: RequestId,
    ) -> Result<(), PeerHelpError>;

    /// Claims the mentor reward for a confirmed completion.
    async fn mentor_claim_reward(
        &self,
        caller: AccountId,
        match_id: MatchId,
        request_id: RequestId,
    ) -> Result<RewardReceipt, PeerHelpError>;

    // -------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------

    /// Aggregate counters.
    async fn registry_stats(&self) -> RegistryStats;

    /// Profile snapshot by identity.
    async fn profile(&self, account: AccountId) -> Option<StudentProfile>;

    /// Request snapshot by id.
    async fn request(&self, id: RequestId) -> Option<HelpRequest>;

    /// Offer snapshot by id.
    async fn offer(&self, id: OfferId) -> Option<HelpOffer>;

    /// Match record snapshot by id.
    async fn match_record(&self, id: MatchId) -> Option<MatchRecord>;

    /// Badges minted to an identity, in mint order.
    async fn badges(&self, account: AccountId) -> Vec<TierBadge>;

    /// Open requests, newest first.
    async fn open_requests(&self) -> Vec<HelpRequest>;

    /// Offers on one request, in arrival order.
    async fn offers_for_request(&self, id: RequestId) -> Vec<HelpOffer>;
}
