//! # Registry - Entity Catalog and Aggregate Counters
//!
//! Root of the data model. Owns every entity, the per-request difficulty
//! voter sets, the monotonic counters, and id allocation.
//!
//! ## Data structures
//!
//! - `profiles`: one profile per identity, O(1) by account
//! - `requests` / `offers` / `matches`: O(1) by id
//! - `badges_by_owner`: append-only badge lists per identity
//! - `difficulty_voters`: per-request voter sets, kept outside the
//!   `HelpRequest` entity so vote idempotence stays decoupled from the
//!   entity's wire shape
//!
//! The Registry is an explicitly-owned aggregate passed by reference into
//! every operation, never process-global state; multiple independent
//! registries coexist in one test run.

use crate::domain::entities::{
    HelpOffer, HelpRequest, MatchRecord, RegistryStats, StudentProfile, TierBadge,
};
use crate::domain::errors::PeerHelpError;
use crate::domain::value_objects::{AccountId, BadgeId, MatchId, OfferId, RequestId};
use std::collections::{HashMap, HashSet};

/// The authoritative catalog of peer-help entities.
#[derive(Debug, Default)]
pub struct Registry {
    /// Aggregate counters. Monotonically increasing.
    stats: RegistryStats,

    /// Profiles indexed by owning identity.
    profiles: HashMap<AccountId, StudentProfile>,

    /// Requests indexed by id.
    requests: HashMap<RequestId, HelpRequest>,

    /// Offers indexed by id.
    offers: HashMap<OfferId, HelpOffer>,

    /// Match records indexed by id.
    matches: HashMap<MatchId, MatchRecord>,

    /// Minted badges per identity, in mint order.
    badges_by_owner: HashMap<AccountId, Vec<TierBadge>>,

    /// Identities that have voted on each request's difficulty.
    difficulty_voters: HashMap<RequestId, HashSet<AccountId>>,

    /// Next ids to allocate. Ids start at 1; 0 is never issued.
    next_request_id: u64,
    next_offer_id: u64,
    next_match_id: u64,
    next_badge_id: u64,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: RegistryStats::default(),
            profiles: HashMap::new(),
            requests: HashMap::new(),
            offers: HashMap::new(),
            matches: HashMap::new(),
            badges_by_owner: HashMap::new(),
            difficulty_voters: HashMap::new(),
            next_request_id: 1,
            next_offer_id: 1,
            next_match_id: 1,
            next_badge_id: 1,
        }
    }

    // -------------------------------------------------------------------------
    // Counters
    // -------------------------------------------------------------------------

    /// Current aggregate counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    pub(crate) fn count_request(&mut self) {
        self.stats.total_requests += 1;
    }

    pub(crate) fn count_match(&mut self) {
        self.stats.total_matches += 1;
    }

    pub(crate) fn count_completion(&mut self) {
        self.stats.total_completions += 1;
    }

    // -------------------------------------------------------------------------
    // Id allocation
    // -------------------------------------------------------------------------

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        id
    }

    pub(crate) fn allocate_offer_id(&mut self) -> OfferId {
        let id = OfferId(self.next_offer_id);
        self.next_offer_id += 1;
        id
    }

    pub(crate) fn allocate_match_id(&mut self) -> MatchId {
        let id = MatchId(self.next_match_id);
        self.next_match_id += 1;
        id
    }

    pub(crate) fn allocate_badge_id(&mut self) -> BadgeId {
        let id = BadgeId(self.next_badge_id);
        self.next_badge_id += 1;
        id
    }

    // -------------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------------

    /// Returns true if `account` has a profile.
    #[must_use]
    pub fn has_profile(&self, account: &AccountId) -> bool {
        self.profiles.contains_key(account)
    }

    /// Gets a profile by owning identity.
    #[must_use]
    pub fn profile(&self, account: &AccountId) -> Option<&StudentProfile> {
        self.profiles.get(account)
    }

    /// Gets a profile or fails `ProfileNotFound`.
    pub fn profile_or_err(&self, account: &AccountId) -> Result<&StudentProfile, PeerHelpError> {
        self.profiles
            .get(account)
            .ok_or(PeerHelpError::ProfileNotFound(*account))
    }

    pub(crate) fn profile_mut_or_err(
        &mut self,
        account: &AccountId,
    ) -> Result<&mut StudentProfile, PeerHelpError> {
        self.profiles
            .get_mut(account)
            .ok_or(PeerHelpError::ProfileNotFound(*account))
    }

    pub(crate) fn insert_profile(&mut self, profile: StudentProfile) {
        self.profiles.insert(profile.owner, profile);
    }

    /// Number of profiles ever created.
    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Gets a request by id.
    #[must_use]
    pub fn request(&self, id: RequestId) -> Option<&HelpRequest> {
        self.requests.get(&id)
    }

    /// Gets a request or fails `RequestNotFound`.
    pub fn request_or_err(&self, id: RequestId) -> Result<&HelpRequest, PeerHelpError> {
        self.requests
            .get(&id)
            .ok_or(PeerHelpError::RequestNotFound(id))
    }

    pub(crate) fn request_mut_or_err(
        &mut self,
        id: RequestId,
    ) -> Result<&mut HelpRequest, PeerHelpError> {
        self.requests
            .get_mut(&id)
            .ok_or(PeerHelpError::RequestNotFound(id))
    }

    pub(crate) fn insert_request(&mut self, request: HelpRequest) {
        self.requests.insert(request.id, request);
    }

    /// All open requests, newest first. The polling surface the client
    /// refreshes its board from.
    #[must_use]
    pub fn open_requests(&self) -> Vec<&HelpRequest> {
        let mut open: Vec<&HelpRequest> = self.requests.values().filter(|r| r.is_open()).collect();
        open.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        open
    }

    /// Iterates all requests (unordered).
    pub fn requests(&self) -> impl Iterator<Item = &HelpRequest> {
        self.requests.values()
    }

    // -------------------------------------------------------------------------
    // Offers
    // -------------------------------------------------------------------------

    /// Gets an offer by id.
    #[must_use]
    pub fn offer(&self, id: OfferId) -> Option<&HelpOffer> {
        self.offers.get(&id)
    }

    /// Gets an offer or fails `OfferNotFound`.
    pub fn offer_or_err(&self, id: OfferId) -> Result<&HelpOffer, PeerHelpError> {
        self.offers.get(&id).ok_or(PeerHelpError::OfferNotFound(id))
    }

    pub(crate) fn offer_mut_or_err(
        &mut self,
        id: OfferId,
    ) -> Result<&mut HelpOffer, PeerHelpError> {
        self.offers
            .get_mut(&id)
            .ok_or(PeerHelpError::OfferNotFound(id))
    }

    pub(crate) fn insert_offer(&mut self, offer: HelpOffer) {
        self.offers.insert(offer.id, offer);
    }

    /// Offers on one request, in arrival order.
    #[must_use]
    pub fn offers_for_request(&self, id: RequestId) -> Vec<&HelpOffer> {
        match self.requests.get(&id) {
            Some(request) => request
                .offers
                .iter()
                .filter_map(|offer_id| self.offers.get(offer_id))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Iterates all offers (unordered).
    pub fn offers(&self) -> impl Iterator<Item = &HelpOffer> {
        self.offers.values()
    }

    // -------------------------------------------------------------------------
    // Matches
    // -------------------------------------------------------------------------

    /// Gets a match record by id.
    #[must_use]
    pub fn match_record(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.get(&id)
    }

    /// Gets a match record or fails `MatchNotFound`.
    pub fn match_or_err(&self, id: MatchId) -> Result<&MatchRecord, PeerHelpError> {
        self.matches.get(&id).ok_or(PeerHelpError::MatchNotFound(id))
    }

    pub(crate) fn match_mut_or_err(
        &mut self,
        id: MatchId,
    ) -> Result<&mut MatchRecord, PeerHelpError> {
        self.matches
            .get_mut(&id)
            .ok_or(PeerHelpError::MatchNotFound(id))
    }

    pub(crate) fn insert_match(&mut self, record: MatchRecord) {
        self.matches.insert(record.id, record);
    }

    /// Iterates all match records (unordered).
    pub fn matches(&self) -> impl Iterator<Item = &MatchRecord> {
        self.matches.values()
    }

    // -------------------------------------------------------------------------
    // Badges
    // -------------------------------------------------------------------------

    /// Badges minted to `account`, in mint order.
    #[must_use]
    pub fn badges(&self, account: &AccountId) -> &[TierBadge] {
        self.badges_by_owner
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn append_badge(&mut self, badge: TierBadge) {
        self.badges_by_owner.entry(badge.owner).or_default().push(badge);
    }

    // -------------------------------------------------------------------------
    // Difficulty voters
    // -------------------------------------------------------------------------

    /// Returns true if `voter` already voted on `request_id`.
    #[must_use]
    pub fn has_voted(&self, request_id: RequestId, voter: &AccountId) -> bool {
        self.difficulty_voters
            .get(&request_id)
            .is_some_and(|voters| voters.contains(voter))
    }

    /// Records a vote. Returns false if the voter was already present.
    pub(crate) fn record_voter(&mut self, request_id: RequestId, voter: AccountId) -> bool {
        self.difficulty_voters
            .entry(request_id)
            .or_default()
            .insert(voter)
    }
}

// =============================================================================
// TESTS
// =============================================================================
