//! Ledger configuration.
//!
//! Validation limits and reward scaling, owned by the service and threaded
//! into the domain operations that need them.

/// Peer-help configuration.
#[derive(Clone, Debug)]
pub struct PeerHelpConfig {
    /// Maximum request title length in bytes.
    pub max_title_len: usize,
    /// Maximum request description length in bytes.
    pub max_description_len: usize,
    /// Maximum offer message length in bytes. Messages may be empty.
    pub max_message_len: usize,
    /// XP awarded per point of community difficulty.
    pub xp_per_difficulty: u64,
    /// Community votes before `community_difficulty` is surfaced as
    /// trustworthy. Informational threshold, never a transition gate.
    pub vote_quorum: u64,
}

impl Default for PeerHelpConfig {
    fn default() -> Self {
        Self {
            max_title_len: 100,
            max_description_len: 2000,
            max_message_len: 500,
            xp_per_difficulty: 10,
            vote_quorum: 2,
        }
    }
}

impl PeerHelpConfig {
    /// Creates a minimal config for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            max_title_len: 32,
            max_description_len: 64,
            max_message_len: 32,
            ..Default::default()
        }
    }
}
