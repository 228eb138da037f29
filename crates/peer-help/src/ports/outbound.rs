//! # Driven Ports (Outbound)
//!
//! Interfaces the peer-help subsystem depends on. External adapters
//! implement these traits to provide:
//! - event publication (the replay seam for asynchronous observers)
//! - wall-clock time
//! - verified external identities at profile creation

use crate::domain::value_objects::{AccountId, Timestamp};
use crate::events::EventRecord;
use async_trait::async_trait;

// =============================================================================
// EVENT SINK
// =============================================================================

/// Receives one record per committed transition, in commit order.
///
/// Publication is fire-and-forget from the core's point of view: a slow or
/// lossy sink must never unwind a transition that already committed, so the
/// method has no error channel.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes a committed event record.
    async fn publish(&self, record: EventRecord);
}

// =============================================================================
// CLOCK
// =============================================================================

/// Wall-clock source for `created_at` / `minted_at` fields.
///
/// The domain never reads time itself; every timestamp enters through this
/// port, which keeps operations replayable under a fixed clock in tests.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since UNIX epoch.
    fn now_ms(&self) -> Timestamp;
}

// =============================================================================
// IDENTITY PROVIDER
// =============================================================================

/// A verified external identity, resolved once at profile creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Display name to seed the profile with.
    pub display_name: String,
    /// Verified login handle at the external provider.
    pub external_login: String,
}

/// Maps a caller to its verified external handle.
///
/// Consulted only by `create_profile`; later calls trust the stored handle
/// and never revalidate.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the verified identity for `account`, or None when the
    /// provider has no verified handle for it.
    async fn resolve(&self, account: &AccountId) -> Option<VerifiedIdentity>;
}
