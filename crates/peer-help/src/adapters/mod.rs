//! # Adapters
//!
//! In-process implementations of the outbound ports: an in-memory event log,
//! system and fixed clocks, and a preloaded identity directory. These are
//! what tests and single-process deployments wire into the service.

use crate::domain::value_objects::{AccountId, Timestamp};
use crate::events::EventRecord;
use crate::ports::outbound::{Clock, EventSink, IdentityProvider, VerifiedIdentity};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

// =============================================================================
// IN-MEMORY EVENT SINK
// =============================================================================

/// Ordered, append-only event log.
///
/// Records arrive in commit order; observers snapshot the log instead of
/// re-reading entities, the same replay pattern a ledger poller uses.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    records: RwLock<Vec<EventRecord>>,
}

impl InMemoryEventSink {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records published so far, in commit order.
    pub async fn records(&self) -> Vec<EventRecord> {
        self.records.read().await.clone()
    }

    /// Number of records published so far.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True if nothing was published yet.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn publish(&self, record: EventRecord) {
        self.records.write().await.push(record);
    }
}

// =============================================================================
// CLOCKS
// =============================================================================

/// Wall-clock backed by `SystemTime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Deterministic clock that ticks one millisecond per reading.
///
/// Strictly monotone so `created_at` ordering in tests mirrors call order.
#[derive(Debug)]
pub struct FixedClock {
    now: AtomicU64,
}

impl FixedClock {
    /// Creates a clock starting at `start_ms`.
    #[must_use]
    pub fn new(start_ms: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Timestamp {
        self.now.fetch_add(1, Ordering::Relaxed)
    }
}

// =============================================================================
// STATIC IDENTITY PROVIDER
// =============================================================================

/// Identity directory preloaded with verified handles.
///
/// Stands in for the external OAuth provider: accounts registered here
/// resolve, everything else is unverified.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    identities: HashMap<AccountId, VerifiedIdentity>,
}

impl StaticIdentityProvider {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a verified handle for `account`.
    pub fn register(
        &mut self,
        account: AccountId,
        display_name: impl Into<String>,
        external_login: impl Into<String>,
    ) {
        self.identities.insert(
            account,
            VerifiedIdentity {
                display_name: display_name.into(),
                external_login: external_login.into(),
            },
        );
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(
        mut self,
        account: AccountId,
        display_name: impl Into<String>,
        external_login: impl Into<String>,
    ) -> Self {
        self.register(account, display_name, external_login);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, account: &AccountId) -> Option<VerifiedIdentity> {
        self.identities.get(account).cloned()
    }
}

// =============================================================================
// TESTS
// =============================================================================
