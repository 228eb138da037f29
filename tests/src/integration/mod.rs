//! Cross-component integration tests.

pub mod choreography;
pub mod concurrency;
pub mod properties;

use peer_help::prelude::*;

/// Deterministic account from a single byte.
#[must_use]
pub fn account(byte: u8) -> AccountId {
    AccountId::new([byte; 32])
}

/// Installs a test log subscriber once; later calls are no-ops.
#[cfg(test)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Identity directory with one verified handle per listed byte.
#[must_use]
pub fn directory(accounts: &[u8]) -> StaticIdentityProvider {
    let mut provider = StaticIdentityProvider::new();
    for byte in accounts {
        provider.register(
            account(*byte),
            format!("student-{byte:02x}"),
            format!("login{byte:02x}"),
        );
    }
    provider
}
