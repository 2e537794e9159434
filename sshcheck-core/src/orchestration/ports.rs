use async_trait::async_trait;

use crate::{api::UpsertCredentials, error::Result};

/// Where confirmed credentials are recorded and stale ones expired.
///
/// Implemented by the HTTP registry client and by the in-process registry
/// store.
#[async_trait]
pub trait RegistryPort: Send + Sync {
    async fn upsert(&self, update: &UpsertCredentials) -> Result<()>;

    /// Drop entries older than the registry's staleness threshold.
    async fn prune(&self) -> Result<()>;
}

/// External scoring service told about every host we can log into.
#[async_trait]
pub trait ScoreNotifier: Send + Sync {
    async fn notify(&self, host: &str) -> Result<()>;
}
