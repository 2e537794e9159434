//! The credential registry: an upsert-and-expire store keyed by
//! (team, host), plus the HTTP client used to reach a remote instance.

pub mod client;
pub mod store;

use std::time::Duration;

pub use client::RegistryClient;
pub use store::CredentialRegistry;

/// Entries older than this are pruned unless configured otherwise.
pub const DEFAULT_STALENESS: Duration = Duration::from_secs(60);
