use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TeamNumber;

/// Uniqueness key of the credential registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryKey {
    pub team: TeamNumber,
    pub host: String,
}

impl RegistryKey {
    pub fn new(team: TeamNumber, host: impl Into<String>) -> Self {
        Self {
            team,
            host: host.into(),
        }
    }
}

/// A currently-valid credential for one (team, host) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub team: TeamNumber,
    pub ip: String,
    pub user: String,
    pub password: String,
    pub last_updated: DateTime<Utc>,
}

impl RegistryEntry {
    pub fn key(&self) -> RegistryKey {
        RegistryKey::new(self.team, self.ip.clone())
    }

    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_updated < cutoff
    }
}
