use std::time::Duration;

use super::{CredentialPair, TeamNumber};

/// One credential attempt against one concrete host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTask {
    pub team: TeamNumber,
    pub host: String,
    pub credential: CredentialPair,
}

impl ProbeTask {
    pub fn new(
        team: TeamNumber,
        host: impl Into<String>,
        credential: CredentialPair,
    ) -> Self {
        Self {
            team,
            host: host.into(),
            credential,
        }
    }
}

/// Outcome of a single [`ProbeTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub team: TeamNumber,
    pub host: String,
    pub credential: CredentialPair,
    pub succeeded: bool,
    /// Trimmed stderr or the launch error when the attempt did not succeed.
    pub diagnostic: Option<String>,
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn success(task: &ProbeTask, elapsed: Duration) -> Self {
        Self {
            team: task.team,
            host: task.host.clone(),
            credential: task.credential.clone(),
            succeeded: true,
            diagnostic: None,
            elapsed,
        }
    }

    pub fn failure(
        task: &ProbeTask,
        diagnostic: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            team: task.team,
            host: task.host.clone(),
            credential: task.credential.clone(),
            succeeded: false,
            diagnostic: diagnostic.filter(|d| !d.is_empty()),
            elapsed,
        }
    }
}
