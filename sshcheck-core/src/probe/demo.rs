use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use super::CredentialTester;
use crate::types::{ProbeResult, ProbeTask};

/// Reports every attempt as successful after `delay`.
///
/// Exercises the orchestrator, registry and scoring pipeline without
/// touching real infrastructure.
#[derive(Debug, Clone)]
pub struct DemoCredentialTester {
    delay: Duration,
}

impl DemoCredentialTester {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CredentialTester for DemoCredentialTester {
    async fn attempt(&self, task: &ProbeTask) -> ProbeResult {
        let started = Instant::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!(
            target: "scan::probe",
            team = task.team,
            host = %task.host,
            user = %task.credential.username,
            "demo attempt succeeded"
        );
        ProbeResult::success(task, started.elapsed())
    }
}
