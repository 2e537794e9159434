use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, warn};

use super::ports::{RegistryPort, ScoreNotifier};
use crate::{
    api::UpsertCredentials,
    probe::CredentialTester,
    targets::HostTemplate,
    types::{CredentialPair, ProbeResult, ProbeTask, TeamNumber},
};

/// Counters for one team pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub team: TeamNumber,
    pub attempted: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
}

/// Expand every template for `team` and pair each host with every
/// credential. Hosts keep template order; credentials keep file order.
pub fn plan_pass(
    team: TeamNumber,
    templates: &[HostTemplate],
    credentials: &[CredentialPair],
) -> Vec<ProbeTask> {
    templates
        .iter()
        .map(|template| template.expand(team))
        .flat_map(|host| {
            credentials.iter().map(move |credential| {
                ProbeTask::new(team, host.clone(), credential.clone())
            })
        })
        .collect()
}

/// Fans a team's host × credential cross-product out to a
/// [`CredentialTester`] and reports every success.
///
/// Each success is upserted into the registry and announced to the scoring
/// service. The two reports run concurrently and a failure in one never
/// blocks the other or the rest of the pass.
#[derive(Clone)]
pub struct ProbeOrchestrator {
    tester: Arc<dyn CredentialTester>,
    registry: Arc<dyn RegistryPort>,
    scoring: Option<Arc<dyn ScoreNotifier>>,
    permits: Option<Arc<Semaphore>>,
}

impl fmt::Debug for ProbeOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeOrchestrator")
            .field(
                "tester",
                &std::any::type_name_of_val(self.tester.as_ref()),
            )
            .field(
                "registry",
                &std::any::type_name_of_val(self.registry.as_ref()),
            )
            .field("scoring_enabled", &self.scoring.is_some())
            .field(
                "permits_available",
                &self.permits.as_ref().map(|p| p.available_permits()),
            )
            .finish()
    }
}

impl ProbeOrchestrator {
    pub fn new(
        tester: Arc<dyn CredentialTester>,
        registry: Arc<dyn RegistryPort>,
    ) -> Self {
        Self {
            tester,
            registry,
            scoring: None,
            permits: None,
        }
    }

    pub fn with_scoring(mut self, scoring: Arc<dyn ScoreNotifier>) -> Self {
        self.scoring = Some(scoring);
        self
    }

    /// Cap concurrently running attempts. `None` (or zero) leaves the pass
    /// unbounded.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.permits = limit
            .filter(|limit| *limit > 0)
            .map(|limit| Arc::new(Semaphore::new(limit)));
        self
    }

    pub fn registry(&self) -> Arc<dyn RegistryPort> {
        Arc::clone(&self.registry)
    }

    /// Probe every (host, credential) pair of `team` concurrently and wait
    /// until all attempts and their success reports have finished.
    pub async fn run_pass(
        &self,
        team: TeamNumber,
        templates: &[HostTemplate],
        credentials: &[CredentialPair],
    ) -> PassSummary {
        let started = Instant::now();
        let tasks = plan_pass(team, templates, credentials);
        let attempted = tasks.len();

        debug!(target: "scan::pass", team, attempted, "dispatching team pass");

        let mut set = JoinSet::new();
        for task in tasks {
            let tester = Arc::clone(&self.tester);
            let registry = Arc::clone(&self.registry);
            let scoring = self.scoring.clone();
            let permits = self.permits.clone();

            set.spawn(async move {
                // The semaphore is never closed, so acquisition only fails
                // if that invariant breaks; fall through unbounded then.
                let _permit = match permits {
                    Some(permits) => permits.acquire_owned().await.ok(),
                    None => None,
                };

                let result = tester.attempt(&task).await;
                if !result.succeeded {
                    return false;
                }
                report_success(&result, registry.as_ref(), scoring.as_deref())
                    .await;
                true
            });
        }

        let mut succeeded = 0usize;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(true) => succeeded += 1,
                Ok(false) => {}
                Err(error) => warn!(
                    target: "scan::pass",
                    team,
                    %error,
                    "probe task aborted"
                ),
            }
        }

        let summary = PassSummary {
            team,
            attempted,
            succeeded,
            elapsed: started.elapsed(),
        };
        info!(
            target: "scan::pass",
            team,
            attempted,
            succeeded,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "team pass complete"
        );
        summary
    }
}

async fn report_success(
    result: &ProbeResult,
    registry: &dyn RegistryPort,
    scoring: Option<&dyn ScoreNotifier>,
) {
    let update =
        UpsertCredentials::new(result.team, result.host.clone(), &result.credential);

    let record = async {
        match registry.upsert(&update).await {
            Ok(()) => debug!(
                target: "scan::report",
                team = result.team,
                host = %result.host,
                "registry updated"
            ),
            Err(error) => warn!(
                target: "scan::report",
                team = result.team,
                host = %result.host,
                %error,
                "registry update failed"
            ),
        }
    };

    let announce = async {
        let Some(scoring) = scoring else { return };
        match scoring.notify(&result.host).await {
            Ok(()) => debug!(
                target: "scan::report",
                host = %result.host,
                "scoring callback delivered"
            ),
            Err(error) => warn!(
                target: "scan::report",
                host = %result.host,
                %error,
                "scoring callback failed"
            ),
        }
    };

    futures::join!(record, announce);
}
