use std::{ops::RangeInclusive, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::orchestrator::{PassSummary, ProbeOrchestrator};
use crate::{
    targets::HostTemplate,
    types::{CredentialPair, TeamNumber},
};

/// Back-off between passes that had nothing to probe, so an empty host or
/// credential list does not spin against the registry.
const EMPTY_PASS_BACKOFF: Duration = Duration::from_secs(1);

/// Which teams a pass covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSelection {
    /// One designated team.
    Single(TeamNumber),
    /// Teams `1..=n`.
    Range(TeamNumber),
}

impl TeamSelection {
    pub fn teams(&self) -> RangeInclusive<TeamNumber> {
        match *self {
            Self::Single(team) => team..=team,
            Self::Range(count) => 1..=count,
        }
    }
}

/// Totals accumulated by [`ScanLoop::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Completed passes, each ending with a registry prune.
    pub passes: usize,
    pub attempted: usize,
    pub succeeded: usize,
    /// Whether the loop ended because of the shutdown token.
    pub cancelled: bool,
}

impl ScanReport {
    fn record(&mut self, summary: &PassSummary) {
        self.attempted += summary.attempted;
        self.succeeded += summary.succeeded;
    }
}

/// Drives [`ProbeOrchestrator::run_pass`] over every selected team, prunes
/// the registry, and repeats until cancelled.
///
/// Teams are processed one after another; team `n + 1` (and the prune) only
/// starts once team `n`'s attempts and reports are finished.
#[derive(Debug)]
pub struct ScanLoop {
    orchestrator: ProbeOrchestrator,
    selection: TeamSelection,
    templates: Arc<[HostTemplate]>,
    credentials: Arc<[CredentialPair]>,
    max_passes: Option<usize>,
}

impl ScanLoop {
    pub fn new(
        orchestrator: ProbeOrchestrator,
        selection: TeamSelection,
        templates: Vec<HostTemplate>,
        credentials: Vec<CredentialPair>,
    ) -> Self {
        Self {
            orchestrator,
            selection,
            templates: templates.into(),
            credentials: credentials.into(),
            max_passes: None,
        }
    }

    /// Stop on its own after `passes` full passes.
    pub fn with_max_passes(mut self, passes: Option<usize>) -> Self {
        self.max_passes = passes;
        self
    }

    pub fn selection(&self) -> TeamSelection {
        self.selection
    }

    /// Run passes until `shutdown` fires or the pass limit is reached.
    ///
    /// Cancellation drops the in-progress team pass. Subprocesses that were
    /// already launched are left to finish against their own timeouts.
    pub async fn run(&self, shutdown: CancellationToken) -> ScanReport {
        let mut report = ScanReport::default();

        info!(
            target: "scan::pass",
            teams = ?self.selection.teams(),
            hosts = self.templates.len(),
            credentials = self.credentials.len(),
            "scan loop starting"
        );

        loop {
            if self.max_passes.is_some_and(|max| report.passes >= max) {
                break;
            }
            if shutdown.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let attempted_before = report.attempted;
            for team in self.selection.teams() {
                let pass = self.orchestrator.run_pass(
                    team,
                    &self.templates,
                    &self.credentials,
                );
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        report.cancelled = true;
                        info!(target: "scan::pass", team, "scan interrupted mid-pass");
                        return report;
                    }
                    summary = pass => report.record(&summary),
                }
            }

            let registry = self.orchestrator.registry();
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    report.cancelled = true;
                    return report;
                }
                pruned = registry.prune() => match pruned {
                    Ok(()) => debug!(target: "scan::pass", "registry pruned"),
                    Err(error) => warn!(
                        target: "scan::pass",
                        %error,
                        "registry prune failed"
                    ),
                },
            }

            report.passes += 1;
            info!(
                target: "scan::pass",
                pass = report.passes,
                succeeded = report.succeeded,
                "completed a pass over all teams"
            );

            if report.attempted == attempted_before {
                tokio::select! {
                    _ = shutdown.cancelled() => {}
                    _ = tokio::time::sleep(EMPTY_PASS_BACKOFF) => {}
                }
            }
        }

        report
    }
}
