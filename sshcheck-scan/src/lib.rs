//! # sshcheck scan
//!
//! Operator entry point: loads the host templates and credential list,
//! builds the configured credential tester and reporters, and drives the
//! scan loop until interrupted.

pub mod cli;
pub mod settings;
pub mod validation;

use std::sync::Arc;

use anyhow::Context;
use sshcheck_core::{
    orchestration::{ProbeOrchestrator, ScanLoop, ScanReport},
    probe::{ProbeMode, PunishmentTrigger, build_tester},
    registry::RegistryClient,
    scoring::PwnboardNotifier,
    targets::{load_credentials, load_host_templates},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

pub use cli::{Cli, ScanMode};
pub use settings::{SettingsSource, load_settings};
pub use validation::{ConfigError, validate};

/// Build the scan loop described by `cli`.
///
/// Every configuration problem (missing input files, bad URLs, unreadable
/// settings) surfaces here, before any probe is attempted.
pub fn prepare(cli: &Cli) -> anyhow::Result<ScanLoop> {
    validate(cli).context("invalid scan configuration")?;

    let (settings, source) = load_settings(cli.settings.as_deref())?;
    match &source {
        SettingsSource::File(path) => {
            info!(path = %path.display(), "probe settings loaded from file")
        }
        SettingsSource::EnvInline => {
            info!("probe settings loaded from inline environment json")
        }
        SettingsSource::Defaults => info!("using default probe settings"),
    }

    let credentials = load_credentials(&cli.creds_file)
        .context("failed to load credential file")?;
    let templates = load_host_templates(&cli.ip_file_path)
        .context("failed to load host template file")?;
    if credentials.is_empty() || templates.is_empty() {
        warn!(
            credentials = credentials.len(),
            hosts = templates.len(),
            "nothing to probe; passes will only prune the registry"
        );
    }

    let mode = cli.probe_mode();
    let punishment = match (&cli.punish_script, mode) {
        (Some(path), ProbeMode::Live) => Some(
            PunishmentTrigger::load(path, settings.punish_timeout)
                .context("failed to read punish script")?,
        ),
        (Some(path), ProbeMode::Demo) => {
            warn!(
                path = %path.display(),
                "punish script ignored in demo mode"
            );
            None
        }
        (None, _) => None,
    };
    let tester = build_tester(mode, &settings, cli.proxychains, punishment);

    let registry = RegistryClient::new(&cli.dashboard_url, settings.http_timeout)
        .context("failed to build registry client")?;
    let scoring = PwnboardNotifier::new(
        &cli.pwnboard_host,
        settings.http_timeout,
        settings.pwnboard_accept_invalid_certs,
    )
    .context("failed to build pwnboard client")?;

    info!(
        mode = ?cli.mode,
        probe_mode = ?mode,
        teams = ?cli.selection().teams(),
        dashboard = %registry.base_url(),
        pwnboard = %scoring.endpoint(),
        proxychains = cli.proxychains,
        connect_timeout = %humantime::format_duration(settings.connect_timeout),
        max_concurrent_probes = ?settings.max_concurrent_probes,
        "scan configuration in effect"
    );

    let orchestrator = ProbeOrchestrator::new(tester, Arc::new(registry))
        .with_scoring(Arc::new(scoring))
        .with_max_concurrency(settings.max_concurrent_probes);

    Ok(ScanLoop::new(orchestrator, cli.selection(), templates, credentials)
        .with_max_passes(cli.max_passes))
}

/// Prepare and run the scan loop until `shutdown` fires or the pass limit
/// is reached.
pub async fn run(
    cli: &Cli,
    shutdown: CancellationToken,
) -> anyhow::Result<ScanReport> {
    let scan = prepare(cli)?;
    let report = scan.run(shutdown).await;
    info!(
        target: "scan::pass",
        passes = report.passes,
        attempted = report.attempted,
        succeeded = report.succeeded,
        interrupted = report.cancelled,
        "scan stopped"
    );
    Ok(report)
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `debug`.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "info,scan=debug,registry=debug,sshcheck_core=debug,sshcheck_scan=debug"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
