use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sshcheck_core::{
    orchestration::TeamSelection, probe::ProbeMode, types::TeamNumber,
};

/// Which teams each pass covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ScanMode {
    /// Only `--team-number`.
    Single,
    /// Teams `1..=--num-teams`.
    #[default]
    Multiple,
    /// Same sweep as `multiple`, kept for existing launch scripts.
    #[value(alias = "host_across_teams")]
    HostAcrossTeams,
}

/// Continuously probe team hosts for working SSH credentials and report them
/// to the credential registry.
#[derive(Parser, Debug, Clone)]
#[command(name = "sshcheck-scan", version)]
pub struct Cli {
    /// Mode of operation
    #[arg(
        short,
        long,
        env = "SSHCHECK_MODE",
        value_enum,
        default_value_t = ScanMode::Multiple
    )]
    pub mode: ScanMode,

    /// Team probed in single mode
    #[arg(
        short,
        long,
        alias = "team_number",
        env = "SSHCHECK_TEAM_NUMBER",
        default_value_t = 5
    )]
    pub team_number: TeamNumber,

    /// Number of teams probed in multiple modes
    #[arg(
        short,
        long,
        alias = "num_teams",
        env = "SSHCHECK_NUM_TEAMS",
        default_value_t = 10
    )]
    pub num_teams: TeamNumber,

    /// Scoring callback receiving `{ip, type: "bash"}` for each success
    #[arg(
        short,
        long,
        alias = "pwnboard_host",
        env = "SSHCHECK_PWNBOARD_HOST",
        default_value = "https://127.0.0.1/pwn/boxaccess"
    )]
    pub pwnboard_host: String,

    /// Host templates, one per line, `X` replaced by the team number
    #[arg(short = 'f', long, alias = "ip_file_path", env = "SSHCHECK_IP_FILE")]
    pub ip_file_path: PathBuf,

    /// Credentials in `username:password` format, one per line
    #[arg(short, long, alias = "creds_file", env = "SSHCHECK_CREDS_FILE")]
    pub creds_file: PathBuf,

    /// Base URL of the credential registry
    #[arg(long, alias = "dashboard_url", env = "SSHCHECK_DASHBOARD_URL")]
    pub dashboard_url: String,

    /// Simulate successful checks without connecting anywhere
    #[arg(long, env = "SSHCHECK_DEMO", default_value_t = false)]
    pub demo: bool,

    /// Route probes through the configured proxy wrapper
    #[arg(long, env = "SSHCHECK_PROXYCHAINS", default_value_t = false)]
    pub proxychains: bool,

    /// Script piped to `bash -s` on every host with a confirmed credential
    #[arg(long, alias = "punish_script", env = "SSHCHECK_PUNISH_SCRIPT")]
    pub punish_script: Option<PathBuf>,

    /// Stop after this many passes instead of running until interrupted
    #[arg(long, env = "SSHCHECK_MAX_PASSES")]
    pub max_passes: Option<usize>,

    /// Probe tuning file (TOML or JSON)
    #[arg(long, env = "SSHCHECK_SETTINGS_PATH")]
    pub settings: Option<PathBuf>,

    /// Enable debug messages
    #[arg(long, env = "SSHCHECK_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Cli {
    pub fn selection(&self) -> TeamSelection {
        match self.mode {
            ScanMode::Single => TeamSelection::Single(self.team_number),
            ScanMode::Multiple | ScanMode::HostAcrossTeams => {
                TeamSelection::Range(self.num_teams)
            }
        }
    }

    pub fn probe_mode(&self) -> ProbeMode {
        if self.demo {
            ProbeMode::Demo
        } else {
            ProbeMode::Live
        }
    }
}
