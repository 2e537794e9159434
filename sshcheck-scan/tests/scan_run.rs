use std::{fs, path::Path, time::Duration};

use clap::Parser;
use sshcheck_scan::{Cli, run};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Nothing listens on the discard port, so every report fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hosts.txt"), "10.X.1.1\n# jump box\n10.0.0.5\n")
        .unwrap();
    fs::write(
        dir.path().join("creds.txt"),
        "root:toor\nmalformed\nadmin:pass:with:colons\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("probe.toml"),
        "demo_delay = \"0s\"\nhttp_timeout = \"1s\"\n",
    )
    .unwrap();
    dir
}

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "sshcheck-scan".to_string(),
        "-f".to_string(),
        dir.join("hosts.txt").display().to_string(),
        "-c".to_string(),
        dir.join("creds.txt").display().to_string(),
        "--dashboard-url".to_string(),
        UNREACHABLE.to_string(),
        "-p".to_string(),
        format!("{UNREACHABLE}/pwn/boxaccess"),
        "--settings".to_string(),
        dir.join("probe.toml").display().to_string(),
    ];
    args.extend(extra.iter().map(|arg| arg.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn demo_pass_survives_an_unreachable_registry() {
    let dir = workspace();
    let cli = cli(dir.path(), &["--demo", "-n", "2", "--max-passes", "1"]);

    let report = tokio::time::timeout(
        Duration::from_secs(30),
        run(&cli, CancellationToken::new()),
    )
    .await
    .expect("scan finished")
    .unwrap();

    // 2 teams x 2 hosts x 2 valid credentials
    assert_eq!(report.passes, 1);
    assert_eq!(report.attempted, 8);
    assert_eq!(report.succeeded, 8);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn single_mode_probes_only_the_chosen_team() {
    let dir = workspace();
    let cli = cli(
        dir.path(),
        &["--demo", "-m", "single", "-t", "3", "--max-passes", "2"],
    );

    let report = run(&cli, CancellationToken::new()).await.unwrap();

    assert_eq!(report.passes, 2);
    assert_eq!(report.attempted, 8);
}

#[tokio::test]
async fn interrupt_before_start_exits_cleanly() {
    let dir = workspace();
    let cli = cli(dir.path(), &["--demo"]);
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let report = run(&cli, shutdown).await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.passes, 0);
}

#[tokio::test]
async fn missing_input_file_fails_before_scanning() {
    let dir = workspace();
    fs::remove_file(dir.path().join("creds.txt")).unwrap();
    let cli = cli(dir.path(), &["--demo", "--max-passes", "1"]);

    let err = run(&cli, CancellationToken::new()).await.unwrap_err();

    assert!(
        format!("{err:#}").contains("credential file"),
        "unexpected error: {err:#}"
    );
}
