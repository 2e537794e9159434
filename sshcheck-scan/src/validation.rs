use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::cli::Cli;

/// Startup checks that must pass before the scan loop begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{kind} file {path} does not exist or is not a regular file")]
    MissingFile { kind: &'static str, path: PathBuf },
    #[error("--num-teams must be at least 1")]
    NoTeams,
    #[error("--team-number must be at least 1")]
    InvalidTeamNumber,
    #[error("invalid {field} URL {url:?}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub fn validate(cli: &Cli) -> Result<(), ConfigError> {
    require_file("host template", &cli.ip_file_path)?;
    require_file("credential", &cli.creds_file)?;
    if let Some(script) = &cli.punish_script {
        require_file("punish script", script)?;
    }

    if cli.num_teams == 0 {
        return Err(ConfigError::NoTeams);
    }
    if cli.team_number == 0 {
        return Err(ConfigError::InvalidTeamNumber);
    }

    require_url("dashboard", &cli.dashboard_url)?;
    require_url("pwnboard", &cli.pwnboard_host)?;
    Ok(())
}

fn require_file(kind: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::MissingFile {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn require_url(field: &'static str, raw: &str) -> Result<(), ConfigError> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl {
            field,
            url: raw.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn inputs() -> (TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let hosts = dir.path().join("hosts.txt");
        let creds = dir.path().join("creds.txt");
        fs::write(&hosts, "10.X.1.1\n").unwrap();
        fs::write(&creds, "root:toor\n").unwrap();
        (dir, hosts, creds)
    }

    fn cli(hosts: &Path, creds: &Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "sshcheck-scan".to_string(),
            "-f".to_string(),
            hosts.display().to_string(),
            "-c".to_string(),
            creds.display().to_string(),
            "--dashboard-url".to_string(),
            "http://127.0.0.1:5000".to_string(),
        ];
        args.extend(extra.iter().map(|arg| arg.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn accepts_existing_inputs() {
        let (_dir, hosts, creds) = inputs();
        validate(&cli(&hosts, &creds, &[])).unwrap();
    }

    #[test]
    fn missing_credential_file_is_fatal() {
        let (dir, hosts, _) = inputs();
        let err =
            validate(&cli(&hosts, &dir.path().join("nope.txt"), &[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingFile { kind: "credential", .. }
        ));
    }

    #[test]
    fn team_numbers_are_one_based() {
        let (_dir, hosts, creds) = inputs();
        let err = validate(&cli(&hosts, &creds, &["-n", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::NoTeams));

        let err = validate(&cli(&hosts, &creds, &["-m", "single", "-t", "0"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTeamNumber));
    }

    #[test]
    fn bad_urls_are_rejected() {
        let (_dir, hosts, creds) = inputs();
        let err = validate(&cli(&hosts, &creds, &["-p", "not a url"]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl { field: "pwnboard", .. }
        ));
    }

    #[test]
    fn punish_script_must_exist() {
        let (dir, hosts, creds) = inputs();
        let script = dir.path().join("punish.sh");
        let script_arg = script.display().to_string();
        let err = validate(&cli(&hosts, &creds, &["--punish-script", &script_arg]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingFile { kind: "punish script", .. }
        ));

        fs::write(&script, "echo hi\n").unwrap();
        validate(&cli(&hosts, &creds, &["--punish-script", &script_arg])).unwrap();
    }
}
