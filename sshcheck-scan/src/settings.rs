//! Probe tuning loader.
//!
//! Sources, first match wins: an explicit path (`--settings` or
//! `SSHCHECK_SETTINGS_PATH`), inline JSON in `SSHCHECK_SETTINGS_JSON`, the
//! first existing default file, then built-in defaults.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use sshcheck_core::probe::ProbeSettings;

pub const SETTINGS_JSON_ENV: &str = "SSHCHECK_SETTINGS_JSON";

const DEFAULT_CANDIDATES: &[&str] = &["sshcheck.toml", "config/sshcheck.toml"];

/// Where the effective settings came from, for the startup log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File(PathBuf),
    EnvInline,
    Defaults,
}

pub fn load_settings(
    explicit: Option<&Path>,
) -> anyhow::Result<(ProbeSettings, SettingsSource)> {
    if let Some(path) = explicit {
        let settings = load_from_file(path)?;
        return Ok((settings, SettingsSource::File(path.to_path_buf())));
    }

    if let Ok(raw) = env::var(SETTINGS_JSON_ENV) {
        let settings = parse_json(&raw)
            .with_context(|| format!("failed to parse {SETTINGS_JSON_ENV}"))?;
        return Ok((settings, SettingsSource::EnvInline));
    }

    if let Some(path) = find_default_file(Path::new("")) {
        let settings = load_from_file(&path)?;
        return Ok((settings, SettingsSource::File(path)));
    }

    Ok((ProbeSettings::default(), SettingsSource::Defaults))
}

pub fn load_from_file(path: &Path) -> anyhow::Result<ProbeSettings> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!("failed to read probe settings from {}", path.display())
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents).with_context(|| {
            format!("invalid probe settings {}", path.display())
        }),
        Some("toml") => toml::from_str(&contents).map_err(|err| {
            anyhow!("invalid probe settings {}: {}", path.display(), err)
        }),
        _ => parse_from_str(&contents, &path.display().to_string()),
    }
}

fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<ProbeSettings> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!(
                "failed to parse probe settings {}: toml error: {}; json error: {}",
                origin,
                toml_err,
                json_err
            )
        })
    })
}

fn parse_json(raw: &str) -> anyhow::Result<ProbeSettings> {
    serde_json::from_str(raw)
        .map_err(|err| anyhow!("invalid probe settings json: {err}"))
}

/// First default candidate that exists under `base`.
fn find_default_file(base: &Path) -> Option<PathBuf> {
    DEFAULT_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ffi::OsString, time::Duration};

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            // SAFETY: the only test touching this variable restores it on drop.
            unsafe {
                env::set_var(key, value);
            }
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            // SAFETY: we reinstate the environment variable to its prior state.
            unsafe {
                match &self.previous {
                    Some(prev) => env::set_var(self.key, prev),
                    None => env::remove_var(self.key),
                }
            }
        }
    }

    #[test]
    fn toml_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.toml");
        fs::write(
            &path,
            "attempt_timeout = \"3s\"\nmax_concurrent_probes = 64\nproxy_binary = \"proxychains4\"\n",
        )
        .unwrap();

        let (settings, source) = load_settings(Some(&path)).unwrap();

        assert_eq!(source, SettingsSource::File(path));
        assert_eq!(settings.attempt_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_concurrent_probes, Some(64));
        assert_eq!(settings.proxy_binary, "proxychains4");
        assert_eq!(settings.connect_timeout, Duration::from_secs(1));
        assert_eq!(settings.ssh_binary, "ssh");
    }

    #[test]
    fn json_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.json");
        fs::write(&path, r#"{"demo_delay": "250ms"}"#).unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(settings.demo_delay, Duration::from_millis(250));
    }

    #[test]
    fn unknown_extension_falls_back_from_toml_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.conf");
        fs::write(&path, r#"{"http_timeout": "2s"}"#).unwrap();

        let settings = load_from_file(&path).unwrap();
        assert_eq!(settings.http_timeout, Duration::from_secs(2));
    }

    #[test]
    fn unparseable_file_reports_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.conf");
        fs::write(&path, "this is = = not config").unwrap();

        let err = load_from_file(&path).unwrap_err().to_string();
        assert!(err.contains("toml error"), "{err}");
        assert!(err.contains("json error"), "{err}");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn inline_json_from_environment() {
        let _guard =
            EnvVarGuard::set(SETTINGS_JSON_ENV, r#"{"punish_timeout": "5s"}"#);

        let (settings, source) = load_settings(None).unwrap();
        assert_eq!(source, SettingsSource::EnvInline);
        assert_eq!(settings.punish_timeout, Duration::from_secs(5));
    }

    #[test]
    fn default_search_skips_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sshcheck.json"), "{}").unwrap();
        assert_eq!(find_default_file(dir.path()), None);

        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config/sshcheck.toml"), "").unwrap();
        assert_eq!(
            find_default_file(dir.path()),
            Some(dir.path().join("config/sshcheck.toml"))
        );

        fs::write(dir.path().join("sshcheck.toml"), "").unwrap();
        assert_eq!(
            find_default_file(dir.path()),
            Some(dir.path().join("sshcheck.toml"))
        );
    }
}
