use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Knobs for the probe executors and the HTTP reporters.
///
/// All fields carry defaults so a tuning file only has to name what it
/// changes. Durations use humantime notation (`"1s"`, `"250ms"`, `"2m"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// OpenSSH client used for authentication checks.
    pub ssh_binary: String,
    /// Non-interactive password feeder wrapped around `ssh_binary`.
    pub sshpass_binary: String,
    /// Proxy wrapper used when proxy routing is enabled.
    pub proxy_binary: String,
    /// Passed to ssh as `ConnectTimeout` (whole seconds, minimum 1).
    #[serde(with = "humantime_duration")]
    pub connect_timeout: Duration,
    /// Hard bound on one authentication subprocess.
    #[serde(with = "humantime_duration")]
    pub attempt_timeout: Duration,
    /// Simulated latency of a demo-mode attempt.
    #[serde(with = "humantime_duration")]
    pub demo_delay: Duration,
    /// Bound on the post-success remote script.
    #[serde(with = "humantime_duration")]
    pub punish_timeout: Duration,
    /// Cap on concurrently running attempts within a pass. `None` dispatches
    /// the whole cross-product at once.
    pub max_concurrent_probes: Option<usize>,
    /// Request timeout for registry and scoring calls.
    #[serde(with = "humantime_duration")]
    pub http_timeout: Duration,
    /// Scoring endpoints commonly run with self-signed certificates.
    pub pwnboard_accept_invalid_certs: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            ssh_binary: "ssh".to_string(),
            sshpass_binary: "sshpass".to_string(),
            proxy_binary: "proxychains".to_string(),
            connect_timeout: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(10),
            demo_delay: Duration::from_secs(1),
            punish_timeout: Duration::from_secs(30),
            max_concurrent_probes: None,
            http_timeout: Duration::from_secs(5),
            pwnboard_accept_invalid_certs: true,
        }
    }
}

impl ProbeSettings {
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout.as_secs().max(1)
    }
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(D::Error::custom)
    }
}
