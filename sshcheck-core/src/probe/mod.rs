//! Credential testers: the single-attempt probe executors.
//!
//! The orchestrator only sees [`CredentialTester`]; live SSH checks and the
//! demo simulator are interchangeable behind it.

pub mod config;
pub mod demo;
pub mod punish;
pub mod ssh;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{ProbeResult, ProbeTask};

pub use config::ProbeSettings;
pub use demo::DemoCredentialTester;
pub use punish::PunishmentTrigger;
pub use ssh::{CommandLine, SshCommandBuilder, SshCredentialTester};

/// Attempts one credential against one host.
///
/// Implementations must never panic or return early on infrastructure
/// faults: every problem is folded into a failed [`ProbeResult`] so sibling
/// attempts in the same pass are unaffected.
#[async_trait]
pub trait CredentialTester: Send + Sync {
    async fn attempt(&self, task: &ProbeTask) -> ProbeResult;
}

/// How attempts are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Real authentication through the external ssh client.
    #[default]
    Live,
    /// Simulated success after a fixed delay, no network I/O.
    Demo,
}

/// Build the tester for `mode`. Proxy routing and the punishment trigger
/// only apply to live probing.
pub fn build_tester(
    mode: ProbeMode,
    settings: &ProbeSettings,
    use_proxy: bool,
    punishment: Option<PunishmentTrigger>,
) -> Arc<dyn CredentialTester> {
    match mode {
        ProbeMode::Demo => {
            Arc::new(DemoCredentialTester::new(settings.demo_delay))
        }
        ProbeMode::Live => {
            let mut tester =
                SshCredentialTester::new(settings).with_proxy(use_proxy);
            if let Some(trigger) = punishment {
                tester = tester.with_punishment(trigger);
            }
            Arc::new(tester)
        }
    }
}

/// Stand-in `sshpass` executable for exercising real subprocess handling.
///
/// Accepts only the password `toor`. A `bash -s` invocation copies its stdin
/// to `capture` and exits 7.
#[cfg(all(test, unix))]
pub(crate) fn fake_sshpass(
    dir: &std::path::Path,
    capture: &std::path::Path,
) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("sshpass");
    let script = format!(
        "#!/bin/sh\n\
         for arg in \"$@\"; do last=\"$arg\"; done\n\
         if [ \"$last\" = \"-s\" ]; then\n\
         \x20   cat > '{}'\n\
         \x20   exit 7\n\
         fi\n\
         if [ \"$SSHPASS\" = \"toor\" ]; then exit 0; fi\n\
         if [ \"$SSHPASS\" = \"quiet\" ]; then exit 5; fi\n\
         echo 'Permission denied, please try again.' >&2\n\
         exit 1\n",
        capture.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .unwrap();
    path.display().to_string()
}
