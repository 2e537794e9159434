use std::{
    fs,
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
    time::Duration,
};

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::SshCommandBuilder;
use crate::{
    error::{CoreError, Result},
    types::ProbeTask,
};

/// Optional follow-up action: once a credential is confirmed, stream a
/// local script into `bash -s` on the target with the same credential.
///
/// Runs detached and best-effort. The probe result has already been
/// returned by the time the script executes, so its outcome is only logged.
#[derive(Debug, Clone)]
pub struct PunishmentTrigger {
    path: PathBuf,
    script: Arc<str>,
    timeout: Duration,
}

impl PunishmentTrigger {
    pub fn load(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        let script =
            fs::read_to_string(path).map_err(|err| CoreError::io(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            script: script.into(),
            timeout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn fire(&self, builder: &SshCommandBuilder, task: &ProbeTask) {
        let line = builder.command_line(task, &["bash", "-s"]);
        let mut command = line.to_command(&task.credential.password);
        // Abandoning the run on timeout must also stop the remote script.
        command.stdin(Stdio::piped()).kill_on_drop(true);

        let script = Arc::clone(&self.script);
        let timeout = self.timeout;
        let script_path = self.path.display().to_string();
        let team = task.team;
        let host = task.host.clone();

        tokio::spawn(async move {
            let run = async {
                let mut child = command.spawn().map_err(|err| {
                    CoreError::Probe(format!("failed to launch: {err}"))
                })?;
                // Feed stdin concurrently so a chatty script cannot fill its
                // stdout pipe while we are still writing.
                let feeder = child.stdin.take().map(|mut stdin| {
                    tokio::spawn(async move {
                        stdin.write_all(script.as_bytes()).await
                    })
                });
                let output = child.wait_with_output().await.map_err(|err| {
                    CoreError::Probe(format!("failed to collect output: {err}"))
                })?;

                if !output.status.success() {
                    return Err(CoreError::Probe(format!(
                        "script exited with {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )));
                }
                if let Some(feeder) = feeder {
                    match feeder.await {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => {
                            return Err(CoreError::Probe(format!(
                                "failed to send script: {err}"
                            )));
                        }
                        Err(err) => {
                            return Err(CoreError::Probe(format!(
                                "script writer aborted: {err}"
                            )));
                        }
                    }
                }
                Ok::<(), CoreError>(())
            };

            match tokio::time::timeout(timeout, run).await {
                Ok(Ok(())) => info!(
                    target: "scan::probe",
                    team,
                    host = %host,
                    script = %script_path,
                    "punishment script completed"
                ),
                Ok(Err(error)) => warn!(
                    target: "scan::probe",
                    team,
                    host = %host,
                    script = %script_path,
                    %error,
                    "punishment script failed"
                ),
                Err(_) => warn!(
                    target: "scan::probe",
                    team,
                    host = %host,
                    script = %script_path,
                    "punishment script timed out"
                ),
            }
        });
    }
}
