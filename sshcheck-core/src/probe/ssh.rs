use std::{
    process::Stdio,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{CredentialTester, ProbeSettings, PunishmentTrigger};
use crate::types::{ProbeResult, ProbeTask};

/// Remote command used purely to prove the session authenticated.
const NOOP_REMOTE_COMMAND: &str = "true";

/// Environment variable `sshpass -e` reads the password from, which keeps
/// it out of the process table.
const SSHPASS_ENV: &str = "SSHPASS";

/// Fully resolved program and arguments for one ssh invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Materialise a subprocess with captured output and no stdin.
    ///
    /// `kill_on_drop` stays off: an abandoned attempt runs to its own
    /// connect timeout instead of being killed.
    pub fn to_command(&self, password: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env(SSHPASS_ENV, password)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

/// Builds `[proxy] sshpass -e ssh -o … user@host <remote…>` command lines.
#[derive(Debug, Clone)]
pub struct SshCommandBuilder {
    ssh_binary: String,
    sshpass_binary: String,
    proxy_binary: Option<String>,
    connect_timeout_secs: u64,
}

impl SshCommandBuilder {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self {
            ssh_binary: settings.ssh_binary.clone(),
            sshpass_binary: settings.sshpass_binary.clone(),
            proxy_binary: None,
            connect_timeout_secs: settings.connect_timeout_secs(),
        }
    }

    pub fn with_proxy(mut self, proxy_binary: impl Into<String>) -> Self {
        self.proxy_binary = Some(proxy_binary.into());
        self
    }

    pub fn command_line(
        &self,
        task: &ProbeTask,
        remote_command: &[&str],
    ) -> CommandLine {
        let connect_timeout =
            format!("ConnectTimeout={}", self.connect_timeout_secs);
        let destination =
            format!("{}@{}", task.credential.username, task.host);

        let mut args: Vec<String> = Vec::with_capacity(16);
        let program = match &self.proxy_binary {
            Some(proxy) => {
                args.push(self.sshpass_binary.clone());
                proxy.clone()
            }
            None => self.sshpass_binary.clone(),
        };

        args.push("-e".to_string());
        args.push(self.ssh_binary.clone());
        for option in [
            connect_timeout.as_str(),
            "UserKnownHostsFile=/dev/null",
            "StrictHostKeyChecking=no",
            "NumberOfPasswordPrompts=1",
            "LogLevel=ERROR",
        ] {
            args.push("-o".to_string());
            args.push(option.to_string());
        }
        args.push(destination);
        args.extend(remote_command.iter().map(|part| part.to_string()));

        CommandLine { program, args }
    }
}

/// Validates credentials by running a no-op remote command through the
/// external ssh client. Exit status zero means the credential works.
#[derive(Debug, Clone)]
pub struct SshCredentialTester {
    builder: SshCommandBuilder,
    proxy_binary: String,
    attempt_timeout: Duration,
    punishment: Option<PunishmentTrigger>,
}

impl SshCredentialTester {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self {
            builder: SshCommandBuilder::new(settings),
            proxy_binary: settings.proxy_binary.clone(),
            attempt_timeout: settings.attempt_timeout,
            punishment: None,
        }
    }

    pub fn with_proxy(mut self, enabled: bool) -> Self {
        if enabled {
            self.builder = self.builder.with_proxy(self.proxy_binary.clone());
        }
        self
    }

    pub fn with_punishment(mut self, trigger: PunishmentTrigger) -> Self {
        self.punishment = Some(trigger);
        self
    }

    pub fn check_command(&self, task: &ProbeTask) -> CommandLine {
        self.builder.command_line(task, &[NOOP_REMOTE_COMMAND])
    }
}

#[async_trait]
impl CredentialTester for SshCredentialTester {
    async fn attempt(&self, task: &ProbeTask) -> ProbeResult {
        let started = Instant::now();
        let line = self.check_command(task);
        let mut command = line.to_command(&task.credential.password);

        let outcome =
            tokio::time::timeout(self.attempt_timeout, command.output()).await;

        let result = match outcome {
            Ok(Ok(output)) if output.status.success() => {
                ProbeResult::success(task, started.elapsed())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let diagnostic = match stderr.trim() {
                    "" => format!("ssh exited with {}", output.status),
                    text => text.to_string(),
                };
                ProbeResult::failure(task, Some(diagnostic), started.elapsed())
            }
            Ok(Err(err)) => ProbeResult::failure(
                task,
                Some(format!("failed to launch {}: {err}", line.program)),
                started.elapsed(),
            ),
            Err(_) => ProbeResult::failure(
                task,
                Some(format!(
                    "attempt timed out after {}",
                    humantime::format_duration(self.attempt_timeout)
                )),
                started.elapsed(),
            ),
        };

        if result.succeeded {
            info!(
                target: "scan::probe",
                team = task.team,
                host = %task.host,
                user = %task.credential.username,
                "credential accepted"
            );
            if let Some(trigger) = &self.punishment {
                trigger.fire(&self.builder, task);
            }
        } else {
            debug!(
                target: "scan::probe",
                team = task.team,
                host = %task.host,
                user = %task.credential.username,
                diagnostic = result.diagnostic.as_deref().unwrap_or(""),
                "credential rejected"
            );
        }

        result
    }
}
