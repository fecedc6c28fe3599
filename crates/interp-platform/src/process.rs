//! External command execution

use crate::error::ProcessError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Options for a single command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Kill the child and report [`ProcessError::TimedOut`] after this long.
    pub timeout: Option<Duration>,
    /// Working directory for the child.
    pub cwd: Option<PathBuf>,
}

impl ExecOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Runs an external command and captures its output.
///
/// A command that cannot be spawned or exits non-zero is an error. Callers
/// that probe for tools treat any error as "not present here".
#[async_trait]
pub trait ProcessService: Send + Sync {
    async fn exec(
        &self,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// [`ProcessService`] backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessService;

impl TokioProcessService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessService for TokioProcessService {
    async fn exec(
        &self,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ProcessOutput, ProcessError> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        tracing::trace!(command, ?args, "spawning");

        let output = match options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| ProcessError::TimedOut {
                    command: command.to_string(),
                    timeout,
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| spawn_error(command, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ProcessError::NonZeroExit {
                command: command.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}

fn spawn_error(command: &str, source: std::io::Error) -> ProcessError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ProcessError::NotFound {
            command: command.to_string(),
        }
    } else {
        ProcessError::Spawn {
            command: command.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_command_reports_not_found() {
        let service = TokioProcessService::new();
        let result = service
            .exec(
                "interp-definitely-not-a-real-command",
                &["--version".to_string()],
                &ExecOptions::default(),
            )
            .await;

        assert!(
            matches!(result, Err(ProcessError::NotFound { .. })),
            "expected NotFound, got {:?}",
            result
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout() {
        let service = TokioProcessService::new();
        let output = service
            .exec("echo", &["conda 4.5.4".to_string()], &ExecOptions::default())
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "conda 4.5.4");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let service = TokioProcessService::new();
        let result = service.exec("false", &[], &ExecOptions::default()).await;
        assert!(matches!(
            result,
            Err(ProcessError::NonZeroExit { code: Some(1), .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_reported() {
        let service = TokioProcessService::new();
        let options = ExecOptions::default().with_timeout(Duration::from_millis(50));
        let result = service.exec("sleep", &["5".to_string()], &options).await;
        assert!(matches!(result, Err(ProcessError::TimedOut { .. })));
    }
}
