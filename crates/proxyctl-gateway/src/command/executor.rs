use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use proxyctl_core::error::{ProxyCtlError, Result};

/// A host program plus its arguments. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Process-spawning seam.
///
/// `Ok` means the process ran, whatever its exit code. `Err` is reserved for
/// spawn failures (`CommandUnavailable`) and timeouts.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, inv: &Invocation) -> Result<CommandOutput>;
}

/// Spawns real host processes with a per-invocation timeout.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    timeout: Duration,
}

impl SystemExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn execute(&self, inv: &Invocation) -> Result<CommandOutput> {
        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let out = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => return Err(ProxyCtlError::Timeout(self.timeout.as_millis() as u64)),
            Ok(Err(e)) => {
                return Err(ProxyCtlError::CommandUnavailable(format!("{}: {e}", inv.program)))
            }
            Ok(Ok(out)) => out,
        };

        Ok(CommandOutput {
            status: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", vec!["-c".into(), script.into()])
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let ex = SystemExecutor::new(Duration::from_secs(5));
        let out = ex.execute(&sh("echo hello")).await.unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello\n");
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn nonzero_exit_is_ok_with_stderr() {
        let ex = SystemExecutor::new(Duration::from_secs(5));
        let out = ex.execute(&sh("echo 'unit not found' >&2; exit 5")).await.unwrap();
        assert_eq!(out.status, Some(5));
        assert_eq!(out.stderr.trim(), "unit not found");
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let ex = SystemExecutor::new(Duration::from_secs(5));
        let err = ex
            .execute(&Invocation::new("/nonexistent/proxyctl-no-such-binary", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "COMMAND_UNAVAILABLE");
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let ex = SystemExecutor::new(Duration::from_millis(100));
        let err = ex.execute(&sh("sleep 5")).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "TIMEOUT");
    }

    #[test]
    fn display_joins_args() {
        let inv = Invocation::new("systemctl", vec!["start".into(), "MTProxy".into()]);
        assert_eq!(inv.display(), "systemctl start MTProxy");
        assert_eq!(Invocation::new("reboot", vec![]).display(), "reboot");
    }
}
