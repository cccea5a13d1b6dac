//! Shell command execution used as the operation behind `oprun run`.

use std::process::Stdio;
use std::time::{Duration, Instant};

use oprun_core::{DualResult, ErrorObject, Failure};
use serde::Serialize;
use serde_json::json;
use tokio::process::Command;

/// A command to execute.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    /// Command to execute (first element is executable).
    pub argv: Vec<String>,

    /// Zero disables the timeout.
    pub timeout_secs: u64,
}

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ShellCommand {
    pub fn new(argv: Vec<String>, timeout_secs: u64) -> Self {
        Self { argv, timeout_secs }
    }

    /// Run the command, reporting failure through the dual-result shape.
    ///
    /// Spawn errors and timeouts are raised errors; a non-zero exit is an
    /// error object whose message is the last non-empty stderr line.
    pub async fn execute(&self) -> DualResult<CommandOutput> {
        let start = Instant::now();

        let Some((exe, args)) = self.argv.split_first() else {
            return DualResult::err(
                ErrorObject::with_message("No command given").code("empty_command"),
            );
        };

        let child = match Command::new(exe)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return DualResult::err(Failure::from(anyhow::anyhow!(
                    "Failed to start '{}': {}",
                    exe,
                    e
                )))
            }
        };

        let output = if self.timeout_secs > 0 {
            match tokio::time::timeout(
                Duration::from_secs(self.timeout_secs),
                child.wait_with_output(),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    return DualResult::err(Failure::from(anyhow::anyhow!(
                        "'{}' timed out after {} seconds",
                        exe,
                        self.timeout_secs
                    )))
                }
            }
        } else {
            child.wait_with_output().await
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => return DualResult::err(Failure::from(e)),
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let duration_ms = start.elapsed().as_millis() as u64;

        if output.status.success() {
            return DualResult::ok(CommandOutput {
                exit_code,
                stdout,
                stderr,
                duration_ms,
            });
        }

        DualResult::err(ErrorObject {
            message: last_line(&stderr),
            code: Some(format!("exit_{}", exit_code)),
            details: json!({
                "exit_code": exit_code,
                "stdout": stdout,
                "stderr": stderr,
                "duration_ms": duration_ms,
            }),
        })
    }
}

fn last_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
