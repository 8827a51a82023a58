use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

use warden_core::{Result, WardenError};

use crate::redact::redact;

/// Reserved exit code reported when a command exceeds its timeout. A
/// timeout is a normal, expected outcome — never an error.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Result of running one command of one block.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub exit_code: i32,
    /// Redacted stdout.
    pub stdout: String,
    /// Redacted stderr; a placeholder body on timeout.
    pub stderr: String,
    /// Persisted log files; `None` when the command timed out.
    pub stdout_log: Option<PathBuf>,
    pub stderr_log: Option<PathBuf>,
    pub timed_out: bool,
}

/// Run one command to completion or timeout.
///
/// The command is split into an argument vector and spawned directly —
/// there is no shell interpretation layer, so metacharacters reach the
/// target program as literal arguments. The working directory is pinned
/// to the session output root regardless of where the caller runs.
pub async fn run_command(
    output_root: &Path,
    block_id: &str,
    index: usize,
    raw: &str,
    timeout: Duration,
) -> Result<CommandOutcome> {
    let argv = shlex::split(raw)
        .unwrap_or_else(|| raw.split_whitespace().map(str::to_string).collect());
    let program = argv.first().cloned().ok_or_else(|| WardenError::Spawn {
        command: raw.to_string(),
        reason: "empty command".into(),
    })?;

    info!(block_id, index, cmd = raw, "executing command");

    let mut cmd = Command::new(&program);
    cmd.args(&argv[1..])
        .current_dir(output_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| WardenError::Spawn {
        command: raw.to_string(),
        reason: e.to_string(),
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| WardenError::Spawn {
            command: raw.to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => {
            // Dropping the wait future kills the child (kill_on_drop).
            warn!(block_id, index, cmd = raw, timeout_secs = timeout.as_secs(), "command timed out");
            return Ok(CommandOutcome {
                exit_code: TIMEOUT_EXIT_CODE,
                stdout: String::new(),
                stderr: "timed out".into(),
                stdout_log: None,
                stderr_log: None,
                timed_out: true,
            });
        }
    };

    let stdout = redact(&String::from_utf8_lossy(&output.stdout));
    let stderr = redact(&String::from_utf8_lossy(&output.stderr));
    let exit_code = output.status.code().unwrap_or(-1);

    let logs_dir = output_root.join("logs");
    std::fs::create_dir_all(&logs_dir)?;
    let stdout_log = logs_dir.join(format!("{block_id}_{index}.out"));
    let stderr_log = logs_dir.join(format!("{block_id}_{index}.err"));
    std::fs::write(&stdout_log, &stdout)?;
    std::fs::write(&stderr_log, &stderr)?;

    Ok(CommandOutcome {
        exit_code,
        stdout,
        stderr,
        stdout_log: Some(stdout_log),
        stderr_log: Some(stderr_log),
        timed_out: false,
    })
}
