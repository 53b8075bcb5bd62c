//! Shell execution - run one command string through a shell
//!
//! Output capture is bounded: each stream may hold at most
//! [`MAX_BUFFER_BYTES`]; a command that writes more is killed and reported
//! as an error.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, SirError};

/// Capture limit per output stream (10 MB)
pub const MAX_BUFFER_BYTES: usize = 10 * 1024 * 1024;

/// Shell used when none is requested
pub const DEFAULT_SHELL: &str = "bash";

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ShellOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code to propagate for a failed command
    #[must_use]
    pub fn failure_code(&self) -> i32 {
        match self.exit_code {
            Some(0) | None => 1,
            Some(code) => code,
        }
    }
}

/// Runs commands through a configurable shell in a configurable directory
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    cwd: PathBuf,
}

impl ShellRunner {
    /// Create a runner; `cwd` defaults to the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if no working directory is given and the current one
    /// cannot be determined
    pub fn new(shell: Option<&str>, cwd: Option<&Path>) -> Result<Self> {
        let cwd = match cwd {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };
        Ok(Self {
            shell: shell.unwrap_or(DEFAULT_SHELL).to_string(),
            cwd,
        })
    }

    /// Shell flag that introduces an inline command
    fn command_flag(&self) -> &'static str {
        let name = Path::new(&self.shell)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if name == "cmd" {
            "/C"
        } else {
            "-c"
        }
    }

    /// Run `command` to completion and capture its output
    ///
    /// A non-zero exit is not an error here; inspect [`ShellOutput::success`].
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be spawned or either stream
    /// exceeds [`MAX_BUFFER_BYTES`]
    pub async fn run(&self, command: &str) -> Result<ShellOutput> {
        debug!(shell = %self.shell, cwd = %self.cwd.display(), "spawning command");

        let mut child = Command::new(&self.shell)
            .arg(self.command_flag())
            .arg(command)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SirError::Shell(format!("failed to spawn '{}': {e}", self.shell)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SirError::Shell("failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| SirError::Shell("failed to capture stderr".to_string()))?;

        let (stdout, stderr) = tokio::join!(read_capped(stdout), read_capped(stderr));
        let (stdout, stderr) = match (stdout, stderr) {
            (Ok(out), Ok(err)) => (out, err),
            (Err(e), _) | (_, Err(e)) => {
                warn!("command output exceeded buffer, killing child");
                let _ = child.kill().await;
                return Err(e);
            }
        };

        let status = child.wait().await?;
        debug!(code = ?status.code(), "command finished");

        Ok(ShellOutput {
            stdout,
            stderr,
            exit_code: status.code(),
        })
    }
}

async fn read_capped<R: AsyncRead + Unpin>(reader: R) -> Result<String> {
    let mut buf = Vec::new();
    let limit = u64::try_from(MAX_BUFFER_BYTES).unwrap_or(u64::MAX);
    reader.take(limit + 1).read_to_end(&mut buf).await?;

    if buf.len() > MAX_BUFFER_BYTES {
        return Err(SirError::Shell("maxBuffer length exceeded".to_string()));
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
