//! Runs an external circuit tool with captured output.

use std::process::{Command, Output, Stdio};

use thiserror::Error;

/// Longest stderr excerpt carried into an error message.
const STDERR_TAIL: usize = 2_000;

/// Why a tool run did not succeed.
#[derive(Debug, Error)]
pub(crate) enum ToolError {
    /// The process never started.
    #[error("failed to run {tool} ({program}): {source}")]
    Spawn { tool: String, program: String, source: std::io::Error },
    /// The process ran and exited non-zero.
    #[error("{tool} exited with {status}: {detail}")]
    Exited { tool: String, status: std::process::ExitStatus, detail: String },
}

/// Spawns `cmd` with stdin closed and both output streams captured, so nothing
/// the tool prints can reach our own stdout. A non-zero exit becomes
/// [`ToolError::Exited`] carrying the tail of the tool's stderr.
pub(crate) fn run(tool: &str, cmd: &mut Command) -> Result<Output, ToolError> {
    tracing::debug!(tool, command = ?cmd, "spawning");
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ToolError::Spawn {
            tool: tool.to_owned(),
            program: cmd.get_program().to_string_lossy().into_owned(),
            source,
        })?;

    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let detail = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_owned()
    } else {
        tail(stderr, STDERR_TAIL).to_owned()
    };
    Err(ToolError::Exited { tool: tool.to_owned(), status: output.status, detail })
}

/// Relays captured tool output line by line as debug events tagged with the tool name.
pub(crate) fn relay(tool: &'static str, bytes: &[u8]) {
    for line in String::from_utf8_lossy(bytes).lines().filter(|l| !l.trim().is_empty()) {
        tracing::debug!(tool, "{line}");
    }
}

fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
