use thiserror::Error;

/// An external command exited non-zero (or could not be spawned at all).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command failed: {command}{}", exit_suffix(.status))]
pub struct CommandExecutionError {
    /// Rendered invocation, e.g. `docker run --rm beeldbank-dev/redis-checker:latest`
    pub command: String,
    /// Exit code, `None` when the process was killed or never started
    pub status: Option<i32>,
}

impl CommandExecutionError {
    pub fn new(command: impl Into<String>, status: Option<i32>) -> Self {
        Self {
            command: command.into(),
            status,
        }
    }
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" (exit status {code})"),
        None => String::new(),
    }
}
