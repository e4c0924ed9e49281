//! Shared error type across proxyctl crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Caller address is not in the allowlist.
    Forbidden,
    /// Host command ran and exited non-zero.
    CommandFailed,
    /// Host command could not be spawned.
    CommandUnavailable,
    /// Host command exceeded its time budget.
    Timeout,
    /// Host command output could not be parsed.
    InvalidOutput,
    /// Secret resource unreadable.
    SecretUnavailable,
    /// Managed service reported a non-active state.
    NotRunning,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Forbidden => "FORBIDDEN",
            ClientCode::CommandFailed => "COMMAND_FAILED",
            ClientCode::CommandUnavailable => "COMMAND_UNAVAILABLE",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::InvalidOutput => "INVALID_OUTPUT",
            ClientCode::SecretUnavailable => "SECRET_UNAVAILABLE",
            ClientCode::NotRunning => "NOT_RUNNING",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProxyCtlError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ProxyCtlError {
    #[error("Forbidden: Your IP is not allowed.")]
    AccessDenied,
    #[error("{resource} unavailable: {reason}")]
    ResourceUnavailable { resource: &'static str, reason: String },
    #[error("{message}")]
    CommandFailed { code: Option<i32>, message: String },
    #[error("command unavailable: {0}")]
    CommandUnavailable(String),
    #[error("command timed out after {0} ms")]
    Timeout(u64),
    #[error("invalid command output: {0}")]
    InvalidOutput(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ProxyCtlError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ProxyCtlError::AccessDenied => ClientCode::Forbidden,
            ProxyCtlError::ResourceUnavailable { .. } => ClientCode::SecretUnavailable,
            ProxyCtlError::CommandFailed { .. } => ClientCode::CommandFailed,
            ProxyCtlError::CommandUnavailable(_) => ClientCode::CommandUnavailable,
            ProxyCtlError::Timeout(_) => ClientCode::Timeout,
            ProxyCtlError::InvalidOutput(_) => ClientCode::InvalidOutput,
            ProxyCtlError::BadConfig(_) => ClientCode::BadConfig,
            ProxyCtlError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            ProxyCtlError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Build a `CommandFailed` from a process exit code and its stderr.
    ///
    /// Stderr is trimmed; when it is empty the exit status stands in.
    pub fn command_failed(code: Option<i32>, stderr: &str) -> Self {
        let trimmed = stderr.trim();
        let message = if trimmed.is_empty() {
            match code {
                Some(c) => format!("command exited with status {c}"),
                None => "command terminated by signal".to_string(),
            }
        } else {
            trimmed.to_string()
        };
        ProxyCtlError::CommandFailed { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_prefers_trimmed_stderr() {
        let e = ProxyCtlError::command_failed(Some(5), "  unit not found\n");
        assert_eq!(e.to_string(), "unit not found");
        assert_eq!(e.client_code().as_str(), "COMMAND_FAILED");
    }

    #[test]
    fn command_failed_falls_back_to_exit_status() {
        let e = ProxyCtlError::command_failed(Some(3), "\n");
        assert_eq!(e.to_string(), "command exited with status 3");

        let e = ProxyCtlError::command_failed(None, "");
        assert_eq!(e.to_string(), "command terminated by signal");
    }

    #[test]
    fn access_denied_message_is_fixed() {
        assert_eq!(
            ProxyCtlError::AccessDenied.to_string(),
            "Forbidden: Your IP is not allowed."
        );
    }
}
