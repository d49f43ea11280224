//! Structured command errors
//!
//! Every command handler returns a [`WskError`]. It carries the user-facing
//! message, the underlying cause (if any), the exit code class and whether the
//! dispatcher should also print the command usage.

use std::error::Error as StdError;
use thiserror::Error;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Process exit code classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Malformed invocation or local failure
    General = 1,
    /// The remote call failed
    Network = 3,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Broad error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Remote,
    General,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct WskError {
    message: String,
    #[source]
    cause: Option<BoxedCause>,
    kind: ErrorKind,
    exit_code: ExitCode,
    display_usage: bool,
}

impl WskError {
    /// Malformed invocation: general exit class, usage is displayed
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            kind: ErrorKind::Usage,
            exit_code: ExitCode::General,
            display_usage: true,
        }
    }

    /// Remote call failure: network exit class, no usage
    pub fn remote(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
            kind: ErrorKind::Remote,
            exit_code: ExitCode::Network,
            display_usage: false,
        }
    }

    /// Local failure unrelated to the invocation syntax (config, I/O)
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            kind: ErrorKind::General,
            exit_code: ExitCode::General,
            display_usage: false,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<BoxedCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Wrap this error under a new message, keeping its classification.
    /// The wrapped error becomes the cause.
    pub fn wrap(self, message: impl Into<String>) -> Self {
        let kind = self.kind;
        let exit_code = self.exit_code;
        let display_usage = self.display_usage;
        Self {
            message: message.into(),
            cause: Some(Box::new(self)),
            kind,
            exit_code,
            display_usage,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    pub fn display_usage(&self) -> bool {
        self.display_usage
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}
