//! Scan errors and the error state shared with the consumer.
//!
//! Errors never travel through the token channel. The producer records the
//! last error message in an [`ErrorSlot`]; after the stream closes the
//! consumer reads it to tell normal completion from an early stop.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Why a scan session ended abnormally.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A state function reported an error and no handler was registered.
    #[error("scan aborted: {message}")]
    Fatal {
        /// Message passed to `Lexer::error`.
        message: String,
    },

    /// The session was cancelled through a `CancelHandle`.
    #[error("scan cancelled")]
    Cancelled,

    /// The configured timeout elapsed before the state machine finished.
    #[error("scan timed out after {after:?}")]
    TimedOut {
        /// The configured timeout.
        after: Duration,
    },

    /// The scanner thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The scanner thread panicked, typically inside a state function or
    /// an error handler.
    #[error("scanner thread panicked")]
    WorkerPanicked,
}

impl ScanError {
    /// Build a fatal error from a message.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    /// The message recorded in the error state for this error.
    ///
    /// Fatal errors record the caller's message verbatim.
    pub fn message(&self) -> String {
        match self {
            Self::Fatal { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Last recorded error message, shared between producer and consumer.
#[derive(Clone, Debug, Default)]
pub(crate) struct ErrorSlot {
    message: Arc<Mutex<Option<String>>>,
}

impl ErrorSlot {
    /// Overwrite the recorded message.
    pub(crate) fn record(&self, message: &str) {
        *self.message.lock() = Some(message.to_owned());
    }

    /// The recorded message, if any.
    pub(crate) fn get(&self) -> Option<String> {
        self.message.lock().clone()
    }
}

#[cfg(test)]
mod tests;
