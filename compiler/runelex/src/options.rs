//! Lexer configuration.

use std::time::Duration;

/// Initial capacity of the pending-token buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

/// Name given to the scanner thread spawned by `Lexer::lex`.
pub const DEFAULT_THREAD_NAME: &str = "runelex-scanner";

/// Tunables for a scan session.
///
/// ```
/// use std::time::Duration;
/// use runelex::LexerOptions;
///
/// let options = LexerOptions::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_thread_name("config-scanner");
/// assert_eq!(options.thread_name, "config-scanner");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerOptions {
    /// Initial capacity of the pending-token buffer. The buffer grows past it
    /// for longer tokens and keeps its allocation across commits.
    pub buffer_capacity: usize,
    /// Cancel the session once this much time has passed since the state
    /// machine started. Checked between steps and while blocked in `emit`.
    pub timeout: Option<Duration>,
    /// Name of the scanner thread.
    pub thread_name: String,
    /// Stack size of the scanner thread. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            timeout: None,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            stack_size: None,
        }
    }
}

impl LexerOptions {
    /// Set the initial token buffer capacity.
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the session timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the scanner thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the scanner thread stack size in bytes.
    #[must_use]
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}
