//! Consumer end of a scan session.
//!
//! The producer thread and the consumer meet at a capacity-zero channel:
//! exactly one token is in flight at a time and `emit` does not return until
//! [`TokenStream::next_token`] has taken the token. The channel closing is the
//! only end-of-stream signal. Whether the session ended normally is read
//! separately from [`TokenStream::err`] or [`TokenStream::finish`].
//!
//! One stream has one consumer; it is deliberately not `Clone`. Dropping the
//! stream cancels the session, so a producer that stops emitting still exits.

use std::iter::FusedIterator;
use std::thread::JoinHandle;

use crossbeam::channel::Receiver;
use tracing::trace;

use crate::cancel::CancelHandle;
use crate::error::ErrorSlot;
use crate::{ScanError, Token};

/// Totals reported by a finished session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Tokens delivered to the consumer.
    pub emitted: usize,
    /// State function invocations.
    pub steps: usize,
    /// Final cursor position in bytes.
    pub consumed: usize,
    /// Message of a recoverable error that stopped the session early.
    pub error: Option<String>,
}

/// Pull-based view of the tokens a scanner thread emits.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Receiver<Token>,
    /// Taken by `finish`.
    worker: Option<JoinHandle<Result<ScanSummary, ScanError>>>,
    errors: ErrorSlot,
    cancel: CancelHandle,
    closed: bool,
}

impl TokenStream {
    pub(crate) fn new(
        tokens: Receiver<Token>,
        worker: JoinHandle<Result<ScanSummary, ScanError>>,
        errors: ErrorSlot,
        cancel: CancelHandle,
    ) -> Self {
        Self {
            tokens,
            worker: Some(worker),
            errors,
            cancel,
            closed: false,
        }
    }

    /// Block until the next token arrives, or return `None` once the stream
    /// has closed. Every call after the first `None` also returns `None`.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.closed {
            return None;
        }
        if let Ok(token) = self.tokens.recv() {
            Some(token)
        } else {
            trace!("token stream closed");
            self.closed = true;
            None
        }
    }

    /// Returns `true` once a pull has observed the stream closing.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The last error message the producer recorded.
    ///
    /// Meaningful once the stream has closed: `None` then means the state
    /// machine ran to completion.
    pub fn err(&self) -> Option<String> {
        self.errors.get()
    }

    /// A handle that cancels this session from any thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Cancel this session.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Discard any remaining tokens, wait for the scanner thread, and return
    /// its outcome.
    ///
    /// Fatal errors, cancellation and timeouts come back as `Err`. A
    /// recoverable error is `Ok` with [`ScanSummary::error`] set.
    pub fn finish(mut self) -> Result<ScanSummary, ScanError> {
        while self.next_token().is_some() {}
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| ScanError::WorkerPanicked)?,
            None => Ok(ScanSummary::default()),
        }
    }
}

impl Drop for TokenStream {
    fn drop(&mut self) {
        if self.worker.is_some() && !self.closed {
            trace!("token stream dropped before finish, cancelling scan");
            self.cancel.cancel();
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl FusedIterator for TokenStream {}
