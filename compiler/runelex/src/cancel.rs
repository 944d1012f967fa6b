//! External cancellation and deadlines for a scan session.
//!
//! State functions can only stop a session from the inside. A [`CancelHandle`]
//! lets any thread end it from the outside, and a timeout from
//! [`LexerOptions`](crate::LexerOptions) ends it after a fixed duration. Both
//! are observed between state steps and while the producer is blocked in
//! `emit`, so a consumer that stops pulling cannot stall the producer forever.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::debug;

use crate::ScanError;

/// Cloneable handle that cancels a running scan session.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    wake: Sender<()>,
}

impl CancelHandle {
    /// Create a handle and the listener the producer polls.
    pub(crate) fn new() -> (Self, CancelListener) {
        let flag = Arc::new(AtomicBool::new(false));
        let (wake, woken) = channel::bounded(1);
        let listener = CancelListener {
            flag: Arc::clone(&flag),
            woken,
        };
        (Self { flag, wake }, listener)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            debug!("scan cancellation requested");
        }
        // A full slot means a wakeup is already pending.
        let _ = self.wake.try_send(());
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Producer side of a [`CancelHandle`].
#[derive(Debug)]
pub(crate) struct CancelListener {
    flag: Arc<AtomicBool>,
    woken: Receiver<()>,
}

#[derive(Clone, Copy, Debug)]
struct Deadline {
    at: Instant,
    after: Duration,
}

/// Cancellation sources the producer checks. Empty by default, which is the
/// synchronous `tokenize` case without a timeout.
#[derive(Debug, Default)]
pub(crate) struct Control {
    listener: Option<CancelListener>,
    deadline: Option<Deadline>,
}

impl Control {
    /// Attach the listener of a cancel handle.
    pub(crate) fn listen(&mut self, listener: CancelListener) {
        self.listener = Some(listener);
    }

    /// Start the timeout clock. A timeout too large to represent as an
    /// instant never fires.
    pub(crate) fn arm(&mut self, timeout: Option<Duration>) {
        self.deadline = timeout.and_then(|after| {
            Instant::now()
                .checked_add(after)
                .map(|at| Deadline { at, after })
        });
    }

    /// The reason the session must halt now, if any.
    pub(crate) fn poll(&self) -> Option<ScanError> {
        if self
            .listener
            .as_ref()
            .is_some_and(|l| l.flag.load(Ordering::SeqCst))
        {
            return Some(ScanError::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d.at => Some(ScanError::TimedOut { after: d.after }),
            _ => None,
        }
    }

    /// Channel that becomes ready when cancellation is requested or every
    /// handle is dropped. Never ready without a listener.
    pub(crate) fn woken(&self) -> Receiver<()> {
        self.listener
            .as_ref()
            .map_or_else(channel::never, |l| l.woken.clone())
    }

    /// Channel that becomes ready at the deadline. Never ready without one.
    pub(crate) fn timer(&self) -> Receiver<Instant> {
        self.deadline
            .map_or_else(channel::never, |d| channel::at(d.at))
    }

    /// The error for an expired deadline.
    pub(crate) fn timed_out(&self) -> ScanError {
        ScanError::TimedOut {
            after: self.deadline.map_or(Duration::ZERO, |d| d.after),
        }
    }
}
