//! The scanning engine: cursor, rewind stack, token buffer and commit.
//!
//! A [`Lexer`] owns a [`Source`] and a window `start..pos` over it. State
//! functions move `pos` forward with [`next`](Lexer::next), undo steps with
//! [`rewind`](Lexer::rewind), and commit the window with
//! [`emit`](Lexer::emit) or [`ignore`](Lexer::ignore).
//!
//! # Token Buffer
//!
//! The pending token's text is kept in a buffer parallel to the rewind
//! stack rather than sliced from the source, so [`skip`](Lexer::skip) can drop
//! a consumed code point from the value without un-consuming it. EOF steps
//! occupy a buffer slot (keeping the buffer in lockstep with the stack) but
//! never appear in the value.
//!
//! # Invariants
//!
//! - `start <= pos <= source.len()`
//! - `rewind` never moves `pos` below `start`
//! - every commit empties the rewind stack and the buffer and sets
//!   `start = pos`

use std::fmt;
use std::thread;

use crossbeam::channel;
use tracing::{debug, trace};

use crate::cancel::{CancelHandle, Control};
use crate::error::ErrorSlot;
use crate::rewind_stack::{RewindStack, Scanned};
use crate::sink::{Delivery, Sink};
use crate::state::{self, StateFn};
use crate::{CharCounter, LexerOptions, ScanError, ScanSummary, Source, Token, TokenStream, TokenType};

/// Callback invoked by [`Lexer::error`] with the error message.
pub type ErrorHandler = Box<dyn FnMut(&str) + Send>;

/// A scan session over one source.
pub struct Lexer {
    source: Source,
    start: usize,
    pos: usize,
    entry: StateFn,
    rewind: RewindStack,
    buffer: Vec<Option<char>>,
    counter: CharCounter,
    error_handler: Option<ErrorHandler>,
    err: Option<String>,
    errors: ErrorSlot,
    stopped: bool,
    /// Set when cancellation or timeout ends the session from outside.
    halt: Option<ScanError>,
    sink: Sink,
    control: Control,
    options: LexerOptions,
    emitted: usize,
    steps: usize,
}

impl Lexer {
    /// Create a lexer that will start in `entry`.
    pub fn new(source: impl Into<Source>, entry: StateFn) -> Self {
        let options = LexerOptions::default();
        Self {
            source: source.into(),
            start: 0,
            pos: 0,
            entry,
            rewind: RewindStack::new(),
            buffer: Vec::with_capacity(options.buffer_capacity),
            counter: CharCounter::new(),
            error_handler: None,
            err: None,
            errors: ErrorSlot::default(),
            stopped: false,
            halt: None,
            sink: Sink::Collect(Vec::new()),
            control: Control::default(),
            options,
            emitted: 0,
            steps: 0,
        }
    }

    /// Register a handler for [`error`](Self::error). With a handler, errors
    /// stop the session gracefully instead of aborting it.
    #[must_use]
    pub fn with_error_handler(mut self, handler: impl FnMut(&str) + Send + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Replace the session options.
    #[must_use]
    pub fn with_options(mut self, options: LexerOptions) -> Self {
        self.buffer = Vec::with_capacity(options.buffer_capacity);
        self.options = options;
        self
    }

    // ─── Running ────────────────────────────────────────────────

    /// Start the state machine on its own thread and return the consumer end.
    ///
    /// Every [`emit`](Self::emit) blocks until the returned stream takes the
    /// token. Spawning the thread is the only thing that can fail here.
    pub fn lex(mut self) -> Result<TokenStream, ScanError> {
        let (tx, rx) = channel::bounded(0);
        let (cancel, listener) = CancelHandle::new();
        self.sink = Sink::Channel(tx);
        self.control.listen(listener);
        let errors = self.errors.clone();

        let mut builder = thread::Builder::new().name(self.options.thread_name.clone());
        if let Some(size) = self.options.stack_size {
            builder = builder.stack_size(size);
        }
        debug!(
            thread = %self.options.thread_name,
            source_len = self.source.len(),
            "spawning scanner"
        );
        let worker = builder.spawn(move || self.run()).map_err(ScanError::Spawn)?;
        Ok(TokenStream::new(rx, worker, errors, cancel))
    }

    /// Run the state machine on the calling thread and collect every token.
    ///
    /// Returns the tokens together with the session totals. A recoverable
    /// error (handler registered) is still `Ok`, with the tokens emitted
    /// before it and [`ScanSummary::error`] set.
    pub fn tokenize(mut self) -> Result<(Vec<Token>, ScanSummary), ScanError> {
        self.control.arm(self.options.timeout);
        state::drive(&mut self)?;
        let summary = self.summary();
        Ok((self.sink.take_collected(), summary))
    }

    /// Scanner thread body. Dropping `self` at the end closes the stream.
    fn run(mut self) -> Result<ScanSummary, ScanError> {
        self.control.arm(self.options.timeout);
        state::drive(&mut self)?;
        Ok(self.summary())
    }

    fn summary(&mut self) -> ScanSummary {
        ScanSummary {
            emitted: self.emitted,
            steps: self.steps,
            consumed: self.pos,
            error: self.err.take(),
        }
    }

    // ─── Scanning Primitives ────────────────────────────────────

    /// Consume one code point and return it, or `None` at end of input.
    ///
    /// At EOF nothing is consumed, but the step is still recorded so that a
    /// following [`rewind`](Self::rewind) undoes this call and not an earlier
    /// one.
    #[allow(
        clippy::should_implement_trait,
        reason = "scanning primitive, not an iterator: EOF is repeatable and \
                  the call records a rewind step"
    )]
    pub fn next(&mut self) -> Option<char> {
        let (rune, width) = self.source.decode_at(self.pos);
        self.pos += width;
        self.rewind.push(Scanned { rune, width });
        self.buffer.push(rune);
        rune
    }

    /// One code point of lookahead. Leaves the cursor and buffer unchanged.
    pub fn peek(&mut self) -> Option<char> {
        let rune = self.next();
        self.rewind();
        rune
    }

    /// Consume the longest run of characters contained in `set`.
    pub fn take(&mut self, set: &str) {
        self.take_while(|c| set.contains(c));
    }

    /// Consume the longest run of characters matching `pred`.
    ///
    /// The first non-matching step (including EOF) is rewound exactly once.
    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.next().is_some_and(&mut pred) {}
        self.rewind();
    }

    /// Undo the most recent uncommitted [`next`](Self::next). No-op right
    /// after a commit.
    pub fn rewind(&mut self) {
        let step = self.rewind.pop();
        self.buffer.pop();
        if let Some(Scanned {
            rune: Some(_),
            width,
        }) = step
        {
            self.pos = self.pos.saturating_sub(width).max(self.start);
        }
    }

    /// Discard the pending window without emitting a token.
    pub fn ignore(&mut self) {
        trace!(start = self.start, pos = self.pos, "ignore");
        self.commit();
    }

    /// Drop the most recently buffered code point from the pending value.
    ///
    /// The input stays consumed: `pos`, `start` and the rewind stack are not
    /// touched. A later [`rewind`](Self::rewind) still pops one buffer entry,
    /// which is then the code point before the skipped one.
    pub fn skip(&mut self) {
        self.buffer.pop();
    }

    /// Emit the pending value as a token of type `kind` and commit.
    ///
    /// Blocks until the consumer accepts the token. If the consumer is gone,
    /// or the session is cancelled or times out while waiting, the token is
    /// dropped and the lexer stops.
    pub fn emit(&mut self, kind: TokenType) {
        let token = Token::new(kind, self.current());
        trace!(kind = kind.raw(), value = %token.value, start = self.start, pos = self.pos, "emit");
        match self.sink.deliver(token, &self.control) {
            Delivery::Delivered => self.emitted += 1,
            Delivery::Disconnected => {
                debug!(emitted = self.emitted, "token stream dropped by consumer, stopping");
                self.stopped = true;
            }
            Delivery::Halted(reason) => self.halt(reason),
        }
        self.commit();
    }

    /// The pending value, without committing.
    pub fn current(&self) -> String {
        self.buffer.iter().flatten().collect()
    }

    /// Report a scanning error.
    ///
    /// With a handler registered, the message is recorded, the handler is
    /// called, the lexer stops after the current state returns, and this
    /// returns `Ok(())`. Without one, this returns [`ScanError::Fatal`]; the
    /// state function should propagate it with `?` to abort the session.
    pub fn error(&mut self, message: impl Into<String>) -> Result<(), ScanError> {
        let message = message.into();
        self.record_error(&message);
        let Some(handler) = self.error_handler.as_mut() else {
            return Err(ScanError::Fatal { message });
        };
        debug!(%message, pos = self.pos, "scan error reported to handler");
        handler(&message);
        self.stop();
        Ok(())
    }

    /// Stop the state machine once the current state function returns.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    // ─── Counter ────────────────────────────────────────────────

    /// Increment the auxiliary count for `c`.
    pub fn inc(&mut self, c: char) {
        self.counter.inc(c);
    }

    /// Decrement the auxiliary count for `c`. No-op at zero.
    pub fn dec(&mut self, c: char) {
        self.counter.dec(c);
    }

    /// The auxiliary count for `c`.
    pub fn count(&self, c: char) -> usize {
        self.counter.count(c)
    }

    // ─── Inspection ─────────────────────────────────────────────

    /// Byte offset where the pending token starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the next code point to decode.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The source being scanned.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Returns `true` once the lexer has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The last recorded error message.
    pub fn err(&self) -> Option<&str> {
        self.err.as_deref()
    }

    /// Number of tokens delivered so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Number of state steps completed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    // ─── Driver hooks ───────────────────────────────────────────

    pub(crate) fn entry(&self) -> StateFn {
        self.entry
    }

    pub(crate) fn count_step(&mut self) {
        self.steps += 1;
    }

    pub(crate) fn record_error(&mut self, message: &str) {
        self.errors.record(message);
        self.err = Some(message.to_owned());
    }

    /// Check external cancellation sources between steps.
    pub(crate) fn poll_control(&mut self) {
        if self.halt.is_none() {
            if let Some(reason) = self.control.poll() {
                self.halt(reason);
            }
        }
    }

    pub(crate) fn take_halt(&mut self) -> Option<ScanError> {
        self.halt.take()
    }

    fn halt(&mut self, reason: ScanError) {
        debug!(%reason, pos = self.pos, "halting scan");
        self.record_error(&reason.message());
        self.stopped = true;
        self.halt = Some(reason);
    }

    fn commit(&mut self) {
        self.rewind.clear();
        self.buffer.clear();
        self.start = self.pos;
    }
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("start", &self.start)
            .field("pos", &self.pos)
            .field("pending", &self.current())
            .field("stopped", &self.stopped)
            .field("err", &self.err)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}
