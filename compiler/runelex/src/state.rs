//! State functions and the loop that drives them.
//!
//! A grammar is a set of mutually-recursive state functions. Each one scans
//! some input through the [`Lexer`] primitives and returns the state to run
//! next, `Ok(None)` to finish, or an error to abort the session.

use std::fmt;

use tracing::{debug, trace};

use crate::{Lexer, ScanError};

/// What a state function returns: the next state, the terminal marker
/// (`Ok(None)`), or a fatal error.
pub type Transition = Result<Option<StateFn>, ScanError>;

/// A unit of scanning logic.
///
/// Wraps a plain function pointer so state functions can be stored and sent
/// to the scanner thread. Non-capturing closures coerce:
///
/// ```
/// use runelex::{done, Lexer, StateFn, TokenType};
///
/// const KEY: TokenType = TokenType::new(1);
///
/// let entry = StateFn::new(|l| {
///     l.take("key");
///     l.emit(KEY);
///     done()
/// });
/// let (tokens, summary) = Lexer::new("key=value", entry).tokenize()?;
/// assert_eq!(tokens[0].value, "key");
/// assert_eq!(summary.error, None);
/// # Ok::<(), runelex::ScanError>(())
/// ```
#[derive(Clone, Copy)]
pub struct StateFn(fn(&mut Lexer) -> Transition);

impl StateFn {
    /// Wrap a state function.
    pub const fn new(f: fn(&mut Lexer) -> Transition) -> Self {
        Self(f)
    }

    /// Run one step.
    #[inline]
    pub fn call(self, lexer: &mut Lexer) -> Transition {
        (self.0)(lexer)
    }
}

impl fmt::Debug for StateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateFn({:p})", self.0 as *const ())
    }
}

/// Continue with `f`.
#[inline]
pub fn goto(f: fn(&mut Lexer) -> Transition) -> Transition {
    Ok(Some(StateFn::new(f)))
}

/// Finish the state machine.
#[inline]
pub fn done() -> Transition {
    Ok(None)
}

/// Run state functions from the lexer's entry state until one returns the
/// terminal marker, the lexer is stopped, or the session is halted from
/// outside.
///
/// Fatal errors are recorded in the lexer's error state before they are
/// returned.
#[tracing::instrument(level = "debug", skip_all, fields(source_len = lexer.source().len()))]
pub(crate) fn drive(lexer: &mut Lexer) -> Result<(), ScanError> {
    let mut state = Some(lexer.entry());

    while let Some(current) = state {
        lexer.poll_control();
        if let Some(reason) = lexer.take_halt() {
            debug!(steps = lexer.steps(), %reason, "scan halted");
            return Err(reason);
        }
        if lexer.is_stopped() {
            break;
        }

        trace!(step = lexer.steps(), ?current, pos = lexer.pos(), "state step");
        state = match current.call(lexer) {
            Ok(next) => next,
            Err(err) => {
                lexer.record_error(&err.message());
                debug!(steps = lexer.steps(), %err, "state function failed");
                return Err(err);
            }
        };
        lexer.count_step();
    }

    if let Some(reason) = lexer.take_halt() {
        debug!(steps = lexer.steps(), %reason, "scan halted");
        return Err(reason);
    }
    debug!(
        steps = lexer.steps(),
        emitted = lexer.emitted(),
        "state machine finished"
    );
    Ok(())
}
