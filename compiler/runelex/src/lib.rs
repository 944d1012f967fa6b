//! State-function driven lexical scanning engine.
//!
//! Grammar knowledge lives in caller-supplied state functions; this crate
//! provides the scanning primitives they call and the protocol that delivers
//! the tokens they emit.
//!
//! # Architecture
//!
//! ```text
//! Source ──▶ Lexer (cursor, RewindStack, token buffer, CharCounter)
//!              │  driven by StateFn → StateFn → … → done()
//!              ▼
//!           emit ══ capacity-0 channel ══▶ TokenStream (one consumer)
//! ```
//!
//! - [`Source`]: immutable bytes, decoded one code point at a time
//! - [`Lexer`]: scanning primitives (`next`, `peek`, `take`, `rewind`,
//!   `ignore`, `skip`, `emit`, `current`, `error`, `stop`, `inc`/`dec`/`count`)
//! - [`StateFn`]: one unit of grammar logic returning the next state
//! - [`TokenStream`]: blocking pull end of the session; closes exactly once
//!
//! # Example
//!
//! ```
//! use runelex::{done, goto, Lexer, StateFn, Transition, TokenType};
//!
//! const KEY: TokenType = TokenType::new(1);
//! const VALUE: TokenType = TokenType::new(2);
//!
//! fn key(l: &mut Lexer) -> Transition {
//!     l.take_while(|c| c.is_ascii_alphanumeric());
//!     l.emit(KEY);
//!     if l.next() != Some('=') {
//!         l.error("expected '='")?;
//!         return done();
//!     }
//!     l.ignore();
//!     goto(value)
//! }
//!
//! fn value(l: &mut Lexer) -> Transition {
//!     l.take_while(|c| c != '\n');
//!     l.emit(VALUE);
//!     done()
//! }
//!
//! let mut stream = Lexer::new("name=runelex", StateFn::new(key)).lex()?;
//! let values: Vec<String> = stream.by_ref().map(|t| t.value).collect();
//! assert_eq!(values, ["name", "runelex"]);
//! assert_eq!(stream.err(), None);
//! # Ok::<(), runelex::ScanError>(())
//! ```
//!
//! # Logging
//!
//! The engine logs through `tracing`. Call [`init_tracing`] and set
//! `RUST_LOG=runelex=trace` to see every state step and emitted token.

mod cancel;
mod counter;
mod error;
mod lexer;
mod options;
mod rewind_stack;
mod sink;
mod source;
mod state;
mod stream;
mod token;

pub use cancel::CancelHandle;
pub use counter::CharCounter;
pub use error::ScanError;
pub use lexer::{ErrorHandler, Lexer};
pub use options::{LexerOptions, DEFAULT_BUFFER_CAPACITY, DEFAULT_THREAD_NAME};
pub use rewind_stack::{RewindStack, Scanned};
pub use source::{EncodingIssue, EncodingIssueKind, Source};
pub use state::{done, goto, StateFn, Transition};
pub use stream::{ScanSummary, TokenStream};
pub use token::{Token, TokenType};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=runelex=debug` or `RUST_LOG=runelex=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
