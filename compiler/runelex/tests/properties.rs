//! Property tests for the scanning primitives.
//!
//! Inputs mix ASCII, multi-byte code points and (for the byte-level
//! properties) malformed UTF-8, since width bookkeeping is where cursor bugs
//! hide.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use runelex::{done, goto, Lexer, Source, StateFn, Token, TokenType, Transition};

const WORD: TokenType = TokenType::new(1);
const SPACE: TokenType = TokenType::new(2);
const OTHER: TokenType = TokenType::new(3);

fn class_of(c: char) -> TokenType {
    if c.is_alphanumeric() {
        WORD
    } else if c.is_whitespace() {
        SPACE
    } else {
        OTHER
    }
}

/// Emits maximal runs of same-class characters.
fn class_runs(l: &mut Lexer) -> Transition {
    let Some(first) = l.next() else {
        return done();
    };
    let kind = class_of(first);
    l.take_while(|c| class_of(c) == kind);
    l.emit(kind);
    goto(class_runs)
}

/// One token per code point.
fn per_rune(l: &mut Lexer) -> Transition {
    if l.next().is_none() {
        return done();
    }
    l.emit(OTHER);
    goto(per_rune)
}

fn text() -> impl Strategy<Value = String> {
    "[a-z0-9 \\t=#é€😀]{0,48}"
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.value.as_str()).collect()
}

/// A lexer driven by hand instead of through a state machine.
fn manual(source: impl Into<Source>) -> Lexer {
    Lexer::new(source, StateFn::new(|_| done()))
}

proptest! {
    #[test]
    fn next_and_emit_reproduce_the_source(s in text()) {
        let (tokens, _) = Lexer::new(s.as_str(), StateFn::new(class_runs)).tokenize().unwrap();
        prop_assert_eq!(concat(&tokens), s.clone());
        for pair in tokens.windows(2) {
            prop_assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn threaded_and_collected_runs_agree(s in text()) {
        let (collected, _) = Lexer::new(s.as_str(), StateFn::new(class_runs)).tokenize().unwrap();
        let threaded: Vec<Token> = Lexer::new(s.as_str(), StateFn::new(class_runs))
            .lex()
            .unwrap()
            .collect();
        prop_assert_eq!(threaded, collected);
    }

    #[test]
    fn per_rune_tokens_are_the_decoded_chars(bytes in proptest::collection::vec(any::<u8>(), 0..48)) {
        let source = Source::from_bytes(bytes.clone());
        let (tokens, _) = Lexer::new(source, StateFn::new(per_rune)).tokenize().unwrap();
        let expected: Vec<String> = String::from_utf8_lossy(&bytes)
            .chars()
            .map(String::from)
            .collect();
        let values: Vec<String> = tokens.into_iter().map(|t| t.value).collect();
        prop_assert_eq!(values, expected);
    }

    #[test]
    fn rewinding_every_step_restores_the_window(
        prefix in text(),
        s in text(),
        extra in 0usize..4,
    ) {
        let source = format!("{prefix}{s}");
        let mut l = manual(source.as_str());
        l.take_while(|_| true);
        while l.pos() > prefix.len() {
            l.rewind();
        }
        l.ignore();
        let start = l.start();
        prop_assert_eq!(start, prefix.len());

        let n = s.chars().count() + extra;
        for _ in 0..n {
            l.next();
        }
        prop_assert_eq!(l.pos(), source.len());
        prop_assert_eq!(l.current(), s.clone());
        for _ in 0..n {
            l.rewind();
        }
        prop_assert_eq!(l.pos(), start);
        prop_assert_eq!(l.current(), "");

        // Extra rewinds never cross the committed start.
        l.rewind();
        l.rewind();
        prop_assert_eq!(l.pos(), start);
    }

    #[test]
    fn take_consumes_the_maximal_prefix(s in text()) {
        let set = "ab0 é";
        let mut l = manual(s.as_str());
        l.take(set);
        let expected: String = s.chars().take_while(|c| set.contains(*c)).collect();
        prop_assert_eq!(l.pos(), expected.len());
        prop_assert_eq!(l.current(), expected);
    }

    #[test]
    fn peek_is_net_zero(s in text(), advance in 0usize..8) {
        let mut l = manual(s.as_str());
        for _ in 0..advance {
            l.next();
        }
        let pos = l.pos();
        let pending = l.current();
        let peeked = l.peek();
        prop_assert_eq!(l.pos(), pos);
        prop_assert_eq!(l.current(), pending.clone());
        prop_assert_eq!(l.next(), peeked);
        l.rewind();
        prop_assert_eq!(l.current(), pending);
    }

    #[test]
    fn skip_drops_one_char_but_keeps_the_input_consumed(s in "[a-zé😀]{1,24}") {
        let mut l = manual(s.as_str());
        l.take_while(|_| true);
        let pos = l.pos();
        l.skip();
        let mut expected: Vec<char> = s.chars().collect();
        expected.pop();
        prop_assert_eq!(l.pos(), pos);
        prop_assert_eq!(l.current(), expected.into_iter().collect::<String>());
    }

    #[test]
    fn counter_never_goes_negative(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let mut l = manual("");
        let mut model = 0usize;
        for inc in ops {
            if inc {
                l.inc('(');
                model += 1;
            } else {
                l.dec('(');
                model = model.saturating_sub(1);
            }
            prop_assert_eq!(l.count('('), model);
        }
        prop_assert_eq!(l.count(')'), 0);
    }
}
