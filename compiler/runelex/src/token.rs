//! Token types produced by a commit.

use std::fmt;

/// Caller-defined token classification tag.
///
/// Grammars declare their own tags as constants:
///
/// ```
/// use runelex::TokenType;
///
/// const KEY: TokenType = TokenType::new(1);
/// const VALUE: TokenType = TokenType::new(2);
/// assert_ne!(KEY, VALUE);
/// assert!(!KEY.is_unset());
/// ```
///
/// Tag `0` is reserved as [`TokenType::UNSET`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TokenType(u16);

impl TokenType {
    /// The reserved "unset" tag.
    pub const UNSET: Self = Self(0);

    /// Wrap a raw tag value.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw tag value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns `true` for the reserved tag `0`.
    #[inline]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A classified literal fragment of the source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// Classification chosen by the state function that emitted it.
    pub kind: TokenType,
    /// Literal text, as accumulated in the token buffer.
    pub value: String,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.value)
    }
}
