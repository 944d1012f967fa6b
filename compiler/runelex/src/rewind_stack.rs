//! LIFO record of the steps consumed since the last commit.

use smallvec::SmallVec;

/// Inline capacity before the stack spills to the heap. Most tokens are
/// shorter than this.
const INLINE_STEPS: usize = 16;

/// One consumed step: the decoded rune (`None` for EOF) and the number of
/// source bytes it covered.
///
/// The width is recorded rather than recomputed from the rune because a
/// replacement character produced from malformed input covers however many
/// bytes the invalid subpart had, not `char::len_utf8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scanned {
    /// The decoded rune, or `None` at end of input.
    pub rune: Option<char>,
    /// Bytes consumed. Zero for EOF.
    pub width: usize,
}

impl Scanned {
    /// The zero-width end-of-input step.
    pub const EOF: Self = Self {
        rune: None,
        width: 0,
    };

    /// Returns `true` for the end-of-input step.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.rune.is_none()
    }
}

/// Stack of steps a lexer can rewind through.
///
/// Depth is bounded by the length of the pending token: every commit clears it.
#[derive(Clone, Debug, Default)]
pub struct RewindStack {
    steps: SmallVec<[Scanned; INLINE_STEPS]>,
}

impl RewindStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a consumed step.
    #[inline]
    pub fn push(&mut self, step: Scanned) {
        self.steps.push(step);
    }

    /// Remove and return the most recent step, or `None` when empty.
    #[inline]
    pub fn pop(&mut self) -> Option<Scanned> {
        self.steps.pop()
    }

    /// Drop every entry. Entries are `Copy`, so nothing is dropped one by one.
    #[inline]
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if nothing has been consumed since the last commit.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
