//! Free-form per-character occurrence counter.
//!
//! State functions use it for bookkeeping the cursor cannot express, such as
//! bracket depth. Scanning primitives never touch it.

use rustc_hash::FxHashMap;

/// Map from character to a non-negative count.
#[derive(Clone, Debug, Default)]
pub struct CharCounter {
    counts: FxHashMap<char, usize>,
}

impl CharCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `c`.
    pub fn inc(&mut self, c: char) {
        *self.counts.entry(c).or_insert(0) += 1;
    }

    /// Decrement the count for `c`. No-op at zero.
    pub fn dec(&mut self, c: char) {
        if let Some(n) = self.counts.get_mut(&c) {
            *n -= 1;
            if *n == 0 {
                self.counts.remove(&c);
            }
        }
    }

    /// Current count for `c`.
    pub fn count(&self, c: char) -> usize {
        self.counts.get(&c).copied().unwrap_or(0)
    }
}
