//! Sources of unbiased coin flips
//!
//! Every flip is drawn through the [`RandomBitSource`] trait so trials can run
//! against a seeded generator, a fixed script, or a recording wrapper.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces one binary outcome per call. `true` is heads, `false` is tails.
pub trait RandomBitSource {
    /// Draw the next flip, advancing the source's state.
    fn next_bit(&mut self) -> bool;
}

impl<S: RandomBitSource + ?Sized> RandomBitSource for &mut S {
    fn next_bit(&mut self) -> bool {
        (**self).next_bit()
    }
}

/// Pseudo-random bit source backed by [`StdRng`].
///
/// Two sources built from the same seed yield the same flip sequence.
#[derive(Debug, Clone)]
pub struct SeededBitSource {
    rng: StdRng,
}

impl SeededBitSource {
    /// Create a reproducible source.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomBitSource for SeededBitSource {
    fn next_bit(&mut self) -> bool {
        self.rng.gen()
    }
}

/// Replays a fixed bit pattern, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedBitSource {
    pattern: Vec<bool>,
    position: usize,
}

impl ScriptedBitSource {
    /// Create a source that cycles through `pattern`.
    ///
    /// An empty pattern yields tails forever.
    #[must_use]
    pub fn new(pattern: impl Into<Vec<bool>>) -> Self {
        Self {
            pattern: pattern.into(),
            position: 0,
        }
    }

    /// Heads, tails, heads, tails, ...
    #[must_use]
    pub fn alternating() -> Self {
        Self::new(vec![true, false])
    }

    /// Heads on every flip.
    #[must_use]
    pub fn always_heads() -> Self {
        Self::new(vec![true])
    }
}

impl RandomBitSource for ScriptedBitSource {
    fn next_bit(&mut self) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        let bit = self.pattern[self.position];
        self.position = (self.position + 1) % self.pattern.len();
        bit
    }
}

/// Wraps a source and keeps every outcome it hands out.
#[derive(Debug, Clone)]
pub struct RecordingBitSource<S> {
    inner: S,
    history: Vec<bool>,
}

impl<S: RandomBitSource> RecordingBitSource<S> {
    /// Start recording flips drawn from `inner`.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            history: Vec::new(),
        }
    }

    /// Every outcome drawn so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[bool] {
        &self.history
    }

    /// Return the recorded outcomes and reset the history.
    pub fn take_history(&mut self) -> Vec<bool> {
        std::mem::take(&mut self.history)
    }
}

impl<S: RandomBitSource> RandomBitSource for RecordingBitSource<S> {
    fn next_bit(&mut self) -> bool {
        let bit = self.inner.next_bit();
        self.history.push(bit);
        bit
    }
}
