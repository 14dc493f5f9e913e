//! Injectable random source for the decision engines.
//!
//! Every probabilistic branch draws through [`DecisionRng`], so a host can
//! seed a reproducible [`SeededRng`] and tests can force exact branches with
//! a [`ScriptedRng`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform draws in `[0, 1)`.
pub trait DecisionRng {
    /// Returns the next uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Succeeds with probability `p`. Values outside `[0, 1]` saturate.
    ///
    /// Always consumes exactly one draw so scripted sequences stay aligned.
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }

    /// Picks an index in `0..len`. Returns `None` for an empty range without
    /// consuming a draw.
    fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss,
            reason = "The product is floored and clamped into 0..len."
        )]
        let index = (self.next_unit() * len as f32).floor() as usize;
        Some(index.min(len - 1))
    }
}

/// ChaCha8-backed generator seeded from a `u64`.
#[derive(Clone, Debug)]
pub struct SeededRng(ChaCha8Rng);

impl SeededRng {
    /// Creates a generator whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl DecisionRng for SeededRng {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed sequence of draws, then repeats a fallback value.
///
/// Intended for tests: a draw of `0.0` makes every [`DecisionRng::chance`]
/// with `p > 0` succeed and picks index `0`; a draw just below `1.0` fails
/// every chance below one and picks the last index.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    draws: VecDeque<f32>,
    fallback: f32,
    consumed: usize,
}

impl ScriptedRng {
    /// Replays `draws` in order, then returns `0.0`.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = f32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.0,
            consumed: 0,
        }
    }

    /// Returns `value` forever.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self {
            draws: VecDeque::new(),
            fallback: value,
            consumed: 0,
        }
    }

    /// Sets the value returned once the script runs out.
    #[must_use]
    pub fn with_fallback(mut self, value: f32) -> Self {
        self.fallback = value;
        self
    }

    /// Number of draws taken so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// Draws still queued before the fallback applies.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl DecisionRng for ScriptedRng {
    fn next_unit(&mut self) -> f32 {
        self.consumed += 1;
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}

impl<R: DecisionRng + ?Sized> DecisionRng for Box<R> {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..16 {
            let x = a.next_unit();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x.to_bits(), b.next_unit().to_bits());
        }
    }

    #[rstest]
    #[case::low(0.0, 4, 0)]
    #[case::mid(0.5, 4, 2)]
    #[case::high(0.999, 4, 3)]
    #[case::exact_one(1.0, 3, 2)]
    fn pick_maps_draw_to_index(#[case] draw: f32, #[case] len: usize, #[case] expected: usize) {
        let mut rng = ScriptedRng::new([draw]);
        assert_eq!(rng.pick(len), Some(expected));
    }

    #[test]
    fn pick_on_empty_range_consumes_nothing() {
        let mut rng = ScriptedRng::new([0.3]);
        assert_eq!(rng.pick(0), None);
        assert_eq!(rng.consumed(), 0);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn chance_compares_strictly() {
        let mut rng = ScriptedRng::new([0.5, 0.5]).with_fallback(0.99);
        assert!(!rng.chance(0.5));
        assert!(rng.chance(0.51));
        assert!(!rng.chance(0.9));
        assert_eq!(rng.consumed(), 3);
    }
}
