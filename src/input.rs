//! Live input seam for pursuers.
//!
//! Input capture happens elsewhere; the pursuer engine only asks, at node
//! arrival, which direction a given input slot currently requests.

use crate::direction::Cardinal;

/// Snapshot of one input source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveInput {
    /// Whether the source is currently requesting a direction.
    pub has_input: bool,
    /// Requested `x` sign.
    pub x: i32,
    /// Requested `z` sign.
    pub z: i32,
}

impl LiveInput {
    /// An idle source.
    pub const NONE: Self = Self {
        has_input: false,
        x: 0,
        z: 0,
    };

    /// A source holding `dir`.
    #[must_use]
    pub const fn toward(dir: Cardinal) -> Self {
        Self {
            has_input: true,
            x: dir.dir_x(),
            z: dir.dir_z(),
        }
    }

    /// The requested cardinal direction, if the source is active and its
    /// components describe exactly one axis.
    #[must_use]
    pub const fn cardinal(self) -> Option<Cardinal> {
        if self.has_input {
            Cardinal::from_signs(self.x, self.z)
        } else {
            None
        }
    }
}

/// Answers "what is input slot `n` asking for right now?".
#[cfg_attr(test, mockall::automock)]
pub trait InputQuery {
    /// Current request for `slot`.
    fn live_input(&self, slot: usize) -> LiveInput;
}

impl<F> InputQuery for F
where
    F: Fn(usize) -> LiveInput,
{
    fn live_input(&self, slot: usize) -> LiveInput {
        self(slot)
    }
}

/// Input source that never requests anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputQuery for NoInput {
    fn live_input(&self, _slot: usize) -> LiveInput {
        LiveInput::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_input_has_no_direction() {
        let input = LiveInput {
            has_input: false,
            x: 1,
            z: 0,
        };
        assert_eq!(input.cardinal(), None);
    }

    #[test]
    fn diagonal_input_has_no_direction() {
        let input = LiveInput {
            has_input: true,
            x: 1,
            z: -1,
        };
        assert_eq!(input.cardinal(), None);
    }

    #[test]
    fn closures_answer_per_slot() {
        let query = |slot: usize| {
            if slot == 1 {
                LiveInput::toward(Cardinal::West)
            } else {
                LiveInput::NONE
            }
        };
        assert_eq!(query.live_input(1).cardinal(), Some(Cardinal::West));
        assert_eq!(query.live_input(0).cardinal(), None);
        assert_eq!(NoInput.live_input(3), LiveInput::NONE);
    }
}
