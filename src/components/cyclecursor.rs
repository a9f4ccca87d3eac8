//! Playback position within the active cycle.

use std::sync::Arc;

use crate::components::animationset::{Cycle, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn from_reversed(reversed: bool) -> Self {
        if reversed {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

/// Index and direction over the frames of one cycle.
///
/// `index` always points at the frame the next [`next_frame`](Self::next_frame)
/// call returns. `at_end` latches when a call steps off either end of the
/// cycle and stays set until [`take_at_end`](Self::take_at_end).
#[derive(Debug, Clone)]
pub struct CycleCursor {
    pub name: String,
    frames: Arc<[Frame]>,
    index: usize,
    pub direction: Direction,
    at_end: bool,
}

impl CycleCursor {
    pub fn new(cycle: &Cycle) -> Self {
        CycleCursor {
            name: cycle.name.clone(),
            frames: Arc::clone(&cycle.frames),
            index: 0,
            direction: Direction::Forward,
            at_end: false,
        }
    }

    /// Point at the first frame of `cycle`. Direction and a pending
    /// `at_end` are kept.
    pub fn switch_to(&mut self, cycle: &Cycle) {
        self.name.clone_from(&cycle.name);
        self.frames = Arc::clone(&cycle.frames);
        self.index = 0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// Read and clear the end-of-cycle latch.
    pub fn take_at_end(&mut self) -> bool {
        std::mem::take(&mut self.at_end)
    }

    fn will_overshoot(&self) -> bool {
        match self.direction {
            Direction::Forward => self.index + 1 == self.frames.len(),
            Direction::Backward => self.index == 0,
        }
    }

    /// Return the frame under the cursor and step in the current direction,
    /// wrapping at either end.
    pub fn next_frame(&mut self) -> &Frame {
        let current = self.index;
        let last = self.frames.len() - 1;

        if self.will_overshoot() {
            self.at_end = true;
            self.index = match self.direction {
                Direction::Forward => 0,
                Direction::Backward => last,
            };
        } else {
            self.index = match self.direction {
                Direction::Forward => current + 1,
                Direction::Backward => current - 1,
            };
        }

        &self.frames[current]
    }
}
