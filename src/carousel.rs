//! Position bookkeeping for an endlessly looping carousel track.
//!
//! The track renders three back-to-back copies of the item sequence. The
//! index normally rests inside the middle copy; a single animated step may
//! carry it one slot into a neighbouring copy, and [`LoopingTrack::settle`]
//! snaps it back by exactly one sequence length.

use crate::error::Error;
use crate::events::{Direction, SettleReport, Slide};

/// One forward move of a timer-free walk, see [`LoopingTrack::plan_forward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: usize,
    /// Index reached by the animated move, before correction.
    pub moved_to: usize,
    pub settled: SettleReport,
}

#[derive(Debug, Clone)]
pub struct LoopingTrack<T> {
    items: Vec<T>,
    index: usize,
    in_transition: bool,
}

impl<T> LoopingTrack<T> {
    /// Build a track over `items`, resting on the first item of the middle copy.
    ///
    /// # Errors
    /// Returns [`Error::EmptySequence`] if `items` is empty.
    pub fn new(items: Vec<T>) -> Result<Self, Error> {
        if items.is_empty() {
            return Err(Error::EmptySequence);
        }
        let index = items.len();
        Ok(Self {
            items,
            index,
            in_transition: false,
        })
    }

    /// Number of distinct items (N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rendered slots (3N).
    #[must_use]
    pub fn display_len(&self) -> usize {
        self.items.len() * 3
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Item currently under the viewport.
    #[must_use]
    pub fn current(&self) -> &T {
        &self.items[self.index % self.items.len()]
    }

    /// Offset of the track as a percentage of one slot width.
    #[must_use]
    pub fn offset_percent(&self) -> f64 {
        -(self.index as f64) * 100.0
    }

    /// Start an animated single-step move.
    ///
    /// Returns the new index, or `None` when a move is already in flight; a
    /// dropped request leaves the track untouched.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        if self.in_transition {
            return None;
        }
        self.index = match direction {
            Direction::Forward => self.index + 1,
            // an idle track rests at index >= N >= 1
            Direction::Backward => self.index - 1,
        };
        self.in_transition = true;
        Some(self.index)
    }

    /// Finish the in-flight move and pull the index back into the middle copy.
    pub fn settle(&mut self) -> SettleReport {
        self.in_transition = false;
        let n = self.items.len();
        let corrected = if self.index >= 2 * n {
            self.index -= n;
            true
        } else if self.index < n {
            self.index += n;
            true
        } else {
            false
        };
        SettleReport {
            index: self.index,
            corrected,
        }
    }

    /// Walk `steps` forward moves, settling each one immediately.
    pub fn plan_forward(&mut self, steps: usize) -> Vec<PlannedStep> {
        if self.in_transition {
            self.settle();
        }
        (1..=steps)
            .map(|step| {
                let moved_to = self.advance(Direction::Forward).unwrap_or(self.index);
                PlannedStep {
                    step,
                    moved_to,
                    settled: self.settle(),
                }
            })
            .collect()
    }
}

impl<T: AsRef<str>> LoopingTrack<T> {
    /// The 3N slides in render order: leading copy, original, trailing copy.
    pub fn display_sequence(&self) -> Vec<Slide> {
        let n = self.items.len();
        (0..self.display_len())
            .map(|slot| {
                let item = slot % n;
                Slide {
                    image: self.items[item].as_ref().to_owned(),
                    label: format!("Gallery image {}", item + 1),
                }
            })
            .collect()
    }
}
