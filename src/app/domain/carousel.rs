//! Carousel position model.
//!
//! Index math only; drawing is left to a [`SlideView`]. Moving past either
//! end is governed by [`EndBehavior`]:
//!
//! - `Jump` lands on the opposite end and the strip rewinds, so the
//!   transition runs against the requested direction.
//! - `Wrap` lands on the opposite end and keeps the requested direction,
//!   as if the slides were on a ring.
//! - `Stop` stays on the boundary and requests no update.

use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartingPosition {
    #[default]
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EndBehavior {
    Jump,
    #[default]
    Wrap,
    Stop,
}

/// Direction the slide strip travels during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
}

impl SlideDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideMove {
    pub from: usize,
    pub to: usize,
    pub direction: SlideDirection,
    /// True when the move crossed an end of the range.
    pub crossed_end: bool,
}

/// Something that can display a slide.
pub trait SlideView {
    fn show_slide(&mut self, index: usize, direction: Option<SlideDirection>);
}

#[derive(Debug, Clone)]
pub struct Carousel {
    current: usize,
    count: usize,
    start: StartingPosition,
    end: EndBehavior,
}

impl Carousel {
    pub fn new(count: usize, start: StartingPosition, end: EndBehavior) -> Result<Self> {
        if count == 0 {
            return Err(AppError::Slide("a carousel needs at least one slide".to_string()));
        }
        Ok(Self {
            current: Self::start_index(count, start),
            count,
            start,
            end,
        })
    }

    fn start_index(count: usize, start: StartingPosition) -> usize {
        match start {
            StartingPosition::Left => 0,
            StartingPosition::Right => count - 1,
            StartingPosition::Center => count / 2,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn end_behavior(&self) -> EndBehavior {
        self.end
    }

    pub fn slide_left(&mut self, view: &mut dyn SlideView) -> Option<SlideMove> {
        self.step(SlideDirection::Left, view)
    }

    pub fn slide_right(&mut self, view: &mut dyn SlideView) -> Option<SlideMove> {
        self.step(SlideDirection::Right, view)
    }

    /// Go straight to `index` without a transition.
    pub fn show_slide(&mut self, index: usize, view: &mut dyn SlideView) -> Result<()> {
        if index >= self.count {
            return Err(AppError::Slide(format!(
                "slide {} out of range (count {})",
                index, self.count
            )));
        }
        self.current = index;
        view.show_slide(index, None);
        Ok(())
    }

    /// Back to the configured starting position.
    pub fn reset(&mut self, view: &mut dyn SlideView) {
        self.current = Self::start_index(self.count, self.start);
        view.show_slide(self.current, None);
    }

    fn step(&mut self, requested: SlideDirection, view: &mut dyn SlideView) -> Option<SlideMove> {
        let last = self.count - 1;
        let from = self.current;

        let next = match requested {
            SlideDirection::Left => from.checked_sub(1),
            SlideDirection::Right => (from < last).then_some(from + 1),
        };

        let (to, direction, crossed_end) = match next {
            Some(to) => (to, requested, false),
            None => {
                let opposite = match requested {
                    SlideDirection::Left => last,
                    SlideDirection::Right => 0,
                };
                match self.end {
                    EndBehavior::Jump => (opposite, requested.reversed(), true),
                    EndBehavior::Wrap => (opposite, requested, true),
                    EndBehavior::Stop => return None,
                }
            }
        };

        if to == from {
            return None;
        }

        self.current = to;
        view.show_slide(to, Some(direction));
        Some(SlideMove {
            from,
            to,
            direction,
            crossed_end,
        })
    }
}
