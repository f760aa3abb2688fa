//! Declarative animation plans.

use draggrid_layout::Point;

use crate::easing::Easing;
use crate::value::{AnimatedOffset, AnimatedValue};

/// Moves one [`AnimatedValue`] toward `to`.
#[derive(Clone, Debug)]
pub struct Tween {
    pub target: AnimatedValue,
    /// Start value. `None` starts from whatever the channel holds when the
    /// tween becomes active.
    pub from: Option<f32>,
    pub to: f32,
    pub duration_ms: u64,
    /// Delay relative to the start of the plan (or of the current loop
    /// iteration).
    pub delay_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(target: &AnimatedValue, to: f32, duration_ms: u64) -> Self {
        Self {
            target: target.clone(),
            from: None,
            to,
            duration_ms,
            delay_ms: 0,
            easing: Easing::Linear,
        }
    }

    pub fn from(mut self, from: f32) -> Self {
        self.from = Some(from);
        self
    }

    pub fn delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub(crate) fn end_ms(&self) -> u64 {
        self.delay_ms + self.duration_ms
    }
}

/// How often a plan runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Once,
    /// Restarts every time the longest tween finishes. Never completes.
    Forever,
}

/// A set of tweens started together.
///
/// Sequencing is expressed with per-tween delays; a plan ends when its
/// longest tween does.
#[derive(Clone, Debug, Default)]
pub struct AnimationPlan {
    pub tweens: Vec<Tween>,
    pub repeat: Repeat,
    /// Delay before the first iteration. Not repeated by looping plans.
    pub start_delay_ms: u64,
}

impl AnimationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already configured tween.
    pub fn with(mut self, tween: Tween) -> Self {
        self.tweens.push(tween);
        self
    }

    /// Adds a linear tween of `target` to `to`.
    pub fn tween(self, target: &AnimatedValue, to: f32, duration_ms: u64) -> Self {
        self.with(Tween::new(target, to, duration_ms))
    }

    /// Adds one tween per axis moving `target` to `to`.
    pub fn tween_offset(self, target: &AnimatedOffset, to: Point, duration_ms: u64, easing: Easing) -> Self {
        self.with(Tween::new(target.x(), to.x, duration_ms).easing(easing))
            .with(Tween::new(target.y(), to.y, duration_ms).easing(easing))
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn start_delay(mut self, delay_ms: u64) -> Self {
        self.start_delay_ms = delay_ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Length of one iteration.
    pub fn duration_ms(&self) -> u64 {
        self.tweens.iter().map(Tween::end_ms).max().unwrap_or(0)
    }
}
