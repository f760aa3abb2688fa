//! Easing curves.

use std::f32::consts::PI;

/// Maps linear progress in `[0, 1]` to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant velocity. Used by auto-scroll so the content moves at a
    /// steady speed regardless of distance.
    #[default]
    Linear,
    /// Sine ease-in-out, for back-and-forth motion.
    EaseInOutSine,
    /// Cubic ease-out: fast start, soft landing. Stands in for the spring
    /// used when lifting and dropping a card.
    EaseOutCubic,
}

impl Easing {
    pub fn transform(self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOutSine => -(0.5 * (PI * t).cos()) + 0.5,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}
