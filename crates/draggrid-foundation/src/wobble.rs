//! Idle wobble animation.

use std::hash::{Hash, Hasher};

use draggrid_animation::{AnimatedValue, AnimationPlan, Easing, Repeat, Tween};
use rustc_hash::FxHasher;

use crate::config::WobbleConfig;

/// Start delay for `key`, stable across runs and below
/// `config.max_start_delay_ms`.
pub fn wobble_start_delay(key: &str, config: &WobbleConfig) -> u64 {
    if config.max_start_delay_ms == 0 {
        return 0;
    }
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish() % config.max_start_delay_ms
}

/// Looping swing of `rotation`: 0 → 1 → -1 → 1 …
pub fn wobble_plan(rotation: &AnimatedValue, key: &str, config: &WobbleConfig) -> AnimationPlan {
    let leg = config.duration_ms;
    AnimationPlan::new()
        .with(Tween::new(rotation, 1.0, leg).easing(Easing::EaseInOutSine))
        .with(Tween::new(rotation, -1.0, leg).delay(leg).easing(Easing::EaseInOutSine))
        .repeat(Repeat::Forever)
        .start_delay(wobble_start_delay(key, config))
}
