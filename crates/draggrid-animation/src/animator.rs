//! Frame-driven executor for [`AnimationPlan`]s.

use smallvec::SmallVec;

use crate::plan::{AnimationPlan, Repeat, Tween};
use crate::value::AnimatedValue;

/// Handle to a running plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanId(u64);

impl PlanId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Plans that finished during one [`Animator::tick`].
pub type FinishedPlans = SmallVec<[PlanId; 4]>;

struct ActiveTween {
    tween: Tween,
    resolved_from: Option<f32>,
    done: bool,
}

impl ActiveTween {
    fn new(tween: Tween) -> Self {
        Self {
            resolved_from: tween.from,
            tween,
            done: false,
        }
    }

    fn restart(&mut self) {
        self.resolved_from = self.tween.from;
        self.done = false;
    }

    /// Writes the value for `elapsed` ms into the current iteration.
    fn apply(&mut self, elapsed: u64) {
        if self.done || elapsed < self.tween.delay_ms {
            return;
        }
        let from = *self
            .resolved_from
            .get_or_insert_with(|| self.tween.target.get());
        let local = elapsed - self.tween.delay_ms;
        if local >= self.tween.duration_ms {
            self.tween.target.set(self.tween.to);
            self.done = true;
            return;
        }
        let fraction = local as f32 / self.tween.duration_ms as f32;
        let eased = self.tween.easing.transform(fraction);
        self.tween.target.set(from + (self.tween.to - from) * eased);
    }
}

struct RunningPlan {
    id: PlanId,
    tweens: Vec<ActiveTween>,
    repeat: Repeat,
    period_ms: u64,
    iteration_start: u64,
}

impl RunningPlan {
    /// Advances the plan; returns true once it completed.
    fn advance(&mut self, now_ms: u64) -> bool {
        if now_ms < self.iteration_start {
            return false;
        }
        let mut elapsed = now_ms - self.iteration_start;
        self.apply(elapsed);

        match self.repeat {
            Repeat::Once => elapsed >= self.period_ms,
            Repeat::Forever => {
                if self.period_ms == 0 {
                    log::warn!("looping animation plan {:?} has zero length; stopping it", self.id);
                    return true;
                }
                if elapsed >= self.period_ms {
                    let iterations = elapsed / self.period_ms;
                    self.iteration_start += iterations * self.period_ms;
                    elapsed -= iterations * self.period_ms;
                    for tween in &mut self.tweens {
                        tween.restart();
                    }
                    self.apply(elapsed);
                }
                false
            }
        }
    }

    fn apply(&mut self, elapsed: u64) {
        // Later tweens on the same channel win, so sequences written with
        // delays compose in declaration order.
        for tween in &mut self.tweens {
            tween.apply(elapsed);
        }
    }

    fn drop_channel(&mut self, value: &AnimatedValue) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| !t.tween.target.same_channel(value));
        before != self.tweens.len()
    }
}

/// Runs plans against a caller supplied millisecond clock.
///
/// Only one plan drives a given channel at a time: starting a plan removes
/// the tweens of older plans that target any of its channels. A plan left
/// with no tweens that way is reported finished on the next tick.
#[derive(Default)]
pub struct Animator {
    plans: Vec<RunningPlan>,
    superseded: FinishedPlans,
    next_id: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `plan` at `now_ms` and returns its handle.
    pub fn run(&mut self, plan: AnimationPlan, now_ms: u64) -> PlanId {
        self.next_id += 1;
        let id = PlanId(self.next_id);

        for tween in &plan.tweens {
            self.release_channel(&tween.target);
        }

        let period_ms = plan.duration_ms();
        log::trace!(
            "animation plan {:?} started: {} tweens, {}ms",
            id,
            plan.tweens.len(),
            period_ms
        );
        self.plans.push(RunningPlan {
            id,
            tweens: plan.tweens.into_iter().map(ActiveTween::new).collect(),
            repeat: plan.repeat,
            period_ms,
            iteration_start: now_ms + plan.start_delay_ms,
        });
        id
    }

    /// Advances every plan to `now_ms` and returns the plans that completed.
    pub fn tick(&mut self, now_ms: u64) -> FinishedPlans {
        let mut finished = std::mem::take(&mut self.superseded);
        self.plans.retain_mut(|plan| {
            if plan.advance(now_ms) {
                finished.push(plan.id);
                false
            } else {
                true
            }
        });
        finished
    }

    /// Removes a plan without reporting it. Values stay where they are.
    pub fn stop(&mut self, id: PlanId) -> bool {
        let before = self.plans.len();
        self.plans.retain(|plan| plan.id != id);
        self.superseded.retain(|pending| *pending != id);
        before != self.plans.len()
    }

    pub fn stop_all(&mut self) {
        self.plans.clear();
        self.superseded.clear();
    }

    /// Sets `target` immediately, cancelling any tween that drives it.
    pub fn snap(&mut self, target: &AnimatedValue, value: f32) {
        self.release_channel(target);
        target.set(value);
    }

    pub fn is_running(&self, id: PlanId) -> bool {
        self.plans.iter().any(|plan| plan.id == id)
    }

    pub fn is_idle(&self) -> bool {
        self.plans.is_empty() && self.superseded.is_empty()
    }

    fn release_channel(&mut self, value: &AnimatedValue) {
        let superseded = &mut self.superseded;
        self.plans.retain_mut(|plan| {
            if plan.drop_channel(value) && plan.tweens.is_empty() {
                log::trace!("animation plan {:?} superseded", plan.id);
                superseded.push(plan.id);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_linear_tween_progress() {
        let value = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let id = animator.run(AnimationPlan::new().tween(&value, 100.0, 200), 1_000);

        assert!(animator.tick(1_050).is_empty());
        assert!(approx(value.get(), 25.0));
        assert!(animator.tick(1_150).is_empty());
        assert!(approx(value.get(), 75.0));
        assert_eq!(animator.tick(1_200).as_slice(), &[id]);
        assert_eq!(value.get(), 100.0);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_from_resolves_when_tween_activates() {
        let value = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        animator.run(
            AnimationPlan::new().with(Tween::new(&value, 10.0, 100).delay(100)),
            0,
        );
        animator.tick(50);
        assert_eq!(value.get(), 0.0);
        value.set(5.0);
        animator.tick(150);
        assert!(approx(value.get(), 7.5));
    }

    #[test]
    fn test_empty_plan_finishes_next_tick() {
        let mut animator = Animator::new();
        let id = animator.run(AnimationPlan::new(), 10);
        assert!(animator.is_running(id));
        assert_eq!(animator.tick(10).as_slice(), &[id]);
    }

    #[test]
    fn test_start_delay_holds_plan() {
        let value = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let id = animator.run(
            AnimationPlan::new().tween(&value, 1.0, 100).start_delay(500),
            0,
        );
        animator.tick(400);
        assert_eq!(value.get(), 0.0);
        animator.tick(550);
        assert!(approx(value.get(), 0.5));
        assert_eq!(animator.tick(600).as_slice(), &[id]);
    }

    #[test]
    fn test_new_plan_supersedes_channel() {
        let value = AnimatedValue::new(0.0);
        let other = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let first = animator.run(
            AnimationPlan::new().tween(&value, 100.0, 100).tween(&other, 1.0, 100),
            0,
        );
        let only_value = animator.run(AnimationPlan::new().tween(&value, 100.0, 1_000), 0);
        assert!(animator.is_running(first));

        let second = animator.run(AnimationPlan::new().tween(&other, -1.0, 1_000), 0);
        assert!(!animator.is_running(first));
        assert_eq!(animator.tick(10).as_slice(), &[first]);
        assert!(animator.is_running(only_value));
        assert!(animator.is_running(second));
    }

    #[test]
    fn test_snap_cancels_tween() {
        let value = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let id = animator.run(AnimationPlan::new().tween(&value, 100.0, 100), 0);
        animator.snap(&value, 7.0);
        assert_eq!(value.get(), 7.0);
        assert_eq!(animator.tick(50).as_slice(), &[id]);
        assert_eq!(value.get(), 7.0);
    }

    #[test]
    fn test_stop_does_not_report() {
        let value = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let id = animator.run(AnimationPlan::new().tween(&value, 1.0, 100), 0);
        assert!(animator.stop(id));
        assert!(!animator.stop(id));
        assert!(animator.tick(200).is_empty());
        assert_eq!(value.get(), 0.0);
    }

    #[test]
    fn test_looping_sequence_repeats() {
        let rotation = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let plan = AnimationPlan::new()
            .with(Tween::new(&rotation, 2.0, 100).easing(Easing::Linear))
            .with(Tween::new(&rotation, -2.0, 100).delay(100))
            .repeat(Repeat::Forever);
        let id = animator.run(plan, 0);

        animator.tick(100);
        assert!(approx(rotation.get(), 2.0));
        animator.tick(150);
        assert!(approx(rotation.get(), 0.0));
        animator.tick(200);
        assert!(approx(rotation.get(), -2.0));
        // Second iteration starts from -2.
        assert!(animator.tick(250).is_empty());
        assert!(approx(rotation.get(), 0.0));
        assert!(animator.is_running(id));
    }
}
