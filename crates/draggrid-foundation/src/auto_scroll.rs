//! Edge auto-scroll while a card is dragged.
//!
//! Scrolling runs at constant velocity toward the top or bottom extreme by
//! animating the scroll translation channel. The dragged card receives the
//! opposite translation so it stays under the finger.

use draggrid_animation::{AnimatedValue, AnimationPlan, Animator, Easing, PlanId, Tween};

use crate::scroll::ScrollTracker;

/// Scrolling shorter than this is not worth starting.
pub const MIN_AUTO_SCROLL_DISTANCE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Builds the scroll plan toward `direction`, or `None` when already within
/// [`MIN_AUTO_SCROLL_DISTANCE`] of that extreme.
pub fn auto_scroll_plan(
    direction: ScrollDirection,
    scroll: &ScrollTracker,
    counter_translation: &AnimatedValue,
    velocity: f32,
) -> Option<AnimationPlan> {
    let target = match direction {
        ScrollDirection::Up => scroll.top_extreme(),
        ScrollDirection::Down => scroll.bottom_extreme(),
    };
    let distance = target - scroll.total();
    if distance.abs() < MIN_AUTO_SCROLL_DISTANCE {
        return None;
    }
    let duration_ms = (distance.abs() / velocity).round() as u64;
    let list_offset = scroll.list_offset();
    Some(
        AnimationPlan::new()
            .with(Tween::new(scroll.translation(), list_offset - target, duration_ms).easing(Easing::Linear))
            .with(Tween::new(counter_translation, target - list_offset, duration_ms).easing(Easing::Linear)),
    )
}

/// Tracks the running scroll plan and the direction the load-more poll
/// retries in.
#[derive(Debug, Default)]
pub struct AutoScroller {
    plan: Option<PlanId>,
    direction: Option<ScrollDirection>,
}

impl AutoScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scrolling(&self) -> bool {
        self.plan.is_some()
    }

    pub fn plan(&self) -> Option<PlanId> {
        self.plan
    }

    /// Direction of the last start, kept until [`AutoScroller::stop`].
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// Starts scrolling toward `direction`. Returns the started plan, or
    /// `None` when the extreme is already reached.
    pub fn start(
        &mut self,
        direction: ScrollDirection,
        scroll: &ScrollTracker,
        counter_translation: &AnimatedValue,
        velocity: f32,
        animator: &mut Animator,
        now_ms: u64,
    ) -> Option<PlanId> {
        self.direction = Some(direction);
        let plan = auto_scroll_plan(direction, scroll, counter_translation, velocity)?;
        log::debug!("auto-scroll {:?} for {}ms", direction, plan.duration_ms());
        let id = animator.run(plan, now_ms);
        self.plan = Some(id);
        Some(id)
    }

    /// Forgets a plan that ran to completion.
    pub fn plan_finished(&mut self, id: PlanId) -> bool {
        if self.plan == Some(id) {
            self.plan = None;
            true
        } else {
            false
        }
    }

    /// Stops the running plan. Safe to call when idle.
    pub fn stop(&mut self, animator: &mut Animator) -> Option<PlanId> {
        self.direction = None;
        let id = self.plan.take()?;
        animator.stop(id);
        log::debug!("auto-scroll stopped");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tall_list() -> ScrollTracker {
        let mut scroll = ScrollTracker::new(300.0);
        scroll.set_items_height(1_000.0);
        scroll
    }

    #[test]
    fn test_plan_runs_at_constant_velocity() {
        let scroll = tall_list();
        let counter = AnimatedValue::new(0.0);
        let plan = auto_scroll_plan(ScrollDirection::Down, &scroll, &counter, 0.5).unwrap();
        assert_eq!(plan.duration_ms(), 1_400);
        assert_eq!(plan.tweens[0].to, -700.0);
        assert_eq!(plan.tweens[1].to, 700.0);
    }

    #[test]
    fn test_plan_accounts_for_list_offset() {
        let mut scroll = tall_list();
        scroll.set_list_offset(200.0);
        let counter = AnimatedValue::new(0.0);
        let plan = auto_scroll_plan(ScrollDirection::Up, &scroll, &counter, 0.5).unwrap();
        assert_eq!(plan.duration_ms(), 400);
        assert_eq!(plan.tweens[0].to, 200.0);
        assert_eq!(plan.tweens[1].to, -200.0);
    }

    #[test]
    fn test_no_plan_near_extreme() {
        let mut scroll = tall_list();
        scroll.set_list_offset(695.0);
        let counter = AnimatedValue::new(0.0);
        assert!(auto_scroll_plan(ScrollDirection::Down, &scroll, &counter, 0.5).is_none());
    }

    #[test]
    fn test_scroll_moves_translation_and_stops() {
        let scroll = tall_list();
        let counter = AnimatedValue::new(0.0);
        let mut animator = Animator::new();
        let mut scroller = AutoScroller::new();

        scroller.start(ScrollDirection::Down, &scroll, &counter, 0.5, &mut animator, 0);
        assert!(scroller.is_scrolling());
        animator.tick(100);
        assert!((scroll.translation().get() + 50.0).abs() < 0.01);
        assert!((counter.get() - 50.0).abs() < 0.01);

        assert!(scroller.stop(&mut animator).is_some());
        assert!(scroller.stop(&mut animator).is_none());
        assert!(!scroller.is_scrolling());
        assert!(animator.is_idle());
    }
}
