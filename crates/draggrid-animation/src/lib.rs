//! Animation system for draggrid.
//!
//! Choreography is described as data and executed separately:
//! - [`AnimatedValue`] / [`AnimatedOffset`] - shared numeric channels the
//!   rendering host reads when it applies transforms
//! - [`AnimationPlan`] - a list of [`Tween`]s run in parallel, optionally
//!   delayed and looping
//! - [`Animator`] - advances plans on every frame and reports which plans
//!   finished
//!
//! # Example
//!
//! ```rust
//! use draggrid_animation::{AnimatedValue, AnimationPlan, Animator};
//!
//! let scale = AnimatedValue::new(1.0);
//! let mut animator = Animator::new();
//! let id = animator.run(AnimationPlan::new().tween(&scale, 1.2, 100), 0);
//!
//! animator.tick(50);
//! assert!((scale.get() - 1.1).abs() < 1e-4);
//! let finished = animator.tick(100);
//! assert_eq!(finished.as_slice(), &[id]);
//! assert_eq!(scale.get(), 1.2);
//! ```

mod animator;
mod easing;
mod plan;
mod value;

pub use animator::*;
pub use easing::*;
pub use plan::*;
pub use value::*;
