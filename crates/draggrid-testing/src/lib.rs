//! Testing utilities and harness for draggrid

pub mod clock;
pub mod scene;
pub mod test_rule;

pub use clock::ManualClock;
pub use scene::{FakeScene, ListenerLog, RecordingHost, RecordingListener};
pub use test_rule::*;

pub mod prelude {
    pub use crate::{DragScope, GridTestRule, ManualClock, TestItem};
    pub use draggrid_foundation::{DragPhase, MasonryGridConfig};
    pub use draggrid_layout::GridItem;
}
