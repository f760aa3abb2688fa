use std::cell::Cell;
use std::rc::Rc;

use draggrid_foundation::FrameClock;

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl FrameClock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        clock.advance(16);
        handle.advance(4);
        assert_eq!(clock.now_millis(), 20);
        clock.set(5);
        assert_eq!(handle.now(), 5);
    }
}
