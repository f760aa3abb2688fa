//! Deadline queue for deferred work.
//!
//! Timers are identified by a small `Copy` key; scheduling a key that is
//! already pending replaces it, which is how debouncing is expressed.
//! Expired timers are collected by [`TimerQueue::take_due`] on every frame.

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug)]
struct Timer<K> {
    id: K,
    deadline: u64,
    interval: Option<u64>,
    /// Insertion sequence, orders timers sharing a deadline.
    seq: u64,
}

#[derive(Debug)]
pub struct TimerQueue<K> {
    timers: Vec<Timer<K>>,
    next_seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + Eq + std::fmt::Debug> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `id` once, `delay_ms` after `now_ms`. Replaces a pending `id`.
    pub fn schedule(&mut self, id: K, now_ms: u64, delay_ms: u64) {
        self.insert(id, now_ms + delay_ms, None);
    }

    /// Fires `id` every `interval_ms` until cancelled. Replaces a pending `id`.
    pub fn schedule_repeating(&mut self, id: K, now_ms: u64, interval_ms: u64) {
        let interval_ms = interval_ms.max(1);
        self.insert(id, now_ms + interval_ms, Some(interval_ms));
    }

    /// Returns true when a pending timer was removed.
    pub fn cancel(&mut self, id: K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        before != self.timers.len()
    }

    pub fn is_pending(&self, id: K) -> bool {
        self.timers.iter().any(|timer| timer.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Removes and returns every timer whose deadline is at or before
    /// `now_ms`, earliest first. Repeating timers fire at most once per call
    /// and are rearmed relative to `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> SmallVec<[K; 4]> {
        let mut due: SmallVec<[Timer<K>; 4]> = SmallVec::new();
        self.timers.retain_mut(|timer| {
            if timer.deadline > now_ms {
                return true;
            }
            due.push(*timer);
            match timer.interval {
                Some(interval) => {
                    timer.deadline = now_ms + interval;
                    true
                }
                None => false,
            }
        });
        due.sort_by_key(|timer| (timer.deadline, timer.seq));
        due.into_iter().map(|timer| timer.id).collect()
    }

    fn insert(&mut self, id: K, deadline: u64, interval: Option<u64>) {
        self.cancel(id);
        self.next_seq += 1;
        log::trace!("timer {:?} armed for {}ms", id, deadline);
        self.timers.push(Timer {
            id,
            deadline,
            interval,
            seq: self.next_seq,
        });
    }
}
