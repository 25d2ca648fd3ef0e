//! Timer queue
//!
//! Every component instance owns one [`TimerQueue`]. Timers are plain data:
//! each carries a message that the owning component handles when the timer
//! fires, so no callback ever holds a reference back into the component.
//!
//! Time is virtual. The host advances it by draining due timers:
//!
//! ```rust
//! use unveil_animation::TimerQueue;
//!
//! let mut queue = TimerQueue::new();
//! queue.set_timeout(100, "flip");
//! let tick = queue.set_interval(40, "tick");
//!
//! let mut fired = Vec::new();
//! while let Some((_, msg)) = queue.pop_due(110) {
//!     fired.push((queue.now(), msg));
//! }
//! queue.catch_up(110);
//!
//! assert_eq!(fired, vec![(40, "tick"), (80, "tick"), (100, "flip")]);
//! assert!(queue.cancel(tick));
//! assert!(queue.is_empty());
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use unveil_core::Millis;

new_key_type! {
    /// Handle to a scheduled timeout or interval
    pub struct TimerId;
}

#[derive(Clone, Debug)]
struct Timer<M> {
    due: Millis,
    /// `Some` for intervals
    period: Option<Millis>,
    /// Tie-breaker so timers due at the same instant fire in scheduling order
    seq: u64,
    message: M,
}

/// Single-threaded queue of timeouts and intervals on a virtual clock
#[derive(Clone, Debug)]
pub struct TimerQueue<M> {
    timers: SlotMap<TimerId, Timer<M>>,
    now: Millis,
    next_seq: u64,
}

impl<M: Clone> TimerQueue<M> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: 0,
            next_seq: 0,
        }
    }

    /// Current time of this queue's clock
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Fire `message` once, `delay` ms from now
    pub fn set_timeout(&mut self, delay: Millis, message: M) -> TimerId {
        let seq = self.bump_seq();
        self.timers.insert(Timer {
            due: self.now.saturating_add(delay),
            period: None,
            seq,
            message,
        })
    }

    /// Fire `message` every `period` ms, starting one period from now
    ///
    /// A zero period is treated as 1 ms so the queue always makes progress.
    pub fn set_interval(&mut self, period: Millis, message: M) -> TimerId {
        let period = period.max(1);
        let seq = self.bump_seq();
        self.timers.insert(Timer {
            due: self.now.saturating_add(period),
            period: Some(period),
            seq,
            message,
        })
    }

    /// Cancel a pending timer, returning whether it was still scheduled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Number of scheduled timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Time at which the next timer fires
    pub fn next_due(&self) -> Option<Millis> {
        self.timers.values().map(|t| t.due).min()
    }

    /// Pop the earliest timer due at or before `until`
    ///
    /// Moves the clock to the timer's due time. Intervals are rescheduled
    /// one period later before the message is returned, so a handler may
    /// cancel them by id.
    pub fn pop_due(&mut self, until: Millis) -> Option<(TimerId, M)> {
        let (id, due) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(id, t)| (id, t.due))?;

        self.now = self.now.max(due);

        // An interval whose next run would overflow the clock fires one last time
        match self.timers.get(id)?.period.and_then(|p| due.checked_add(p)) {
            Some(next) => {
                let seq = self.bump_seq();
                let timer = self.timers.get_mut(id)?;
                timer.due = next;
                timer.seq = seq;
                Some((id, timer.message.clone()))
            }
            None => self.timers.remove(id).map(|t| (id, t.message)),
        }
    }

    /// Move the clock forward to `now` once every due timer has been popped
    pub fn catch_up(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Drop every timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<M: Clone> Default for TimerQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// The set of timers belonging to one animation run
///
/// Replacing or aborting a run cancels the whole group in one call, so no
/// stale timer from a previous run can touch freshly reset state.
#[derive(Clone, Debug, Default)]
pub struct TimerGroup {
    handles: SmallVec<[TimerId; 4]>,
}

impl TimerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `id` as part of this run
    pub fn track(&mut self, id: TimerId) -> TimerId {
        self.handles.push(id);
        id
    }

    /// Forget a handle whose timer already fired
    pub fn release(&mut self, id: TimerId) {
        self.handles.retain(|h| *h != id);
    }

    /// Cancel one timer of the run
    pub fn cancel<M: Clone>(&mut self, queue: &mut TimerQueue<M>, id: TimerId) -> bool {
        self.release(id);
        queue.cancel(id)
    }

    /// Cancel every timer of the run, returning how many were still pending
    pub fn cancel_all<M: Clone>(&mut self, queue: &mut TimerQueue<M>) -> usize {
        self.handles
            .drain(..)
            .filter(|id| queue.cancel(*id))
            .count()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.handles.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<M: Clone>(queue: &mut TimerQueue<M>, until: Millis) -> Vec<(Millis, M)> {
        let mut fired = Vec::new();
        while let Some((_, msg)) = queue.pop_due(until) {
            fired.push((queue.now(), msg));
        }
        queue.catch_up(until);
        fired
    }

    #[test]
    fn test_far_future_timers_saturate() {
        let mut queue = TimerQueue::new();
        queue.catch_up(10);
        queue.set_timeout(Millis::MAX, 'a');
        let id = queue.set_interval(Millis::MAX - 20, 'b');

        assert_eq!(queue.next_due(), Some(Millis::MAX - 10));
        let fired = drain(&mut queue, Millis::MAX);
        assert_eq!(fired, vec![(Millis::MAX - 10, 'b'), (Millis::MAX, 'a')]);
        assert!(!queue.is_pending(id));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(100, 1);

        assert!(drain(&mut queue, 99).is_empty());
        assert_eq!(drain(&mut queue, 100), vec![(100, 1)]);
        assert!(drain(&mut queue, 1000).is_empty());
        assert_eq!(queue.now(), 1000);
    }

    #[test]
    fn test_interval_repeats_until_cancelled() {
        let mut queue = TimerQueue::new();
        let id = queue.set_interval(10, 'x');

        assert_eq!(drain(&mut queue, 35).len(), 3);
        assert!(queue.cancel(id));
        assert!(drain(&mut queue, 100).is_empty());
        assert!(!queue.cancel(id));
    }

    #[test]
    fn test_same_instant_fires_in_scheduling_order() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(50, "a");
        queue.set_timeout(50, "b");
        queue.set_timeout(20, "c");

        let order: Vec<_> = drain(&mut queue, 50).into_iter().map(|(_, m)| m).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_timers_are_relative_to_queue_clock() {
        let mut queue = TimerQueue::new();
        queue.catch_up(500);
        queue.set_timeout(100, ());

        assert_eq!(queue.next_due(), Some(600));
    }

    #[test]
    fn test_zero_period_interval_progresses() {
        let mut queue = TimerQueue::new();
        queue.set_interval(0, ());
        assert_eq!(drain(&mut queue, 3).len(), 3);
    }

    #[test]
    fn test_group_cancel_all() {
        let mut queue = TimerQueue::new();
        let mut group = TimerGroup::new();

        group.track(queue.set_interval(10, 0));
        let fired = group.track(queue.set_timeout(5, 1));
        queue.set_timeout(30, 2);

        assert_eq!(queue.pop_due(5).map(|(_, m)| m), Some(1));
        group.release(fired);

        assert_eq!(group.cancel_all(&mut queue), 1);
        assert!(group.is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_group_cancel_all_ignores_fired_timers() {
        let mut queue = TimerQueue::new();
        let mut group = TimerGroup::new();

        group.track(queue.set_timeout(5, ()));
        drain(&mut queue, 10);

        assert_eq!(group.cancel_all(&mut queue), 0);
    }
}
