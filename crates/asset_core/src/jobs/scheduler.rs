//! Virtual-time task scheduler
//!
//! Time only moves when the owner calls [`TaskScheduler::advance`] (or drives
//! [`TaskScheduler::pop_due`] itself), which keeps every timing behaviour
//! reproducible in tests.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Smallest repeat interval; zero would never let time move past the timer
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct Timer<T> {
    due: Duration,
    interval: Option<Duration>,
    seq: u64,
    task: T,
}

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    /// Timer that fired; repeating timers keep their id
    pub id: TimerId,
    /// Virtual time at which it fired
    pub at: Duration,
    /// Payload registered with the timer
    pub task: T,
}

/// One-shot and repeating timers over a virtual clock
#[derive(Debug)]
pub struct TaskScheduler<T> {
    now: Duration,
    timers: SlotMap<TimerId, Timer<T>>,
    next_seq: u64,
}

impl<T: Clone> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TaskScheduler<T> {
    /// Empty scheduler at time zero
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    fn insert(&mut self, due: Duration, interval: Option<Duration>, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            due,
            interval,
            seq,
            task,
        })
    }

    /// Fire `task` once, `delay` from now
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TimerId {
        self.insert(self.now + delay, None, task)
    }

    /// Fire `task` every `interval`, first one `interval` from now
    pub fn schedule_repeating(&mut self, interval: Duration, task: T) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        self.insert(self.now + interval, Some(interval), task)
    }

    /// Remove a timer; returns false if it already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Number of live timers
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to it
    ///
    /// Ties fire in scheduling order. Repeating timers are re-armed before
    /// they are returned, so the caller may cancel them while handling the
    /// event.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let (id, due) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(id, timer)| (id, timer.due))?;

        self.now = self.now.max(due);

        let repeat = self.timers.get(id).and_then(|timer| timer.interval);
        let task = match repeat {
            Some(interval) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let timer = self.timers.get_mut(id)?;
                timer.due += interval;
                timer.seq = seq;
                timer.task.clone()
            }
            None => self.timers.remove(id)?.task,
        };

        Some(Fired { id, at: due, task })
    }

    /// Move the clock forward to `until` without firing anything
    ///
    /// Call after draining [`pop_due`](Self::pop_due).
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advance by `delta`, returning every timer that fired, in order
    pub fn advance(&mut self, delta: Duration) -> Vec<Fired<T>> {
        let until = self.now + delta;
        let mut fired = Vec::new();
        while let Some(event) = self.pop_due(until) {
            fired.push(event);
        }
        self.settle(until);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut scheduler = TaskScheduler::new();
        let id = scheduler.schedule_once(ms(100), "done");

        assert!(scheduler.advance(ms(99)).is_empty());
        let fired = scheduler.advance(ms(1));
        assert_eq!(fired, vec![Fired { id, at: ms(100), task: "done" }]);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.advance(ms(1000)).is_empty());
    }

    #[test]
    fn test_repeating_fires_on_cadence() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_repeating(ms(100), "tick");

        let fired = scheduler.advance(ms(350));
        let times: Vec<_> = fired.iter().map(|f| f.at).collect();
        assert_eq!(times, vec![ms(100), ms(200), ms(300)]);
        assert_eq!(scheduler.now(), ms(350));
        assert_eq!(scheduler.pop_due(ms(399)), None);
        assert_eq!(scheduler.pop_due(ms(400)).map(|f| f.at), Some(ms(400)));
    }

    #[test]
    fn test_interleaving_is_time_ordered() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_repeating(ms(100), "tick");
        scheduler.schedule_once(ms(250), "done");

        let tasks: Vec<_> = scheduler.advance(ms(300)).into_iter().map(|f| f.task).collect();
        assert_eq!(tasks, vec!["tick", "tick", "done", "tick"]);
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_once(ms(50), "first");
        scheduler.schedule_once(ms(50), "second");

        let tasks: Vec<_> = scheduler.advance(ms(50)).into_iter().map(|f| f.task).collect();
        assert_eq!(tasks, vec!["first", "second"]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = TaskScheduler::new();
        let ticker = scheduler.schedule_repeating(ms(10), 1);
        let once = scheduler.schedule_once(ms(25), 2);

        assert!(scheduler.cancel(ticker));
        assert!(!scheduler.cancel(ticker));
        assert_eq!(scheduler.pending_count(), 1);

        let tasks: Vec<_> = scheduler.advance(ms(100)).into_iter().map(|f| f.task).collect();
        assert_eq!(tasks, vec![2]);
        assert!(!scheduler.cancel(once));
    }

    #[test]
    fn test_cancel_between_pops() {
        let mut scheduler = TaskScheduler::new();
        let ticker = scheduler.schedule_repeating(ms(10), "tick");

        let first = scheduler.pop_due(ms(100)).unwrap();
        assert_eq!(first.at, ms(10));
        scheduler.cancel(ticker);
        assert!(scheduler.pop_due(ms(100)).is_none());
        scheduler.settle(ms(100));
        assert_eq!(scheduler.now(), ms(100));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_repeating(Duration::ZERO, ());
        assert_eq!(scheduler.advance(ms(5)).len(), 5);
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut scheduler = TaskScheduler::new();
        scheduler.advance(ms(1000));
        scheduler.schedule_once(ms(10), "late");
        assert!(scheduler.advance(ms(9)).is_empty());
        assert_eq!(scheduler.advance(ms(1)).len(), 1);
    }
}
