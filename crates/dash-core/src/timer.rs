//! Cancellable periodic timers on a virtual monotonic clock.
//!
//! The queue never sleeps. The event loop advances it (by wall-clock time
//! in the CLI, by fixed steps in tests) and dispatches each due timer as a
//! message before asking for the next one, so a handler that cancels its
//! own timer is never fired again within the same advance.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    period: Duration,
    deadline: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock offset.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Starts a timer firing every `period`, first at `now + period`.
    /// A zero period is raised to one millisecond.
    pub fn schedule_every(&mut self, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            period,
            deadline: self.now + period,
        });
        id
    }

    /// Stops `id`. Cancelling an unknown or already cancelled timer is a
    /// no-op; returns whether a running timer was stopped.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Pops the earliest timer due at or before `until`, moving the clock
    /// to its deadline and rescheduling it one period later. Ties fire in
    /// scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.deadline <= until)
            .min_by_key(|t| (t.deadline, t.id))?;
        self.now = self.now.max(timer.deadline);
        timer.deadline += timer.period;
        Some(timer.id)
    }

    /// Moves the clock to `until` once every due timer has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let slow = timers.schedule_every(ms(300));
        let fast = timers.schedule_every(ms(200));

        let until = ms(600);
        let mut fired = Vec::new();
        while let Some(id) = timers.pop_due(until) {
            fired.push((id, timers.now()));
        }
        timers.settle(until);
        assert_eq!(
            fired,
            vec![
                (fast, ms(200)),
                (slow, ms(300)),
                (fast, ms(400)),
                (slow, ms(600)),
                (fast, ms(600)),
            ]
        );
        assert_eq!(timers.now(), until);
        assert_eq!(timers.next_deadline(), Some(ms(800)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_every(ms(500));
        assert!(timers.is_active(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.active_count(), 0);
        assert_eq!(timers.pop_due(ms(10_000)), None);
    }

    #[test]
    fn cancelled_timer_stops_mid_advance() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_every(ms(100));
        assert_eq!(timers.pop_due(ms(1_000)), Some(id));
        timers.cancel(id);
        assert_eq!(timers.pop_due(ms(1_000)), None);
    }
}
