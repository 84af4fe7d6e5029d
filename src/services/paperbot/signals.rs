//! Expiry schedule for advisory signals.
//!
//! Every enqueued signal gets a one-shot deadline `ttl` after it was raised. The TTL is
//! fixed, so deadlines come out in insertion order and the front is always the earliest.

use std::collections::VecDeque;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExpirySchedule {
    ttl: Duration,
    deadlines: VecDeque<Instant>,
}

impl ExpirySchedule {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            deadlines: VecDeque::new(),
        }
    }

    /// Schedule an expiry for a signal raised at `now`.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.ttl;
        self.deadlines.push_back(deadline);
        deadline
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.front().copied()
    }

    /// Consume the earliest deadline once it has fired.
    pub fn pop_next(&mut self) -> Option<Instant> {
        self.deadlines.pop_front()
    }

    /// Cancel every pending expiry.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlines_follow_insertion_order() {
        let mut schedule = ExpirySchedule::new(Duration::from_millis(1800));
        let start = Instant::now();

        let first = schedule.schedule(start);
        let second = schedule.schedule(start + Duration::from_millis(1500));

        assert_eq!(first, start + Duration::from_millis(1800));
        assert_eq!(schedule.next_deadline(), Some(first));
        assert_eq!(schedule.pop_next(), Some(first));
        assert_eq!(schedule.next_deadline(), Some(second));
    }

    #[test]
    fn test_clear_cancels_pending() {
        let mut schedule = ExpirySchedule::new(Duration::from_secs(1));
        schedule.schedule(Instant::now());
        schedule.schedule(Instant::now());

        schedule.clear();

        assert!(schedule.is_empty());
        assert_eq!(schedule.next_deadline(), None);
    }
}
