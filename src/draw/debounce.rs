use std::time::{Duration, Instant};

/// Fire-once scheduled action that is pushed back on every re-arm.
///
/// Time is supplied by the caller so the owner decides when to poll.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Changes the quiet period. A pending deadline keeps its original time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedules the action `delay` after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drops the pending action. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drains the pending action immediately. Returns whether the owner should
    /// run it now.
    pub fn flush(&mut self) -> bool {
        self.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.arm(start);

        assert!(!debounce.poll(start + Duration::from_millis(499)));
        assert!(debounce.poll(start + Duration::from_millis(500)));
        assert!(!debounce.poll(start + Duration::from_secs(5)));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn rearm_pushes_deadline_back() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(100));
        debounce.arm(start);
        debounce.arm(start + Duration::from_millis(80));

        assert!(!debounce.poll(start + Duration::from_millis(150)));
        assert!(debounce.poll(start + Duration::from_millis(180)));
    }

    #[test]
    fn new_delay_applies_on_next_arm() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.arm(start);
        debounce.set_delay(Duration::from_millis(50));

        assert!(!debounce.poll(start + Duration::from_millis(100)));
        assert!(debounce.poll(start + Duration::from_millis(500)));

        debounce.arm(start);
        assert!(debounce.poll(start + Duration::from_millis(50)));
    }

    #[test]
    fn cancel_and_flush_drain_pending() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(100));
        assert!(!debounce.cancel());
        assert!(!debounce.flush());

        debounce.arm(start);
        assert!(debounce.cancel());
        assert!(!debounce.poll(start + Duration::from_secs(1)));

        debounce.arm(start);
        assert!(debounce.flush());
        assert!(!debounce.is_pending());
    }
}
