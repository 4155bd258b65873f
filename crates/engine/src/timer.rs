use std::time::{Duration, Instant};

/// Debounce timer owned by the engine.
///
/// Each arm replaces the pending deadline, so a burst of signals fires once,
/// `delay` after the last one.
#[derive(Debug, Clone)]
pub struct PendingTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl PendingTimer {
    /// Idle timer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns true if an earlier pending deadline was discarded.
    pub fn arm(&mut self, now: Instant) -> bool {
        self.deadline.replace(now + self.delay).is_some()
    }

    /// Pending deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a deadline is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clear and report the deadline if it has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
