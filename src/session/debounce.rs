use std::time::{Duration, Instant};

/// Default quiet period before an edit burst is persisted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Trailing-edge debounce: every `touch` restarts the window, and the
/// pending action fires once the window elapses with no further touches.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending action if its window has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending action regardless of the window.
    pub fn take_pending(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
