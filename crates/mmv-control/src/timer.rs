//! Owned timer handle driven by an external clock.
//!
//! Nothing here reads the wall clock: callers pass `now` (time elapsed since
//! an arbitrary origin) to every method, which keeps playback deterministic
//! under test.

use std::time::Duration;

/// A one-shot deadline.  Periodic use re-arms it after each fire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Duration>,
}

impl Timer {
    pub const fn stopped() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the timer to fire at `at`.
    #[inline]
    pub fn start(&mut self, at: Duration) {
        self.deadline = Some(at);
    }

    #[inline]
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[inline]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    /// Disarm and return `true` when the deadline has passed.
    pub fn fire(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
