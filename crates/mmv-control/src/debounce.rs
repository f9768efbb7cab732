//! `Debouncer<T>` — paces a call so it fires at most once per interval.
//!
//! ```text
//!  request(a) ─► fires a now          (idle for ≥ interval)
//!  request(b) ─► deferred to last_fire + interval
//!  request(c) ─► replaces b, same deadline
//!  poll(≥ deadline) ─► fires c once
//! ```

use std::time::Duration;

use crate::timer::Timer;

#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    interval:  Duration,
    last_fire: Option<Duration>,
    pending:   Option<T>,
    timer:     Timer,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_fire: None, pending: None, timer: Timer::stopped() }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn last_fire(&self) -> Option<Duration> {
        self.last_fire
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending call will fire, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Ask for a call with `args`.
    ///
    /// Returns the arguments back when the call may go out right away;
    /// otherwise they replace whatever was pending and `None` is returned.
    pub fn request(&mut self, now: Duration, args: T) -> Option<T> {
        let ready = self.last_fire.is_none_or(|last| now.saturating_sub(last) >= self.interval);
        if ready && self.pending.is_none() {
            self.last_fire = Some(now);
            return Some(args);
        }

        self.pending = Some(args);
        let at = self.last_fire.map_or(now, |last| last + self.interval);
        self.timer.start(at.max(now));
        None
    }

    /// Release the pending call once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if !self.timer.fire(now) {
            return None;
        }
        let args = self.pending.take()?;
        self.last_fire = Some(now);
        Some(args)
    }

    /// Drop the pending call.  The pacing history is kept.
    pub fn cancel(&mut self) {
        self.timer.stop();
        self.pending = None;
    }

    /// Drop the pending call and forget the last fire time.
    pub fn reset(&mut self) {
        self.cancel();
        self.last_fire = None;
    }
}
