//! Scroll throttle
//!
//! Lets at most one event through per interval. The first event in a quiet
//! period passes immediately; later events in the same window replace each
//! other and the survivor is released once the window closes.
//!
//! Time is passed in explicitly so the throttle can be driven without a clock.

use std::time::Duration;
use tokio::time::Instant;

/// Leading- and trailing-edge throttle
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle; a zero interval lets everything through
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
        }
    }

    /// Offer an event. Returns it if it may be evaluated now, otherwise
    /// parks it as the trailing event.
    pub fn offer(&mut self, now: Instant, event: T) -> Option<T> {
        if self.is_open(now) {
            self.last_fired = Some(now);
            self.pending = None;
            Some(event)
        } else {
            self.pending = Some(event);
            None
        }
    }

    /// Release the trailing event if its window has closed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.is_open(now) {
            self.last_fired = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// When the trailing event becomes due, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        Some(self.last_fired.map_or_else(Instant::now, |t| t + self.interval))
    }

    /// Whether an event is parked
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_open(&self, now: Instant) -> bool {
        self.last_fired
            .map_or(true, |t| now.saturating_duration_since(t) >= self.interval)
    }
}
