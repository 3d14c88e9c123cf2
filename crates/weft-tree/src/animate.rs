#![forbid(unsafe_code)]

//! Frame timing for animated nodes, without timer threads.
//!
//! Animation state is a pure function of elapsed time sampled at render
//! time. A [`Ticker`] reports the current frame index and the time until
//! the next visible change; the external frame driver uses the latter to
//! schedule the next repaint.

use std::time::{Duration, Instant};

/// A fixed-interval frame clock.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    started: Instant,
    interval: Duration,
    frames: usize,
}

impl Ticker {
    /// A ticker cycling through `frames` frames, advancing every
    /// `interval`, starting now.
    pub fn new(interval: Duration, frames: usize) -> Self {
        Self::starting_at(Instant::now(), interval, frames)
    }

    pub fn starting_at(started: Instant, interval: Duration, frames: usize) -> Self {
        Self {
            started,
            interval,
            frames,
        }
    }

    /// Restart the cycle from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.started = now;
    }

    /// Current frame index at the sampled instant.
    pub fn frame_index(&self, now: Instant) -> usize {
        if self.frames == 0 || self.interval.is_zero() {
            return 0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let ticks = (elapsed.as_nanos() / self.interval.as_nanos()) as usize;
        ticks % self.frames
    }

    /// Time until the frame index next changes.
    ///
    /// Zero-interval or single-frame tickers never change; callers treat
    /// `None` from [`crate::node::Node::next_frame_in`] the same way.
    pub fn next_change_in(&self, now: Instant) -> Option<Duration> {
        if self.frames <= 1 || self.interval.is_zero() {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let into_tick = elapsed.as_nanos() % self.interval.as_nanos();
        let remaining = self.interval.as_nanos() - into_tick;
        Some(Duration::from_nanos(remaining.min(u64::MAX as u128) as u64))
    }
}
