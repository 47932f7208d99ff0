//! Wall-clock and frame-delta sources.
//!
//! Decay and hatching are measured against the wall clock (so time spent with the
//! client closed still counts), while motion integrates the per-frame delta.

use std::cell::Cell;

use time::OffsetDateTime;

use crate::constants::MAX_FRAME_DELTA;

/// Epoch milliseconds.
pub type Millis = i64;

/// A source of wall-clock time.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as Millis
    }
}

/// A clock that only moves when told to. Used by tests and the headless demo.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self { now: Cell::new(start) }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Clamps a raw frame delta (seconds) into `[0, MAX_FRAME_DELTA]`.
///
/// Non-finite and negative deltas become zero.
pub fn clamp_delta(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    }
}
