//! Two-sided countdown clock.
//!
//! Elapsed time is read from a [`TimeSource`] only when a method is called;
//! nothing ticks in the background, so a timeout is noticed on the next call
//! that reconciles the active side.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

use crate::types::Color;

/// Millisecond wall clock the timer reads from.
pub trait TimeSource: Send + Sync + fmt::Debug {
    fn now_ms(&self) -> i64;
}

/// Monotonic clock measured from its own creation.
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

/// Clock that only moves when told to. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Arc<AtomicI64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Remaining time after charging `elapsed_ms`, floored at zero.
/// Negative elapsed time (clock skew) charges nothing.
pub fn charge_elapsed(remaining_ms: i64, elapsed_ms: i64) -> i64 {
    (remaining_ms - elapsed_ms.max(0)).max(0)
}

/// Format milliseconds as `MM:SS`.
pub fn format_ms(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes:02}:{seconds:02}")
}

#[derive(Debug, Clone)]
pub struct ChessTimer {
    white_remaining_ms: i64,
    black_remaining_ms: i64,
    white_last_ts: i64,
    black_last_ts: i64,
    running: bool,
    started: bool,
    active: Color,
    source: Arc<dyn TimeSource>,
}

impl ChessTimer {
    /// Timer giving each side `minutes`, reading the system clock.
    pub fn new(minutes: u32) -> Self {
        Self::with_source(minutes, Arc::new(SystemTimeSource::new()))
    }

    pub fn with_source(minutes: u32, source: Arc<dyn TimeSource>) -> Self {
        let initial_ms = i64::from(minutes) * 60 * 1000;
        Self {
            white_remaining_ms: initial_ms,
            black_remaining_ms: initial_ms,
            white_last_ts: 0,
            black_last_ts: 0,
            running: false,
            started: false,
            active: Color::White,
            source,
        }
    }

    /// Begin charging the active side. No-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.started = true;
        let now = self.source.now_ms();
        *self.last_ts_mut(self.active) = now;
    }

    /// Stop charging either side. Timestamps are left as they are.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Charge the side that just moved and hand the clock to the other side.
    /// When stopped only the active side flips.
    pub fn switch_turn(&mut self) {
        if self.running {
            let now = self.source.now_ms();
            let mover = self.active;
            let elapsed = now - self.last_ts(mover);
            let remaining = charge_elapsed(self.remaining_raw(mover), elapsed);
            *self.remaining_mut(mover) = remaining;
            self.active = mover.other();
            *self.last_ts_mut(self.active) = now;
        } else {
            self.active = self.active.other();
        }
    }

    /// Reconcile the active side against the clock, then report whether it
    /// has run out.
    pub fn is_timeout(&mut self) -> bool {
        self.reconcile_active();
        self.remaining_raw(self.active) <= 0
    }

    /// Remaining time for `c` as of now, without mutating the timer.
    pub fn remaining_ms(&self, c: Color) -> i64 {
        let stored = self.remaining_raw(c);
        if self.running && c == self.active {
            charge_elapsed(stored, self.source.now_ms() - self.last_ts(c))
        } else {
            stored
        }
    }

    pub fn formatted_time(&self, c: Color) -> String {
        format_ms(self.remaining_ms(c))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether [`start`](Self::start) has ever been called.
    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn active_side(&self) -> Color {
        self.active
    }

    fn reconcile_active(&mut self) {
        if !self.running {
            return;
        }
        let now = self.source.now_ms();
        let side = self.active;
        let elapsed = now - self.last_ts(side);
        if elapsed > 0 {
            *self.remaining_mut(side) = charge_elapsed(self.remaining_raw(side), elapsed);
            *self.last_ts_mut(side) = now;
        }
    }

    fn remaining_raw(&self, c: Color) -> i64 {
        match c {
            Color::White => self.white_remaining_ms,
            Color::Black => self.black_remaining_ms,
        }
    }

    fn remaining_mut(&mut self, c: Color) -> &mut i64 {
        match c {
            Color::White => &mut self.white_remaining_ms,
            Color::Black => &mut self.black_remaining_ms,
        }
    }

    fn last_ts(&self, c: Color) -> i64 {
        match c {
            Color::White => self.white_last_ts,
            Color::Black => self.black_last_ts,
        }
    }

    fn last_ts_mut(&mut self, c: Color) -> &mut i64 {
        match c {
            Color::White => &mut self.white_last_ts,
            Color::Black => &mut self.black_last_ts,
        }
    }
}

impl Default for ChessTimer {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod timer_tests;
