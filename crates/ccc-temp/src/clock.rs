//! Time source abstraction for the polling loop.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};

/// Source of wall-clock time and blocking pauses for the polling loop.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
    /// Blocks for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// The host clock; sleeps block the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Clock that never blocks: sleeping advances its time and is recorded.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: DateTime<Local>,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Clock reading `now` until slept.
    pub fn starting_at(now: DateTime<Local>) -> Self {
        Self {
            now,
            sleeps: Vec::new(),
        }
    }

    /// Every pause requested so far, in order.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        let step = chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        self.now = self.now + step;
        self.sleeps.push(duration);
    }
}
