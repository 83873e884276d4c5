// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Time sources driving the send scheduler.

use core::time::Duration;

#[cfg(feature = "std")]
extern crate std;

/// A monotonic time source.
///
/// `now` returns the time passed since an arbitrary, fixed origin of the clock and must never go backwards.
pub trait Clock {
    /// Time since the origin of this clock
    fn now(&mut self) -> Duration;
}

/// Wall clock time backed by [`std::time::Instant`]
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Creates a clock with its origin at the current instant
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Useful for hosts that already track their own frame time, and in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Creates a clock standing at its origin
    pub const fn new() -> Self {
        Self { now: Duration::ZERO }
    }

    /// Moves the clock forward by `delta`
    pub fn advance(&mut self, delta: Duration) {
        self.now = self.now.saturating_add(delta);
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now
    }
}
