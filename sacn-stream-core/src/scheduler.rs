// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Decides on every tick whether a send pass is due.
//!
//! The scheduler only keeps track of time. It is advanced with the time passed since the last tick and compares the
//! accumulated time against the time of the last send. With the framerate gate switched off every tick is a send.

use core::time::Duration;

/// Framerate used until another one is set.
pub const DEFAULT_FRAMERATE: f32 = 30.0;

/// Framerate gate and auto send switch of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct SendScheduler {
    elapsed: Duration,
    last_send: Duration,
    send_interval: Duration,
    framerate: f32,
    use_framerate: bool,
    auto_send: bool,
}

impl Default for SendScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAMERATE)
    }
}

impl SendScheduler {
    /// Creates a scheduler with the given framerate, gate and auto send enabled.
    pub fn new(framerate: f32) -> Self {
        let mut scheduler = Self {
            elapsed: Duration::ZERO,
            last_send: Duration::ZERO,
            send_interval: Duration::ZERO,
            framerate: 0.0,
            use_framerate: true,
            auto_send: true,
        };
        scheduler.set_framerate(framerate);
        scheduler
    }

    /// Sets the number of sends per second used by the framerate gate.
    ///
    /// A framerate of zero or below, or one too small to give a representable interval, stops gated sending.
    pub fn set_framerate(&mut self, framerate: f32) {
        self.framerate = framerate;
        self.send_interval = if framerate > 0.0 {
            Duration::try_from_secs_f32(1.0 / framerate).unwrap_or(Duration::MAX)
        } else {
            Duration::MAX
        };
        tracing::debug!(framerate, interval = ?self.send_interval, "framerate set");
    }

    /// Current framerate
    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    /// Time between two gated sends
    pub fn send_interval(&self) -> Duration {
        self.send_interval
    }

    /// Turns the framerate gate on or off
    pub fn set_use_framerate(&mut self, use_framerate: bool) {
        self.use_framerate = use_framerate;
    }

    /// Returns true if sends are limited to the framerate
    pub fn use_framerate(&self) -> bool {
        self.use_framerate
    }

    /// Turns sending from [`Self::tick`] on or off
    pub fn set_auto_send(&mut self, auto_send: bool) {
        self.auto_send = auto_send;
    }

    /// Returns true if [`Self::tick`] may trigger sends
    pub fn auto_send(&self) -> bool {
        self.auto_send
    }

    /// Accumulated time since the scheduler was created
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Accumulated time at the last send
    pub fn last_send(&self) -> Duration {
        self.last_send
    }

    /// Returns true if a send is due at `current`. Does not record anything, see [`Self::tick`].
    ///
    /// Without the framerate gate this always returns true. With it, a full send interval must have passed since the
    /// last send and the framerate must be above zero.
    pub fn should_send_data(&self, current: Duration) -> bool {
        if !self.use_framerate {
            return true;
        }

        self.framerate > 0.0 && current.saturating_sub(self.last_send) >= self.send_interval
    }

    /// Advances the scheduler by `delta` and returns true if a send pass should run now.
    ///
    /// A due send is recorded as the last send. Nothing is ever due while auto send is off.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta);
        if !self.auto_send || !self.should_send_data(self.elapsed) {
            return false;
        }

        self.last_send = self.elapsed;
        true
    }
}
