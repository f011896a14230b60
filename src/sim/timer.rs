//! Session countdown

/// Result of one timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting; seconds left
    Running(u32),
    /// Reached zero on this tick. Reported exactly once.
    Expired,
    /// Timer is not running
    Stopped,
}

/// Counts whole seconds down from the session length
#[derive(Debug, Clone)]
pub struct Timer {
    remaining: u32,
    max: u32,
    running: bool,
}

impl Timer {
    pub fn new(max_secs: u32) -> Self {
        Self {
            remaining: max_secs,
            max: max_secs,
            running: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Refill to the maximum and start counting
    pub fn restart(&mut self) {
        self.remaining = self.max;
        self.running = true;
    }

    /// One second elapsed
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TimerTick::Expired
        } else {
            TimerTick::Running(self.remaining)
        }
    }

    /// Add bonus seconds, capped at the session length. Returns seconds actually added.
    pub fn extend(&mut self, secs: u32) -> u32 {
        if !self.running {
            return 0;
        }
        let before = self.remaining;
        self.remaining = self.remaining.saturating_add(secs).min(self.max);
        self.remaining - before
    }

    /// Stop counting. Stopping a stopped timer is a no-op.
    pub fn cancel(&mut self) {
        self.running = false;
    }
}
