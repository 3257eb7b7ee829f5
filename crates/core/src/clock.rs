/// Repeating turn timer.
///
/// Time arrives in milliseconds from whoever drives the engine. Every full
/// clock period (one second by default) the countdown steps once: it
/// decrements while more than one period remains, and otherwise reports a
/// turn expiry and reloads the interval. Partial periods carry over between
/// calls.
#[derive(Debug, Clone)]
pub struct TurnClock {
    period_ms: u64,
    interval_secs: u32,
    time_left: u32,
    carry_ms: u64,
    armed: bool,
}

impl TurnClock {
    pub fn new(period_ms: u64, interval_secs: u32) -> Self {
        let interval_secs = interval_secs.max(1);
        Self {
            period_ms: period_ms.max(1),
            interval_secs,
            time_left: interval_secs,
            carry_ms: 0,
            armed: false,
        }
    }

    /// Start counting down from `interval_secs`.
    pub fn arm(&mut self, interval_secs: u32) {
        self.interval_secs = interval_secs.max(1);
        self.time_left = self.interval_secs;
        self.carry_ms = 0;
        self.armed = true;
    }

    /// Stop the clock. Safe to call on a clock that is already cancelled.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.carry_ms = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Feed elapsed time; returns how many turns expired.
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        if !self.armed {
            return 0;
        }

        self.carry_ms = self.carry_ms.saturating_add(elapsed_ms);
        let mut expired = 0;
        while self.carry_ms >= self.period_ms {
            self.carry_ms -= self.period_ms;
            if self.time_left > 1 {
                self.time_left -= 1;
            } else {
                expired += 1;
                self.time_left = self.interval_secs;
            }
        }
        expired
    }
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new(1000, 5)
    }
}
