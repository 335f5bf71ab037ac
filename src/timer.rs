use std::time::{Duration, Instant};

/// Sampling and countdown cadence of a running session.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest period a timer accepts; shorter ones are raised to it.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Periodic deadline owned by a running session.
///
/// The session holds it as `Option<SessionTimer>`: it exists from the first
/// keystroke until the session finishes or is replaced, and ticks can only be
/// drawn from a live timer.
#[derive(Debug)]
pub struct SessionTimer {
    period: Duration,
    next: Instant,
}

impl SessionTimer {
    pub fn start(now: Instant) -> Self {
        Self::with_period(now, TICK_INTERVAL)
    }

    pub fn with_period(now: Instant, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        tracing::trace!(target: "session.timer", ?period, "timer_acquired");
        Self {
            period,
            next: now + period,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Number of whole periods that elapsed up to `now`; advances the deadline
    /// past `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while self.next <= now {
            self.next += self.period;
            fired += 1;
        }
        fired
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        tracing::trace!(target: "session.timer", "timer_released");
    }
}
