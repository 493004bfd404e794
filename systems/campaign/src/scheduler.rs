use std::time::Duration;

/// Default interval between two ticks of the level loop.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Most ticks a single frame may catch up on; older backlog is discarded.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Converts variable frame durations into a whole number of fixed ticks.
#[derive(Clone, Debug)]
pub struct FixedStepScheduler {
    interval: Duration,
    accumulator: Duration,
    stopped: bool,
}

impl FixedStepScheduler {
    /// Creates a running scheduler with the provided tick interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
            stopped: false,
        }
    }

    /// Interval between two ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulates elapsed time and returns the number of ticks now due.
    ///
    /// A stopped scheduler never reports due ticks. At most
    /// [`MAX_CATCH_UP_TICKS`] are reported per call; after a longer stall the
    /// remaining backlog is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.stopped || self.interval.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        let mut due = 0;
        while self.accumulator >= self.interval {
            if due == MAX_CATCH_UP_TICKS {
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.interval;
            due += 1;
        }
        due
    }

    /// Stops the scheduler; no tick is reported afterwards.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.accumulator = Duration::ZERO;
    }

    /// Resumes a stopped scheduler with an empty accumulator.
    pub fn restart(&mut self) {
        self.stopped = false;
        self.accumulator = Duration::ZERO;
    }

    /// Reports whether the scheduler was stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}
