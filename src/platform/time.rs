use std::time::Duration;

/// Fixed timestep accumulator.
/// Converts variable wall-clock frame time into whole simulation steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Duration of one simulation step
    step: Duration,
    /// Wall-clock time not yet consumed by a step
    accumulator: Duration,
    /// Most steps handed out by a single `accumulate` call
    max_steps: u32,
}

impl FixedTimestep {
    /// `rate` steps per second, at most `max_steps` per pass
    pub fn new(rate: u32, max_steps: u32) -> Self {
        let rate = rate.max(1);
        Self {
            step: Duration::from_secs(1) / rate,
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    /// Add elapsed wall-clock time. Returns the number of steps to run now.
    ///
    /// Whole steps beyond `max_steps` are dropped rather than carried, so a long
    /// stall costs at most one capped burst instead of an ever-growing backlog.
    /// The sub-step remainder is always kept.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let step_nanos = self.step.as_nanos().max(1);
        let acc_nanos = self.accumulator.as_nanos();
        let whole = acc_nanos / step_nanos;
        self.accumulator = Duration::from_nanos((acc_nanos % step_nanos) as u64);

        let capped = whole.min(self.max_steps as u128) as u32;
        if whole > capped as u128 {
            log::debug!("Scheduler fell behind, dropped {} steps", whole - capped as u128);
        }
        capped
    }

    /// Fraction of a step currently accumulated (0.0 to 1.0)
    pub fn alpha(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.step.as_secs_f64()
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }
}
