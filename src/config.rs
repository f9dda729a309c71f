use std::time::Duration;

use crate::error::SchedulerError;

pub const DEFAULT_AGING_COEFFICIENT: f64 = 0.1;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Priority units shaved off per tick of waiting (default: 0.1)
    pub aging_coefficient: f64,

    /// Log every simulation event at `info` instead of `debug`
    pub verbose: bool,

    /// Delay between executed ticks when verbose. Cosmetic only.
    pub pacing: Option<Duration>,
}

impl SchedulerConfig {
    pub fn new(aging_coefficient: f64) -> Self {
        Self {
            aging_coefficient,
            ..Self::default()
        }
    }

    /// Pure priority scheduling, starvation possible
    pub fn no_aging() -> Self {
        Self::new(0.0)
    }

    pub fn aggressive() -> Self {
        Self::new(0.5)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        validate_aging_coefficient(self.aging_coefficient)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            aging_coefficient: DEFAULT_AGING_COEFFICIENT,
            verbose: false,
            pacing: None,
        }
    }
}

pub(crate) fn validate_aging_coefficient(coefficient: f64) -> Result<(), SchedulerError> {
    if coefficient.is_finite() && coefficient >= 0.0 {
        Ok(())
    } else {
        Err(SchedulerError::InvalidAgingCoefficient(coefficient))
    }
}
