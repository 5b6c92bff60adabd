//! Optional step and wall-clock limits for a search

use crate::error::ReverseError;
use std::time::{Duration, Instant};

/// The clock is only read every this many steps
const CLOCK_POLL_INTERVAL: u64 = 1024;

#[derive(Debug, Clone)]
pub struct SearchBudget {
    max_steps: Option<u64>,
    timeout: Option<Duration>,
    started: Instant,
    steps: u64,
}

impl SearchBudget {
    pub fn new(max_steps: Option<u64>, timeout: Option<Duration>) -> Self {
        Self {
            max_steps,
            timeout,
            started: Instant::now(),
            steps: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Reset the counters for a fresh solve
    pub fn restart(&mut self) {
        self.started = Instant::now();
        self.steps = 0;
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Account for one search node
    #[inline]
    pub fn tick(&mut self) -> Result<(), ReverseError> {
        self.steps += 1;

        if let Some(max) = self.max_steps {
            if self.steps > max {
                return Err(ReverseError::StepBudgetExhausted { steps: max });
            }
        }

        if let Some(timeout) = self.timeout {
            if self.steps % CLOCK_POLL_INTERVAL == 0 && self.started.elapsed() >= timeout {
                return Err(ReverseError::TimeBudgetExhausted {
                    seconds: timeout.as_secs(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_fails() {
        let mut budget = SearchBudget::unlimited();
        for _ in 0..10_000 {
            budget.tick().unwrap();
        }
        assert_eq!(budget.steps(), 10_000);
    }

    #[test]
    fn test_step_limit() {
        let mut budget = SearchBudget::new(Some(3), None);
        assert!(budget.tick().is_ok());
        assert!(budget.tick().is_ok());
        assert!(budget.tick().is_ok());
        assert_eq!(budget.tick(), Err(ReverseError::StepBudgetExhausted { steps: 3 }));

        budget.restart();
        assert!(budget.tick().is_ok());
    }

    #[test]
    fn test_clock_polled_periodically() {
        let mut budget = SearchBudget::new(None, Some(Duration::ZERO));
        for _ in 1..CLOCK_POLL_INTERVAL {
            budget.tick().unwrap();
        }
        assert_eq!(budget.tick(), Err(ReverseError::TimeBudgetExhausted { seconds: 0 }));
    }
}
