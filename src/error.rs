//! Error kinds raised by the predecessor search library

use thiserror::Error;

/// Errors that are not ordinary search outcomes.
///
/// "No predecessor exists" is never an error; searches report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseError {
    /// Two grids (or a grid and a mask) passed to one operation differ in size.
    #[error(
        "dimension mismatch: expected {expected_width}x{expected_height}, found {found_width}x{found_height}"
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        found_width: usize,
        found_height: usize,
    },

    /// A flat cell buffer does not hold exactly width * height cells.
    #[error("cell buffer of length {len} does not fit a {width}x{height} grid")]
    InvalidBuffer {
        len: usize,
        width: usize,
        height: usize,
    },

    /// The configured step budget ran out before the search finished.
    #[error("search step budget exhausted after {steps} steps")]
    StepBudgetExhausted { steps: u64 },

    /// The configured wall-clock budget ran out before the search finished.
    #[error("search time budget of {seconds}s exhausted")]
    TimeBudgetExhausted { seconds: u64 },
}

impl ReverseError {
    /// Build a mismatch error from two `(width, height)` pairs.
    pub fn mismatch(expected: (usize, usize), found: (usize, usize)) -> Self {
        ReverseError::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            found_width: found.0,
            found_height: found.1,
        }
    }

    /// Whether this error means a search gave up rather than failed.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(
            self,
            ReverseError::StepBudgetExhausted { .. } | ReverseError::TimeBudgetExhausted { .. }
        )
    }
}
