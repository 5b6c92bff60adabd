//! Problem orchestration, solutions and their validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{ComplexityEstimate, ComplexityLevel, ReverseProblem};
pub use solution::{Solution, SolutionMetadata, SolutionSummary};
pub use validator::{validate_transition, RuleViolation, SolutionValidator, ValidationResult};
