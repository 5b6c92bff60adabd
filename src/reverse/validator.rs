//! Independent checking of predecessors and evolution paths

use super::Solution;
use crate::config::Settings;
use crate::error::ReverseError;
use crate::game_of_life::{GameOfLifeRules, Grid};
use itertools::iproduct;

/// Re-simulates candidate predecessors forward and reports what went wrong
pub struct SolutionValidator {
    generations: usize,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub evolution_path: Vec<Grid>,
    pub error_message: Option<String>,
    pub validation_details: ValidationDetails,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    pub generations_checked: usize,
    pub final_state_matches: bool,
    /// Steps `i` where generation `i` equals generation `i + 1`
    pub fixed_point_steps: Vec<usize>,
    pub rule_violations: Vec<RuleViolation>,
    pub validation_time_ms: u64,
}

/// A cell whose next state does not follow from its neighborhood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub generation: usize,
    /// `(row, col)`
    pub cell_position: (usize, usize),
    pub expected_state: bool,
    pub actual_state: bool,
    pub neighbor_count: u8,
}

impl SolutionValidator {
    pub fn new(generations: usize) -> Self {
        Self { generations }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.simulation.generations)
    }

    /// Advance `predecessor` the configured number of generations and compare
    /// with `target`. No step may leave its grid unchanged.
    pub fn validate(&self, predecessor: &Grid, target: &Grid) -> ValidationResult {
        let start_time = std::time::Instant::now();

        if let Err(e) = target.ensure_same_dimensions(predecessor) {
            return ValidationResult::rejected(e.to_string());
        }

        let evolution_path = GameOfLifeRules::evolution_path(predecessor, self.generations);
        let fixed_point_steps = fixed_point_steps(&evolution_path);
        let final_state_matches = evolution_path.last() == Some(target);

        let details = ValidationDetails {
            generations_checked: self.generations,
            final_state_matches,
            fixed_point_steps,
            rule_violations: Vec::new(),
            validation_time_ms: start_time.elapsed().as_millis() as u64,
        };

        ValidationResult::from_details(evolution_path, details)
    }

    /// Check a supplied path step by step, oldest grid first.
    pub fn validate_path(&self, path: &[Grid]) -> ValidationResult {
        let start_time = std::time::Instant::now();

        if path.len() != self.generations + 1 {
            return ValidationResult::rejected(format!(
                "Expected {} grids for {} generations, found {}",
                self.generations + 1,
                self.generations,
                path.len()
            ));
        }

        let mut rule_violations = Vec::new();
        for (generation, pair) in path.windows(2).enumerate() {
            match validate_transition(&pair[0], &pair[1], generation) {
                Ok(violations) => rule_violations.extend(violations),
                Err(e) => return ValidationResult::rejected(e.to_string()),
            }
        }

        let details = ValidationDetails {
            generations_checked: self.generations,
            final_state_matches: rule_violations.is_empty(),
            fixed_point_steps: fixed_point_steps(path),
            rule_violations,
            validation_time_ms: start_time.elapsed().as_millis() as u64,
        };

        ValidationResult::from_details(path.to_vec(), details)
    }

    /// Check both the stored path and its endpoints
    pub fn validate_solution(&self, solution: &Solution) -> ValidationResult {
        let path = &solution.evolution_path;
        if path.first() != Some(&solution.predecessor) || path.last() != Some(&solution.target) {
            return ValidationResult::rejected(
                "Evolution path does not run from predecessor to target".to_string(),
            );
        }
        self.validate_path(path)
    }

    /// Only compare the final state
    pub fn quick_validate(&self, predecessor: &Grid, target: &Grid) -> Result<bool, ReverseError> {
        target.ensure_same_dimensions(predecessor)?;
        let evolved = GameOfLifeRules::evolve_generations(predecessor.clone(), self.generations);
        Ok(GameOfLifeRules::grids_equal(&evolved, target))
    }
}

/// Every cell of `next` that does not follow from `current` under the rules
pub fn validate_transition(
    current: &Grid,
    next: &Grid,
    generation: usize,
) -> Result<Vec<RuleViolation>, ReverseError> {
    current.ensure_same_dimensions(next)?;

    let violations = iproduct!(0..current.height, 0..current.width)
        .filter_map(|(row, col)| {
            let neighbor_count = current.count_neighbors(row, col);
            let expected_state = GameOfLifeRules::should_be_alive(current.get(row, col), neighbor_count);
            let actual_state = next.get(row, col);
            (expected_state != actual_state).then_some(RuleViolation {
                generation,
                cell_position: (row, col),
                expected_state,
                actual_state,
                neighbor_count,
            })
        })
        .collect();

    Ok(violations)
}

fn fixed_point_steps(path: &[Grid]) -> Vec<usize> {
    path.windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] == pair[1])
        .map(|(step, _)| step)
        .collect()
}

impl ValidationResult {
    fn rejected(message: String) -> Self {
        Self {
            is_valid: false,
            evolution_path: Vec::new(),
            error_message: Some(message),
            validation_details: ValidationDetails::default(),
        }
    }

    fn from_details(evolution_path: Vec<Grid>, details: ValidationDetails) -> Self {
        let is_valid = details.final_state_matches
            && details.rule_violations.is_empty()
            && details.fixed_point_steps.is_empty();
        let error_message = (!is_valid).then(|| details.describe_failure());

        Self {
            is_valid,
            evolution_path,
            error_message,
            validation_details: details,
        }
    }
}

impl ValidationDetails {
    fn describe_failure(&self) -> String {
        let mut message = String::new();

        if !self.final_state_matches {
            message.push_str("Final state does not match target. ");
        }

        if !self.fixed_point_steps.is_empty() {
            message.push_str(&format!(
                "Generation {} does not change. ",
                self.fixed_point_steps[0]
            ));
        }

        if !self.rule_violations.is_empty() {
            message.push_str(&format!(
                "Found {} rule violations. ",
                self.rule_violations.len()
            ));
            for violation in self.rule_violations.iter().take(3) {
                message.push_str(&format!("{}; ", violation));
            }
            if self.rule_violations.len() > 3 {
                message.push_str(&format!("... and {} more", self.rule_violations.len() - 3));
            }
        }

        message.trim_end().to_string()
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |alive: bool| if alive { "alive" } else { "dead" };
        write!(
            f,
            "cell ({}, {}) at generation {} should be {} but is {} ({} neighbors)",
            self.cell_position.0,
            self.cell_position.1,
            self.generation + 1,
            state(self.expected_state),
            state(self.actual_state),
            self.neighbor_count
        )
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        let details = &self.validation_details;
        writeln!(f, "Generations checked: {}", details.generations_checked)?;
        writeln!(f, "Final state matches: {}", details.final_state_matches)?;
        writeln!(f, "Unchanged steps: {}", details.fixed_point_steps.len())?;
        writeln!(f, "Rule violations: {}", details.rule_violations.len())?;
        writeln!(f, "Validation time: {}ms", details.validation_time_ms)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::parse_grid_from_string;
    use crate::search::SearchStatistics;
    use std::time::Duration;

    fn grid(text: &str) -> Grid {
        parse_grid_from_string(text).unwrap()
    }

    #[test]
    fn test_valid_blinker_evolution() {
        let validator = SolutionValidator::new(1);
        let result = validator.validate(&grid("010\n010\n010\n"), &grid("000\n111\n000\n"));

        assert!(result.is_valid);
        assert!(result.error_message.is_none());
        assert_eq!(result.evolution_path.len(), 2);
        assert!(result.validation_details.fixed_point_steps.is_empty());
    }

    #[test]
    fn test_wrong_final_state() {
        let validator = SolutionValidator::new(1);
        let result = validator.validate(&Grid::new(3, 3), &grid("000\n010\n000\n"));

        assert!(!result.is_valid);
        assert!(!result.validation_details.final_state_matches);
    }

    #[test]
    fn test_still_life_is_rejected() {
        let block = grid("0000\n0110\n0110\n0000\n");
        let result = SolutionValidator::new(1).validate(&block, &block);

        assert!(!result.is_valid);
        assert!(result.validation_details.final_state_matches);
        assert_eq!(result.validation_details.fixed_point_steps, vec![0]);
        assert!(result.error_message.unwrap().contains("does not change"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let validator = SolutionValidator::new(1);
        let result = validator.validate(&Grid::new(3, 3), &Grid::new(4, 4));

        assert!(!result.is_valid);
        assert!(result.error_message.unwrap().contains("dimension mismatch"));
        assert!(matches!(
            validator.quick_validate(&Grid::new(3, 3), &Grid::new(4, 4)),
            Err(ReverseError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_quick_validation() {
        let validator = SolutionValidator::new(2);
        let horizontal = grid("000\n111\n000\n");
        assert!(validator.quick_validate(&horizontal, &horizontal).unwrap());
        assert!(!validator.quick_validate(&horizontal, &Grid::new(3, 3)).unwrap());
    }

    #[test]
    fn test_rule_violation_detection() {
        // A lone cell stays alive with no neighbors
        let current = grid("000\n010\n000\n");
        let violations = validate_transition(&current, &current, 0).unwrap();

        assert_eq!(
            violations,
            vec![RuleViolation {
                generation: 0,
                cell_position: (1, 1),
                expected_state: false,
                actual_state: true,
                neighbor_count: 0,
            }]
        );
    }

    #[test]
    fn test_validate_path() {
        let validator = SolutionValidator::new(2);
        let horizontal = grid("000\n111\n000\n");
        let vertical = grid("010\n010\n010\n");

        let good = validator.validate_path(&[horizontal.clone(), vertical.clone(), horizontal.clone()]);
        assert!(good.is_valid);

        let bad = validator.validate_path(&[horizontal.clone(), horizontal.clone(), vertical.clone()]);
        assert!(!bad.is_valid);
        assert!(!bad.validation_details.rule_violations.is_empty());
        assert_eq!(bad.validation_details.fixed_point_steps, vec![0]);

        let short = validator.validate_path(&[horizontal]);
        assert!(!short.is_valid);
    }

    #[test]
    fn test_validate_solution() {
        let horizontal = grid("000\n111\n000\n");
        let vertical = grid("010\n010\n010\n");
        let solution = Solution::new(
            vec![vertical],
            horizontal,
            Duration::ZERO,
            SearchStatistics::default(),
        );

        assert!(SolutionValidator::new(1).validate_solution(&solution).is_valid);
    }
}
