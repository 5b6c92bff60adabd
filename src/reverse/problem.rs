//! Reverse Game of Life problem definition

use super::{Solution, SolutionValidator};
use crate::config::{SearchEngine, Settings};
use crate::error::ReverseError;
use crate::game_of_life::{load_grid_from_file, Grid};
use crate::search::{PredecessorSearch, SearchOptions, SearchStatistics};
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// A target grid plus the settings to search predecessors for it
pub struct ReverseProblem {
    settings: Settings,
    target_grid: Grid,
    search: PredecessorSearch,
    validator: SolutionValidator,
}

impl ReverseProblem {
    /// Load the target named in `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        let target_grid = load_grid_from_file(&settings.input.target_state_file)
            .context("Failed to load target state file")?;

        Self::with_target_grid(settings, target_grid)
    }

    /// Use an explicit target grid instead of the configured file
    pub fn with_target_grid(settings: Settings, target_grid: Grid) -> Result<Self> {
        if let Some(expected) = settings.simulation.grid {
            let found = target_grid.dimensions();
            if (expected.width, expected.height) != found {
                return Err(ReverseError::mismatch((expected.width, expected.height), found))
                    .context("Target grid does not match the configured grid size");
            }
        }

        let search = PredecessorSearch::new(SearchOptions::from(&settings.solver));
        let validator = SolutionValidator::from_settings(&settings);

        Ok(Self {
            settings,
            target_grid,
            search,
            validator,
        })
    }

    /// Search for a predecessor chain.
    ///
    /// `Ok(None)` means no predecessor exists; a search that runs out of
    /// budget is an error.
    pub fn solve(&mut self) -> Result<Option<Solution>> {
        let start_time = Instant::now();
        let generations = self.settings.simulation.generations;

        info!(
            width = self.target_grid.width,
            height = self.target_grid.height,
            generations,
            living = self.target_grid.living_count(),
            engine = ?self.settings.solver.engine,
            "solving reverse problem"
        );

        let chain = self
            .search
            .find_chain(&self.target_grid, generations)
            .context("Predecessor search did not finish")?;
        let solve_time = start_time.elapsed();

        let Some(chain) = chain else {
            info!(elapsed_ms = solve_time.as_millis() as u64, "no predecessor exists");
            return Ok(None);
        };

        let solution = Solution::new(
            chain,
            self.target_grid.clone(),
            solve_time,
            self.search.statistics().clone(),
        );

        let validation = self.validator.validate_solution(&solution);
        if !validation.is_valid {
            warn!(
                error = validation.error_message.as_deref().unwrap_or("unknown"),
                "search returned a chain that failed validation"
            );
            anyhow::bail!(
                "Search returned an invalid chain: {}",
                validation.error_message.unwrap_or_default()
            );
        }

        info!(
            elapsed_ms = solve_time.as_millis() as u64,
            nodes = solution.statistics.nodes_visited,
            "predecessor found"
        );
        Ok(Some(solution))
    }

    pub fn target_grid(&self) -> &Grid {
        &self.target_grid
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Counters accumulated over every solve of this problem
    pub fn statistics(&self) -> &SearchStatistics {
        self.search.statistics()
    }

    /// Rough size of the search before running it
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        ComplexityEstimate::for_target(
            &self.target_grid,
            self.settings.simulation.generations,
            self.settings.solver.engine,
        )
    }
}

/// Search-space estimate for one target
#[derive(Debug, Clone, Serialize)]
pub struct ComplexityEstimate {
    pub width: usize,
    pub height: usize,
    pub living_cells: usize,
    pub density: f64,
    pub generations: usize,
    /// Cells the chosen engine branches on at the first level
    pub branching_cells: usize,
    /// log2 of the number of candidates the engine may have to consider
    pub search_space_log2: f64,
    pub complexity_level: ComplexityLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ComplexityEstimate {
    pub fn for_target(target: &Grid, generations: usize, engine: SearchEngine) -> Self {
        let (width, height) = target.dimensions();
        let cells = width * height;
        let living_cells = target.living_count();

        // Each live cell picks from at most nine neighborhood cells; the
        // row scan decides every cell.
        let (branching_cells, bits_per_cell) = match engine {
            SearchEngine::LiveCells => (living_cells, 9f64.log2()),
            SearchEngine::RowScan => (cells, 1.0),
        };
        let search_space_log2 = branching_cells as f64 * bits_per_cell * generations as f64;

        let complexity_level = match search_space_log2 {
            x if x <= 20.0 => ComplexityLevel::Low,
            x if x <= 60.0 => ComplexityLevel::Medium,
            x if x <= 150.0 => ComplexityLevel::High,
            _ => ComplexityLevel::VeryHigh,
        };

        Self {
            width,
            height,
            living_cells,
            density: target.density(),
            generations,
            branching_cells,
            search_space_log2,
            complexity_level,
        }
    }

    pub fn recommendations(&self) -> Vec<String> {
        let mut recommendations = Vec::new();

        match self.complexity_level {
            ComplexityLevel::VeryHigh => {
                recommendations.push("Consider reducing the grid size".to_string());
                recommendations.push("Consider reducing the number of generations".to_string());
                recommendations.push("Set solver.max_steps or solver.timeout_seconds to bound the search".to_string());
            }
            ComplexityLevel::High => {
                recommendations.push("Set a step or time budget before running unattended".to_string());
            }
            _ => {}
        }

        if self.density > 0.7 {
            recommendations.push("Dense targets rarely have predecessors".to_string());
        }

        if self.generations > 3 {
            recommendations.push("Each extra generation multiplies the search".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("Problem looks reasonable to solve".to_string());
        }

        recommendations
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Complexity Estimate:")?;
        writeln!(f, "  Grid: {}x{}, {} generations", self.width, self.height, self.generations)?;
        writeln!(f, "  Living cells: {} ({:.1}%)", self.living_cells, self.density * 100.0)?;
        writeln!(f, "  Branching cells: {}", self.branching_cells)?;
        writeln!(f, "  Search space: ~2^{:.0}", self.search_space_log2)?;
        writeln!(f, "  Level: {:?}", self.complexity_level)?;
        writeln!(f, "  Recommendations:")?;
        for rec in self.recommendations() {
            writeln!(f, "    - {}", rec)?;
        }
        Ok(())
    }
}
