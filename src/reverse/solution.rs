//! A found predecessor chain and what is known about it

use crate::game_of_life::Grid;
use crate::search::SearchStatistics;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The oldest grid of the chain
    pub predecessor: Grid,
    pub target: Grid,
    /// Generations between predecessor and target
    pub generations: usize,
    /// Every grid from predecessor to target, both included
    pub evolution_path: Vec<Grid>,
    #[serde(skip)]
    pub solve_time: Duration,
    pub statistics: SearchStatistics,
    pub metadata: SolutionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Stable identifier derived from the predecessor cells
    pub id: String,
    pub predecessor_living_cells: usize,
    pub target_living_cells: usize,
    pub predecessor_density: f64,
    /// Living cells at each step of the evolution path
    pub population_trend: Vec<usize>,
}

impl Solution {
    /// Build a solution from a search chain (oldest first, target excluded).
    pub fn new(chain: Vec<Grid>, target: Grid, solve_time: Duration, statistics: SearchStatistics) -> Self {
        let generations = chain.len();
        let predecessor = chain.first().cloned().unwrap_or_else(|| target.clone());

        let mut evolution_path = chain;
        evolution_path.push(target.clone());

        let metadata = SolutionMetadata::analyze(&predecessor, &target, &evolution_path);

        Self {
            predecessor,
            target,
            generations,
            evolution_path,
            solve_time,
            statistics,
            metadata,
        }
    }

    pub fn initial_state(&self) -> &Grid {
        &self.predecessor
    }

    pub fn final_state(&self) -> &Grid {
        &self.target
    }

    /// Grid `generation` steps after the predecessor
    pub fn state_at_generation(&self, generation: usize) -> Option<&Grid> {
        self.evolution_path.get(generation)
    }

    /// Grids strictly between predecessor and target
    pub fn intermediate_states(&self) -> &[Grid] {
        match self.evolution_path.len() {
            0..=2 => &[],
            len => &self.evolution_path[1..len - 1],
        }
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            predecessor_living_cells: self.metadata.predecessor_living_cells,
            target_living_cells: self.metadata.target_living_cells,
            generations: self.generations,
            nodes_visited: self.statistics.nodes_visited,
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json().context("Failed to serialize solution")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write solution: {}", path.display()))?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse solution: {}", path.display()))
    }

    /// Every generation of the path, labelled
    pub fn format_evolution(&self) -> String {
        let mut result = String::new();

        result.push_str(&format!("Solution {} - {} generations\n", self.metadata.id, self.generations));
        result.push_str(&format!(
            "Solve time: {:.3}s, {} nodes visited\n\n",
            self.solve_time.as_secs_f64(),
            self.statistics.nodes_visited
        ));

        for (i, grid) in self.evolution_path.iter().enumerate() {
            result.push_str(&format!("Generation {}:\n", i));
            result.push_str(&grid.to_string());
            result.push('\n');
        }

        result
    }
}

impl SolutionMetadata {
    pub fn analyze(predecessor: &Grid, target: &Grid, evolution_path: &[Grid]) -> Self {
        Self {
            id: Self::generate_id(predecessor),
            predecessor_living_cells: predecessor.living_count(),
            target_living_cells: target.living_count(),
            predecessor_density: predecessor.density(),
            population_trend: evolution_path.iter().map(Grid::living_count).collect(),
        }
    }

    fn generate_id(predecessor: &Grid) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        predecessor.hash(&mut hasher);
        format!("sol_{:x}", hasher.finish())
    }
}

/// One-line view of a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub predecessor_living_cells: usize,
    pub target_living_cells: usize,
    pub generations: usize,
    pub nodes_visited: u64,
    pub solve_time_ms: u64,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution {}: {} -> {} cells, {} gen, {} nodes, {}ms",
            self.id,
            self.predecessor_living_cells,
            self.target_living_cells,
            self.generations,
            self.nodes_visited,
            self.solve_time_ms
        )
    }
}
