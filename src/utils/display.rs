//! Console and file rendering of grids and solutions

use crate::config::OutputFormat;
use crate::game_of_life::{save_generations, Grid};
use crate::reverse::Solution;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a solution for console output
    pub fn format_solution(solution: &Solution, show_evolution: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!("Generations: {}\n", solution.generations));
        output.push_str(&format!(
            "Living Cells: {} -> {}\n",
            solution.metadata.predecessor_living_cells, solution.metadata.target_living_cells
        ));
        output.push_str(&format!("Nodes Visited: {}\n", solution.statistics.nodes_visited));
        if solution.statistics.fallback_scans > 0 {
            output.push_str(&format!("Fallback Scans: {}\n", solution.statistics.fallback_scans));
        }
        output.push('\n');

        if show_evolution {
            output.push_str("Evolution:\n");
            for (i, grid) in solution.evolution_path.iter().enumerate() {
                output.push_str(&format!("Generation {}:\n", i));
                output.push_str(&Self::format_grid_compact(grid));
                output.push('\n');
            }
        } else {
            output.push_str("Predecessor:\n");
            output.push_str(&Self::format_grid_compact(&solution.predecessor));
            output.push('\n');
            output.push_str(&format!("Target (after {} generations):\n", solution.generations));
            output.push_str(&Self::format_grid_compact(&solution.target));
        }

        output
    }

    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity((grid.width + 1) * grid.height * 3);
        for y in 0..grid.height {
            for x in 0..grid.width {
                output.push(if grid.get(y, x) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for x in 0..grid.width {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        for y in 0..grid.height {
            output.push_str(&format!("{:2} ", y));
            for x in 0..grid.width {
                output.push_str(if grid.get(y, x) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// Write a solution in the configured format and return the files written.
    ///
    /// With `save_intermediate` every generation is also written as its own
    /// grid file under `generations/`.
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        format: OutputFormat,
        save_intermediate: bool,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        let stem = &solution.metadata.id;
        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", stem));
                std::fs::write(&path, Self::format_solution(solution, true))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", stem));
                solution.save_to_file(&path)?;
                path
            }
            OutputFormat::Visual => {
                let path = output_dir.join(format!("{}_visual.txt", stem));
                std::fs::write(&path, Self::create_visual_evolution(solution))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
        };

        let mut written = vec![path];
        if save_intermediate {
            let generations_dir = output_dir.join(format!("{}_generations", stem));
            written.extend(save_generations(&solution.evolution_path, generations_dir)?);
        }

        Ok(written)
    }

    fn create_visual_evolution(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("Visual Evolution - Solution {}\n", solution.metadata.id));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for (i, grid) in solution.evolution_path.iter().enumerate() {
            output.push_str(&format!("\nGeneration {} (Living: {}):\n", i, grid.living_count()));
            output.push_str(&Self::format_grid_with_coords(grid));
        }

        output.push('\n');
        output.push_str(&solution.statistics.to_string());
        output
    }
}

/// ANSI colouring that respects `NO_COLOR` and dumb terminals
pub struct ColorOutput;

impl ColorOutput {
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }

    pub fn header(text: &str) -> String {
        Self::colored(text, Color::Cyan)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::parse_grid_from_string;
    use crate::search::SearchStatistics;
    use std::time::Duration;
    use tempfile::tempdir;

    fn blinker_solution() -> Solution {
        Solution::new(
            vec![parse_grid_from_string("010\n010\n010\n").unwrap()],
            parse_grid_from_string("000\n111\n000\n").unwrap(),
            Duration::from_millis(3),
            SearchStatistics::default(),
        )
    }

    #[test]
    fn test_grid_formatting() {
        let grid = parse_grid_from_string("101\n010\n101\n").unwrap();

        let compact = SolutionFormatter::format_grid_compact(&grid);
        assert_eq!(compact.lines().next(), Some("█·█"));

        let with_coords = SolutionFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 1 ··██··"));
    }

    #[test]
    fn test_format_solution() {
        let text = SolutionFormatter::format_solution(&blinker_solution(), false);
        assert!(text.contains("Generations: 1"));
        assert!(text.contains("Living Cells: 3 -> 3"));
        assert!(text.contains("Predecessor:"));

        let evolution = SolutionFormatter::format_solution(&blinker_solution(), true);
        assert!(evolution.contains("Generation 1:"));
    }

    #[test]
    fn test_save_every_format() {
        let temp_dir = tempdir().unwrap();
        let solution = blinker_solution();

        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Visual] {
            let written = SolutionFormatter::save_solution(&solution, temp_dir.path(), format, false).unwrap();
            assert_eq!(written.len(), 1);
            assert!(written[0].exists());
        }

        let written = SolutionFormatter::save_solution(&solution, temp_dir.path(), OutputFormat::Json, true).unwrap();
        // Solution file plus both generations
        assert_eq!(written.len(), 3);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));
        assert!(ColorOutput::success("OK").contains("OK"));
    }
}
