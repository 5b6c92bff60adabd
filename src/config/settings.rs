//! Configuration settings for the predecessor solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// How many generations to invert; 0 is the identity
    pub generations: usize,
    /// Expected target dimensions, checked when the target is loaded
    #[serde(default)]
    pub grid: Option<GridConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub engine: SearchEngine,
    /// Re-search a level with the row-scan engine when the live-cell engine fails
    pub exhaustive_fallback: bool,
    #[serde(default)]
    pub max_steps: Option<u64>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchEngine {
    /// Backtracking driven by the list of alive target cells
    LiveCells,
    /// Row-major assignment of every predecessor cell
    RowScan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub target_state_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_intermediate: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            engine: SearchEngine::LiveCells,
            exhaustive_fallback: true,
            max_steps: None,
            timeout_seconds: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                generations: 1,
                grid: Some(GridConfig { width: 9, height: 9 }),
            },
            solver: SolverConfig::default(),
            input: InputConfig {
                target_state_file: PathBuf::from("input/target_states/example.txt"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_intermediate: false,
                output_directory: PathBuf::from("output/solutions"),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings before a solve
    pub fn validate(&self) -> Result<()> {
        if let Some(grid) = self.simulation.grid {
            if grid.width == 0 || grid.height == 0 {
                anyhow::bail!("Grid dimensions must be positive, got {}x{}", grid.width, grid.height);
            }
        }

        if self.solver.max_steps == Some(0) {
            anyhow::bail!("max_steps must be positive when set");
        }

        if self.solver.timeout_seconds == Some(0) {
            anyhow::bail!("timeout_seconds must be positive when set");
        }

        if !self.input.target_state_file.exists() {
            anyhow::bail!("Target state file does not exist: {}", self.input.target_state_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(engine) = cli_overrides.engine {
            self.solver.engine = engine;
        }
        if cli_overrides.no_fallback {
            self.solver.exhaustive_fallback = false;
        }
        if let Some(max_steps) = cli_overrides.max_steps {
            self.solver.max_steps = Some(max_steps);
        }
        if let Some(ref target_file) = cli_overrides.target_file {
            self.input.target_state_file = target_file.clone();
            // An explicit target brings its own dimensions
            self.simulation.grid = None;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub generations: Option<usize>,
    pub engine: Option<SearchEngine>,
    pub no_fallback: bool,
    pub max_steps: Option<u64>,
    pub target_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}
