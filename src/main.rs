//! Command line front end for the predecessor solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_of_life_predecessor::{
    config::{CliOverrides, LoggingConfig, SearchEngine, Settings},
    game_of_life::{
        create_example_grids, load_grid_from_file, load_grids_from_directory, save_grid_to_file, GameOfLifeRules,
    },
    reverse::{ComplexityEstimate, ReverseProblem, Solution, SolutionValidator},
    utils::{logging, ColorOutput, SolutionFormatter},
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "game_of_life_predecessor")]
#[command(about = "Find Game of Life predecessors by backtracking search")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a predecessor of a target grid
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Target state file (overrides config)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Number of generations to go back (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Search engine: live_cells or row_scan (overrides config)
        #[arg(short, long, value_parser = parse_engine)]
        engine: Option<SearchEngine>,

        /// Do not re-search with the row-scan engine when the live-cell engine fails
        #[arg(long)]
        no_fallback: bool,

        /// Give up after this many search steps (overrides config)
        #[arg(long)]
        max_steps: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show every generation of the solution
        #[arg(long)]
        show_evolution: bool,
    },

    /// Advance a grid forward under the Game of Life rules
    Step {
        /// Grid file to start from
        #[arg(short, long)]
        input: PathBuf,

        /// Generations to advance
        #[arg(short, long, default_value_t = 1)]
        generations: usize,

        /// Write the final grid here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every intermediate generation
        #[arg(long)]
        show_evolution: bool,
    },

    /// Check that a predecessor advances to a target
    Validate {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Predecessor state file
        #[arg(short, long)]
        predecessor: PathBuf,

        /// Target state file
        #[arg(short, long)]
        target: PathBuf,

        /// Number of generations between them (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Show evolution path
        #[arg(long)]
        show_evolution: bool,
    },

    /// Print statistics and a search-space estimate for a target
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Target state file
        #[arg(short, long)]
        target: PathBuf,
    },

    /// Solve every .txt target in a directory in parallel
    Batch {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Directory of target grids
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Number of generations to go back (overrides config)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Give up on a target after this many search steps (overrides config)
        #[arg(long)]
        max_steps: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_engine(value: &str) -> Result<SearchEngine, String> {
    match value {
        "live_cells" | "live-cells" => Ok(SearchEngine::LiveCells),
        "row_scan" | "row-scan" => Ok(SearchEngine::RowScan),
        other => Err(format!("unknown engine '{}', expected live_cells or row_scan", other)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Solve {
            config,
            target,
            generations,
            engine,
            no_fallback,
            max_steps,
            output,
            show_evolution,
        } => {
            let overrides = CliOverrides {
                generations,
                engine,
                no_fallback,
                max_steps,
                target_file: target,
                output_dir: output,
            };
            let settings = load_settings(&config, &overrides)?;
            logging::init(&settings.logging, verbose)?;
            solve_command(settings, show_evolution, verbose > 0).map(|_| ())
        }
        Commands::Step {
            input,
            generations,
            output,
            show_evolution,
        } => {
            logging::init(&LoggingConfig::default(), verbose)?;
            step_command(&input, generations, output.as_deref(), show_evolution)
        }
        Commands::Validate {
            config,
            predecessor,
            target,
            generations,
            show_evolution,
        } => {
            let overrides = CliOverrides {
                generations,
                ..CliOverrides::default()
            };
            let settings = load_settings(&config, &overrides)?;
            logging::init(&settings.logging, verbose)?;
            validate_command(&settings, &predecessor, &target, show_evolution).map(|_| ())
        }
        Commands::Analyze { config, target } => {
            let settings = load_settings(&config, &CliOverrides::default())?;
            logging::init(&settings.logging, verbose)?;
            analyze_command(&settings, &target)
        }
        Commands::Batch {
            config,
            input_dir,
            generations,
            max_steps,
            output,
        } => {
            let overrides = CliOverrides {
                generations,
                max_steps,
                output_dir: output,
                ..CliOverrides::default()
            };
            let settings = load_settings(&config, &overrides)?;
            logging::init(&settings.logging, verbose)?;
            batch_command(&settings, &input_dir).map(|_| ())
        }
        Commands::Setup { directory, force } => {
            logging::init(&LoggingConfig::default(), verbose)?;
            setup_command(&directory, force)
        }
    }
}

/// Read the config file if present, otherwise start from defaults
fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    Ok(settings)
}

fn solve_command(settings: Settings, show_evolution: bool, verbose: bool) -> Result<Option<Solution>> {
    println!("{}", ColorOutput::header("Reverse Game of Life predecessor search"));

    settings.validate().context("Configuration validation failed")?;

    if verbose {
        println!("Configuration:");
        println!("  Generations: {}", settings.simulation.generations);
        println!("  Engine: {:?}", settings.solver.engine);
        println!("  Fallback: {}", settings.solver.exhaustive_fallback);
        println!("  Target file: {}", settings.input.target_state_file.display());
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    let start_time = Instant::now();
    let mut problem = ReverseProblem::new(settings.clone()).context("Failed to create reverse problem")?;

    if verbose {
        println!("{}", problem.estimate_complexity());
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(e) => {
            println!("{}", ColorOutput::error(&format!("Search stopped: {:#}", e)));
            return Err(e);
        }
    };
    let total_time = start_time.elapsed();

    let Some(solution) = solution else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "No predecessor exists {} generation(s) back ({:.3}s)",
                settings.simulation.generations,
                total_time.as_secs_f64()
            ))
        );
        if verbose {
            println!("\n{}", problem.statistics());
        }
        return Ok(None);
    };

    println!(
        "{}",
        ColorOutput::success(&format!("Found a predecessor in {:.3}s", total_time.as_secs_f64()))
    );
    println!("\n{}", SolutionFormatter::format_solution(&solution, show_evolution));

    let written = SolutionFormatter::save_solution(
        &solution,
        &settings.output.output_directory,
        settings.output.format,
        settings.output.save_intermediate,
    )
    .context("Failed to save solution")?;

    println!(
        "{}",
        ColorOutput::info(&format!(
            "Saved {} file(s) to {}",
            written.len(),
            settings.output.output_directory.display()
        ))
    );

    if verbose {
        println!("\n{}", solution.statistics);
    }

    Ok(Some(solution))
}

fn step_command(input: &Path, generations: usize, output: Option<&Path>, show_evolution: bool) -> Result<()> {
    let grid =
        load_grid_from_file(input).with_context(|| format!("Failed to load grid from {}", input.display()))?;

    let path = GameOfLifeRules::evolution_path(&grid, generations);
    if show_evolution {
        for (i, state) in path.iter().enumerate() {
            println!("Generation {} (Living: {}):", i, state.living_count());
            println!("{}", SolutionFormatter::format_grid_compact(state));
        }
    }

    let Some(last) = path.last() else {
        return Ok(());
    };

    if !show_evolution {
        println!("Generation {} (Living: {}):", generations, last.living_count());
        println!("{}", SolutionFormatter::format_grid_compact(last));
    }

    if let Some(output) = output {
        save_grid_to_file(last, output)?;
        println!("{}", ColorOutput::success(&format!("Saved to {}", output.display())));
    }

    Ok(())
}

fn validate_command(settings: &Settings, predecessor_path: &Path, target_path: &Path, show_evolution: bool) -> Result<bool> {
    println!("{}", ColorOutput::info("Validating predecessor..."));

    let predecessor = load_grid_from_file(predecessor_path)
        .with_context(|| format!("Failed to load predecessor from {}", predecessor_path.display()))?;
    let target = load_grid_from_file(target_path)
        .with_context(|| format!("Failed to load target from {}", target_path.display()))?;

    let result = SolutionValidator::from_settings(settings).validate(&predecessor, &target);

    println!("{}", result);

    if show_evolution && !result.evolution_path.is_empty() {
        println!("\nEvolution Path:");
        for (i, grid) in result.evolution_path.iter().enumerate() {
            println!("Generation {}:", i);
            println!("{}", SolutionFormatter::format_grid_compact(grid));
        }
    }

    if result.is_valid {
        println!("{}", ColorOutput::success("Predecessor is valid"));
    } else {
        println!("{}", ColorOutput::error("Predecessor is invalid"));
    }

    Ok(result.is_valid)
}

fn analyze_command(settings: &Settings, target_path: &Path) -> Result<()> {
    let target = load_grid_from_file(target_path)
        .with_context(|| format!("Failed to load target from {}", target_path.display()))?;

    println!("Target Grid ({}x{}):", target.width, target.height);
    println!("{}", SolutionFormatter::format_grid_with_coords(&target));

    println!("Grid Statistics:");
    println!("  Living cells: {}", target.living_count());
    println!("  Density: {:.1}%", target.density() * 100.0);
    if GameOfLifeRules::is_fixed_point(&target) {
        println!("  Still life: the target itself is never accepted as its own predecessor");
    }

    if let Some(grid) = settings.simulation.grid {
        if (grid.width, grid.height) != target.dimensions() {
            println!(
                "{}",
                ColorOutput::warning(&format!(
                    "Configured grid is {}x{}; solve will reject this target",
                    grid.width, grid.height
                ))
            );
        }
    }

    let estimate = ComplexityEstimate::for_target(&target, settings.simulation.generations, settings.solver.engine);
    println!("\n{}", estimate);

    Ok(())
}

/// Outcome of one target in a batch
struct BatchEntry {
    name: String,
    outcome: Result<Option<Solution>>,
}

fn batch_command(settings: &Settings, input_dir: &Path) -> Result<Vec<(String, bool)>> {
    let targets = load_grids_from_directory(input_dir)?;
    println!(
        "{}",
        ColorOutput::header(&format!("Solving {} target(s) from {}", targets.len(), input_dir.display()))
    );

    // Each search is single-threaded; targets run side by side
    let entries: Vec<BatchEntry> = targets
        .into_par_iter()
        .map(|(name, grid)| {
            let outcome = ReverseProblem::with_target_grid(settings.clone(), grid).and_then(|mut p| p.solve());
            BatchEntry { name, outcome }
        })
        .collect();

    let mut summary = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.outcome {
            Ok(Some(solution)) => {
                let dir = settings.output.output_directory.join(&entry.name);
                SolutionFormatter::save_solution(&solution, &dir, settings.output.format, settings.output.save_intermediate)
                    .with_context(|| format!("Failed to save solution for {}", entry.name))?;
                println!("{} {}", ColorOutput::success("solved  "), solution.summary());
                summary.push((entry.name, true));
            }
            Ok(None) => {
                println!("{} {}: no predecessor", ColorOutput::warning("unsolved"), entry.name);
                summary.push((entry.name, false));
            }
            Err(e) => {
                println!("{} {}: {:#}", ColorOutput::error("failed  "), entry.name, e);
                summary.push((entry.name, false));
            }
        }
    }

    let solved = summary.iter().filter(|(_, ok)| *ok).count();
    println!("\n{}/{} target(s) solved", solved, summary.len());
    Ok(summary)
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/target_states");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.input.target_state_file = PathBuf::from("input/target_states/blinker.txt");
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_grids(&input_dir).context("Failed to create example grids")?;
    println!("Created example target states in: {}", input_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut simple_config = Settings::default();
    simple_config.input.target_state_file = PathBuf::from("input/target_states/blinker.txt");
    simple_config.to_file(&examples_dir.join("simple.yaml"))?;

    let mut deep_config = Settings::default();
    deep_config.simulation.generations = 2;
    deep_config.solver.max_steps = Some(50_000_000);
    deep_config.input.target_state_file = PathBuf::from("input/target_states/glider.txt");
    deep_config.to_file(&examples_dir.join("deep.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your target states to {}", input_dir.display());
    println!("3. Run: game_of_life_predecessor solve --config config/default.yaml");

    Ok(())
}
