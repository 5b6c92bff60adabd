//! Configuration management for the predecessor solver

pub mod settings;

pub use settings::{
    Settings, SimulationConfig, GridConfig, SolverConfig, InputConfig, OutputConfig,
    LoggingConfig, SearchEngine, OutputFormat, LogFormat, CliOverrides
};
