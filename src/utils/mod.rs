//! Output formatting and logging setup

pub mod display;
pub mod logging;

pub use display::{Color, ColorOutput, SolutionFormatter};
