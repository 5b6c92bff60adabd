//! Reverse Game of Life predecessor search
//!
//! Given a target grid with a permanently dead border, find a grid that
//! advances to it under Conway's rules, optionally several generations back.
//! The search is plain backtracking over candidate predecessors.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod reverse;
pub mod search;
pub mod utils;

pub use config::Settings;
pub use error::ReverseError;
pub use game_of_life::{advance, Grid};
pub use reverse::{ReverseProblem, Solution};
pub use search::solve_predecessor;

use anyhow::Result;

/// Load the configured target and search for a predecessor chain
pub fn solve_reverse(settings: Settings) -> Result<Option<Solution>> {
    let mut problem = ReverseProblem::new(settings)?;
    problem.solve()
}
