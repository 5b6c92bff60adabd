//! Backtracking predecessor search
//!
//! Two engines share one [`PredecessorSearch`]: the live-cell engine works
//! outward from the alive cells of the target, and the row-scan engine
//! assigns every cell in turn. The live-cell engine is fast but does not try
//! every candidate, so by default a level it cannot solve is searched again
//! by the row-scan engine.

pub mod budget;
pub mod consistency;
mod live_cells;
mod row_scan;
pub mod solver;
pub mod stats;
pub mod undo;

pub use budget::SearchBudget;
pub use consistency::{fixed_ok, ok, round_trip, Verdict};
pub use solver::{solve_predecessor, PredecessorSearch, SearchOptions};
pub use stats::SearchStatistics;
pub use undo::{FixedMask, UndoLog};
