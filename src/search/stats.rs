//! Counters collected while searching

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Recursive visits across both engines
    pub nodes_visited: u64,
    /// Complete candidates checked by forward simulation
    pub terminal_checks: u64,
    /// Candidates that did not advance to their target
    pub round_trip_rejections: u64,
    /// Candidates identical to their target
    pub fixed_point_rejections: u64,
    /// Accepted candidates with no predecessor chain of their own
    pub chain_failures: u64,
    /// Levels re-searched by the row-scan engine
    pub fallback_scans: u64,
    /// Depth levels entered, counting repeats
    pub levels_searched: u64,
    /// Furthest generation back that was searched
    pub deepest_level: usize,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes visited: {}", self.nodes_visited)?;
        writeln!(f, "  Terminal checks: {}", self.terminal_checks)?;
        writeln!(f, "  Round-trip rejections: {}", self.round_trip_rejections)?;
        writeln!(f, "  Fixed-point rejections: {}", self.fixed_point_rejections)?;
        writeln!(f, "  Chain failures: {}", self.chain_failures)?;
        writeln!(f, "  Fallback scans: {}", self.fallback_scans)?;
        writeln!(f, "  Levels searched: {}", self.levels_searched)?;
        writeln!(f, "  Deepest level: {}", self.deepest_level)?;
        Ok(())
    }
}
