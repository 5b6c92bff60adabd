//! Predecessor search across one or more generations

use super::budget::SearchBudget;
use super::consistency::{verdict, Verdict};
use super::stats::SearchStatistics;
use super::undo::{FixedMask, UndoLog};
use crate::config::{SearchEngine, SolverConfig};
use crate::error::ReverseError;
use crate::game_of_life::Grid;
use std::time::Duration;
use tracing::{debug, trace};

/// Knobs for a [`PredecessorSearch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub engine: SearchEngine,
    pub exhaustive_fallback: bool,
    pub max_steps: Option<u64>,
    pub timeout: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            engine: SearchEngine::LiveCells,
            exhaustive_fallback: true,
            max_steps: None,
            timeout: None,
        }
    }
}

impl From<&SolverConfig> for SearchOptions {
    fn from(config: &SolverConfig) -> Self {
        Self {
            engine: config.engine,
            exhaustive_fallback: config.exhaustive_fallback,
            max_steps: config.max_steps,
            timeout: config.timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Mutable state of one depth level. Every engine leaves it as it found it.
pub(crate) struct Level<'t> {
    pub(crate) target: &'t Grid,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) candidate: Vec<bool>,
    pub(crate) fixed: FixedMask,
    pub(crate) undo: UndoLog,
    /// Alive target cells in row-major order
    pub(crate) live: Vec<usize>,
}

impl<'t> Level<'t> {
    pub(crate) fn new(target: &'t Grid) -> Self {
        let (width, height) = target.dimensions();
        Self {
            target,
            width,
            height,
            candidate: vec![false; width * height],
            fixed: FixedMask::new(width, height),
            undo: UndoLog::with_capacity(width * height),
            live: target.living_indices(),
        }
    }

    fn is_pristine(&self) -> bool {
        self.undo.is_empty()
            && self.fixed.fixed_count() == 0
            && self.candidate.iter().all(|&alive| !alive)
    }
}

/// Backtracking search for predecessor chains.
///
/// One instance can run many solves; statistics accumulate across them.
pub struct PredecessorSearch {
    options: SearchOptions,
    budget: SearchBudget,
    stats: SearchStatistics,
    requested_depth: usize,
}

impl PredecessorSearch {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            budget: SearchBudget::new(options.max_steps, options.timeout),
            stats: SearchStatistics::default(),
            requested_depth: 0,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }

    /// Find grids `g_0 .. g_{depth-1}` where each advances to the next and the
    /// last advances to `target`, with no grid equal to its successor.
    ///
    /// The chain is returned oldest first and is empty for depth 0. `Ok(None)`
    /// means no such chain exists.
    pub fn find_chain(&mut self, target: &Grid, depth: usize) -> Result<Option<Vec<Grid>>, ReverseError> {
        if target.cells.len() != target.width * target.height {
            return Err(ReverseError::InvalidBuffer {
                len: target.cells.len(),
                width: target.width,
                height: target.height,
            });
        }
        self.budget.restart();
        self.requested_depth = depth;
        self.solve_level(target, depth)
    }

    /// The oldest grid of [`find_chain`](Self::find_chain); the target itself for depth 0.
    pub fn find_predecessor(&mut self, target: &Grid, depth: usize) -> Result<Option<Grid>, ReverseError> {
        let chain = self.find_chain(target, depth)?;
        Ok(chain.map(|chain| chain.into_iter().next().unwrap_or_else(|| target.clone())))
    }

    pub(crate) fn solve_level(&mut self, target: &Grid, depth: usize) -> Result<Option<Vec<Grid>>, ReverseError> {
        if depth == 0 {
            return Ok(Some(Vec::new()));
        }

        let generation = self.requested_depth.saturating_sub(depth) + 1;
        self.stats.levels_searched += 1;
        self.stats.deepest_level = self.stats.deepest_level.max(generation);

        let mut level = Level::new(target);
        debug!(
            generation,
            live_cells = level.live.len(),
            engine = ?self.options.engine,
            "searching predecessor level"
        );

        let found = match self.options.engine {
            SearchEngine::LiveCells => {
                let found = self.extend(&mut level, 0, 0, depth)?;
                debug_assert!(level.is_pristine());
                if found.is_some() || !self.options.exhaustive_fallback {
                    found
                } else {
                    self.stats.fallback_scans += 1;
                    debug!(generation, "live-cell search exhausted, rescanning level");
                    self.scan(&mut level, 0, 0, depth)?
                }
            }
            SearchEngine::RowScan => self.scan(&mut level, 0, 0, depth)?,
        };
        debug_assert!(level.is_pristine());

        debug!(generation, found = found.is_some(), "predecessor level finished");
        Ok(found)
    }

    /// Account for one node of either engine
    #[inline]
    pub(crate) fn step(&mut self) -> Result<(), ReverseError> {
        self.stats.nodes_visited += 1;
        self.budget.tick()
    }

    /// Verify a fully assigned candidate, then chain into the next level back.
    pub(crate) fn complete(&mut self, level: &Level<'_>, depth: usize) -> Result<Option<Vec<Grid>>, ReverseError> {
        self.stats.terminal_checks += 1;

        match verdict(&level.candidate, &level.target.cells, level.width, level.height) {
            Verdict::Accepted => {}
            Verdict::Mismatch => {
                self.stats.round_trip_rejections += 1;
                return Ok(None);
            }
            Verdict::FixedPoint => {
                self.stats.fixed_point_rejections += 1;
                trace!("rejected fixed point");
                return Ok(None);
            }
        }

        let predecessor = Grid {
            width: level.width,
            height: level.height,
            cells: level.candidate.clone(),
        };
        trace!(depth, living = predecessor.living_count(), "candidate accepted");

        match self.solve_level(&predecessor, depth - 1)? {
            Some(mut chain) => {
                chain.push(predecessor);
                Ok(Some(chain))
            }
            None => {
                self.stats.chain_failures += 1;
                debug!(depth, "accepted candidate has no earlier chain");
                Ok(None)
            }
        }
    }
}

/// Find a predecessor `depth` generations back with an unbounded search.
///
/// Returns `target` itself for depth 0 and `None` when no chain exists.
pub fn solve_predecessor(target: &Grid, depth: usize) -> Option<Grid> {
    // Without a budget the only possible error is a malformed grid buffer
    PredecessorSearch::new(SearchOptions::default())
        .find_predecessor(target, depth)
        .ok()
        .flatten()
}
