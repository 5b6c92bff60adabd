//! Fixed-cell mask and the undo log that scopes its changes

use crate::error::ReverseError;
use crate::game_of_life::{neighbor_index, Grid, NEIGHBOR_OFFSETS};

/// Indices set during a search branch, unwound back to a mark on exit.
#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<usize>,
}

impl UndoLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Current position; pass it back to [`FixedMask::rollback`]
    #[inline]
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn record(&mut self, index: usize) {
        self.entries.push(index);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn unwind(&mut self, mark: usize) -> impl Iterator<Item = usize> + '_ {
        self.entries.drain(mark..)
    }
}

/// Cells whose predecessor value is locked for the rest of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl FixedMask {
    /// A mask with nothing fixed
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Build a mask from a grid of flags
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            cells: grid.cells.clone(),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn ensure_matches(&self, grid: &Grid) -> Result<(), ReverseError> {
        if self.dimensions() != grid.dimensions() {
            return Err(ReverseError::mismatch(grid.dimensions(), self.dimensions()));
        }
        Ok(())
    }

    #[inline]
    pub fn is_fixed(&self, index: usize) -> bool {
        self.cells[index]
    }

    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Number of fixed cells
    pub fn fixed_count(&self) -> usize {
        self.cells.iter().filter(|&&fixed| fixed).count()
    }

    /// Fix every on-grid neighbor of `(x, y)` that is not fixed yet.
    ///
    /// The cell itself is left alone. Newly fixed indices go to `log`.
    pub fn fix_neighborhood(&mut self, x: usize, y: usize, log: &mut UndoLog) {
        for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
            if let Some(idx) = neighbor_index(self.width, self.height, x, y, dx, dy) {
                if !self.cells[idx] {
                    self.cells[idx] = true;
                    log.record(idx);
                }
            }
        }
    }

    /// Release everything fixed since `mark`
    pub fn rollback(&mut self, log: &mut UndoLog, mark: usize) {
        for idx in log.unwind(mark) {
            self.cells[idx] = false;
        }
    }
}
