//! Consistency checks on partially assigned predecessors
//!
//! The slice-level functions are the hot path used by the engines. The
//! `Grid`-level wrappers check dimensions first and are what callers outside
//! the search should use.

use super::undo::FixedMask;
use crate::error::ReverseError;
use crate::game_of_life::{advance_cells, count_live_neighbors, GameOfLifeRules, Grid};

/// Outcome of checking a fully assigned candidate against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Advances to the target and differs from it
    Accepted,
    /// Does not advance to the target
    Mismatch,
    /// Advances to the target but is the target itself
    FixedPoint,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

/// Check every cell that can no longer change.
///
/// A cell counts as settled when it lies more than one row plus one cell
/// before `current_index` in scan order, or when it is fixed and all eight
/// of its neighbors are fixed too. Each settled cell must be able to produce
/// its target value from its current state and neighbor count.
pub(crate) fn fixed_region_ok(
    candidate: &[bool],
    fixed: &[bool],
    target: &[bool],
    width: usize,
    height: usize,
    current_index: usize,
) -> bool {
    for idx in 0..candidate.len() {
        let (x, y) = (idx % width, idx / width);
        let settled = idx + width + 1 < current_index
            || (fixed[idx] && count_live_neighbors(fixed, width, height, x, y) == 8);
        if !settled {
            continue;
        }

        let pop = count_live_neighbors(candidate, width, height, x, y);
        if !GameOfLifeRules::is_compatible(target[idx], candidate[idx], pop) {
            return false;
        }
    }
    true
}

/// Check the single cell at `(row, col)`; off-grid positions always pass.
pub(crate) fn single_cell_ok(
    candidate: &[bool],
    target: &[bool],
    width: usize,
    height: usize,
    row: isize,
    col: isize,
) -> bool {
    if row < 0 || col < 0 || row as usize >= height || col as usize >= width {
        return true;
    }
    let (x, y) = (col as usize, row as usize);
    let idx = y * width + x;
    let pop = count_live_neighbors(candidate, width, height, x, y);
    GameOfLifeRules::is_compatible(target[idx], candidate[idx], pop)
}

/// Round-trip and fixed-point check of a complete candidate
pub(crate) fn verdict(candidate: &[bool], target: &[bool], width: usize, height: usize) -> Verdict {
    let next = advance_cells(candidate, width, height);
    if next != target {
        Verdict::Mismatch
    } else if candidate == target {
        Verdict::FixedPoint
    } else {
        Verdict::Accepted
    }
}

/// Whether the settled part of `candidate` is still compatible with `target`.
pub fn fixed_ok(
    candidate: &Grid,
    fixed: &FixedMask,
    target: &Grid,
    current_index: usize,
) -> Result<bool, ReverseError> {
    target.ensure_same_dimensions(candidate)?;
    fixed.ensure_matches(target)?;
    Ok(fixed_region_ok(
        &candidate.cells,
        fixed.cells(),
        &target.cells,
        target.width,
        target.height,
        current_index,
    ))
}

/// Whether the cell at `(row, col)` is not already provably wrong.
///
/// Only meaningful once every neighbor of that cell has been assigned.
pub fn ok(candidate: &Grid, target: &Grid, row: isize, col: isize) -> Result<bool, ReverseError> {
    target.ensure_same_dimensions(candidate)?;
    Ok(single_cell_ok(
        &candidate.cells,
        &target.cells,
        target.width,
        target.height,
        row,
        col,
    ))
}

/// Classify a complete candidate predecessor of `target`.
pub fn round_trip(candidate: &Grid, target: &Grid) -> Result<Verdict, ReverseError> {
    target.ensure_same_dimensions(candidate)?;
    Ok(verdict(&candidate.cells, &target.cells, target.width, target.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::parse_grid_from_string;
    use crate::search::undo::UndoLog;

    fn grid(text: &str) -> Grid {
        parse_grid_from_string(text).unwrap()
    }

    #[test]
    fn test_verdicts() {
        let vertical = grid("010\n010\n010\n");
        let horizontal = grid("000\n111\n000\n");
        let block = grid("0000\n0110\n0110\n0000\n");

        assert_eq!(round_trip(&vertical, &horizontal).unwrap(), Verdict::Accepted);
        assert_eq!(round_trip(&horizontal, &horizontal).unwrap(), Verdict::Mismatch);
        assert_eq!(round_trip(&block, &block).unwrap(), Verdict::FixedPoint);
        assert!(!Verdict::FixedPoint.is_accepted());
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let a = Grid::new(3, 3);
        let b = Grid::new(4, 3);
        let mask = FixedMask::new(3, 4);

        assert!(matches!(round_trip(&a, &b), Err(ReverseError::DimensionMismatch { .. })));
        assert!(matches!(ok(&a, &b, 0, 0), Err(ReverseError::DimensionMismatch { .. })));
        assert!(matches!(fixed_ok(&a, &mask, &a, 0), Err(ReverseError::DimensionMismatch { .. })));
        assert!(matches!(fixed_ok(&a, &FixedMask::new(3, 3), &b, 0), Err(ReverseError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_nothing_settled_at_start() {
        // Every cell is wrong, but none is settled yet
        let target = grid("111\n111\n111\n");
        let candidate = Grid::new(3, 3);
        assert!(fixed_ok(&candidate, &FixedMask::new(3, 3), &target, 0).unwrap());
    }

    #[test]
    fn test_scan_order_settles_early_cells() {
        // Cell 0 wants alive but has no neighbors; it settles once the scan
        // index is past one full row plus one cell
        let target = grid("100\n000\n000\n");
        let candidate = Grid::new(3, 3);
        let mask = FixedMask::new(3, 3);

        assert!(fixed_ok(&candidate, &mask, &target, 4).unwrap());
        assert!(!fixed_ok(&candidate, &mask, &target, 5).unwrap());
    }

    #[test]
    fn test_fully_fixed_neighborhood_settles_cell() {
        let target = grid("00000\n00000\n00100\n00000\n00000\n");
        let candidate = Grid::new(5, 5);
        let mut mask = FixedMask::new(5, 5);
        let mut log = UndoLog::default();

        // Center wants alive but is dead with no neighbors
        mask.fix_neighborhood(2, 2, &mut log);
        // Not yet: the center itself is not fixed
        assert!(fixed_ok(&candidate, &mask, &target, 0).unwrap());

        mask.fix_neighborhood(1, 1, &mut log);
        assert!(!fixed_ok(&candidate, &mask, &target, 0).unwrap());
    }

    #[test]
    fn test_single_cell_check() {
        let target = grid("000\n010\n000\n");
        let mut candidate = grid("101\n000\n010\n");

        // Center has three neighbors and wants alive
        assert!(ok(&candidate, &target, 1, 1).unwrap());
        // Corner (0,0) has no neighbors and wants dead
        assert!(ok(&candidate, &target, 0, 0).unwrap());
        // Off-grid positions are ignored
        assert!(ok(&candidate, &target, -1, 2).unwrap());
        assert!(ok(&candidate, &target, 1, 3).unwrap());

        // A fourth neighbor kills the center
        candidate.set(1, 0, true).unwrap();
        assert!(!ok(&candidate, &target, 1, 1).unwrap());
    }

    #[test]
    fn test_single_cell_uses_row_and_column() {
        // Asymmetric 2x3 board so a transposed lookup would read the wrong cell
        let target = grid("000\n000\n");
        let candidate = grid("110\n100\n");
        // (0, 2) has a single neighbor and stays dead
        assert!(ok(&candidate, &target, 0, 2).unwrap());
        // (0, 1) is alive with two neighbors and would survive
        assert!(!ok(&candidate, &target, 0, 1).unwrap());
        // (1, 1) has three neighbors and would be born
        assert!(!ok(&candidate, &target, 1, 1).unwrap());
    }
}
