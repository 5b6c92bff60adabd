//! Exhaustive cell-by-cell backtracking in row-major order
//!
//! Each cell is tried dead and then alive. Once a cell is assigned, the cell
//! diagonally up and to the left has all of its neighbors decided and can be
//! checked against the target. Rows below the last one and columns past the
//! right edge are never checked here; the forward simulation at the end
//! covers them.

use super::consistency::single_cell_ok;
use super::solver::{Level, PredecessorSearch};
use crate::error::ReverseError;
use crate::game_of_life::Grid;

impl PredecessorSearch {
    pub(crate) fn scan(
        &mut self,
        level: &mut Level<'_>,
        row: usize,
        col: usize,
        depth: usize,
    ) -> Result<Option<Vec<Grid>>, ReverseError> {
        self.step()?;

        if row >= level.height {
            return self.complete(level, depth);
        }

        let idx = row * level.width + col;
        let (next_row, next_col) = if col + 1 >= level.width {
            (row + 1, 0)
        } else {
            (row, col + 1)
        };

        for alive in [false, true] {
            level.candidate[idx] = alive;

            if !single_cell_ok(
                &level.candidate,
                &level.target.cells,
                level.width,
                level.height,
                row as isize - 1,
                col as isize - 1,
            ) {
                continue;
            }

            if let Some(chain) = self.scan(level, next_row, next_col, depth)? {
                level.candidate[idx] = false;
                return Ok(Some(chain));
            }
        }

        level.candidate[idx] = false;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchEngine;
    use crate::game_of_life::{advance, parse_grid_from_string};
    use crate::search::solver::SearchOptions;

    fn row_scan() -> PredecessorSearch {
        PredecessorSearch::new(SearchOptions {
            engine: SearchEngine::RowScan,
            ..SearchOptions::default()
        })
    }

    #[test]
    fn test_lone_dying_cell_for_empty_target() {
        let target = Grid::new(3, 3);
        let chain = row_scan().find_chain(&target, 1).unwrap().unwrap();

        // Dead cells come first, so the last cell is the one revived
        let mut expected = Grid::new(3, 3);
        expected.set(2, 2, true).unwrap();
        assert_eq!(chain, vec![expected]);
    }

    #[test]
    fn test_matches_brute_force_on_every_3x3() {
        let successors: Vec<(Grid, Grid)> = (0u32..512)
            .map(|bits| {
                let cells = (0..9).map(|i| bits & (1 << i) != 0).collect();
                let grid = Grid::from_raw(3, 3, cells).unwrap();
                let next = advance(&grid);
                (grid, next)
            })
            .collect();

        for bits in (0u32..512).step_by(7) {
            let cells = (0..9).map(|i| bits & (1 << i) != 0).collect();
            let target = Grid::from_raw(3, 3, cells).unwrap();
            let exists = successors.iter().any(|(grid, next)| *next == target && *grid != target);

            let found = row_scan().find_predecessor(&target, 1).unwrap();
            assert_eq!(found.is_some(), exists, "target bits {:09b}", bits);
            if let Some(predecessor) = found {
                assert_eq!(advance(&predecessor), target);
                assert_ne!(predecessor, target);
            }
        }
    }

    #[test]
    fn test_leaves_level_untouched() {
        let target = parse_grid_from_string("000\n111\n000\n").unwrap();
        let mut search = row_scan();
        let mut level = Level::new(&target);

        assert!(search.scan(&mut level, 0, 0, 1).unwrap().is_some());
        assert!(level.candidate.iter().all(|&alive| !alive));
        assert!(level.undo.is_empty());
    }
}
