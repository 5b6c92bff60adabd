//! Backtracking driven by the alive cells of the target
//!
//! Every alive target cell must come from one of three predecessor
//! configurations: alive with two neighbors, alive with three, or dead with
//! three. The engine visits alive target cells in row-major order and, for
//! each, tries the cell alive and then dead, adding neighbors one slot at a
//! time until the population fits. Once a cell's population is final its
//! neighborhood is fixed so later cells cannot disturb it.

use super::consistency::fixed_region_ok;
use super::solver::{Level, PredecessorSearch};
use crate::error::ReverseError;
use crate::game_of_life::{count_live_neighbors, neighbor_index, Grid, NEIGHBOR_OFFSETS};

/// Result of walking the neighbor slots of one cell
enum Additions {
    /// A complete chain was found below one of the additions
    Found(Vec<Grid>),
    /// A slot had no addable neighbor left; the whole cell is abandoned
    OutOfSlots,
    /// Every slot was tried without success
    Exhausted,
}

impl Level<'_> {
    /// First unfixed dead on-grid neighbor of `(x, y)`, skipping the first
    /// `cursor` on-grid neighbors in slot order.
    fn addable_neighbor(&self, x: usize, y: usize, cursor: usize) -> Option<usize> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| neighbor_index(self.width, self.height, x, y, dx, dy))
            .skip(cursor)
            .find(|&idx| !self.fixed.is_fixed(idx) && !self.candidate[idx])
    }
}

impl PredecessorSearch {
    /// Handle alive target cell `index` of the level, then everything after it.
    ///
    /// `cursor` is the first neighbor slot this call may add; it only grows
    /// while the same cell is being populated.
    pub(crate) fn extend(
        &mut self,
        level: &mut Level<'_>,
        index: usize,
        cursor: usize,
        depth: usize,
    ) -> Result<Option<Vec<Grid>>, ReverseError> {
        self.step()?;

        let Some(&cell) = level.live.get(index) else {
            return self.complete(level, depth);
        };

        let (x, y) = (cell % level.width, cell / level.width);
        let pop = count_live_neighbors(&level.candidate, level.width, level.height, x, y);

        // More neighbors never lower the count
        if pop >= 4 {
            return Ok(None);
        }

        if !fixed_region_ok(
            &level.candidate,
            level.fixed.cells(),
            &level.target.cells,
            level.width,
            level.height,
            cell,
        ) {
            return Ok(None);
        }

        // Alive in the predecessor
        let revived = !level.fixed.is_fixed(cell) && !level.candidate[cell];
        if revived {
            level.candidate[cell] = true;
        }

        if level.candidate[cell] {
            let outcome = match pop {
                0 | 1 => self.add_neighbors(level, index, cursor, x, y, depth)?,
                2 => match self.settle(level, index, x, y, depth)? {
                    Some(chain) => Additions::Found(chain),
                    // One more neighbor still keeps the cell alive
                    None => self.add_neighbors(level, index, cursor, x, y, depth)?,
                },
                _ => match self.settle(level, index, x, y, depth)? {
                    Some(chain) => Additions::Found(chain),
                    None => Additions::Exhausted,
                },
            };

            match outcome {
                Additions::Found(chain) => {
                    if revived {
                        level.candidate[cell] = false;
                    }
                    return Ok(Some(chain));
                }
                Additions::OutOfSlots => {
                    if revived {
                        level.candidate[cell] = false;
                    }
                    return Ok(None);
                }
                Additions::Exhausted => {}
            }
        }

        if revived {
            level.candidate[cell] = false;
        }

        // Dead in the predecessor, born from exactly three neighbors
        let killed = !level.fixed.is_fixed(cell) && level.candidate[cell];
        if killed {
            level.candidate[cell] = false;
        }

        let mut found = None;
        if !level.candidate[cell] {
            let outcome = if pop <= 2 {
                self.add_neighbors(level, index, cursor, x, y, depth)?
            } else {
                match self.settle(level, index, x, y, depth)? {
                    Some(chain) => Additions::Found(chain),
                    None => Additions::Exhausted,
                }
            };

            if let Additions::Found(chain) = outcome {
                found = Some(chain);
            }
        }

        if killed {
            level.candidate[cell] = true;
        }

        Ok(found)
    }

    /// Fix the neighborhood of `(x, y)` and move on to the next alive cell.
    fn settle(
        &mut self,
        level: &mut Level<'_>,
        index: usize,
        x: usize,
        y: usize,
        depth: usize,
    ) -> Result<Option<Vec<Grid>>, ReverseError> {
        let mark = level.undo.mark();
        level.fixed.fix_neighborhood(x, y, &mut level.undo);

        let result = self.extend(level, index + 1, 0, depth);

        level.fixed.rollback(&mut level.undo, mark);
        result
    }

    /// Try one more alive neighbor in each slot from `cursor` on, staying on
    /// the same alive cell with the cursor moved past the chosen slot.
    fn add_neighbors(
        &mut self,
        level: &mut Level<'_>,
        index: usize,
        cursor: usize,
        x: usize,
        y: usize,
        depth: usize,
    ) -> Result<Additions, ReverseError> {
        for slot in cursor..NEIGHBOR_OFFSETS.len() {
            let Some(neighbor) = level.addable_neighbor(x, y, slot) else {
                return Ok(Additions::OutOfSlots);
            };

            level.candidate[neighbor] = true;
            let result = self.extend(level, index, slot + 1, depth);
            level.candidate[neighbor] = false;

            if let Some(chain) = result? {
                return Ok(Additions::Found(chain));
            }
        }

        Ok(Additions::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchEngine;
    use crate::game_of_life::{advance, parse_grid_from_string};
    use crate::search::solver::SearchOptions;

    fn grid(text: &str) -> Grid {
        parse_grid_from_string(text).unwrap()
    }

    fn live_cells_only() -> PredecessorSearch {
        PredecessorSearch::new(SearchOptions {
            engine: SearchEngine::LiveCells,
            exhaustive_fallback: false,
            ..SearchOptions::default()
        })
    }

    #[test]
    fn test_addable_neighbor_order() {
        let target = Grid::new(3, 3);
        let mut level = Level::new(&target);

        // Slot order around the center is column-major: 0, 3, 6, 1, 7, 2, 5, 8
        assert_eq!(level.addable_neighbor(1, 1, 0), Some(0));
        assert_eq!(level.addable_neighbor(1, 1, 1), Some(3));
        assert_eq!(level.addable_neighbor(1, 1, 4), Some(7));
        assert_eq!(level.addable_neighbor(1, 1, 7), Some(8));

        // Taken slots are skipped, not counted
        level.candidate[3] = true;
        assert_eq!(level.addable_neighbor(1, 1, 1), Some(6));
        level.fixed.fix_neighborhood(1, 2, &mut level.undo);
        // (1,2) fixes 3, 4, 5, 6 and 8; slot 1 now lands on 1
        assert_eq!(level.addable_neighbor(1, 1, 1), Some(1));

        // A corner has only three on-grid neighbors
        let corner = Level::new(&target);
        assert_eq!(corner.addable_neighbor(0, 0, 2), Some(4));
        assert_eq!(corner.addable_neighbor(0, 0, 3), None);
    }

    #[test]
    fn test_finds_blinker_phase() {
        let target = grid("000\n111\n000\n");
        let mut search = live_cells_only();
        let chain = search.find_chain(&target, 1).unwrap().unwrap();

        assert_eq!(chain.len(), 1);
        assert_eq!(advance(&chain[0]), target);
        assert_ne!(chain[0], target);
        assert!(search.statistics().nodes_visited > 0);
        assert_eq!(search.statistics().fallback_scans, 0);
    }

    #[test]
    fn test_result_is_deterministic() {
        let target = grid("00000\n01100\n01010\n00100\n00000\n");
        let first = live_cells_only().find_chain(&target, 1).unwrap();
        let second = live_cells_only().find_chain(&target, 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_target_needs_other_engine() {
        // With no alive target cells the only candidate is the empty grid,
        // which is a fixed point
        let target = Grid::new(3, 3);
        let mut search = live_cells_only();
        assert_eq!(search.find_chain(&target, 1).unwrap(), None);
        assert_eq!(search.statistics().fixed_point_rejections, 1);
    }

    #[test]
    fn test_overpopulated_target_has_no_predecessor() {
        // A full 3x3 would need the center alive from at most three neighbors
        // while every corner stays alive too
        let target = grid("111\n111\n111\n");
        let mut search = live_cells_only();
        assert_eq!(search.find_chain(&target, 1).unwrap(), None);
    }

    #[test]
    fn test_every_accepted_candidate_round_trips() {
        for bits in 0u32..512 {
            let cells = (0..9).map(|i| bits & (1 << i) != 0).collect();
            let target = Grid::from_raw(3, 3, cells).unwrap();
            if let Some(chain) = live_cells_only().find_chain(&target, 1).unwrap() {
                assert_eq!(advance(&chain[0]), target, "target bits {:09b}", bits);
                assert_ne!(chain[0], target, "target bits {:09b}", bits);
            }
        }
    }
}
