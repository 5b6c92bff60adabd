//! Game of Life rules implementation

use super::grid::count_live_neighbors;
use super::Grid;
use rayon::prelude::*;

/// Grids with at least this many cells are advanced row-parallel
const PARALLEL_THRESHOLD: usize = 64 * 64;

/// Compute the next generation of `grid` without touching it.
pub fn advance(grid: &Grid) -> Grid {
    GameOfLifeRules::evolve(grid)
}

/// Next generation of a raw row-major buffer
pub fn advance_cells(cells: &[bool], width: usize, height: usize) -> Vec<bool> {
    let cell_at = |idx: usize| {
        let (x, y) = (idx % width, idx / width);
        GameOfLifeRules::should_be_alive(cells[idx], count_live_neighbors(cells, width, height, x, y))
    };

    if cells.len() >= PARALLEL_THRESHOLD {
        (0..cells.len()).into_par_iter().map(cell_at).collect()
    } else {
        (0..cells.len()).map(cell_at).collect()
    }
}

/// Game of Life rules engine
pub struct GameOfLifeRules;

impl GameOfLifeRules {
    /// Apply Game of Life rules to evolve the grid one generation forward
    pub fn evolve(current: &Grid) -> Grid {
        Grid {
            width: current.width,
            height: current.height,
            cells: advance_cells(&current.cells, current.width, current.height),
        }
    }

    /// Evolve the grid for multiple generations
    pub fn evolve_generations(mut grid: Grid, generations: usize) -> Grid {
        for _ in 0..generations {
            grid = Self::evolve(&grid);
        }
        grid
    }

    /// Every generation from `grid` onward, `generations + 1` grids in total
    pub fn evolution_path(grid: &Grid, generations: usize) -> Vec<Grid> {
        let mut path = Vec::with_capacity(generations + 1);
        path.push(grid.clone());
        for _ in 0..generations {
            let next = match path.last() {
                Some(last) => Self::evolve(last),
                None => break,
            };
            path.push(next);
        }
        path
    }

    /// Check if a cell should be alive in the next generation given its current state and neighbor count
    ///
    /// Dead below two neighbors, survives on two or three, dead above three,
    /// born on exactly three.
    #[inline]
    pub fn should_be_alive(current_state: bool, neighbor_count: u8) -> bool {
        matches!((current_state, neighbor_count), (true, 2) | (_, 3))
    }

    /// Whether a cell with this state and neighbor count can produce `wanted`.
    ///
    /// Alive wanted: (alive and pop == 2) or pop == 3.
    /// Dead wanted: (dead and pop == 2) or pop <= 1 or pop >= 4.
    #[inline]
    pub fn is_compatible(wanted: bool, current_state: bool, neighbor_count: u8) -> bool {
        Self::should_be_alive(current_state, neighbor_count) == wanted
    }

    /// Validate that a predecessor state correctly evolves to the target state
    pub fn validate_evolution(predecessor: &Grid, target: &Grid, generations: usize) -> bool {
        if predecessor.dimensions() != target.dimensions() {
            return false;
        }

        let evolved = Self::evolve_generations(predecessor.clone(), generations);
        evolved == *target
    }

    /// Check if two grids are equivalent (same living cells)
    pub fn grids_equal(grid1: &Grid, grid2: &Grid) -> bool {
        grid1.width == grid2.width
            && grid1.height == grid2.height
            && grid1.cells == grid2.cells
    }

    /// Whether `grid` maps to itself under one rule application
    pub fn is_fixed_point(grid: &Grid) -> bool {
        Self::evolve(grid) == *grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_life_block() {
        // 2x2 block should remain stable
        let cells = vec![
            vec![false, false, false, false],
            vec![false, true, true, false],
            vec![false, true, true, false],
            vec![false, false, false, false],
        ];
        let grid = Grid::from_cells(cells).unwrap();
        let evolved = advance(&grid);

        assert!(GameOfLifeRules::grids_equal(&grid, &evolved));
        assert!(GameOfLifeRules::is_fixed_point(&grid));
    }

    #[test]
    fn test_oscillator_blinker() {
        let cells = vec![
            vec![false, false, false],
            vec![true, true, true],
            vec![false, false, false],
        ];
        let grid = Grid::from_cells(cells).unwrap();
        let evolved = advance(&grid);

        let expected_cells = vec![
            vec![false, true, false],
            vec![false, true, false],
            vec![false, true, false],
        ];
        let expected = Grid::from_cells(expected_cells).unwrap();

        assert!(GameOfLifeRules::grids_equal(&evolved, &expected));

        // Evolve again should return to original
        let evolved_twice = advance(&evolved);
        assert!(GameOfLifeRules::grids_equal(&grid, &evolved_twice));
        assert!(!GameOfLifeRules::is_fixed_point(&grid));
    }

    #[test]
    fn test_advance_does_not_mutate_input() {
        let grid = Grid::from_cells(vec![vec![true, true], vec![true, false]]).unwrap();
        let before = grid.clone();
        let next = advance(&grid);
        assert_eq!(grid, before);
        // L-tromino becomes a block
        assert_eq!(next.living_count(), 4);
    }

    #[test]
    fn test_rule_logic() {
        assert!(GameOfLifeRules::should_be_alive(true, 2));
        assert!(GameOfLifeRules::should_be_alive(true, 3));
        assert!(GameOfLifeRules::should_be_alive(false, 3));
        assert!(!GameOfLifeRules::should_be_alive(true, 1));
        assert!(!GameOfLifeRules::should_be_alive(true, 4));
        assert!(!GameOfLifeRules::should_be_alive(false, 2));
        assert!(!GameOfLifeRules::should_be_alive(false, 0));
    }

    #[test]
    fn test_compatibility_predicate() {
        for pop in 0..=8u8 {
            for alive in [false, true] {
                let want_alive = (alive && pop == 2) || pop == 3;
                let want_dead = (!alive && pop == 2) || pop <= 1 || pop >= 4;
                assert_eq!(GameOfLifeRules::is_compatible(true, alive, pop), want_alive);
                assert_eq!(GameOfLifeRules::is_compatible(false, alive, pop), want_dead);
            }
        }
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        // Large enough to take the rayon path; a row of blinkers
        let width = 80;
        let height = 80;
        let mut grid = Grid::new(width, height);
        for col in (1..width - 1).step_by(4) {
            grid.set(40, col, true).unwrap();
            grid.set(40, col + 1, true).unwrap();
            grid.set(40, col + 2, true).unwrap();
        }
        let evolved = advance(&grid);
        for row in 0..height {
            for col in 0..width {
                let expected = GameOfLifeRules::should_be_alive(grid.get(row, col), grid.count_neighbors(row, col));
                assert_eq!(evolved.get(row, col), expected);
            }
        }
    }

    #[test]
    fn test_validation() {
        let cells = vec![
            vec![false, true, false],
            vec![false, true, false],
            vec![false, true, false],
        ];
        let predecessor = Grid::from_cells(cells).unwrap();

        let target_cells = vec![
            vec![false, false, false],
            vec![true, true, true],
            vec![false, false, false],
        ];
        let target = Grid::from_cells(target_cells).unwrap();

        assert!(GameOfLifeRules::validate_evolution(&predecessor, &target, 1));
        assert!(!GameOfLifeRules::validate_evolution(&predecessor, &target, 2));
        assert!(!GameOfLifeRules::validate_evolution(&predecessor, &Grid::new(4, 4), 1));

        let path = GameOfLifeRules::evolution_path(&predecessor, 2);
        assert_eq!(path.len(), 3);
        assert_eq!(path[1], target);
        assert_eq!(path[2], predecessor);
    }
}
