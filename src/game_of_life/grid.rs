//! Grid representation and utilities for Game of Life

use crate::error::ReverseError;
use anyhow::Result;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moore neighborhood offsets as `(dx, dy)`, dx outer and dy inner.
///
/// The search numbers neighbor slots in this order, so it must not change.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count live cells around `(x, y)` in a row-major buffer.
///
/// Positions outside `[0, width) x [0, height)` are dead; there is no wraparound.
#[inline]
pub fn count_live_neighbors(cells: &[bool], width: usize, height: usize, x: usize, y: usize) -> u8 {
    let mut count = 0;
    for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
        if let Some(idx) = neighbor_index(width, height, x, y, dx, dy) {
            if cells[idx] {
                count += 1;
            }
        }
    }
    count
}

/// Row-major index of the cell at `(x + dx, y + dy)`, if it lies on the grid.
#[inline]
pub fn neighbor_index(width: usize, height: usize, x: usize, y: usize, dx: isize, dy: isize) -> Option<usize> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    if nx < width && ny < height {
        Some(ny * width + nx)
    } else {
        None
    }
}

/// Represents a Game of Life grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<bool>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Wrap a row-major cell buffer
    pub fn from_raw(width: usize, height: usize, cells: Vec<bool>) -> std::result::Result<Self, ReverseError> {
        if cells.len() != width * height {
            return Err(ReverseError::InvalidBuffer {
                len: cells.len(),
                width,
                height,
            });
        }
        Ok(Self { width, height, cells })
    }

    /// Create a grid from a 2D boolean array
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("Grid cannot be empty");
        }

        let height = cells.len();
        let width = cells[0].len();

        if width == 0 {
            anyhow::bail!("Grid width cannot be zero");
        }

        for (i, row) in cells.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        let flat_cells: Vec<bool> = cells.into_iter().flatten().collect();

        Ok(Self {
            width,
            height,
            cells: flat_cells,
        })
    }

    /// `(width, height)` of the grid
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Fail with `DimensionMismatch` unless `other` has the same size
    pub fn ensure_same_dimensions(&self, other: &Grid) -> std::result::Result<(), ReverseError> {
        if self.dimensions() != other.dimensions() {
            return Err(ReverseError::mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Get cell value at coordinates
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row < self.height && col < self.width {
            self.cells[self.index(row, col)]
        } else {
            false // Out of bounds cells are considered dead
        }
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        if row >= self.height || col >= self.width {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} grid", row, col, self.height, self.width);
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Count living neighbors for a cell
    pub fn count_neighbors(&self, row: usize, col: usize) -> u8 {
        count_live_neighbors(&self.cells, self.width, self.height, col, row)
    }

    /// Get all living cell coordinates as `(row, col)`
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        iproduct!(0..self.height, 0..self.width)
            .filter(|&(row, col)| self.get(row, col))
            .collect()
    }

    /// Row-major indices of all living cells
    pub fn living_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &alive)| alive.then_some(i))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Check if the grid is empty (no living cells)
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| !cell)
    }

    /// Fraction of living cells, 0.0 for a zero-sized grid
    pub fn density(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.living_count() as f64 / self.cells.len() as f64
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = self.get(row, col);
                let symbol = if cell { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
