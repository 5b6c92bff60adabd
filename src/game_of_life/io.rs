//! Plain-text grid files
//!
//! One row per line. `1`, `X`, `x`, `O` or `#` mark a live cell; `0` or `.`
//! mark a dead one. Blank lines and surrounding whitespace are ignored.

use super::Grid;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load a grid from a text file
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

fn parse_cell(ch: char) -> Option<bool> {
    match ch {
        '1' | 'X' | 'x' | 'O' | '#' => Some(true),
        '0' | '.' => Some(false),
        _ => None,
    }
}

/// Parse a grid from a string representation
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let rows = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(row_idx, line)| {
            line.chars()
                .enumerate()
                .map(|(col_idx, ch)| {
                    parse_cell(ch).with_context(|| {
                        format!("Invalid character '{}' at position ({}, {})", ch, row_idx, col_idx)
                    })
                })
                .collect::<Result<Vec<bool>>>()
        })
        .collect::<Result<Vec<Vec<bool>>>>()?;

    if rows.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    // from_cells reports ragged rows
    Grid::from_cells(rows)
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, grid_to_string(grid))
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a grid to its `0`/`1` text form
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.height * (grid.width + 1));
    for row in grid.cells.chunks(grid.width.max(1)) {
        result.extend(row.iter().map(|&alive| if alive { '1' } else { '0' }));
        result.push('\n');
    }
    result
}

/// Write each grid of a generation chain as `generation_NNN.txt`
pub fn save_generations<P: AsRef<Path>>(grids: &[Grid], dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    grids
        .iter()
        .enumerate()
        .map(|(i, grid)| {
            let path = dir.join(format!("generation_{:03}.txt", i));
            save_grid_to_file(grid, &path)?;
            Ok(path)
        })
        .collect()
}

/// Load every `.txt` grid in a directory, sorted by file stem.
///
/// Files that fail to parse are logged and skipped.
pub fn load_grids_from_directory<P: AsRef<Path>>(dir_path: P) -> Result<Vec<(String, Grid)>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut grids = Vec::new();

    for entry in dir {
        let path = entry.context("Failed to read directory entry")?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "txt") {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        match load_grid_from_file(&path) {
            Ok(grid) => grids.push((name, grid)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable grid"),
        }
    }

    grids.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(grids)
}

/// Example targets, all on the default 9x9 board
const EXAMPLE_TARGETS: &[(&str, &str)] = &[
    (
        "blinker",
        "000000000\n000000000\n000000000\n000000000\n000111000\n000000000\n000000000\n000000000\n000000000\n",
    ),
    (
        "glider",
        "000000000\n000000000\n000100000\n000010000\n001110000\n000000000\n000000000\n000000000\n000000000\n",
    ),
    (
        "block",
        "000000000\n000000000\n000000000\n000110000\n000110000\n000000000\n000000000\n000000000\n000000000\n",
    ),
    (
        "center",
        "000000000\n000000000\n000000000\n000000000\n000010000\n000000000\n000000000\n000000000\n000000000\n",
    ),
];

/// Create example target files
pub fn create_example_grids<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for (name, content) in EXAMPLE_TARGETS {
        let path = dir.join(format!("{}.txt", name));
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_grid_from_string() {
        let content = "010\n101\n010\n";
        let grid = parse_grid_from_string(content).unwrap();

        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 3);
        assert_eq!(grid.living_count(), 4);
        assert!(grid.get(0, 1));
        assert!(grid.get(1, 0));
        assert!(grid.get(1, 2));
        assert!(grid.get(2, 1));
    }

    #[test]
    fn test_parse_alternate_symbols() {
        let grid = parse_grid_from_string("  .X.\n\nX.X  \n.X.\n").unwrap();
        let expected = parse_grid_from_string("010\n101\n010\n").unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_grid_to_string() {
        let grid = Grid::from_cells(vec![
            vec![false, true, false, false],
            vec![true, false, true, true],
        ])
        .unwrap();
        assert_eq!(grid_to_string(&grid), "0100\n1011\n");
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/test_grid.txt");

        let original_grid = Grid::from_cells(vec![
            vec![true, false, true],
            vec![false, true, false],
        ])
        .unwrap();

        save_grid_to_file(&original_grid, &file_path).unwrap();
        let loaded_grid = load_grid_from_file(&file_path).unwrap();

        assert_eq!(original_grid, loaded_grid);
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_grid_from_string("010\n1Z1\n010\n").is_err());
        assert!(parse_grid_from_string("010\n11\n010\n").is_err());
        assert!(parse_grid_from_string("").is_err());
        assert!(parse_grid_from_string("\n   \n").is_err());
    }

    #[test]
    fn test_save_generations() {
        let temp_dir = tempdir().unwrap();
        let grids = vec![Grid::new(2, 2), Grid::from_cells(vec![vec![true, true]]).unwrap()];
        let paths = save_generations(&grids, temp_dir.path()).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("generation_000.txt"));
        assert_eq!(load_grid_from_file(&paths[1]).unwrap(), grids[1]);
    }

    #[test]
    fn test_examples_and_directory_loading() {
        let temp_dir = tempdir().unwrap();
        create_example_grids(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("broken.txt"), "01\n2\n").unwrap();
        std::fs::write(temp_dir.path().join("notes.md"), "ignored").unwrap();

        let grids = load_grids_from_directory(temp_dir.path()).unwrap();
        let names: Vec<_> = grids.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["blinker", "block", "center", "glider"]);

        for (_, grid) in &grids {
            assert_eq!(grid.dimensions(), (9, 9));
        }
        let glider = &grids[3].1;
        assert_eq!(glider.living_count(), 5);
    }
}
