//! Game of Life core functionality

pub mod grid;
pub mod rules;
pub mod io;

pub use grid::{Grid, count_live_neighbors, neighbor_index, NEIGHBOR_OFFSETS};
pub use rules::{GameOfLifeRules, advance, advance_cells};
pub use io::{
    load_grid_from_file, save_grid_to_file, parse_grid_from_string, grid_to_string,
    save_generations, load_grids_from_directory, create_example_grids
};
