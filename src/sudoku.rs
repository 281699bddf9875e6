//! A [Sudoku puzzle](https://en.wikipedia.org/wiki/Sudoku) is a `9` × `9`
//! grid with sub-grids of size `3` × `3`. Each row, column, and sub-grid
//! contains the values `1` through `9` with no repeats.
//!
//! ```
//! use dancing_cover::sudoku::SudokuPuzzle;
//!
//! let puzzle: SudokuPuzzle = "
//! ...|..8|...
//! ..7|.35|..9
//! 5..|4.6|8..
//! ---+---+---
//! ...|..4|2..
//! 4..|...|.37
//! 8..|...|5..
//! ---+---+---
//! .9.|.67|...
//! ..3|...|1.5
//! ...|...|..3
//! "
//! .parse()
//! .unwrap();
//!
//! let solution = puzzle.solve().unwrap();
//! assert!(solution.is_solution_for(&puzzle));
//! ```

use crate::{
    grid::{GridPuzzle, GridSquare, GridTemplate},
    puzzle::{Definition, Puzzle, PuzzleType},
};
use std::sync::OnceLock;

/// The side length of a sub-grid.
pub const BOX_SIDE_LENGTH: usize = 3;

/// The side length of the whole grid.
pub const SIDE_LENGTH: usize = BOX_SIDE_LENGTH * BOX_SIDE_LENGTH;

const TEMPLATE: &str = "\
...|...|...
...|...|...
...|...|...
---+---+---
...|...|...
...|...|...
...|...|...
---+---+---
...|...|...
...|...|...
...|...|...";

/// The Sudoku puzzle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sudoku;

/// A (possibly partial) Sudoku grid.
pub type SudokuPuzzle = Puzzle<Sudoku>;

impl PuzzleType for Sudoku {
    type Square = GridSquare;
    type Glyph = u8;

    fn definition() -> &'static Definition<GridSquare, u8> {
        static DEFINITION: OnceLock<Definition<GridSquare, u8>> = OnceLock::new();
        DEFINITION.get_or_init(|| {
            let squares = Sudoku::template().squares();
            let group = |matches: &dyn Fn(&GridSquare) -> bool| {
                squares
                    .iter()
                    .copied()
                    .filter(|square| matches(square))
                    .collect::<Vec<_>>()
            };

            let rows = (0..SIDE_LENGTH).map(|y| group(&|square| square.y == y));
            let columns = (0..SIDE_LENGTH).map(|x| group(&|square| square.x == x));
            let boxes = (0..SIDE_LENGTH).map(|index| {
                group(&|square| {
                    square.x / BOX_SIDE_LENGTH == index % BOX_SIDE_LENGTH
                        && square.y / BOX_SIDE_LENGTH == index / BOX_SIDE_LENGTH
                })
            });

            let groups: Vec<_> = rows.chain(columns).chain(boxes).collect();
            Definition::new((1..=9).collect(), squares.iter().copied(), groups)
                .unwrap_or_else(|err| panic!("invalid sudoku definition: {}", err))
        })
    }
}

impl GridPuzzle for Sudoku {
    fn template() -> &'static GridTemplate {
        static GRID: OnceLock<GridTemplate> = OnceLock::new();
        GRID.get_or_init(|| GridTemplate::new(TEMPLATE, "123456789".chars().collect()))
    }
}
