use dancing_cover::{
    grid::{GridPuzzle, GridSquare, GridTemplate},
    puzzle::{Definition, Puzzle, PuzzleType},
    sudoku::SudokuPuzzle,
};
use std::sync::OnceLock;

/// Install `env_logger` for the test binary, ignoring repeated calls.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sort every solution, then the list of solutions, so they can be compared
/// independently of search order.
#[allow(dead_code)]
pub fn normalize<T: Ord>(mut solutions: Vec<Vec<T>>) -> Vec<Vec<T>> {
    for solution in &mut solutions {
        solution.sort();
    }
    solutions.sort();

    solutions
}

/// Generate a Sudoku puzzle from an input string.
///
/// # Expected Format
///  - 0 denotes an empty value
///  - The numbers are presented in row-major order. So the first nine numbers
///    are the first row, the second nine numbers are the second row, etc.
///
/// # Panics
///  - If the string is not exactly 81 characters
///  - If any character in the string is not [0-9]
#[allow(dead_code)]
pub fn parse_flat_sudoku(sudoku_input: &str) -> SudokuPuzzle {
    log::debug!("Parsing sudoku puzzle input [{}].", sudoku_input);

    assert_eq!(
        sudoku_input.len(),
        81,
        "Input needs to be 81 characters long."
    );

    let mut puzzle = SudokuPuzzle::new();
    for (index, c) in sudoku_input.chars().enumerate() {
        let value = c.to_digit(10).expect("input should only contain digits");
        if value != 0 {
            let glyph = u8::try_from(value).unwrap();
            puzzle.set_at(index % 9, index / 9, Some(glyph)).unwrap();
        }
    }

    puzzle
}

/// Format a Sudoku puzzle into a string format matching the input of
/// `parse_flat_sudoku`.
#[allow(dead_code)]
pub fn format_flat_sudoku(puzzle: &SudokuPuzzle) -> String {
    (0..81)
        .map(|index| match puzzle.get_at(index % 9, index / 9).unwrap() {
            Some(glyph) => char::from(b'0' + glyph),
            None => '0',
        })
        .collect()
}

/// Rows, columns and boxes of a `side` × `side` grid whose boxes are
/// `box_width` squares wide.
fn rectangular_groups(
    squares: &[GridSquare],
    side: usize,
    box_width: usize,
) -> Vec<Vec<GridSquare>> {
    let box_height = side / box_width;
    let boxes_across = side / box_width;
    let mut groups: Vec<Vec<GridSquare>> = Vec::new();

    for index in 0..side {
        groups.push(squares.iter().copied().filter(|s| s.y == index).collect());
        groups.push(squares.iter().copied().filter(|s| s.x == index).collect());
        groups.push(
            squares
                .iter()
                .copied()
                .filter(|s| {
                    s.x / box_width == index % boxes_across
                        && s.y / box_height == index / boxes_across
                })
                .collect(),
        );
    }

    groups
}

/// A 4x4 Sudoku, with 2x2 boxes.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shidoku;

#[allow(dead_code)]
pub type ShidokuPuzzle = Puzzle<Shidoku>;

impl PuzzleType for Shidoku {
    type Square = GridSquare;
    type Glyph = u8;

    fn definition() -> &'static Definition<GridSquare, u8> {
        static DEFINITION: OnceLock<Definition<GridSquare, u8>> = OnceLock::new();
        DEFINITION.get_or_init(|| {
            let squares = Shidoku::template().squares();
            let groups = rectangular_groups(squares, 4, 2);

            Definition::new(vec![1, 2, 3, 4], squares.iter().copied(), groups).unwrap()
        })
    }
}

impl GridPuzzle for Shidoku {
    fn template() -> &'static GridTemplate {
        static TEMPLATE: OnceLock<GridTemplate> = OnceLock::new();
        TEMPLATE.get_or_init(|| {
            GridTemplate::new("..|..\n..|..\n--+--\n..|..\n..|..", vec!['1', '2', '3', '4'])
        })
    }
}

/// A 6x6 Sudoku, with boxes of 2 rows by 3 columns.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sudoku6x6;

impl PuzzleType for Sudoku6x6 {
    type Square = GridSquare;
    type Glyph = u8;

    fn definition() -> &'static Definition<GridSquare, u8> {
        static DEFINITION: OnceLock<Definition<GridSquare, u8>> = OnceLock::new();
        DEFINITION.get_or_init(|| {
            let squares = Sudoku6x6::template().squares();
            let groups = rectangular_groups(squares, 6, 3);

            Definition::new((1..=6).collect(), squares.iter().copied(), groups).unwrap()
        })
    }
}

impl GridPuzzle for Sudoku6x6 {
    fn template() -> &'static GridTemplate {
        static TEMPLATE: OnceLock<GridTemplate> = OnceLock::new();
        TEMPLATE.get_or_init(|| {
            GridTemplate::new(
                "...|...\n...|...\n---+---\n...|...\n...|...\n---+---\n...|...\n...|...",
                "123456".chars().collect(),
            )
        })
    }
}
