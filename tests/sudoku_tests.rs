mod common;

use common::{format_flat_sudoku, init_logging, parse_flat_sudoku, ShidokuPuzzle, Sudoku6x6};
use dancing_cover::{
    error::ParseError,
    puzzle::{Puzzle, PuzzleCover},
    sudoku::SudokuPuzzle,
    ExactCover,
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::ops::ControlFlow;

const EXAMPLE: &str = "\
...|..8|...
..7|.35|..9
5..|4.6|8..
---+---+---
...|..4|2..
4..|...|.37
8..|...|5..
---+---+---
.9.|.67|...
..3|...|1.5
...|...|..3";

const PUZZLES: &[(&str, &str)] = &[
    (
        "006008047000607200304009060003100005010020480740005009020930600081000034905006170",
        "296318547158647293374259861863194725519723486742865319427931658681572934935486172",
    ),
    (
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
    ),
];

// Basing this exact count off of https://en.wikipedia.org/wiki/Mathematics_of_Sudoku#Sudoku_with_rectangular_regions
#[test]
fn enumerate_all_shidoku_solutions() {
    let puzzle = ShidokuPuzzle::new();

    assert_eq!(puzzle.solutions().len(), 288);
}

#[test]
#[ignore = "enumerating every 6x6 grid takes hours outside of release mode"]
fn enumerate_all_sudoku_solutions_large() {
    let mut count = 0usize;
    Puzzle::<Sudoku6x6>::new().each_solution(|_| -> ControlFlow<()> {
        count += 1;
        ControlFlow::Continue(())
    });

    assert_eq!(count, 28_200_960);
}

#[test]
#[ignore = "takes about a minute outside of release mode"]
fn enumerate_many_sudoku_solutions() {
    let mut count = 0usize;
    let stopped = Puzzle::<Sudoku6x6>::new().each_solution(|solution| {
        assert!(solution.is_solution());
        count += 1;
        if count == 10_000 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    // Assert that the number of solutions is at least 10,000.
    assert_eq!(stopped, Some(()));
    assert_eq!(count, 10_000);
}

#[test]
fn single_sudoku_test() {
    init_logging();

    let (sudoku_input, expected_solved_sudoku) = PUZZLES[0];

    let puzzle = parse_flat_sudoku(sudoku_input);
    let solutions = puzzle.solutions();

    assert_eq!(solutions.len(), 1);
    assert_eq!(format_flat_sudoku(&solutions[0]), expected_solved_sudoku);
}

#[test]
fn solve_example_grid() {
    init_logging();

    let puzzle: SudokuPuzzle = EXAMPLE.parse().unwrap();
    let solution = puzzle.solve().unwrap();

    log::debug!("Solved example grid:\n{}", solution);

    assert!(solution.is_filled());
    assert!(solution.is_valid());
    assert!(solution.is_solution_for(&puzzle));
    assert!(puzzle <= solution);
    assert!(solution.get_at(7, 8).unwrap().is_some());
}

#[test]
fn grid_strings_round_trip() {
    let puzzle: SudokuPuzzle = EXAMPLE.parse().unwrap();

    assert_eq!(puzzle.to_string(), EXAMPLE);
    assert_eq!(puzzle.to_string().parse::<SudokuPuzzle>(), Ok(puzzle.clone()));

    let solution = puzzle.solve().unwrap();
    assert_eq!(solution.to_string().parse::<SudokuPuzzle>(), Ok(solution));
}

#[test]
fn grid_string_errors_report_position() {
    let misplaced = EXAMPLE.replacen("...|..8|...", "...|..8|...?", 1);
    assert_eq!(
        misplaced.parse::<SudokuPuzzle>(),
        Err(ParseError::ExpectedSpace {
            line: 1,
            column: 12,
            found: '?'
        })
    );

    let bad_glyph = EXAMPLE.replacen("..7", "..0", 1);
    assert_eq!(
        bad_glyph.parse::<SudokuPuzzle>(),
        Err(ParseError::InvalidGlyph {
            line: 2,
            column: 3,
            found: '0'
        })
    );
}

#[test]
fn conflicting_givens_have_no_solution() {
    let mut puzzle: SudokuPuzzle = EXAMPLE.parse().unwrap();
    puzzle.set_at(0, 0, Some(8)).unwrap();

    assert!(!puzzle.is_valid());
    assert_eq!(puzzle.solve(), None);
    assert_eq!(puzzle.each_solution(ControlFlow::Break), None);
}

#[test]
fn stop_after_two_solutions() {
    let mut found = 0;
    let stopped = SudokuPuzzle::new().each_solution(|solution| {
        assert!(solution.is_solution());
        found += 1;
        if found == 2 {
            ControlFlow::Break(solution)
        } else {
            ControlFlow::Continue(())
        }
    });

    assert!(stopped.is_some());
    assert_eq!(found, 2);
}

#[test]
fn parallel_matrices_agree_with_serial() {
    init_logging();

    let matrices: Vec<_> = PUZZLES
        .iter()
        .map(|(input, _)| PuzzleCover::new(&parse_flat_sudoku(input)).link_matrix())
        .collect();

    let serial: Vec<_> = matrices
        .iter()
        .cloned()
        .map(|mut matrix| matrix.exact_covers().count())
        .collect();

    let parallel: Vec<_> = matrices
        .par_iter()
        .map(|matrix| matrix.clone().exact_covers().count())
        .collect();

    assert_eq!(serial, vec![1, 1]);
    assert_eq!(parallel, serial);

    let solved: Vec<_> = PUZZLES
        .par_iter()
        .map(|(input, _)| {
            let solution = parse_flat_sudoku(input).solve().unwrap();
            format_flat_sudoku(&solution)
        })
        .collect();

    for ((_, expected), actual) in PUZZLES.iter().zip(solved) {
        assert_eq!(&actual, expected);
    }
}
