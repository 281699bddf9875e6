//! Run Sudoku solver
//! Usage:
//!
//! ```bash
//! cargo run --release --example solve_sudoku 300080900000340000008005600500104070002009010003000040005001200000000000070008090
//! ```
//!
//! Without an argument, a grid drawn like
//!
//! ```text
//! ...|..8|...
//! ..7|.35|..9
//! 5..|4.6|8..
//! ---+---+---
//! ...
//! ```
//!
//! is read from standard input instead.

use dancing_cover::sudoku::SudokuPuzzle;
use std::{io::Read, ops::ControlFlow};

fn parse_digits(problem: &str) -> Option<SudokuPuzzle> {
    if problem.len() != 9 * 9 {
        return None;
    }

    let mut puzzle = SudokuPuzzle::new();
    for (index, c) in problem.chars().enumerate() {
        let value = u8::try_from(c.to_digit(10)?).ok()?;
        if value != 0 {
            puzzle.set_at(index % 9, index / 9, Some(value)).ok()?;
        }
    }

    Some(puzzle)
}

fn main() {
    env_logger::init();

    let puzzle = match std::env::args().nth(1) {
        Some(problem) => match parse_digits(&problem) {
            Some(puzzle) => puzzle,
            None => {
                eprintln!("invalid problem format");
                std::process::exit(1);
            }
        },
        None => {
            let mut input = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut input) {
                eprintln!("unable to read problem: {err}");
                std::process::exit(1);
            }

            match input.parse::<SudokuPuzzle>() {
                Ok(puzzle) => puzzle,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
    };

    let mut count = 0usize;
    puzzle.each_solution(|solution| -> ControlFlow<()> {
        count += 1;
        println!("{solution}");
        println!();
        ControlFlow::Continue(())
    });

    if count == 0 {
        eprintln!("no solution");
        std::process::exit(1);
    }
}
