#![no_main]

use dancing_cover::sudoku::SudokuPuzzle;
use libfuzzer_sys::fuzz_target;

#[derive(Debug)]
struct PartialSudoku {
    puzzle: SudokuPuzzle,
}

impl<'a> arbitrary::Arbitrary<'a> for PartialSudoku {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut puzzle = SudokuPuzzle::new();

        for (index, value) in u.arbitrary::<[u8; 81]>()?.into_iter().enumerate() {
            // Most squares stay empty, otherwise nearly every board conflicts.
            let value = value % 30;
            if (1..=9).contains(&value) {
                puzzle
                    .set_at(index % 9, index / 9, Some(value))
                    .map_err(|_| arbitrary::Error::IncorrectFormat)?;
            }
        }

        Ok(PartialSudoku { puzzle })
    }
}

fuzz_target!(|data: PartialSudoku| {
    let puzzle = data.puzzle;

    if let Some(solution) = puzzle.solve() {
        assert!(solution.is_solution_for(&puzzle));
    }

    let reparsed: SudokuPuzzle = puzzle.to_string().parse().unwrap();
    assert_eq!(reparsed, puzzle);
});
