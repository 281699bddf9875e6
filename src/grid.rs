//! Puzzles laid out on a rectangular grid, read from and printed to strings.
//!
//! A grid puzzle type is described by a template string, where every `.`
//! marks a square and the characters `-`, `+` and `|` only draw separators:
//!
//! ```text
//! ..|..
//! --+--
//! ..|..
//! ```
//!
//! Separator characters are skipped when computing coordinates, and a line
//! containing nothing but separators does not count as a row.

use crate::{
    error::{ParseError, PuzzleError},
    puzzle::{Puzzle, PuzzleType},
};
use std::{cmp::Ordering, collections::HashMap, fmt, str::FromStr};

/// Characters that are only used to draw the layout of a grid.
pub const SEPARATORS: [char; 3] = ['-', '+', '|'];

/// A character of a grid string, with its position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridChar {
    /// The character itself.
    pub ch: char,
    /// Zero based column, ignoring separators.
    pub x: usize,
    /// Zero based row, ignoring separator lines.
    pub y: usize,
    /// Zero based line of the string the character is on.
    pub line_number: usize,
    /// Zero based position of the character within its line.
    pub char_number: usize,
}

/// Iterate over the non-separator characters of `text`.
pub fn parse_grid_string(text: &str) -> impl Iterator<Item = GridChar> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| line.chars().any(|ch| !SEPARATORS.contains(&ch)))
        .enumerate()
        .flat_map(|(y, (line_number, line))| {
            line.chars()
                .enumerate()
                .filter(|(_, ch)| !SEPARATORS.contains(ch))
                .enumerate()
                .map(move |(x, (char_number, ch))| GridChar {
                    ch,
                    x,
                    y,
                    line_number,
                    char_number,
                })
        })
}

/// A square of a grid puzzle.
///
/// Squares are ordered top to bottom, then left to right.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridSquare {
    /// Zero based column.
    pub x: usize,
    /// Zero based row.
    pub y: usize,
    /// The line of the template where the square is drawn.
    pub line_number: usize,
    /// The position within that line where the square is drawn.
    pub char_number: usize,
}

impl Ord for GridSquare {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x, self.line_number, self.char_number).cmp(&(
            other.y,
            other.x,
            other.line_number,
            other.char_number,
        ))
    }
}

impl PartialOrd for GridSquare {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GridSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({}, {})", self.x, self.y)
    }
}

/// The layout of a grid puzzle type, and the characters used for its glyphs.
#[derive(Debug, Clone)]
pub struct GridTemplate {
    text: String,
    glyph_chars: Vec<char>,
    squares: Vec<GridSquare>,
    square_index: HashMap<(usize, usize), GridSquare>,
}

impl GridTemplate {
    /// Create a template from its layout string.
    ///
    /// `glyph_chars[i]` is the character used for the `i`th glyph of the
    /// puzzle definition.
    pub fn new(text: &str, glyph_chars: Vec<char>) -> Self {
        let squares: Vec<GridSquare> = parse_grid_string(text)
            .filter(|grid_char| grid_char.ch == '.')
            .map(|grid_char| GridSquare {
                x: grid_char.x,
                y: grid_char.y,
                line_number: grid_char.line_number,
                char_number: grid_char.char_number,
            })
            .collect();

        let square_index = squares
            .iter()
            .map(|square| ((square.x, square.y), *square))
            .collect();

        GridTemplate {
            text: text.to_owned(),
            glyph_chars,
            squares,
            square_index,
        }
    }

    /// The layout string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The characters used for the glyphs.
    pub fn glyph_chars(&self) -> &[char] {
        &self.glyph_chars
    }

    /// Every square, in the order they appear in the template.
    pub fn squares(&self) -> &[GridSquare] {
        &self.squares
    }

    /// Return the square at the given coordinates, if there is one.
    pub fn square_at(&self, x: usize, y: usize) -> Option<GridSquare> {
        self.square_index.get(&(x, y)).copied()
    }
}

/// A puzzle type whose squares are laid out by a [`GridTemplate`].
pub trait GridPuzzle: PuzzleType<Square = GridSquare> {
    /// Return the template shared by every puzzle of this type.
    fn template() -> &'static GridTemplate;
}

impl<T: GridPuzzle> Puzzle<T> {
    /// Read a puzzle from a grid string drawn like the template.
    ///
    /// A square holds either `.` for an empty square or a glyph character;
    /// every other position must be a space.
    pub fn from_grid_str(text: &str) -> Result<Self, ParseError> {
        let template = T::template();
        let glyphs = T::definition().glyphs();
        let mut puzzle = Puzzle::new();

        for grid_char in parse_grid_string(text) {
            let line = grid_char.line_number + 1;
            let column = grid_char.char_number + 1;

            match template.square_at(grid_char.x, grid_char.y) {
                None if grid_char.ch == ' ' => {}
                None => {
                    return Err(ParseError::ExpectedSpace {
                        line,
                        column,
                        found: grid_char.ch,
                    })
                }
                Some(_) if grid_char.ch == '.' => {}
                Some(square) => {
                    let glyph = template
                        .glyph_chars()
                        .iter()
                        .position(|ch| *ch == grid_char.ch)
                        .and_then(|index| glyphs.get(index))
                        .ok_or(ParseError::InvalidGlyph {
                            line,
                            column,
                            found: grid_char.ch,
                        })?;

                    puzzle
                        .set(square, Some(*glyph))
                        .map_err(|error| match error {
                            PuzzleError::InvalidSquare => {
                                ParseError::UnknownSquare { line, column }
                            }
                            _ => ParseError::InvalidGlyph {
                                line,
                                column,
                                found: grid_char.ch,
                            },
                        })?;
                }
            }
        }

        Ok(puzzle)
    }

    /// Draw the puzzle using the template, with glyph characters in the
    /// filled squares.
    ///
    /// # Panics
    ///  - If a filled glyph has no character in the template
    pub fn to_grid_string(&self) -> String {
        let template = T::template();
        let glyphs = T::definition().glyphs();
        let mut lines: Vec<Vec<char>> = template
            .text()
            .lines()
            .map(|line| line.chars().collect())
            .collect();

        for (square, glyph) in self.iter() {
            let ch = glyphs
                .iter()
                .position(|candidate| *candidate == glyph)
                .and_then(|index| template.glyph_chars().get(index))
                .unwrap_or_else(|| {
                    panic!(
                        "glyph {:?} has no character in the grid template ({} characters for {} glyphs)",
                        glyph,
                        template.glyph_chars().len(),
                        glyphs.len()
                    )
                });

            lines[square.line_number][square.char_number] = *ch;
        }

        lines
            .into_iter()
            .map(|line| line.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Return the glyph at the given coordinates.
    pub fn get_at(&self, x: usize, y: usize) -> Result<Option<T::Glyph>, PuzzleError> {
        let square = T::template()
            .square_at(x, y)
            .ok_or(PuzzleError::InvalidCoordinates { x, y })?;

        self.get(square)
    }

    /// Set or clear the glyph at the given coordinates.
    pub fn set_at(&mut self, x: usize, y: usize, glyph: Option<T::Glyph>) -> Result<(), PuzzleError> {
        let square = T::template()
            .square_at(x, y)
            .ok_or(PuzzleError::InvalidCoordinates { x, y })?;

        self.set(square, glyph)
    }
}

impl<T: GridPuzzle> FromStr for Puzzle<T> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Puzzle::from_grid_str(s)
    }
}

impl<T: GridPuzzle> fmt::Display for Puzzle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_grid_string())
    }
}
