//! Errors reported by the link matrix and the puzzle layer.

use thiserror::Error;

/// A broken structural invariant of a [`LinkMatrix`](crate::LinkMatrix).
///
/// These are never expected to occur as long as covers and uncovers are
/// paired; seeing one means the matrix has been corrupted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Following a link from `node` and then the opposite link does not lead
    /// back to `node`.
    #[error("node {node}: {direction} neighbour does not link back")]
    BrokenLink {
        /// Index of the node the walk was at.
        node: usize,
        /// The direction that was followed.
        direction: &'static str,
    },
    /// A column's recorded size differs from the length of its cycle.
    #[error("column {column}: recorded size {recorded}, but {actual} nodes are linked")]
    SizeMismatch {
        /// Index of the column header.
        column: usize,
        /// The size stored in the header.
        recorded: usize,
        /// The number of nodes found on the column's cycle.
        actual: usize,
    },
    /// A node is linked into the cycle of a column it does not belong to.
    #[error("node {node} is linked into column {expected} but belongs to column {found}")]
    WrongColumn {
        /// Index of the misplaced node.
        node: usize,
        /// The column whose cycle the node was found on.
        expected: usize,
        /// The column recorded in the node.
        found: usize,
    },
    /// Walking from `origin` never returned to it.
    #[error("cycle through node {origin} does not terminate")]
    UnterminatedCycle {
        /// Index of the node the walk started from.
        origin: usize,
    },
    /// A column is still covered although every cover should have been
    /// undone.
    #[error("column {column} is still covered")]
    StillCovered {
        /// Index of the column header.
        column: usize,
    },
}

/// An error encountered while reading a puzzle from a grid string.
///
/// Line and column numbers start at 1 and count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character other than a space at a position that has no square.
    #[error("line {line}, character {column}: invalid character {found:?}, expected a space")]
    ExpectedSpace {
        /// The line of the offending character.
        line: usize,
        /// The position of the offending character within its line.
        column: usize,
        /// The offending character.
        found: char,
    },
    /// A character that is neither `.` nor a glyph at a square.
    #[error("line {line}, character {column}: invalid character {found:?}, expected a period or a glyph")]
    InvalidGlyph {
        /// The line of the offending character.
        line: usize,
        /// The position of the offending character within its line.
        column: usize,
        /// The offending character.
        found: char,
    },    /// A glyph at a template square that the puzzle type does not use.
    #[error("line {line}, character {column}: square is not part of the puzzle")]
    UnknownSquare {
        /// The line of the offending character.
        line: usize,
        /// The position of the offending character within its line.
        column: usize,
    },
}

/// An invalid access to a [`Puzzle`](crate::puzzle::Puzzle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// The square is not part of this puzzle type.
    #[error("square is not part of this puzzle")]
    InvalidSquare,
    /// The glyph is not one of this puzzle type's glyphs.
    #[error("glyph is not used by this puzzle")]
    InvalidGlyph,
    /// No square exists at the given grid coordinates.
    #[error("no square at coordinates ({x}, {y})")]
    InvalidCoordinates {
        /// Zero based column of the grid.
        x: usize,
        /// Zero based row of the grid.
        y: usize,
    },
}

/// A malformed puzzle type definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The same glyph was listed twice.
    #[error("glyph {index} is listed more than once")]
    DuplicateGlyph {
        /// Position of the repeated glyph.
        index: usize,
    },
    /// A group does not have one square per glyph.
    #[error("group {group} has {found} squares, expected {expected}")]
    GroupSize {
        /// Position of the group.
        group: usize,
        /// The number of glyphs.
        expected: usize,
        /// The number of distinct squares in the group.
        found: usize,
    },
    /// A group refers to a square that is not part of the puzzle.
    #[error("group {group} contains a square that is not part of the puzzle")]
    UnknownSquare {
        /// Position of the group.
        group: usize,
    },
}
