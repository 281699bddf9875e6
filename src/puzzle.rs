//! Puzzles where every square receives a glyph, subject to groups of squares
//! that must hold each glyph exactly once, and their reduction to exact cover.
//!
//! A puzzle type is described once by a [`Definition`]; a [`Puzzle`] is a
//! (possibly partial) assignment of glyphs to the squares of that type.

use crate::{
    error::{DefinitionError, PuzzleError},
    ExactCover,
};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap, HashSet},
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::ControlFlow,
};

/// A family of puzzles sharing the same squares, glyphs and groups.
pub trait PuzzleType: 'static {
    /// A position that can hold a glyph.
    type Square: Debug + Copy + Ord + Hash;

    /// A symbol that can be placed in a square.
    type Glyph: Debug + Copy + Ord + Hash;

    /// Return the definition shared by every puzzle of this type.
    fn definition() -> &'static Definition<Self::Square, Self::Glyph>;
}

/// The squares, glyphs and groups of a puzzle type.
#[derive(Debug, Clone)]
pub struct Definition<S, G> {
    glyphs: Vec<G>,
    squares: Vec<S>,
    groups: Vec<Vec<S>>,
    square_groups: HashMap<S, Vec<usize>>,
}

impl<S, G> Definition<S, G>
where
    S: Copy + Ord + Hash,
    G: Copy + Eq,
{
    /// Create a new definition.
    ///
    /// Repeated squares are ignored. Every group has to consist of exactly
    /// one distinct puzzle square per glyph.
    pub fn new(
        glyphs: Vec<G>,
        squares: impl IntoIterator<Item = S>,
        groups: impl IntoIterator<Item = Vec<S>>,
    ) -> Result<Self, DefinitionError> {
        if let Some(index) =
            (1..glyphs.len()).find(|&index| glyphs[..index].contains(&glyphs[index]))
        {
            return Err(DefinitionError::DuplicateGlyph { index });
        }

        let mut seen = HashSet::new();
        let squares: Vec<S> = squares
            .into_iter()
            .filter(|square| seen.insert(*square))
            .collect();

        let mut square_groups: HashMap<S, Vec<usize>> =
            squares.iter().map(|square| (*square, Vec::new())).collect();

        let mut checked_groups = Vec::new();
        for (group, mut members) in groups.into_iter().enumerate() {
            members.sort();
            members.dedup();

            if members.len() != glyphs.len() {
                return Err(DefinitionError::GroupSize {
                    group,
                    expected: glyphs.len(),
                    found: members.len(),
                });
            }
            for square in &members {
                square_groups
                    .get_mut(square)
                    .ok_or(DefinitionError::UnknownSquare { group })?
                    .push(group);
            }

            checked_groups.push(members);
        }

        Ok(Definition {
            glyphs,
            squares,
            groups: checked_groups,
            square_groups,
        })
    }

    /// The glyphs, in their canonical order.
    pub fn glyphs(&self) -> &[G] {
        &self.glyphs
    }

    /// The squares, in the order they were defined.
    pub fn squares(&self) -> &[S] {
        &self.squares
    }

    /// The groups, each sorted.
    pub fn groups(&self) -> &[Vec<S>] {
        &self.groups
    }

    /// The indices of the groups containing `square`.
    pub fn groups_of(&self, square: &S) -> &[usize] {
        self.square_groups
            .get(square)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Return true if `square` is part of this puzzle type.
    pub fn contains_square(&self, square: &S) -> bool {
        self.square_groups.contains_key(square)
    }

    /// Return true if `glyph` is one of this puzzle type's glyphs.
    pub fn contains_glyph(&self, glyph: &G) -> bool {
        self.glyphs.contains(glyph)
    }
}

/// An assignment of glyphs to some of the squares of a puzzle type.
pub struct Puzzle<T: PuzzleType> {
    pub(crate) glyph_state: BTreeMap<T::Square, T::Glyph>,
    kind: PhantomData<T>,
}

// Only `T: PuzzleType` is required, the marker type itself needs no derives.

impl<T: PuzzleType> Clone for Puzzle<T> {
    fn clone(&self) -> Self {
        Puzzle {
            glyph_state: self.glyph_state.clone(),
            kind: PhantomData,
        }
    }
}

impl<T: PuzzleType> Debug for Puzzle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Puzzle")
            .field("glyph_state", &self.glyph_state)
            .finish()
    }
}

impl<T: PuzzleType> PartialEq for Puzzle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.glyph_state == other.glyph_state
    }
}

impl<T: PuzzleType> Eq for Puzzle<T> {}

impl<T: PuzzleType> Hash for Puzzle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.glyph_state.hash(state);
    }
}

impl<T: PuzzleType> Default for Puzzle<T> {
    fn default() -> Self {
        Puzzle {
            glyph_state: BTreeMap::new(),
            kind: PhantomData,
        }
    }
}

impl<T: PuzzleType> Puzzle<T> {
    /// Create a puzzle with every square empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a puzzle from `(square, glyph)` assignments.
    pub fn from_assignments(
        assignments: impl IntoIterator<Item = (T::Square, T::Glyph)>,
    ) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::new();
        for (square, glyph) in assignments {
            puzzle.set(square, Some(glyph))?;
        }

        Ok(puzzle)
    }

    /// The definition of this puzzle's type.
    pub fn definition(&self) -> &'static Definition<T::Square, T::Glyph> {
        T::definition()
    }

    /// Return the glyph in `square`, if any.
    pub fn get(&self, square: T::Square) -> Result<Option<T::Glyph>, PuzzleError> {
        if !T::definition().contains_square(&square) {
            return Err(PuzzleError::InvalidSquare);
        }

        Ok(self.glyph_state.get(&square).copied())
    }

    /// Put `glyph` in `square`, or empty the square with `None`.
    pub fn set(&mut self, square: T::Square, glyph: Option<T::Glyph>) -> Result<(), PuzzleError> {
        let definition = T::definition();
        if !definition.contains_square(&square) {
            return Err(PuzzleError::InvalidSquare);
        }

        match glyph {
            Some(glyph) if !definition.contains_glyph(&glyph) => Err(PuzzleError::InvalidGlyph),
            Some(glyph) => {
                self.glyph_state.insert(square, glyph);
                Ok(())
            }
            None => {
                self.glyph_state.remove(&square);
                Ok(())
            }
        }
    }

    /// Iterate over the filled squares and their glyphs, in square order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Square, T::Glyph)> + '_ {
        self.glyph_state
            .iter()
            .map(|(square, glyph)| (*square, *glyph))
    }

    /// The number of filled squares.
    pub fn len(&self) -> usize {
        self.glyph_state.len()
    }

    /// Return true if no square is filled.
    pub fn is_empty(&self) -> bool {
        self.glyph_state.is_empty()
    }

    /// Return true if every square has a glyph.
    pub fn is_filled(&self) -> bool {
        self.glyph_state.len() == T::definition().squares().len()
    }

    /// Return true if no group holds the same glyph twice.
    pub fn is_valid(&self) -> bool {
        T::definition().groups().iter().all(|group| {
            let mut seen = HashSet::new();
            group
                .iter()
                .filter_map(|square| self.glyph_state.get(square))
                .all(|glyph| seen.insert(*glyph))
        })
    }

    /// Return true if the puzzle is filled and valid.
    pub fn is_solution(&self) -> bool {
        self.is_filled() && self.is_valid()
    }

    /// Return true if this puzzle is a solution and agrees with every glyph
    /// of `puzzle`.
    pub fn is_solution_for(&self, puzzle: &Self) -> bool {
        self.is_solution() && puzzle.is_subset_of(self)
    }

    /// Return true if every glyph of this puzzle is also in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.glyph_state
            .iter()
            .all(|(square, glyph)| other.glyph_state.get(square) == Some(glyph))
    }

    /// Return the first solution found for this puzzle, if any.
    pub fn solve(&self) -> Option<Self> {
        if !self.is_valid() {
            return None;
        }

        let cover = PuzzleCover::new(self);
        cover.solve().map(|placements| cover.assemble(placements))
    }

    /// Call `action` with every solution of this puzzle, until it returns
    /// [`ControlFlow::Break`].
    ///
    /// Returns the value the search was stopped with, if it was stopped.
    pub fn each_solution<B, F>(&self, mut action: F) -> Option<B>
    where
        F: FnMut(Self) -> ControlFlow<B>,
    {
        if !self.is_valid() {
            return None;
        }

        let cover = PuzzleCover::new(self);
        cover.link_matrix().each_exact_cover(|placements| {
            let solution = cover.assemble(placements.iter().map(|placement| **placement));
            action(solution)
        })
    }

    /// Return every solution of this puzzle.
    pub fn solutions(&self) -> Vec<Self> {
        let mut solutions = Vec::new();
        self.each_solution(|solution| -> ControlFlow<()> {
            solutions.push(solution);
            ControlFlow::Continue(())
        });

        solutions
    }
}

/// Puzzles are partially ordered by inclusion of their glyph assignments.
impl<T: PuzzleType> PartialOrd for Puzzle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_subset_of(other), other.is_subset_of(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

/// A glyph placed in a square, the row of a [`PuzzleCover`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement<S, G> {
    /// The square being filled.
    pub square: S,
    /// The glyph placed in it.
    pub glyph: G,
}

/// A condition which must be satisfied in order to solve a puzzle, the column
/// of a [`PuzzleCover`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint<S, G> {
    /// The square must receive exactly one glyph.
    Square(S),
    /// The group must contain the glyph exactly once.
    Group {
        /// Index of the group in the puzzle definition.
        group: usize,
        /// The glyph.
        glyph: G,
    },
}

/// The exact cover problem equivalent to solving a puzzle.
///
/// Squares filled in the initial puzzle, and group constraints they already
/// satisfy, are left out of the problem entirely.
#[derive(Debug)]
pub struct PuzzleCover<T: PuzzleType> {
    /// The puzzle being solved.
    pub initial: Puzzle<T>,
    /// Every placement that does not conflict with the initial glyphs.
    pub possibilities: Vec<Placement<T::Square, T::Glyph>>,
    /// The constraints left to satisfy.
    pub constraints: Vec<Constraint<T::Square, T::Glyph>>,
}

impl<T: PuzzleType> PuzzleCover<T> {
    /// Reduce `puzzle` to an exact cover problem.
    pub fn new(puzzle: &Puzzle<T>) -> Self {
        let definition = T::definition();

        let satisfied: HashSet<(usize, T::Glyph)> = puzzle
            .iter()
            .flat_map(|(square, glyph)| {
                definition
                    .groups_of(&square)
                    .iter()
                    .map(move |&group| (group, glyph))
            })
            .collect();

        let empty_squares: Vec<T::Square> = definition
            .squares()
            .iter()
            .copied()
            .filter(|square| !puzzle.glyph_state.contains_key(square))
            .collect();

        let possibilities = empty_squares
            .iter()
            .flat_map(|&square| {
                definition
                    .glyphs()
                    .iter()
                    .map(move |&glyph| Placement { square, glyph })
            })
            .filter(|placement| {
                definition
                    .groups_of(&placement.square)
                    .iter()
                    .all(|&group| !satisfied.contains(&(group, placement.glyph)))
            })
            .collect();

        let constraints = empty_squares
            .iter()
            .map(|&square| Constraint::Square(square))
            .chain((0..definition.groups().len()).flat_map(|group| {
                definition
                    .glyphs()
                    .iter()
                    .map(move |&glyph| Constraint::Group { group, glyph })
            }))
            .filter(|constraint| match constraint {
                Constraint::Group { group, glyph } => !satisfied.contains(&(*group, *glyph)),
                Constraint::Square(_) => true,
            })
            .collect();

        PuzzleCover {
            initial: puzzle.clone(),
            possibilities,
            constraints,
        }
    }

    /// Combine the initial puzzle with a set of placements.
    pub fn assemble(
        &self,
        placements: impl IntoIterator<Item = Placement<T::Square, T::Glyph>>,
    ) -> Puzzle<T> {
        let mut puzzle = self.initial.clone();
        puzzle.glyph_state.extend(
            placements
                .into_iter()
                .map(|placement| (placement.square, placement.glyph)),
        );

        puzzle
    }
}

impl<T: PuzzleType> ExactCover for PuzzleCover<T> {
    type Constraint = Constraint<T::Square, T::Glyph>;
    type Possibility = Placement<T::Square, T::Glyph>;

    fn constraints(&self) -> &[Self::Constraint] {
        &self.constraints
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        &self.possibilities
    }

    fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<Self::Constraint> {
        std::iter::once(Constraint::Square(poss.square))
            .chain(
                T::definition()
                    .groups_of(&poss.square)
                    .iter()
                    .map(|&group| Constraint::Group {
                        group,
                        glyph: poss.glyph,
                    }),
            )
            .collect()
    }
}
