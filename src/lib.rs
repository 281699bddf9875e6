#![deny(missing_docs)]

//! Implementation of [Dancing Links](https://en.wikipedia.org/wiki/Dancing_Links)
//! and [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) for solving
//!  [exact cover](https://en.wikipedia.org/wiki/Exact_cover) problems.
//!
//! The [`LinkMatrix`] can be built directly from a collection of subsets:
//!
//! ```
//! use dancing_cover::LinkMatrix;
//!
//! let mut matrix = LinkMatrix::from_sets(vec![vec![1, 2], vec![2, 3], vec![3, 4]]);
//! let mut cover = matrix.find_exact_cover().unwrap();
//! cover.sort();
//!
//! assert_eq!(cover, vec![vec![1, 2], vec![3, 4]]);
//! ```
//!
//! Puzzles are reduced to exact cover problems by the [`puzzle`] module, see
//! [`sudoku`] for a complete puzzle type.

pub mod error;
pub mod grid;
pub(crate) mod matrix;
pub(crate) mod node;
pub mod puzzle;
pub(crate) mod solver;
pub mod sudoku;

pub use matrix::{Column, ColumnId, LinkMatrix, NodeRef, Row, Topology};
pub use solver::ExactCovers;

use std::{fmt::Debug, hash::Hash};

/// An instance of an exact cover problem.
pub trait ExactCover {
    /// The type of values that are elements of a solution to the exact cover
    /// problem.
    type Possibility: Debug + Clone + Eq + Hash;

    /// The type of value that are constraints on a given instance of an exact
    /// cover problem.
    type Constraint: Debug + Clone + Eq + Hash;

    /// Return the list of constraints that must be satisfied for this
    /// instance of the problem.
    fn constraints(&self) -> &[Self::Constraint];

    /// Return a list of possibilities for this instance of the problem.
    fn possibilities(&self) -> &[Self::Possibility];

    /// Return every constraint satisfied by the given `Possibility`.
    ///
    /// A constraint missing from [`constraints`](Self::constraints) is still
    /// added to the matrix, and therefore still has to be satisfied.
    fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<Self::Constraint>;

    /// Build the link matrix for this problem, with one column per constraint
    /// and one row per possibility.
    fn link_matrix(&self) -> LinkMatrix<Self::Constraint, Self::Possibility> {
        LinkMatrix::build(
            self.constraints().iter().cloned(),
            self.possibilities()
                .iter()
                .map(|poss| (poss.clone(), self.satisfied_constraints(poss))),
        )
    }

    /// Return the first solution found, if any.
    fn solve(&self) -> Option<Vec<Self::Possibility>> {
        self.link_matrix().find_exact_cover()
    }
}

impl<E> ExactCover for &E
where
    E: ExactCover,
{
    type Constraint = E::Constraint;
    type Possibility = E::Possibility;

    fn constraints(&self) -> &[Self::Constraint] {
        <E as ExactCover>::constraints(self)
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        <E as ExactCover>::possibilities(self)
    }

    fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<Self::Constraint> {
        <E as ExactCover>::satisfied_constraints(self, poss)
    }
}
