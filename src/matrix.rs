//! The toroidal sparse matrix at the heart of the solver.

use crate::{
    error::InvariantViolation,
    node::{Arena, Direction, Links, ROOT},
};
use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{self, Debug, Display},
    hash::Hash,
    ptr,
};

/// Handle to a column of a [`LinkMatrix`], used to [`cover`] and
/// [`uncover`] it.
///
/// A handle is only meaningful for the matrix that produced it.
///
/// [`cover`]: LinkMatrix::cover
/// [`uncover`]: LinkMatrix::uncover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(usize);

#[derive(Debug, Clone)]
struct Header<I> {
    id: I,
    size: usize,
    covered: bool,
}

#[derive(Debug, Clone)]
struct RowEntry<K> {
    key: K,
    first: Option<usize>,
}

/// A sparse 0/1 matrix stored as circular doubly linked lists, supporting
/// reversible removal of columns and the rows that intersect them.
///
/// Columns are identified by values of type `I` (the elements of the
/// universe), rows by keys of type `K`.
#[derive(Debug, Clone)]
pub struct LinkMatrix<I, K> {
    arena: Arena,
    // Indexed by header node index - 1.
    headers: Vec<Header<I>>,
    column_index: HashMap<I, usize>,
    rows: Vec<RowEntry<K>>,
    row_index: HashMap<K, usize>,
}

impl<I, K> Default for LinkMatrix<I, K> {
    fn default() -> Self {
        LinkMatrix {
            arena: Arena::new(),
            headers: Vec::new(),
            column_index: HashMap::new(),
            rows: Vec::new(),
            row_index: HashMap::new(),
        }
    }
}

impl<I, K> LinkMatrix<I, K> {
    /// Create an empty matrix, with no columns and no rows.
    ///
    /// Its only exact cover is the empty selection of rows.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I, K> LinkMatrix<I, K>
where
    I: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
{
    /// Build a matrix from keyed rows, creating a column for every element of
    /// `universe` even if no row contains it.
    ///
    /// Columns are ordered as in `universe`, followed by any element that only
    /// appears in `rows`, in first-seen order. Repeated elements within a
    /// single row produce a single node.
    pub fn build<S>(
        universe: impl IntoIterator<Item = I>,
        rows: impl IntoIterator<Item = (K, S)>,
    ) -> Self
    where
        S: IntoIterator<Item = I>,
    {
        let mut matrix = Self::new();
        let rows: Vec<(K, Vec<I>)> = rows
            .into_iter()
            .map(|(key, subset)| (key, subset.into_iter().collect()))
            .collect();

        // Headers have to occupy arena slots 1..=columns, so every column is
        // allocated before the first row node.
        for id in universe {
            matrix.header_for(id);
        }
        for (_, subset) in &rows {
            for id in subset {
                if !matrix.column_index.contains_key(id) {
                    matrix.header_for(id.clone());
                }
            }
        }

        for (key, subset) in rows {
            matrix.push_row(key, subset);
        }

        log::debug!(
            "Built link matrix with [{}] columns, [{}] rows and [{}] nodes.",
            matrix.headers.len(),
            matrix.rows.len(),
            matrix.arena.len() - matrix.headers.len() - 1
        );

        matrix
    }

    /// Build a matrix from rows given as `(key, subset)` pairs.
    pub fn from_keyed_sets<S>(rows: impl IntoIterator<Item = (K, S)>) -> Self
    where
        S: IntoIterator<Item = I>,
    {
        Self::build(None, rows)
    }

    fn header_for(&mut self, id: I) -> usize {
        if let Some(&header) = self.column_index.get(&id) {
            return header;
        }

        let header = self.arena.push_header();
        debug_assert_eq!(header, self.headers.len() + 1);
        self.headers.push(Header {
            id: id.clone(),
            size: 0,
            covered: false,
        });
        self.column_index.insert(id, header);

        header
    }

    fn push_row(&mut self, key: K, subset: Vec<I>) {
        let row = self.rows.len();
        let mut columns: Vec<usize> = Vec::new();
        let mut first: Option<usize> = None;

        for id in &subset {
            let column = self.column_index[id];
            if columns.contains(&column) {
                continue;
            }
            columns.push(column);

            let node = self.arena.push_node(column, row);
            self.headers[column - 1].size += 1;

            match first {
                Some(first) => {
                    let last = self.arena.links(first).left;
                    self.arena.add_right(last, node);
                    self.arena.add_left(first, node);
                }
                None => first = Some(node),
            }
        }

        self.row_index.entry(key.clone()).or_insert(row);
        self.rows.push(RowEntry { key, first });
    }

    /// Look up the column for a universe element.
    pub fn column<Q>(&self, id: &Q) -> Option<Column<'_, I, K>>
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.column_index.get(id).map(|&header| Column {
            matrix: self,
            header,
        })
    }

    /// Look up the handle for a universe element, for use with
    /// [`cover`](Self::cover) and [`uncover`](Self::uncover).
    pub fn column_id<Q>(&self, id: &Q) -> Option<ColumnId>
    where
        I: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.column_index.get(id).copied().map(ColumnId)
    }

    /// Look up a row by its key.
    ///
    /// For matrices built with [`from_sets`](LinkMatrix::from_sets) the key
    /// is the subset itself. If several rows share a key, the first one is
    /// returned.
    pub fn row<Q>(&self, key: &Q) -> Option<Row<'_, I, K>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.row_index
            .get(key)
            .map(|&row| Row { matrix: self, row })
    }
}

impl<I, S> LinkMatrix<I, S>
where
    I: Eq + Hash + Clone,
    S: IntoIterator<Item = I> + Eq + Hash + Clone,
{
    /// Build a matrix where each row is keyed by the subset that defines it.
    pub fn from_sets(sets: impl IntoIterator<Item = S>) -> Self {
        Self::build(None, sets.into_iter().map(|set| (set.clone(), set)))
    }

    /// Like [`from_sets`](Self::from_sets), with an explicit, ordered
    /// universe of column ids.
    pub fn from_sets_with_universe(
        sets: impl IntoIterator<Item = S>,
        universe: impl IntoIterator<Item = I>,
    ) -> Self {
        Self::build(universe, sets.into_iter().map(|set| (set.clone(), set)))
    }
}

impl<I, K> LinkMatrix<I, K> {
    /// Return the number of columns that are not covered.
    pub fn len(&self) -> usize {
        self.arena.walk(ROOT, Direction::Right).count()
    }

    /// Return true if every column is covered (or there are no columns).
    pub fn is_empty(&self) -> bool {
        self.arena.links(ROOT).right == ROOT
    }

    /// Return the uncovered columns, in the order of the header ring.
    pub fn columns(&self) -> impl Iterator<Item = Column<'_, I, K>> + '_ {
        self.arena
            .walk(ROOT, Direction::Right)
            .map(move |header| Column {
                matrix: self,
                header,
            })
    }

    /// Return the number of rows the matrix was built with.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cover a column: remove it from the header ring, and remove every row
    /// intersecting it from all the other columns.
    ///
    /// # Panics
    ///
    /// Panics if the column is already covered, or if `column` does not
    /// belong to this matrix.
    pub fn cover(&mut self, column: ColumnId) {
        assert!(
            !self.header(column.0).covered,
            "Attempted to cover a column that is already covered."
        );
        self.cover_header(column.0);
    }

    /// Uncover a column, exactly reverting the matching [`cover`].
    ///
    /// Covers have to be undone in the reverse order they were made in.
    ///
    /// # Panics
    ///
    /// Panics if the column is not covered, or if `column` does not belong to
    /// this matrix.
    ///
    /// [`cover`]: Self::cover
    pub fn uncover(&mut self, column: ColumnId) {
        assert!(
            self.header(column.0).covered,
            "Attempted to uncover a column that is not covered."
        );
        self.uncover_header(column.0);
    }

    fn header(&self, header: usize) -> &Header<I> {
        assert!(header != ROOT, "The root is not a column.");
        &self.headers[header - 1]
    }

    pub(crate) fn cover_header(&mut self, header: usize) {
        self.arena.unlink_horizontal(header);

        let mut row = self.arena.links(header).down;
        while row != header {
            let mut node = self.arena.links(row).right;
            while node != row {
                self.arena.unlink_vertical(node);
                let column = self.arena.node(node).column;
                self.headers[column - 1].size -= 1;

                node = self.arena.links(node).right;
            }
            row = self.arena.links(row).down;
        }

        self.headers[header - 1].covered = true;
    }

    pub(crate) fn uncover_header(&mut self, header: usize) {
        let mut row = self.arena.links(header).up;
        while row != header {
            let mut node = self.arena.links(row).left;
            while node != row {
                let column = self.arena.node(node).column;
                self.headers[column - 1].size += 1;
                self.arena.relink_vertical(node);

                node = self.arena.links(node).left;
            }
            row = self.arena.links(row).up;
        }

        self.arena.relink_horizontal(header);
        self.headers[header - 1].covered = false;
    }

    /// Cover the columns of every other node in the row of `node`, walking
    /// right.
    pub(crate) fn select_row(&mut self, node: usize) {
        let mut current = self.arena.links(node).right;
        while current != node {
            self.cover_header(self.arena.node(current).column);
            current = self.arena.links(current).right;
        }
    }

    /// Undo [`select_row`](Self::select_row), walking left.
    pub(crate) fn unselect_row(&mut self, node: usize) {
        let mut current = self.arena.links(node).left;
        while current != node {
            self.uncover_header(self.arena.node(current).column);
            current = self.arena.links(current).left;
        }
    }

    /// Choose the uncovered column with the fewest live nodes, preferring the
    /// first one in ring order on ties.
    ///
    /// Returns the header and its size, or `None` if every column is covered.
    pub(crate) fn choose_column(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;

        for header in self.arena.walk(ROOT, Direction::Right) {
            let size = self.headers[header - 1].size;
            if best.map_or(true, |(_, min_size)| size < min_size) {
                best = Some((header, size));
                if size == 0 {
                    break;
                }
            }
        }

        best
    }

    pub(crate) fn down(&self, node: usize) -> usize {
        self.arena.links(node).down
    }

    pub(crate) fn row_index_of(&self, node: usize) -> usize {
        self.arena
            .node(node)
            .row
            .expect("only row nodes can be part of a solution")
    }

    pub(crate) fn row_key(&self, node: usize) -> &K {
        &self.rows[self.row_index_of(node)].key
    }

    /// Take a snapshot of every link and column size in the matrix.
    ///
    /// Two snapshots of the same matrix compare equal exactly when the link
    /// structure is identical, which makes this useful for checking that a
    /// sequence of operations left the matrix as it found it.
    pub fn topology(&self) -> Topology {
        Topology {
            links: self.arena.nodes().iter().map(|node| node.links).collect(),
            sizes: self.headers.iter().map(|header| header.size).collect(),
            covered: self.headers.iter().map(|header| header.covered).collect(),
        }
    }

    /// Check the structural invariants of the uncovered part of the matrix.
    ///
    /// Every link reachable from the root has to be reciprocated, every
    /// node on a column's cycle has to belong to that column, and every
    /// column's size has to match the length of its cycle.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let limit = self.arena.len();

        self.verify_cycle(ROOT, Direction::Right, limit)?;

        for header in self.arena.walk(ROOT, Direction::Right) {
            let recorded = self.headers[header - 1].size;
            let actual = self.verify_cycle(header, Direction::Down, limit)?;
            if recorded != actual {
                return Err(InvariantViolation::SizeMismatch {
                    column: header,
                    recorded,
                    actual,
                });
            }

            for node in self.arena.walk(header, Direction::Down) {
                let found = self.arena.node(node).column;
                if found != header {
                    return Err(InvariantViolation::WrongColumn {
                        node,
                        expected: header,
                        found,
                    });
                }
                self.verify_cycle(node, Direction::Right, limit)?;
            }
        }

        Ok(())
    }

    /// Walk the cycle through `origin`, checking that each step is
    /// reciprocated. Returns the number of nodes on the cycle, not counting
    /// `origin`.
    fn verify_cycle(
        &self,
        origin: usize,
        direction: Direction,
        limit: usize,
    ) -> Result<usize, InvariantViolation> {
        let mut count = 0;
        let mut current = origin;

        loop {
            let links = self.arena.links(current);
            let (next, back) = match direction {
                Direction::Right => (links.right, self.arena.links(links.right).left),
                Direction::Left => (links.left, self.arena.links(links.left).right),
                Direction::Down => (links.down, self.arena.links(links.down).up),
                Direction::Up => (links.up, self.arena.links(links.up).down),
            };

            if back != current {
                return Err(InvariantViolation::BrokenLink {
                    node: current,
                    direction: direction.name(),
                });
            }
            if next == origin {
                return Ok(count);
            }

            count += 1;
            if count > limit {
                return Err(InvariantViolation::UnterminatedCycle { origin });
            }
            current = next;
        }
    }

    /// Like [`verify`](Self::verify), but also require that no column is
    /// covered, as is the case after every cover has been undone.
    ///
    /// A covered column is unlinked from the root, so `verify` alone cannot
    /// see one that was never uncovered.
    pub fn verify_restored(&self) -> Result<(), InvariantViolation> {
        self.verify()?;

        match self.headers.iter().position(|header| header.covered) {
            Some(position) => Err(InvariantViolation::StillCovered {
                column: position + 1,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn assert_consistent(&self) {
        if let Err(violation) = self.verify_restored() {
            panic!("Link matrix corrupted by search: {violation}");
        }
    }
}

impl<I, K> Display for LinkMatrix<I, K>
where
    I: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for column in self.columns() {
            let nodes: Vec<usize> = column.nodes().map(|node| node.index).collect();
            writeln!(
                f,
                "{:<3} {:>12} ({}): {:?}",
                column.header,
                format!("{:?}", column.id()),
                column.size(),
                nodes
            )?;
        }

        Ok(())
    }
}

/// Snapshot of the link structure of a [`LinkMatrix`], see
/// [`LinkMatrix::topology`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    links: Vec<Links>,
    sizes: Vec<usize>,
    covered: Vec<bool>,
}

/// A view of one column of a [`LinkMatrix`].
#[derive(Debug)]
pub struct Column<'m, I, K> {
    matrix: &'m LinkMatrix<I, K>,
    header: usize,
}

impl<I, K> Clone for Column<'_, I, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, K> Copy for Column<'_, I, K> {}

impl<'m, I, K> Column<'m, I, K> {
    /// The universe element this column represents.
    pub fn id(&self) -> &'m I {
        &self.matrix.header(self.header).id
    }

    /// The number of live nodes in this column.
    pub fn size(&self) -> usize {
        self.matrix.header(self.header).size
    }

    /// Return true if this column is currently covered.
    pub fn is_covered(&self) -> bool {
        self.matrix.header(self.header).covered
    }

    /// The handle used to cover or uncover this column.
    pub fn handle(&self) -> ColumnId {
        ColumnId(self.header)
    }

    /// The header of this column, as a node.
    pub fn as_node(&self) -> NodeRef<'m, I, K> {
        NodeRef {
            matrix: self.matrix,
            index: self.header,
        }
    }

    /// The live nodes of this column, top to bottom.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'m, I, K>> + 'm {
        let matrix = self.matrix;
        matrix
            .arena
            .walk(self.header, Direction::Down)
            .map(move |index| NodeRef { matrix, index })
    }

    /// The last node of this column, or the header itself if it is empty.
    pub fn up(&self) -> NodeRef<'m, I, K> {
        self.as_node().up()
    }

    /// The first node of this column, or the header itself if it is empty.
    pub fn down(&self) -> NodeRef<'m, I, K> {
        self.as_node().down()
    }

    /// The previous header in the ring (possibly the root).
    pub fn left(&self) -> NodeRef<'m, I, K> {
        self.as_node().left()
    }

    /// The next header in the ring (possibly the root).
    pub fn right(&self) -> NodeRef<'m, I, K> {
        self.as_node().right()
    }
}

/// A view of a single node of a [`LinkMatrix`]: the root, a column header,
/// or a row node.
#[derive(Debug)]
pub struct NodeRef<'m, I, K> {
    matrix: &'m LinkMatrix<I, K>,
    index: usize,
}

impl<I, K> Clone for NodeRef<'_, I, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, K> Copy for NodeRef<'_, I, K> {}

macro_rules! neighbour {
    ($name:ident, $field:ident) => {
        #[doc = concat!("Follow the `", stringify!($field), "` link of this node.")]
        pub fn $name(&self) -> NodeRef<'m, I, K> {
            NodeRef {
                matrix: self.matrix,
                index: self.matrix.arena.links(self.index).$field,
            }
        }
    };
}

impl<'m, I, K> NodeRef<'m, I, K> {
    neighbour!(up, up);

    neighbour!(down, down);

    neighbour!(left, left);

    neighbour!(right, right);

    /// The column this node belongs to, `None` for the root.
    pub fn column(&self) -> Option<Column<'m, I, K>> {
        let header = self.matrix.arena.node(self.index).column;
        if header == ROOT {
            None
        } else {
            Some(Column {
                matrix: self.matrix,
                header,
            })
        }
    }

    /// The key of the row this node belongs to, `None` for headers and the
    /// root.
    pub fn row_key(&self) -> Option<&'m K> {
        self.matrix
            .arena
            .node(self.index)
            .row
            .map(|row| &self.matrix.rows[row].key)
    }

    /// Return true if this node is a column header or the root.
    pub fn is_header(&self) -> bool {
        self.matrix.arena.node(self.index).row.is_none()
    }
}

impl<I, K> PartialEq for NodeRef<'_, I, K> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.matrix, other.matrix) && self.index == other.index
    }
}

impl<I, K> Eq for NodeRef<'_, I, K> {}

impl<I, K> PartialEq for Column<'_, I, K> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.matrix, other.matrix) && self.header == other.header
    }
}

impl<I, K> Eq for Column<'_, I, K> {}

impl<'m, I, K> PartialEq<Column<'m, I, K>> for NodeRef<'m, I, K> {
    fn eq(&self, other: &Column<'m, I, K>) -> bool {
        *self == other.as_node()
    }
}

impl<'m, I, K> PartialEq<NodeRef<'m, I, K>> for Column<'m, I, K> {
    fn eq(&self, other: &NodeRef<'m, I, K>) -> bool {
        self.as_node() == *other
    }
}

/// A view of one row of a [`LinkMatrix`].
#[derive(Debug)]
pub struct Row<'m, I, K> {
    matrix: &'m LinkMatrix<I, K>,
    row: usize,
}

impl<I, K> Clone for Row<'_, I, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, K> Copy for Row<'_, I, K> {}

impl<'m, I, K> Row<'m, I, K> {
    /// The key identifying this row.
    pub fn key(&self) -> &'m K {
        &self.matrix.rows[self.row].key
    }

    /// Every node of this row, left to right.
    ///
    /// Covering never unlinks a row horizontally, so this always yields the
    /// complete row.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'m, I, K>> + 'm {
        let matrix = self.matrix;
        let first = matrix.rows[self.row].first;

        first
            .into_iter()
            .flat_map(move |first| {
                std::iter::once(first).chain(matrix.arena.walk(first, Direction::Right))
            })
            .map(move |index| NodeRef { matrix, index })
    }

    /// The ids of the columns this row has a node in, left to right.
    pub fn columns(&self) -> impl Iterator<Item = &'m I> + 'm {
        self.nodes()
            .filter_map(|node| node.column())
            .map(|column| column.id())
    }

    /// The number of nodes in this row.
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    /// Return true if this row has no nodes.
    pub fn is_empty(&self) -> bool {
        self.matrix.rows[self.row].first.is_none()
    }
}
