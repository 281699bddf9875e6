//! Arena storage for the toroidal link structure.
//!
//! Every node of a [`LinkMatrix`](crate::LinkMatrix) (the root, the column
//! headers and the row nodes) lives in a single `Vec` and refers to its
//! neighbours by index. Unlinking a node from a cycle leaves its own links
//! untouched, which is what allows it to be spliced back in later.

/// Index of the root node, the head of the ring of column headers.
pub(crate) const ROOT: usize = 0;

/// The four neighbours of a node, as indices into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Links {
    /// Previous node in the row (or previous header in the root ring).
    pub left: usize,
    /// Next node in the row (or next header in the root ring).
    pub right: usize,
    /// Previous node in the column.
    pub up: usize,
    /// Next node in the column.
    pub down: usize,
}

impl Links {
    fn to_self(index: usize) -> Self {
        Links {
            left: index,
            right: index,
            up: index,
            down: index,
        }
    }
}

/// A direction to walk along a cycle of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    fn step(self, links: &Links) -> usize {
        match self {
            Direction::Up => links.up,
            Direction::Down => links.down,
            Direction::Left => links.left,
            Direction::Right => links.right,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub links: Links,
    /// Header of the column this node belongs to. Headers point to
    /// themselves, the root points to `ROOT`.
    pub column: usize,
    /// Index of the row this node belongs to, `None` for headers and the root.
    pub row: Option<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! attach {
    ($name:ident, $direction:ident, $opposite:ident) => {
        /// Make `node` the neighbour of `anchor` in this direction, and
        /// `anchor` the neighbour of `node` in the opposite one.
        pub fn $name(&mut self, anchor: usize, node: usize) {
            self.nodes[anchor].links.$direction = node;
            self.nodes[node].links.$opposite = anchor;
        }
    };
}

impl Arena {
    /// Create an arena holding only the root node.
    pub fn new() -> Self {
        Arena {
            nodes: vec![Node {
                links: Links::to_self(ROOT),
                column: ROOT,
                row: None,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn links(&self, index: usize) -> &Links {
        &self.nodes[index].links
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Allocate a column header and append it at the tail of the root ring.
    pub fn push_header(&mut self) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            links: Links::to_self(index),
            column: index,
            row: None,
        });

        let tail = self.nodes[ROOT].links.left;
        self.add_right(tail, index);
        self.add_left(ROOT, index);

        index
    }

    /// Allocate a row node and append it at the bottom of `column`.
    ///
    /// The node's horizontal links point to itself until it is attached to
    /// the rest of its row.
    pub fn push_node(&mut self, column: usize, row: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            links: Links::to_self(index),
            column,
            row: Some(row),
        });

        let bottom = self.nodes[column].links.up;
        self.add_below(bottom, index);
        self.add_above(column, index);

        index
    }

    attach!(add_below, down, up);

    attach!(add_above, up, down);

    attach!(add_right, right, left);

    attach!(add_left, left, right);

    // NOTE: both neighbours are read before either is written, so the
    // operations stay correct when `left == right` (or `up == down`).
    pub fn unlink_horizontal(&mut self, index: usize) {
        let Links { left, right, .. } = self.nodes[index].links;

        self.nodes[left].links.right = right;
        self.nodes[right].links.left = left;
    }

    pub fn unlink_vertical(&mut self, index: usize) {
        let Links { up, down, .. } = self.nodes[index].links;

        self.nodes[up].links.down = down;
        self.nodes[down].links.up = up;
    }

    pub fn relink_horizontal(&mut self, index: usize) {
        let Links { left, right, .. } = self.nodes[index].links;

        self.nodes[left].links.right = index;
        self.nodes[right].links.left = index;
    }

    pub fn relink_vertical(&mut self, index: usize) {
        let Links { up, down, .. } = self.nodes[index].links;

        self.nodes[up].links.down = index;
        self.nodes[down].links.up = index;
    }

    /// Walk the cycle through `origin` in the given direction, yielding every
    /// node except `origin` itself.
    pub fn walk(&self, origin: usize, direction: Direction) -> Walk<'_> {
        Walk {
            nodes: &self.nodes,
            origin,
            current: origin,
            direction,
        }
    }
}

/// Iterator over a cycle of nodes, see [`Arena::walk`].
#[derive(Debug, Clone)]
pub(crate) struct Walk<'a> {
    nodes: &'a [Node],
    origin: usize,
    current: usize,
    direction: Direction,
}

impl Iterator for Walk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.direction.step(&self.nodes[self.current].links);

        if next == self.origin {
            None
        } else {
            self.current = next;
            Some(next)
        }
    }
}
