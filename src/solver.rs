use crate::LinkMatrix;
use std::{
    iter::FusedIterator,
    ops::ControlFlow,
    panic::{self, AssertUnwindSafe},
};

/// Iterator over the exact covers of a [`LinkMatrix`], in depth-first order.
///
/// The search keeps its own stack instead of recursing, and suspends between
/// solutions. Dropping the iterator before it is exhausted unwinds that stack,
/// so the matrix is always left exactly as it was found.
#[derive(Debug)]
pub struct ExactCovers<'m, I, K> {
    matrix: &'m mut LinkMatrix<I, K>,
    stack: Vec<Frame>,
    progress: Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Fresh,
    Running,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    // Before selecting the next row of the column
    Cover,
    // After checking the selected row, before unselecting it
    Uncover,
}

#[derive(Debug)]
struct Frame {
    column: usize,
    // The row node currently selected, or the header before the first row
    node: usize,
    state: FrameState,
}

impl Frame {
    fn new(column: usize) -> Self {
        Frame {
            column,
            node: column,
            state: FrameState::Cover,
        }
    }
}

impl<'m, I, K> ExactCovers<'m, I, K> {
    pub(crate) fn new(matrix: &'m mut LinkMatrix<I, K>) -> Self {
        ExactCovers {
            matrix,
            stack: Vec::new(),
            progress: Progress::Fresh,
        }
    }

    /// Run the search up to the next solution.
    ///
    /// Returns true if the rows currently selected on the stack form an exact
    /// cover, false once the search is exhausted.
    fn advance(&mut self) -> bool {
        match self.progress {
            Progress::Done => return false,
            Progress::Fresh => {
                self.progress = Progress::Running;

                match self.matrix.choose_column() {
                    // Nothing to cover, the empty selection is the only solution
                    None => {
                        self.finish();
                        return true;
                    }
                    Some((_, 0)) => {}
                    Some((column, _)) => {
                        self.matrix.cover_header(column);
                        self.stack.push(Frame::new(column));
                    }
                }
            }
            Progress::Running => {}
        }

        while let Some(frame) = self.stack.last_mut() {
            match frame.state {
                // Select the next row of this frame's column, covering every
                // column it touches, then descend.
                FrameState::Cover => {
                    frame.node = self.matrix.down(frame.node);
                    if frame.node == frame.column {
                        self.matrix.uncover_header(frame.column);
                        self.stack.pop();
                        continue;
                    }

                    let node = frame.node;
                    frame.state = FrameState::Uncover;
                    self.matrix.select_row(node);
                    log::trace!(
                        "Selected row [{}] at depth [{}].",
                        self.matrix.row_index_of(node),
                        self.stack.len()
                    );

                    match self.matrix.choose_column() {
                        None => return true,
                        // Dead end, a column that no remaining row can cover
                        Some((_, 0)) => {}
                        Some((column, _)) => {
                            self.matrix.cover_header(column);
                            self.stack.push(Frame::new(column));
                        }
                    }
                }
                // Undo the selected row so the next one can be tried.
                FrameState::Uncover => {
                    self.matrix.unselect_row(frame.node);
                    frame.state = FrameState::Cover;
                }
            }
        }

        self.finish();
        false
    }

    /// The keys of the rows selected on the stack, outermost first.
    fn selection(&self) -> Vec<&K> {
        self.stack
            .iter()
            .map(|frame| self.matrix.row_key(frame.node))
            .collect()
    }

    fn unwind(&mut self) {
        while let Some(frame) = self.stack.pop() {
            if frame.state == FrameState::Uncover {
                self.matrix.unselect_row(frame.node);
            }
            self.matrix.uncover_header(frame.column);
        }
    }

    fn finish(&mut self) {
        self.progress = Progress::Done;

        if cfg!(debug_assertions) && !std::thread::panicking() {
            self.matrix.assert_consistent();
        }
    }
}

impl<I, K> ExactCovers<'_, I, K>
where
    K: Clone,
{
    /// Compute up to the next solution, returning `None` if there are no more.
    pub fn next_solution(&mut self) -> Option<Vec<K>> {
        if self.advance() {
            Some(self.selection().into_iter().cloned().collect())
        } else {
            None
        }
    }
}

impl<I, K> Iterator for ExactCovers<'_, I, K>
where
    K: Clone,
{
    type Item = Vec<K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution()
    }
}

impl<I, K> FusedIterator for ExactCovers<'_, I, K> where K: Clone {}

impl<I, K> Drop for ExactCovers<'_, I, K> {
    fn drop(&mut self) {
        if self.progress == Progress::Running {
            self.unwind();
            self.finish();
        }
    }
}

impl<I, K> LinkMatrix<I, K> {
    /// Return an iterator over every exact cover of the matrix.
    ///
    /// Each solution lists the keys of the selected rows in the order they
    /// were selected. Every call starts a new search.
    pub fn exact_covers(&mut self) -> ExactCovers<'_, I, K> {
        ExactCovers::new(self)
    }

    /// Return the first exact cover found, or `None` if there is none.
    pub fn find_exact_cover(&mut self) -> Option<Vec<K>>
    where
        K: Clone,
    {
        self.exact_covers().next()
    }

    /// Call `action` with every exact cover, until it returns
    /// [`ControlFlow::Break`].
    ///
    /// Returns the value the search was stopped with, or `None` if every
    /// solution was visited. The matrix is restored in both cases.
    pub fn each_exact_cover<B, F>(&mut self, mut action: F) -> Option<B>
    where
        F: FnMut(&[&K]) -> ControlFlow<B>,
    {
        let mut search = ExactCovers::new(self);
        let mut found = 0usize;

        while search.advance() {
            found += 1;
            let selection = search.selection();
            log::debug!("Found exact cover [{}] of [{}] rows.", found, selection.len());

            if let ControlFlow::Break(value) = action(&selection) {
                return Some(value);
            }
        }

        log::debug!("Search finished after [{}] exact covers.", found);
        None
    }

    /// Same as [`each_exact_cover`](Self::each_exact_cover), with the search
    /// written as direct recursion. Solutions are visited in the same order.
    ///
    /// If `action` panics, the matrix is restored before the panic carries on.
    pub fn each_exact_cover_recursive<B, F>(&mut self, mut action: F) -> Option<B>
    where
        F: FnMut(&[&K]) -> ControlFlow<B>,
    {
        let mut trail = Trail::default();
        let flow = panic::catch_unwind(AssertUnwindSafe(|| {
            self.search_recursive(&mut trail, &mut action)
        }));

        let flow = match flow {
            Ok(flow) => flow,
            Err(payload) => {
                // The trail still holds every frame that was live when the
                // callback panicked.
                self.unwind_trail(&mut trail);
                panic::resume_unwind(payload);
            }
        };

        if cfg!(debug_assertions) {
            self.assert_consistent();
        }

        match flow {
            ControlFlow::Break(value) => Some(value),
            ControlFlow::Continue(()) => None,
        }
    }

    fn search_recursive<B, F>(&mut self, trail: &mut Trail, action: &mut F) -> ControlFlow<B>
    where
        F: FnMut(&[&K]) -> ControlFlow<B>,
    {
        let column = match self.choose_column() {
            None => {
                let keys: Vec<&K> = trail.rows.iter().map(|&node| self.row_key(node)).collect();
                log::debug!("Found exact cover of [{}] rows.", keys.len());
                return action(&keys);
            }
            Some((_, 0)) => return ControlFlow::Continue(()),
            Some((column, _)) => column,
        };

        self.cover_header(column);
        trail.columns.push(column);

        let mut flow = ControlFlow::Continue(());
        let mut node = self.down(column);
        while node != column {
            self.select_row(node);
            trail.rows.push(node);

            flow = self.search_recursive(trail, action);

            trail.rows.pop();
            self.unselect_row(node);

            if flow.is_break() {
                break;
            }
            node = self.down(node);
        }

        trail.columns.pop();
        self.uncover_header(column);
        flow
    }

    fn unwind_trail(&mut self, trail: &mut Trail) {
        log::debug!(
            "Unwinding [{}] covered columns after a panic.",
            trail.columns.len()
        );

        while let Some(column) = trail.columns.pop() {
            if trail.rows.len() > trail.columns.len() {
                if let Some(node) = trail.rows.pop() {
                    self.unselect_row(node);
                }
            }
            self.uncover_header(column);
        }
    }
}

/// Columns covered and rows selected by the recursive search, innermost last.
///
/// A column is pushed before any of its rows, so `rows` is either as long as
/// `columns` or one shorter.
#[derive(Debug, Default)]
struct Trail {
    columns: Vec<usize>,
    rows: Vec<usize>,
}
