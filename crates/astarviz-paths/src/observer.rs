use crate::cell::CellId;
use crate::grid::Grid;

/// A single unit of visible progress reported by the search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// All neighbours of this cell have been relaxed.
    Expanded(CellId),
    /// This cell was marked as part of the reconstructed path.
    PathMarked(CellId),
}

/// Receives progress from [`find_path`](crate::find_path) and
/// [`reconstruct_path`](crate::reconstruct_path).
///
/// Called synchronously with a read-only view of the grid. Implementations
/// must not start another search from inside `on_step`.
pub trait StepObserver {
    fn on_step(&mut self, grid: &Grid, step: Step);
}

/// Observer that ignores every step.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    #[inline]
    fn on_step(&mut self, _grid: &Grid, _step: Step) {}
}

impl<F: FnMut(&Grid, Step)> StepObserver for F {
    #[inline]
    fn on_step(&mut self, grid: &Grid, step: Step) {
        self(grid, step)
    }
}
