use std::collections::BinaryHeap;

use log::{debug, info, warn};

use crate::cell::CellId;
use crate::distance::heuristic;
use crate::grid::Grid;
use crate::observer::{Step, StepObserver};

/// Precondition failures of [`find_path`]. None of them mutate the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no start cell has been placed")]
    MissingStart,
    #[error("no end cell has been placed")]
    MissingEnd,
    #[error("start and end are the same cell {0}")]
    SameEndpoints(CellId),
    #[error("cell {0} does not belong to this grid")]
    ForeignCell(CellId),
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Frontier entry, ordered for `BinaryHeap` so that the lowest `f` pops
/// first and equal `f` pops in insertion order.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
struct NodeRef {
    f: u32,
    seq: u64,
    id: CellId,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Open set with lazy deletion: a cell may be queued several times with
/// different scores, and stale entries are dropped by the caller on pop.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<NodeRef>,
    seq: u64,
}

impl Frontier {
    fn push(&mut self, id: CellId, f: u32) {
        self.heap.push(NodeRef {
            f,
            seq: self.seq,
            id,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<CellId> {
        self.heap.pop().map(|n| n.id)
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Run A* from `start` to `end` over `grid`.
///
/// Neighbour lists must be current (see [`Grid::recompute_neighbours`]) and
/// search state should have been cleared with [`Grid::reset_search`]; use
/// [`Grid::search`] to do all of that in one call.
///
/// Returns `Ok(true)` when `end` was reached: its parent chain then leads
/// back to `start` along a minimum-edge path, and every cell strictly between
/// them is marked `on_path`. Returns `Ok(false)` when the frontier runs dry;
/// every cell reachable from `start` (other than `start` itself) is then
/// `visited`.
///
/// `observer` is called once after each expanded cell and once per path
/// cell during reconstruction.
pub fn find_path<O: StepObserver + ?Sized>(
    grid: &mut Grid,
    start: Option<CellId>,
    end: Option<CellId>,
    observer: &mut O,
) -> Result<bool, SearchError> {
    let start = start.ok_or(SearchError::MissingStart)?;
    let end = end.ok_or(SearchError::MissingEnd)?;
    for id in [start, end] {
        if grid.get(id).is_none() {
            return Err(SearchError::ForeignCell(id));
        }
    }
    if start == end {
        return Err(SearchError::SameEndpoints(start));
    }

    debug!(
        "searching {}x{} grid from ({}, {}) to ({}, {})",
        grid.size(),
        grid.size(),
        grid[start].row(),
        grid[start].col(),
        grid[end].row(),
        grid[end].col(),
    );

    let h = heuristic(&grid[start], &grid[end]);
    grid.cell_mut(start).set_scores(0, h);

    let mut open = Frontier::default();
    open.push(start, grid[start].f_score());

    let mut expanded = 0usize;
    let mut nbuf: Vec<CellId> = Vec::with_capacity(4);

    while let Some(current) = open.pop() {
        // Stale entry for a cell that was already settled.
        if grid[current].visited() {
            continue;
        }

        if current == end {
            let marked = reconstruct_path(grid, end, start, observer);
            info!(
                "path found: {} steps, {} cells expanded",
                marked + 1,
                expanded
            );
            return Ok(true);
        }

        let tentative_g = grid[current].g_score().saturating_add(1);
        nbuf.clear();
        nbuf.extend_from_slice(grid[current].neighbours());

        for &n in &nbuf {
            let cell = &grid[n];
            if cell.visited() || tentative_g >= cell.g_score() {
                continue;
            }
            let h = heuristic(cell, &grid[end]);

            let cell = grid.cell_mut(n);
            cell.parent = Some(current);
            cell.set_scores(tentative_g, h);
            cell.in_open_set = true;
            open.push(n, cell.f_score());
        }

        observer.on_step(grid, Step::Expanded(current));
        if current != start {
            grid.cell_mut(current).visited = true;
        }
        expanded += 1;
    }

    info!("no path: frontier exhausted after {expanded} expansions");
    Ok(false)
}

/// Mark the cells between `start` and `end` as the path.
///
/// Walks parent links from `end.parent` until it reaches `start` (by
/// handle), setting `on_path` on every cell in between and reporting each
/// one to `observer` in order from `end` toward `start`. Neither endpoint is
/// marked. Returns the number of cells marked.
pub fn reconstruct_path<O: StepObserver + ?Sized>(
    grid: &mut Grid,
    end: CellId,
    start: CellId,
    observer: &mut O,
) -> usize {
    let limit = grid.len();
    let mut marked = 0;
    let mut curr = grid.get(end).and_then(|c| c.parent());

    while let Some(id) = curr {
        if id == start {
            break;
        }
        if marked >= limit {
            warn!("parent chain from {end} does not terminate");
            break;
        }
        let cell = grid.cell_mut(id);
        cell.on_path = true;
        curr = cell.parent;
        marked += 1;
        observer.on_step(grid, Step::PathMarked(id));
    }

    if curr.is_none() {
        warn!("parent chain from {end} ended before reaching {start}");
    }
    marked
}

impl Grid {
    /// The "run search" trigger.
    ///
    /// Locates the start and end cells, then clears all search state,
    /// rebuilds neighbour lists and runs [`find_path`]. A missing endpoint
    /// is reported before anything is touched.
    pub fn search<O: StepObserver + ?Sized>(&mut self, observer: &mut O) -> Result<bool, SearchError> {
        let start = self.find_start().ok_or(SearchError::MissingStart)?;
        let end = self.find_end().ok_or(SearchError::MissingEnd)?;
        self.reset_search();
        self.recompute_neighbours();
        find_path(self, Some(start), Some(end), observer)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::cell::{Role, UNREACHABLE};
    use crate::observer::NoopObserver;

    fn grid_with(size: usize, start: (usize, usize), end: (usize, usize), barriers: &[(usize, usize)]) -> Grid {
        let (mut grid, _) = Grid::new(size, size as i32);
        grid.set_role(start.0, start.1, Role::Start).unwrap();
        grid.set_role(end.0, end.1, Role::End).unwrap();
        for &(r, c) in barriers {
            grid.set_role(r, c, Role::Barrier).unwrap();
        }
        grid
    }

    /// Unit-cost breadth-first distances from `from`, following the current
    /// neighbour lists.
    fn bfs(grid: &Grid, from: CellId) -> Vec<Option<usize>> {
        let mut dist = vec![None; grid.len()];
        let mut queue = VecDeque::new();
        dist[from.0] = Some(0);
        queue.push_back(from);
        while let Some(c) = queue.pop_front() {
            let d = dist[c.0].unwrap();
            for &n in grid[c].neighbours() {
                if dist[n.0].is_none() {
                    dist[n.0] = Some(d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    fn path_cells(grid: &Grid) -> Vec<CellId> {
        grid.iter().filter(|(_, c)| c.on_path()).map(|(id, _)| id).collect()
    }

    fn adjacent(grid: &Grid, a: CellId, b: CellId) -> bool {
        let (a, b) = (&grid[a], &grid[b]);
        a.row().abs_diff(b.row()) + a.col().abs_diff(b.col()) == 1
    }

    /// Checks that the parent chain from `end` is a contiguous, barrier-free
    /// walk to `start` and that exactly its interior is marked.
    fn assert_valid_path(grid: &Grid) {
        let start = grid.find_start().unwrap();
        let end = grid.find_end().unwrap();
        let mut chain = Vec::new();
        let mut curr = end;
        while curr != start {
            let parent = grid[curr].parent().expect("chain reaches start");
            assert!(adjacent(grid, curr, parent));
            curr = parent;
            if curr != start {
                chain.push(curr);
            }
        }
        let mut marked = path_cells(grid);
        chain.sort();
        marked.sort();
        assert_eq!(marked, chain);
        for id in marked {
            let cell = &grid[id];
            assert!(!cell.is_barrier() && !cell.is_start() && !cell.is_end());
        }
    }

    #[test]
    fn open_3x3_corner_to_corner() {
        let mut grid = grid_with(3, (0, 0), (2, 2), &[]);
        assert_eq!(grid.search(&mut NoopObserver), Ok(true));
        let end = grid.find_end().unwrap();
        assert_eq!(grid.path_len(end), 4);
        assert_eq!(path_cells(&grid).len(), 3);
        assert_valid_path(&grid);
    }

    #[test]
    fn wall_across_3x3_blocks_search() {
        let mut grid = grid_with(3, (0, 0), (2, 2), &[(1, 0), (1, 1), (1, 2)]);
        assert_eq!(grid.search(&mut NoopObserver), Ok(false));
        assert!(path_cells(&grid).is_empty());
        // Reachable side settled (except the start itself), far side untouched.
        assert!(grid.cell_at(0, 1).unwrap().visited());
        assert!(grid.cell_at(0, 2).unwrap().visited());
        assert!(!grid.cell_at(0, 0).unwrap().visited());
        for col in 0..3 {
            let cell = grid.cell_at(2, col).unwrap();
            assert!(!cell.visited());
            assert_eq!(cell.g_score(), UNREACHABLE);
        }
    }

    #[test]
    fn detour_around_wall_is_shortest() {
        // s . . . .
        // # # # # .
        // e . . . .
        let mut grid = grid_with(5, (0, 0), (2, 0), &[(1, 0), (1, 1), (1, 2), (1, 3)]);
        assert_eq!(grid.search(&mut NoopObserver), Ok(true));
        assert_eq!(grid.path_len(grid.find_end().unwrap()), 10);
        assert_valid_path(&grid);
    }

    #[test]
    fn same_endpoint_is_rejected_without_mutation() {
        let (mut grid, _) = Grid::new(3, 3);
        grid.recompute_neighbours();
        let id = grid.id(1, 1).unwrap();
        assert_eq!(
            find_path(&mut grid, Some(id), Some(id), &mut NoopObserver),
            Err(SearchError::SameEndpoints(id))
        );
        assert_eq!(grid[id].g_score(), UNREACHABLE);
    }

    #[test]
    fn missing_endpoints_are_rejected_without_mutation() {
        let (mut grid, _) = Grid::new(3, 3);
        let id = grid.id(0, 0).unwrap();
        assert_eq!(
            find_path(&mut grid, None, Some(id), &mut NoopObserver),
            Err(SearchError::MissingStart)
        );
        assert_eq!(
            find_path(&mut grid, Some(id), None, &mut NoopObserver),
            Err(SearchError::MissingEnd)
        );
        assert_eq!(
            find_path(&mut grid, Some(id), Some(CellId(99)), &mut NoopObserver),
            Err(SearchError::ForeignCell(CellId(99)))
        );
        assert!(grid.iter().all(|(_, c)| c.g_score() == UNREACHABLE));
    }

    #[test]
    fn search_without_start_keeps_previous_state() {
        let mut grid = grid_with(3, (0, 0), (0, 2), &[]);
        assert_eq!(grid.search(&mut NoopObserver), Ok(true));
        let before: Vec<bool> = grid.iter().map(|(_, c)| c.on_path()).collect();
        grid.clear_role(0, 0).unwrap();
        assert_eq!(grid.search(&mut NoopObserver), Err(SearchError::MissingStart));
        let after: Vec<bool> = grid.iter().map(|(_, c)| c.on_path()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn repeated_search_starts_from_clean_state() {
        let mut grid = grid_with(6, (0, 0), (5, 5), &[]);
        assert_eq!(grid.search(&mut NoopObserver), Ok(true));
        // Wall off the end; stale scores from the first run must not leak.
        grid.set_role(4, 5, Role::Barrier).unwrap();
        grid.set_role(5, 4, Role::Barrier).unwrap();
        assert_eq!(grid.search(&mut NoopObserver), Ok(false));
        assert!(path_cells(&grid).is_empty());

        grid.clear_role(4, 5).unwrap();
        assert_eq!(grid.search(&mut NoopObserver), Ok(true));
        assert_eq!(grid.path_len(grid.find_end().unwrap()), 10);
        assert_valid_path(&grid);
    }

    #[test]
    fn observer_sees_expansions_then_path_from_end() {
        let mut grid = grid_with(4, (0, 0), (3, 3), &[]);
        let mut steps = Vec::new();
        let found = grid
            .search(&mut |g: &Grid, step: Step| {
                if let Step::PathMarked(id) = step {
                    assert!(g[id].on_path());
                }
                steps.push(step);
            })
            .unwrap();
        assert!(found);

        let first_path = steps
            .iter()
            .position(|s| matches!(s, Step::PathMarked(_)))
            .unwrap();
        assert!(steps[..first_path].iter().all(|s| matches!(s, Step::Expanded(_))));
        let path: Vec<CellId> = steps[first_path..]
            .iter()
            .map(|s| match s {
                Step::PathMarked(id) => *id,
                other => panic!("expansion after reconstruction: {other:?}"),
            })
            .collect();
        assert_eq!(path.len(), 5);
        let end = grid.find_end().unwrap();
        let start = grid.find_start().unwrap();
        assert!(adjacent(&grid, path[0], end));
        assert!(adjacent(&grid, path[path.len() - 1], start));
    }

    #[test]
    fn expanded_cells_are_never_expanded_twice() {
        let mut grid = grid_with(8, (0, 0), (7, 7), &[(3, 3), (3, 4), (4, 3)]);
        let mut expanded = Vec::new();
        grid.search(&mut |_: &Grid, step: Step| {
            if let Step::Expanded(id) = step {
                expanded.push(id);
            }
        })
        .unwrap();
        let total = expanded.len();
        expanded.sort();
        expanded.dedup();
        assert_eq!(expanded.len(), total);
    }

    #[test]
    fn random_grids_match_breadth_first_distances() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let size = rng.random_range(2..10);
            let (mut grid, _) = Grid::new(size, size as i32 * 8);
            for row in 0..size {
                for col in 0..size {
                    if rng.random_bool(0.3) {
                        grid.set_role(row, col, Role::Barrier).unwrap();
                    }
                }
            }
            let s = (rng.random_range(0..size), rng.random_range(0..size));
            let e = (rng.random_range(0..size), rng.random_range(0..size));
            if s == e {
                continue;
            }
            grid.clear_role(s.0, s.1).unwrap();
            grid.clear_role(e.0, e.1).unwrap();
            grid.set_role(s.0, s.1, Role::Start).unwrap();
            grid.set_role(e.0, e.1, Role::End).unwrap();

            let found = grid.search(&mut NoopObserver).unwrap();
            let start = grid.find_start().unwrap();
            let end = grid.find_end().unwrap();
            let dist = bfs(&grid, start);

            match dist[end.0] {
                Some(d) => {
                    assert!(found);
                    assert_eq!(grid.path_len(end), d);
                    assert_valid_path(&grid);
                }
                None => {
                    assert!(!found);
                    for (id, cell) in grid.iter() {
                        let reachable = dist[id.0].is_some() && id != start;
                        assert_eq!(cell.visited(), reachable, "cell {id}");
                    }
                }
            }
        }
    }

    #[test]
    fn frontier_pops_lowest_f_then_fifo() {
        let mut open = Frontier::default();
        open.push(CellId(1), 5);
        open.push(CellId(2), 3);
        open.push(CellId(3), 5);
        open.push(CellId(4), 3);
        let order: Vec<CellId> = std::iter::from_fn(|| open.pop()).collect();
        assert_eq!(order, vec![CellId(2), CellId(4), CellId(1), CellId(3)]);
    }
}
