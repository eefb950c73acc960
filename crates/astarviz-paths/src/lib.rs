//! Grid model and animated A* search.
//!
//! A [`Grid`] owns a square board of [`Cell`]s, each holding one [`Role`]
//! (empty, start, end or barrier) plus the per-search state the engine
//! writes: visited and open flags, `g`/`h`/`f` scores, a parent link and the
//! reconstructed-path mark.
//!
//! [`find_path`] runs A* over 4-connected, unit-cost moves with the
//! Manhattan [`heuristic`], reporting every expansion and every path cell to
//! a [`StepObserver`] so that a front end can animate the search. The
//! observer sees the grid read-only; it cannot change the outcome.
//!
//! Layouts can be loaded from plain text ([`Maze`], [`load_maze`]) or
//! generated ([`MazeGen`]).
//!
//! ```
//! use astarviz_paths::{Grid, NoopObserver, Role};
//!
//! let (mut grid, _) = Grid::new(3, 3);
//! grid.set_role(0, 0, Role::Start).unwrap();
//! grid.set_role(2, 2, Role::End).unwrap();
//! assert_eq!(grid.search(&mut NoopObserver), Ok(true));
//! assert_eq!(grid.path_len(grid.find_end().unwrap()), 4);
//! ```

mod astar;
mod cell;
mod distance;
mod grid;
mod mapgen;
mod maze;
mod observer;

pub use astar::{SearchError, find_path, reconstruct_path};
pub use cell::{Cell, CellId, Role, UNREACHABLE};
pub use distance::{heuristic, manhattan};
pub use grid::{Grid, RoleError};
pub use mapgen::MazeGen;
pub use maze::{Maze, MazeError, load_maze};
pub use observer::{NoopObserver, Step, StepObserver};
