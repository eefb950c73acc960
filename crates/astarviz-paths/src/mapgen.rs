//! Random maze generation.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cell::Role;
use crate::maze::Maze;

/// Maze generator driven by a caller-supplied random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MazeGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a `size × size` perfect maze.
    ///
    /// Starts from solid walls and carves passages with an iterative
    /// randomized depth-first walk over the cells whose row and column are
    /// both odd, beginning at (1, 1). The start goes at (1, 0) and the end at
    /// (size - 2, size - 1), each next to a carved cell, so for `size >= 2`
    /// the end is always reachable. Smaller sizes yield an all-wall maze with
    /// no endpoints.
    pub fn generate(&mut self, size: usize) -> Maze {
        let mut maze = Maze::filled(size, Role::Barrier);
        if size < 2 {
            return maze;
        }

        let mut dirs: [(isize, isize); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];
        let mut stack = vec![(1usize, 1usize)];
        maze.set(1, 1, Role::Empty);
        let mut carved = 1;

        while let Some(&(row, col)) = stack.last() {
            dirs.shuffle(&mut self.rng);
            let next = dirs.iter().find_map(|&(dr, dc)| {
                let nr = row.checked_add_signed(dr).filter(|&r| r < size)?;
                let nc = col.checked_add_signed(dc).filter(|&c| c < size)?;
                (maze.role_at(nr, nc) == Role::Barrier).then_some((nr, nc, dr, dc))
            });
            match next {
                Some((nr, nc, dr, dc)) => {
                    maze.set(nr, nc, Role::Empty);
                    maze.set(
                        row.wrapping_add_signed(dr / 2),
                        col.wrapping_add_signed(dc / 2),
                        Role::Empty,
                    );
                    stack.push((nr, nc));
                    carved += 1;
                }
                None => {
                    stack.pop();
                }
            }
        }

        maze.set(1, 0, Role::Start);
        maze.set(size - 2, size - 1, Role::End);
        debug!("generated {size}x{size} maze, {carved} rooms carved");
        maze
    }
}
