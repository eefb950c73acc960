//! Plain-text maze layouts.
//!
//! One line per row, one character per cell: `#` barrier, `s` start,
//! `e` end, anything else empty. There is no header; the grid size is fixed
//! by whoever owns the [`Grid`], and the text is cropped or padded to fit.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::cell::Role;
use crate::grid::{Grid, RoleError};

/// Errors raised while loading a maze.
#[derive(Debug, thiserror::Error)]
pub enum MazeError {
    #[error("cannot read maze file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("maze line {line}, column {column}")]
    Role {
        line: usize,
        column: usize,
        #[source]
        source: RoleError,
    },
}

/// A decoded maze: rows of roles, possibly ragged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Maze {
    pub(crate) rows: Vec<Vec<Role>>,
}

impl Maze {
    /// Decode maze text. Never fails: unknown characters are empty cells.
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .map(|line| line.chars().map(Role::from_char).collect())
            .collect();
        Self { rows }
    }

    /// A `size × size` maze with every cell set to `role`.
    pub fn filled(size: usize, role: Role) -> Self {
        Self {
            rows: vec![vec![role; size]; size],
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Role at `(row, col)`; positions past a short row are empty.
    pub fn role_at(&self, row: usize, col: usize) -> Role {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, role: Role) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = role;
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for role in row {
                write!(f, "{}", role.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Grid {
    /// Replace every role on the grid with the ones from `maze`.
    ///
    /// Cells the maze does not cover become empty; rows and columns past the
    /// grid are dropped with a warning. All search state is cleared. If the
    /// maze holds a second start or end, nothing changes and the offending
    /// character's 1-based position is reported.
    pub fn apply_maze(&mut self, maze: &Maze) -> Result<(), MazeError> {
        let size = self.size();
        let (mut fresh, _) = Grid::new(size, size as i32 * self.cell_width());

        for (row, roles) in maze.rows.iter().enumerate() {
            if row >= size {
                warn!(
                    "maze has {} rows, ignoring those past {size}",
                    maze.height()
                );
                break;
            }
            if roles.len() > size {
                warn!(
                    "maze line {} has {} cells, ignoring those past {size}",
                    row + 1,
                    roles.len()
                );
            }
            for (col, &role) in roles.iter().take(size).enumerate() {
                fresh
                    .set_role(row, col, role)
                    .map_err(|source| MazeError::Role {
                        line: row + 1,
                        column: col + 1,
                        source,
                    })?;
            }
        }

        *self = fresh;
        Ok(())
    }
}

/// Read the maze file at `path` and apply it to `grid`.
pub fn load_maze(path: &Path, grid: &mut Grid) -> Result<(), MazeError> {
    let text = std::fs::read_to_string(path).map_err(|source| MazeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    grid.apply_maze(&Maze::parse(&text))?;
    info!("loaded maze from {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    fn roles(grid: &Grid) -> String {
        grid.to_maze_string()
    }

    #[test]
    fn parse_and_apply() {
        let (mut grid, _) = Grid::new(3, 30);
        grid.apply_maze(&Maze::parse("#s.\n..e\n#x#\n")).unwrap();
        assert_eq!(roles(&grid), "#s.\n..e\n#.#\n");
        assert_eq!(grid.find_start(), grid.id(0, 1));
        assert_eq!(grid.find_end(), grid.id(1, 2));
        assert_eq!(grid.cell_width(), 10);
    }

    #[test]
    fn short_lines_and_missing_rows_are_empty() {
        let (mut grid, _) = Grid::new(4, 4);
        grid.apply_maze(&Maze::parse("#\ns#\n")).unwrap();
        assert_eq!(roles(&grid), "#...\ns#..\n....\n....\n");
    }

    #[test]
    fn overflow_is_cropped() {
        let (mut grid, _) = Grid::new(2, 2);
        grid.apply_maze(&Maze::parse("..s\n#.\ne.\n")).unwrap();
        assert_eq!(roles(&grid), "..\n#.\n");
        assert!(grid.find_start().is_none());
        assert!(grid.find_end().is_none());
    }

    #[test]
    fn crlf_lines() {
        let (mut grid, _) = Grid::new(2, 2);
        grid.apply_maze(&Maze::parse("s#\r\n.e\r\n")).unwrap();
        assert_eq!(roles(&grid), "s#\n.e\n");
    }

    #[test]
    fn second_start_is_rejected_without_changes() {
        let (mut grid, _) = Grid::new(3, 3);
        grid.set_role(2, 2, Role::Barrier).unwrap();
        let err = grid.apply_maze(&Maze::parse("s..\n..s\n")).unwrap_err();
        match err {
            MazeError::Role {
                line,
                column,
                source,
            } => {
                assert_eq!((line, column), (2, 3));
                assert_eq!(
                    source,
                    RoleError::AlreadyPlaced {
                        role: Role::Start,
                        row: 0,
                        col: 0
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(roles(&grid), "...\n...\n..#\n");
    }

    #[test]
    fn apply_replaces_roles_and_search_state() {
        let (mut grid, _) = Grid::new(3, 3);
        grid.set_role(0, 0, Role::Start).unwrap();
        grid.set_role(2, 2, Role::End).unwrap();
        grid.search(&mut NoopObserver).unwrap();
        assert!(grid.iter().any(|(_, c)| c.on_path()));

        grid.apply_maze(&Maze::parse("e.s\n")).unwrap();
        assert_eq!(roles(&grid), "e.s\n...\n...\n");
        assert!(grid.iter().all(|(_, c)| !c.on_path() && !c.visited()));
    }

    #[test]
    fn display_matches_grid_encoding() {
        let text = "#s#\n..#\n#e.\n";
        let maze = Maze::parse(text);
        assert_eq!(maze.to_string(), text);
        assert_eq!((maze.width(), maze.height()), (3, 3));
        assert_eq!(maze.role_at(2, 1), Role::End);
        assert_eq!(maze.role_at(7, 7), Role::Empty);

        let (mut grid, _) = Grid::new(3, 3);
        grid.apply_maze(&maze).unwrap();
        assert_eq!(grid.to_maze_string(), text);
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("astarviz-maze-{}.txt", std::process::id()));
        std::fs::write(&path, "s.\n#e\n").unwrap();
        let (mut grid, _) = Grid::new(2, 2);
        let result = load_maze(&path, &mut grid);
        std::fs::remove_file(&path).ok();
        result.unwrap();
        assert_eq!(roles(&grid), "s.\n#e\n");
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/astarviz/maze.txt");
        let (mut grid, _) = Grid::new(2, 2);
        let err = load_maze(path, &mut grid).unwrap_err();
        assert!(matches!(err, MazeError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/astarviz/maze.txt"));
    }
}
