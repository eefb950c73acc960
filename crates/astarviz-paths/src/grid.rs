//! The [`Grid`] type — a fixed-size square board that owns every [`Cell`].
//!
//! Cells are stored contiguously in row-major order; `(row, col)` maps to
//! index `row * size + col`. Neighbour lists and parent links are
//! [`CellId`]s into that storage, so a grid is replaced wholesale on reset
//! rather than patched cell by cell.

use std::ops::Index;

use astarviz_core::Point;

use crate::cell::{Cell, CellId, Role};

/// Errors raised when editing cell roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already {current}; clear it before making it {requested}")]
    Occupied {
        row: usize,
        col: usize,
        current: Role,
        requested: Role,
    },
    #[error("the grid already has a {role} cell at ({row}, {col})")]
    AlreadyPlaced { role: Role, row: usize, col: usize },
}

/// A `size × size` board of cells.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cell_width: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a `size × size` grid whose cells span `world_width` world units.
    ///
    /// Returns the grid together with the cell width
    /// (`world_width / size`, integer division, at least 1). Cell positions
    /// are `(col * cell_width, row * cell_width)`.
    pub fn new(size: usize, world_width: i32) -> (Self, i32) {
        let cell_width = (world_width / size.max(1) as i32).max(1);
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let position = Point::new(col as i32 * cell_width, row as i32 * cell_width);
                cells.push(Cell::new(row, col, position));
            }
        }
        (
            Self {
                size,
                cell_width,
                cells,
            },
            cell_width,
        )
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Handle for `(row, col)`, or `None` if outside the grid.
    #[inline]
    pub fn id(&self, row: usize, col: usize) -> Option<CellId> {
        if row < self.size && col < self.size {
            Some(CellId(row * self.size + col))
        } else {
            None
        }
    }

    /// The cell behind `id`, or `None` if `id` does not belong to this grid.
    #[inline]
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.id(row, col).map(|id| &self.cells[id.0])
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Row-major iterator over `(CellId, &Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// The cell containing world point `world`, if any.
    pub fn locate(&self, world: Point) -> Option<CellId> {
        if world.x < 0 || world.y < 0 {
            return None;
        }
        let col = (world.x / self.cell_width) as usize;
        let row = (world.y / self.cell_width) as usize;
        self.id(row, col)
    }

    // -----------------------------------------------------------------------
    // Neighbours
    // -----------------------------------------------------------------------

    /// Rebuild every cell's neighbour list from the current barriers.
    ///
    /// Neighbours are the in-bounds cells below, above, right and left of a
    /// cell that are not barriers. Must run after barrier edits and before
    /// each search.
    pub fn recompute_neighbours(&mut self) {
        let size = self.size;
        for i in 0..self.cells.len() {
            let (row, col) = (i / size, i % size);
            let mut neighbours = std::mem::take(&mut self.cells[i].neighbours);
            neighbours.clear();

            let candidates = [
                (row + 1 < size).then(|| i + size),
                (row > 0).then(|| i - size),
                (col + 1 < size).then(|| i + 1),
                (col > 0).then(|| i - 1),
            ];
            for n in candidates.into_iter().flatten() {
                if !self.cells[n].is_barrier() {
                    neighbours.push(CellId(n));
                }
            }

            self.cells[i].neighbours = neighbours;
        }
    }

    // -----------------------------------------------------------------------
    // Roles
    // -----------------------------------------------------------------------

    /// Give the cell at `(row, col)` the role `role`.
    ///
    /// `Role::Empty` always succeeds and clears the cell. Any other role is
    /// only accepted on an empty cell (or one that already has that role),
    /// and there can be at most one start and one end on the grid.
    pub fn set_role(&mut self, row: usize, col: usize, role: Role) -> Result<(), RoleError> {
        let id = self.id(row, col).ok_or(RoleError::OutOfBounds { row, col })?;
        let current = self.cells[id.0].role;
        if current == role {
            return Ok(());
        }
        if role != Role::Empty {
            if current != Role::Empty {
                return Err(RoleError::Occupied {
                    row,
                    col,
                    current,
                    requested: role,
                });
            }
            let existing = match role {
                Role::Start => self.find_start(),
                Role::End => self.find_end(),
                _ => None,
            };
            if let Some(existing) = existing {
                let cell = &self.cells[existing.0];
                return Err(RoleError::AlreadyPlaced {
                    role,
                    row: cell.row(),
                    col: cell.col(),
                });
            }
        }
        self.cells[id.0].role = role;
        Ok(())
    }

    /// Clear the cell at `(row, col)`, returning the role it had.
    pub fn clear_role(&mut self, row: usize, col: usize) -> Result<Role, RoleError> {
        let id = self.id(row, col).ok_or(RoleError::OutOfBounds { row, col })?;
        Ok(std::mem::take(&mut self.cells[id.0].role))
    }

    pub fn find_start(&self) -> Option<CellId> {
        self.find_role(Role::Start)
    }

    pub fn find_end(&self) -> Option<CellId> {
        self.find_role(Role::End)
    }

    fn find_role(&self, role: Role) -> Option<CellId> {
        self.cells.iter().position(|c| c.role == role).map(CellId)
    }

    // -----------------------------------------------------------------------
    // Search state
    // -----------------------------------------------------------------------

    /// Return every cell's search state to its initial value. Roles and
    /// neighbour lists are untouched.
    pub fn reset_search(&mut self) {
        for cell in &mut self.cells {
            cell.reset_search();
        }
    }

    /// Number of edges on the parent chain that ends at `end`.
    pub fn path_len(&self, end: CellId) -> usize {
        let mut edges = 0;
        let mut curr = self.get(end).and_then(Cell::parent);
        while let Some(id) = curr {
            edges += 1;
            if edges > self.cells.len() {
                log::warn!("parent chain from {end} does not terminate");
                break;
            }
            curr = self.cells[id.0].parent;
        }
        edges
    }

    /// Encode the roles as maze text: one line per row, `#` barrier,
    /// `s` start, `e` end, `.` empty.
    pub fn to_maze_string(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size);
        for row in self.cells.chunks(self.size.max(1)) {
            out.extend(row.iter().map(|c| c.role.as_char()));
            out.push('\n');
        }
        out
    }
}

impl Index<CellId> for Grid {
    type Output = Cell;

    #[inline]
    fn index(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }
}
