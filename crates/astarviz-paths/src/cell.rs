//! A single grid square: [`Cell`], its [`Role`], and the [`CellId`] handle
//! used to refer to it.

use std::fmt;

use astarviz_core::Point;

/// Sentinel score meaning "not reached yet" (+infinity).
pub const UNREACHABLE: u32 = u32::MAX;

/// Non-owning handle to a cell: its linear index `row * size + col` in the
/// owning [`Grid`](crate::Grid).
///
/// Handles are only meaningful for the grid that produced them and must not
/// be kept across a grid reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub usize);

impl CellId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a cell stands for on the board. A cell holds exactly one role.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
}

impl Role {
    /// The maze-file character for this role.
    pub const fn as_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Start => 's',
            Self::End => 'e',
            Self::Barrier => '#',
        }
    }

    /// Decode a maze-file character. Anything unknown is empty.
    pub const fn from_char(ch: char) -> Self {
        match ch {
            '#' => Self::Barrier,
            's' => Self::Start,
            'e' => Self::End,
            _ => Self::Empty,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::Start => "start",
            Self::End => "end",
            Self::Barrier => "barrier",
        })
    }
}

/// One grid square: identity, role and per-search state.
#[derive(Clone, Debug)]
pub struct Cell {
    row: usize,
    col: usize,
    position: Point,
    pub(crate) role: Role,

    // Search state, cleared by `reset_search`.
    pub(crate) visited: bool,
    pub(crate) in_open_set: bool,
    pub(crate) on_path: bool,
    pub(crate) g_score: u32,
    pub(crate) h_score: u32,
    f_score: u32,
    pub(crate) parent: Option<CellId>,
    pub(crate) neighbours: Vec<CellId>,
}

impl Cell {
    pub(crate) fn new(row: usize, col: usize, position: Point) -> Self {
        Self {
            row,
            col,
            position,
            role: Role::Empty,
            visited: false,
            in_open_set: false,
            on_path: false,
            g_score: UNREACHABLE,
            h_score: UNREACHABLE,
            f_score: UNREACHABLE,
            parent: None,
            neighbours: Vec::with_capacity(4),
        }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// World coordinate of the cell's top-left corner.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Grid coordinate as a point (x = col, y = row).
    #[inline]
    pub fn coord(&self) -> Point {
        Point::new(self.col as i32, self.row as i32)
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.role == Role::Start
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.role == Role::End
    }

    #[inline]
    pub fn is_barrier(&self) -> bool {
        self.role == Role::Barrier
    }

    /// Whether the search has settled this cell.
    #[inline]
    pub fn visited(&self) -> bool {
        self.visited
    }

    /// Whether the cell has ever been put on the frontier. Only used for
    /// display.
    #[inline]
    pub fn in_open_set(&self) -> bool {
        self.in_open_set
    }

    /// Whether the cell lies on the reconstructed path.
    #[inline]
    pub fn on_path(&self) -> bool {
        self.on_path
    }

    #[inline]
    pub fn g_score(&self) -> u32 {
        self.g_score
    }

    #[inline]
    pub fn h_score(&self) -> u32 {
        self.h_score
    }

    /// `g_score + h_score`, saturating at [`UNREACHABLE`].
    #[inline]
    pub fn f_score(&self) -> u32 {
        self.f_score
    }

    #[inline]
    pub fn parent(&self) -> Option<CellId> {
        self.parent
    }

    /// Adjacent non-barrier cells as of the last
    /// [`recompute_neighbours`](crate::Grid::recompute_neighbours).
    #[inline]
    pub fn neighbours(&self) -> &[CellId] {
        &self.neighbours
    }

    /// Set both scores and re-derive `f_score`.
    #[inline]
    pub(crate) fn set_scores(&mut self, g: u32, h: u32) {
        self.g_score = g;
        self.h_score = h;
        self.f_score = g.saturating_add(h);
    }

    pub(crate) fn reset_search(&mut self) {
        self.visited = false;
        self.in_open_set = false;
        self.on_path = false;
        self.set_scores(UNREACHABLE, UNREACHABLE);
        self.parent = None;
    }
}
