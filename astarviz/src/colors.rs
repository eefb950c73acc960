//! Board palette.
//!
//! The cell colours follow the classic raylib palette the visualizer has
//! always used; the UI colours are for the status lines below the board.

use astarviz_core::Color;
use astarviz_paths::Cell;

// -- Cells --

pub const EMPTY: Color = Color::from_rgb(245, 245, 245);
pub const START: Color = Color::from_rgb(0, 121, 241);
pub const END: Color = Color::from_rgb(255, 161, 0);
pub const BARRIER: Color = Color::from_rgb(0, 0, 0);
pub const VISITED: Color = Color::from_rgb(230, 41, 55);
pub const OPEN: Color = Color::from_rgb(0, 228, 48);
pub const PATH: Color = Color::from_rgb(200, 122, 255);

// -- UI --

/// Default terminal foreground (reset).
pub const FG: Color = Color::DEFAULT;
/// Dimmed foreground for key hints.
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
pub const FG_OK: Color = Color::from_rgb(80, 200, 80);
pub const FG_WARN: Color = Color::from_rgb(220, 140, 50);

/// Fill colour for a cell.
///
/// Start, end and barrier win over search state, visited wins over open,
/// and a path mark overrides everything.
pub fn cell_color(cell: &Cell) -> Color {
    if cell.on_path() {
        return PATH;
    }
    if cell.is_start() {
        START
    } else if cell.is_end() {
        END
    } else if cell.is_barrier() {
        BARRIER
    } else if cell.visited() {
        VISITED
    } else if cell.in_open_set() {
        OPEN
    } else {
        EMPTY
    }
}
