use astarviz_core::Point;

use crate::cell::Cell;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Estimated remaining cost from `a` to `b`.
///
/// This is the Manhattan distance between the two cells' positions measured
/// in cell steps, which equals the number of moves on an empty 4-connected
/// grid. It never overestimates and is consistent for unit edge costs.
#[inline]
pub fn heuristic(a: &Cell, b: &Cell) -> u32 {
    manhattan(a.coord(), b.coord())
}
