//! The [`Screen`] type — an off-screen buffer of [`Glyph`]s — and the
//! [`Frame`] diff that back-ends flush to the terminal.

use crate::geom::{Point, Range};
use crate::glyph::Glyph;
use crate::style::Style;

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// A 2D buffer of glyphs in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    glyphs: Vec<Glyph>,
    bounds: Range,
}

impl Screen {
    /// Create a new screen of the given dimensions, filled with blank glyphs.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            glyphs: vec![Glyph::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.bounds.contains(p) {
            Some(p.y as usize * self.bounds.width() as usize + p.x as usize)
        } else {
            None
        }
    }

    /// Read the glyph at `p`. Returns a blank glyph if `p` is outside
    /// bounds.
    pub fn at(&self, p: Point) -> Glyph {
        self.index(p)
            .map(|i| self.glyphs[i])
            .unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op if `p` is outside bounds.
    pub fn set(&mut self, p: Point, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    /// Fill every position with `glyph`.
    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` starting at `p`, one glyph per character, clipped to the
    /// screen width. Returns the number of glyphs written.
    pub fn text(&mut self, p: Point, text: &str, style: Style) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(i as i32, 0);
            if !self.bounds.contains(q) {
                break;
            }
            self.set(q, Glyph::new(ch, style));
            written += 1;
        }
        written
    }

    /// Copy every glyph from `src`. Both screens must have the same size;
    /// otherwise `self` is resized to match.
    pub fn copy_from(&mut self, src: &Screen) {
        if self.bounds != src.bounds {
            self.bounds = src.bounds;
            self.glyphs.resize(src.glyphs.len(), Glyph::default());
        }
        self.glyphs.copy_from_slice(&src.glyphs);
    }

    /// Row-major iterator over `(Point, Glyph)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Glyph)> + '_ {
        self.bounds.iter().zip(self.glyphs.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameGlyph / compute_frame
// ---------------------------------------------------------------------------

/// A single glyph that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameGlyph {
    pub glyph: Glyph,
    pub pos: Point,
}

/// A set of glyph changes (a diff frame).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub glyphs: Vec<FrameGlyph>,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Compute the difference between two screens.
///
/// Returns a [`Frame`] containing only the glyphs of `curr` that differ
/// from `prev`. If the sizes differ, every glyph of `curr` is included.
pub fn compute_frame(prev: &Screen, curr: &Screen) -> Frame {
    let full = prev.bounds() != curr.bounds();
    let glyphs = curr
        .iter()
        .filter(|&(p, g)| full || prev.at(p) != g)
        .map(|(pos, glyph)| FrameGlyph { glyph, pos })
        .collect();
    Frame {
        glyphs,
        width: curr.width(),
        height: curr.height(),
    }
}
