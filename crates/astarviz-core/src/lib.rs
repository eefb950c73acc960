//! **astarviz-core** — terminal presentation primitives for astarviz.
//!
//! This crate provides the types shared by the visualizer and its back-ends:
//! geometry primitives, styled glyphs, an off-screen buffer with frame
//! diffing, input events, and the application loop.

pub mod app;
pub mod geom;
pub mod glyph;
pub mod messages;
pub mod screen;
pub mod style;

pub use app::{App, AppConfig, Canvas, Context, Driver, Effect, HeadlessCanvas, Model};
pub use geom::{Point, Range};
pub use glyph::Glyph;
pub use messages::*;
pub use screen::{Frame, FrameGlyph, Screen};
pub use style::{AttrMask, Color, Style};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn point_round_trip() {
        let p = Point::new(3, -7);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn glyph_round_trip() {
        let g = Glyph::new('#', Style::default().with_bg(Color::from_rgb(0, 0, 0)));
        let json = serde_json::to_string(&g).unwrap();
        let back: Glyph = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
