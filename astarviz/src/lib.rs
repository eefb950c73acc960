//! astarviz — an interactive terminal visualizer for A* search on a grid.

pub mod colors;
pub mod config;
pub mod model;

pub use config::VisualizerConfig;
pub use model::{Mode, Outcome, Visualizer, blank_grid, pick, render};
