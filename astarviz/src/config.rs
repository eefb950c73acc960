//! Visualizer settings.

use std::time::Duration;

/// Settings the [`Visualizer`](crate::Visualizer) is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizerConfig {
    /// Side length of the board in cells.
    pub size: usize,
    /// Pause after each animation frame of a search.
    pub step_delay: Duration,
    /// Seed for generated mazes; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            size: 32,
            step_delay: Duration::from_millis(5),
            seed: None,
        }
    }
}
