//! astarviz — watch A* find its way across a grid in the terminal.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use clap::Parser;
use log::info;

use astarviz_core::{App, AppConfig};
use astarviz_crossterm::CrosstermDriver;
use astarviz_lib::{Visualizer, VisualizerConfig, blank_grid};
use astarviz_paths::load_maze;

/// Interactive A* pathfinding on a grid.
///
/// Left click places the start, then the end, then barriers; right click
/// clears a cell. Space runs the search.
#[derive(Parser, Debug)]
#[command(name = "astarviz", version, about)]
struct Cli {
    /// Maze file to load (`#` barrier, `s` start, `e` end).
    #[arg(long, value_name = "PATH", conflicts_with = "generate")]
    maze: Option<PathBuf>,

    /// Side length of the grid in cells.
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u16).range(2..=512))]
    size: u16,

    /// Start from a randomly generated maze.
    #[arg(long)]
    generate: bool,

    /// Seed for generated mazes.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after each animation frame, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 5)]
    step_delay_ms: u64,

    /// Write logs to this file (filter with RUST_LOG, default `info`).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the starting grid as maze text and exit.
    #[arg(long)]
    print_maze: bool,
}

impl From<&Cli> for VisualizerConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            size: cli.size as usize,
            step_delay: Duration::from_millis(cli.step_delay_ms),
            seed: cli.seed,
        }
    }
}

/// Logs go to a file because the terminal is taken over by the UI. Without
/// one, nothing is logged unless RUST_LOG asks for it.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("logger already initialised")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = VisualizerConfig::from(&cli);
    let mut grid = blank_grid(config.size);
    if let Some(path) = &cli.maze {
        load_maze(path, &mut grid).context("failed to load maze")?;
    }

    let mut model = Visualizer::new(config, grid);
    if cli.generate {
        model.generate_maze();
    }

    if cli.print_maze {
        print!("{}", model.grid().to_maze_string());
        return Ok(());
    }

    let (width, height) = model.screen_size();
    info!("starting {}x{} board", cli.size, cli.size);
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width,
        height,
    });
    app.run().map_err(|e| anyhow!("terminal error: {e}"))?;
    Ok(())
}
