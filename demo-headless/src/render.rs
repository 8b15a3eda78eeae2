//! Terminal output for simulation steps
//!
//! `TerminalRenderer` draws the grid to stdout (truecolour blocks or plain
//! glyphs), optionally redrawing in place with a delay between frames.
//! `LoggingObserver` reports each step and the final outcome through
//! `tracing`, which the demo routes to stderr.

use forest_fire_core::{ForestGrid, RunOutcome, StepObserver, StepStatistics};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

const CLEAR_AND_HOME: &str = "\x1b[H\x1b[2J";
const RESET: &str = "\x1b[0m";

/// Render a grid as text
///
/// With `color` each cell is two background-coloured spaces using
/// [`forest_fire_core::CellState::rgb`]; otherwise one glyph per cell.
pub fn render_grid(grid: &ForestGrid, color: bool) -> String {
    let width = if color { grid.size() * 24 } else { grid.size() + 1 };
    let mut out = String::with_capacity(width * grid.size());
    for row in grid.rows() {
        for state in row {
            if color {
                let [r, g, b] = state.rgb();
                let _ = write!(out, "\x1b[48;2;{r};{g};{b}m  ");
            } else {
                out.push(state.glyph());
            }
        }
        if color {
            out.push_str(RESET);
        }
        out.push('\n');
    }
    out
}

/// Draws grids to stdout
pub struct TerminalRenderer {
    color: bool,
    every: u32,
    delay: Duration,
}

impl TerminalRenderer {
    /// Create a renderer
    ///
    /// # Arguments
    ///
    /// * `color` - Truecolour blocks instead of glyphs
    /// * `every` - Draw every n-th step (0 is treated as 1)
    /// * `delay` - Pause after each frame; non-zero redraws in place
    pub fn new(color: bool, every: u32, delay: Duration) -> Self {
        Self {
            color,
            every: every.max(1),
            delay,
        }
    }

    fn animated(&self) -> bool {
        !self.delay.is_zero()
    }

    fn draw(&self, heading: &str, grid: &ForestGrid) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.animated() {
            out.write_all(CLEAR_AND_HOME.as_bytes())?;
        }
        out.write_all(render_grid(grid, self.color).as_bytes())?;
        writeln!(out, "{heading}")?;
        out.flush()
    }
}

impl StepObserver for TerminalRenderer {
    fn on_step(&mut self, step: u32, grid: &ForestGrid, stats: &StepStatistics) {
        if step % self.every != 0 {
            return;
        }
        if let Err(e) = self.draw(&stats.to_string(), grid) {
            warn!("Failed to render step {}: {}", step, e);
            return;
        }
        if self.animated() {
            thread::sleep(self.delay);
        }
    }

    fn on_finish(&mut self, outcome: RunOutcome, grid: &ForestGrid, _stats: Option<&StepStatistics>) {
        if let Err(e) = self.draw(&format!("Final grid: {outcome}"), grid) {
            warn!("Failed to render final grid: {}", e);
        }
    }
}

/// Logs step statistics and the termination message
#[derive(Default)]
pub struct LoggingObserver;

impl StepObserver for LoggingObserver {
    fn on_step(&mut self, _step: u32, _grid: &ForestGrid, stats: &StepStatistics) {
        info!("{}", stats);
    }

    fn on_finish(&mut self, outcome: RunOutcome, _grid: &ForestGrid, stats: Option<&StepStatistics>) {
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        match outcome {
            RunOutcome::ExtinguishedEarly { step } => {
                info!("Fire died out at step {}", step);
            }
            RunOutcome::CompletedFull { steps } => {
                info!("Step budget of {} reached with fire still active", steps);
            }
        }
    }
}

/// Forwards every event to several observers in order
pub struct Fanout<'a>(pub Vec<&'a mut dyn StepObserver>);

impl StepObserver for Fanout<'_> {
    fn on_step(&mut self, step: u32, grid: &ForestGrid, stats: &StepStatistics) {
        for observer in &mut self.0 {
            observer.on_step(step, grid, stats);
        }
    }

    fn on_finish(&mut self, outcome: RunOutcome, grid: &ForestGrid, stats: Option<&StepStatistics>) {
        for observer in &mut self.0 {
            observer.on_finish(outcome, grid, stats);
        }
    }
}
