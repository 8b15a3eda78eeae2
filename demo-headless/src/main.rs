mod render;

use clap::Parser;
use forest_fire_core::{
    RunSummary, ScanMode, ScenarioPreset, Simulation, SimulationConfig, StepObserver,
};
use render::{Fanout, LoggingObserver, TerminalRenderer};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Forest fire cellular automaton in the terminal
#[derive(Parser, Debug)]
#[command(name = "forest-fire-demo")]
#[command(about = "Stochastic forest fire simulation with regrowth", long_about = None)]
struct Args {
    /// Grid side length (the grid is N x N)
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Chance per step that empty ground grows a tree (0-1)
    #[arg(short, long)]
    growth_rate: Option<f64>,

    /// Chance per step that a tree next to a fire catches (0-1)
    #[arg(short, long)]
    spread_chance: Option<f64>,

    /// Fraction of cells holding a tree at the start (0-1)
    #[arg(short, long)]
    density: Option<f64>,

    /// Maximum number of steps
    #[arg(short = 't', long)]
    steps: Option<u32>,

    /// RNG seed (random when omitted; the chosen seed is logged)
    #[arg(long)]
    seed: Option<u64>,

    /// Scan rows on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Scenario preset (sparse, dense, regrowing)
    #[arg(short, long)]
    preset: Option<ScenarioPreset>,

    /// JSON file with simulation parameters; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pause between frames in milliseconds (non-zero redraws in place)
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Draw every n-th step
    #[arg(long, default_value_t = 1)]
    render_every: u32,

    /// Do not draw the grid, only log statistics
    #[arg(long)]
    no_render: bool,

    /// Plain glyphs instead of truecolour blocks
    #[arg(long)]
    no_color: bool,

    /// Write the run summary and per-step history as JSON
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = build_config(args)?;

    info!(
        "Forest: {0}x{0}, density {1}, growth {2}, spread {3}, {4} steps",
        config.grid_size,
        config.initial_density,
        config.growth_rate,
        config.spread_chance,
        config.steps
    );

    let simulation = Simulation::from_config(config)?;

    let mut logger = LoggingObserver;
    let mut renderer = TerminalRenderer::new(
        !args.no_color,
        args.render_every,
        Duration::from_millis(args.delay_ms),
    );
    let mut observers: Vec<&mut dyn StepObserver> = vec![&mut logger as &mut dyn StepObserver];
    if !args.no_render {
        observers.push(&mut renderer);
    }

    let summary = simulation.run(&mut Fanout(observers));
    print_summary(&summary);

    if let Some(path) = &args.stats_out {
        write_summary(path, &summary)?;
        info!("Statistics written to {}", path.display());
    }
    Ok(())
}

/// Layer the parameter sources: config file or preset, then individual flags
fn build_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config: SimulationConfig = if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("invalid config {}: {}", path.display(), e))?
    } else if let Some(preset) = args.preset {
        info!("Using '{}' preset", preset);
        preset.config()
    } else {
        SimulationConfig::default()
    };

    if let Some(size) = args.size {
        config.grid_size = size;
    }
    if let Some(growth_rate) = args.growth_rate {
        config.growth_rate = growth_rate;
    }
    if let Some(spread_chance) = args.spread_chance {
        config.spread_chance = spread_chance;
    }
    if let Some(density) = args.density {
        config.initial_density = density;
    }
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.parallel {
        config.scan_mode = ScanMode::Parallel;
    }

    config.validate()?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== {} ===", summary.outcome);
    println!("Seed: {}", summary.seed);
    println!(
        "Peak fire: {} trees burning at step {}",
        summary.peak_burning.trees_burning, summary.peak_burning.step
    );
    if let Some(stats) = summary.final_stats() {
        println!(
            "Trees: {} initial, {} grown, {} burned ({:.2}%), {} remaining",
            stats.initial_trees,
            stats.trees_grown_total,
            stats.trees_burned_total,
            stats.burned_percent,
            stats.trees_remaining
        );
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
    Ok(())
}
