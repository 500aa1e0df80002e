//! Headless runner: steps days in the background while presenting the
//! previous day's snapshot.

mod telemetry;

use anyhow::{Context, Result};
use bobs_core::{GameConfig, RunSummary};
use bobs_world::{GridSnapshot, SharedSimulation, Simulation};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// Run a bobs foraging simulation
#[derive(Parser, Debug)]
#[command(name = "bobs-runner")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file (defaults apply to missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of days to simulate (overrides the configuration)
    #[arg(short, long)]
    days: Option<u32>,

    /// Random seed (overrides the configuration)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the final grid snapshot as JSON
    #[arg(long)]
    snapshot_out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json)?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(days) = args.days {
        config.schedule.days = days;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    info!(
        seed = config.seed,
        width = config.world_config.width,
        height = config.world_config.height,
        initial_population = config.initial_population,
        days = config.schedule.days,
        ticks_per_day = config.schedule.ticks_per_day,
        "Starting bobs runner"
    );

    let days = config.schedule.days;
    let mut simulation = Simulation::new(config)?;
    simulation.populate()?;
    let shared = SharedSimulation::new(simulation);

    let mut summary = RunSummary::new(shared.read().population());
    for _ in 0..days {
        // The presented copy is taken before the day thread can touch the grid.
        let frame = shared.snapshot();
        let handle = shared.spawn_day()?;
        present(&frame);
        summary.record(handle.join()?);
    }

    info!(
        event = "run_summary",
        days = summary.days.len(),
        initial_population = summary.initial_population,
        final_population = summary.final_population(),
        peak_population = summary.peak_population(),
        total_births = summary.total_births(),
        total_deaths = summary.total_deaths(),
        "Run complete"
    );

    if let Some(path) = &args.snapshot_out {
        let json = shared.snapshot().to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Final snapshot written");
    }

    Ok(())
}

/// Stand-in for a renderer: report what a frame would show
fn present(frame: &GridSnapshot) {
    let crowded = frame
        .cells()
        .iter()
        .max_by_key(|cell| cell.counts().total());

    info!(
        event = "frame",
        day = frame.day,
        tick = frame.tick,
        population = frame.population(),
        food = frame.food_count(),
        occupied_cells = frame.cells().len(),
        "Presenting snapshot"
    );

    if let Some(cell) = crowded {
        let counts = cell.counts();
        debug!(
            x = cell.position.x,
            y = cell.position.y,
            bobs = counts.bobs,
            foods = counts.foods,
            "Most crowded cell"
        );
    }
}
