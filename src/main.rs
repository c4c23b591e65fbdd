//! Headless actor-network layout
//!
//! Loads a graph, runs the force simulation for a fixed number of frames and
//! exports the node table.

use std::path::PathBuf;
use std::process::ExitCode;

use actor_network::graph::compute_metrics;
use actor_network::{export, LayoutSimulation, NetworkData, Settings, StepOutcome, Viewport};
use clap::Parser;

/// Nominal frame time handed to the simulation
const FRAME_SECS: f32 = 1.0 / 60.0;

#[derive(Debug, Parser)]
#[command(name = "actor-network", version, about = "Force-directed layout for actor networks")]
struct Args {
    /// Graph JSON: {"nodes": [...], "edges": [...]}
    graph: PathBuf,

    /// Frames to simulate
    #[arg(long, default_value_t = 300)]
    steps: u32,

    /// Viewport width (overrides settings)
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height (overrides settings)
    #[arg(long)]
    height: Option<f32>,

    /// Seed for the initial scatter (overrides settings)
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file; defaults to the per-user config directory
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Recompute degree, betweenness and closeness before exporting
    #[arg(long)]
    compute_metrics: bool,

    /// Write the CSV here instead of stdout
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the laid-out graph as JSON (with x/y) instead of the CSV table
    #[arg(long)]
    positions: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> actor_network::Result<()> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }

    let viewport = Viewport::new(
        args.width.unwrap_or(settings.viewport_width),
        args.height.unwrap_or(settings.viewport_height),
    )?;

    let mut data = NetworkData::load_json(&args.graph)?;
    data.validate()?;
    if args.compute_metrics {
        compute_metrics(&mut data);
    }
    tracing::info!(
        "Loaded {} nodes and {} edges from {:?}",
        data.nodes.len(),
        data.edges.len(),
        args.graph
    );

    let mut sim = LayoutSimulation::new(
        data,
        viewport,
        settings.layout(),
        settings.simulation_options(),
    );
    for _ in 0..args.steps {
        if sim.step(FRAME_SECS) != StepOutcome::Advanced {
            break;
        }
    }
    tracing::info!(
        "Ran {} steps, kinetic energy {:.4}, settled: {}",
        sim.step_count(),
        sim.kinetic_energy(),
        sim.is_settled()
    );
    sim.dispose();

    if let Some(path) = &args.csv {
        export::write_csv(path, sim.nodes())?;
    }
    if args.positions {
        println!("{}", sim.snapshot().to_json()?);
    } else if args.csv.is_none() {
        println!("{}", export::to_csv(sim.nodes()));
    }

    Ok(())
}
