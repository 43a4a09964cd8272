use elastic_grid::{Partition, Simulation, SimulationConfig, Throughput};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs;
use std::path::PathBuf;

/// Runs the simulation headless and logs diagnostics.
#[derive(Parser, Debug)]
struct Args {
    /// JSON configuration file. Defaults to the lattice demo.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of ticks to run.
    #[arg(short, long, default_value_t = 1200)]
    ticks: usize,
    /// Tick duration in seconds.
    #[arg(long, default_value_t = 1.0 / 120.0)]
    dt: f32,
    /// Log diagnostics every N ticks.
    #[arg(long, default_value_t = 120)]
    report_every: usize,
    /// Integrate bodies on all cores.
    #[arg(long)]
    parallel: bool,
    /// Use per-cell bucket lists instead of the sorted index.
    #[arg(long)]
    buckets: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SimulationConfig::from_json(&json)
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => SimulationConfig::lattice_demo(),
    };

    if args.parallel {
        config.parallel = true;
    }
    if args.buckets {
        config.partition = Partition::Buckets;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut sim = Simulation::setup(&config)?;

    let mut meter = Throughput::new();
    let every = args.report_every.max(1);

    for tick in 1..=args.ticks {
        sim.step(args.dt);
        meter.record(sim.bodies.len());

        if tick % every == 0 {
            let d = sim.diagnostics();
            log::info!(
                "tick {:>6}  energy {:>12.1}  momentum ({:>9.1}, {:>9.1})  checks {:>7}  hits {:>5}  {:>8.0} ticks/s",
                d.tick,
                d.kinetic_energy,
                d.momentum.x,
                d.momentum.y,
                d.last_step.pair_checks,
                d.last_step.collisions,
                meter.ticks_per_second()
            );
            meter.reset();
        }
    }

    Ok(())
}
