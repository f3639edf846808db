//! Gap Arena entry point
//!
//! Headless runner: loads a config, runs the simulation for a number of
//! ticks and optionally captures every frame to disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gap_arena::SimulationConfig;
use gap_arena::capture::FrameRecorder;
use gap_arena::driver::{Driver, NeverQuit};
use gap_arena::render::{FrameSink, NullSink};
use gap_arena::sim::PolicyKind;

#[derive(Parser, Debug)]
#[command(name = "gap-arena")]
#[command(about = "Bodies bouncing inside a circular arena with a hole in the wall")]
struct Cli {
    /// Path to config file (JSON); defaults are used when omitted
    config: Option<PathBuf>,

    /// Number of ticks to run (600 = ten seconds at 60 ticks/s)
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Run in real time at the configured tick rate
    #[arg(long)]
    paced: bool,

    /// Escape policy: bounce_and_duplicate, pass_through or absorb
    #[arg(long)]
    policy: Option<PolicyKind>,

    /// RNG seed, overriding the config
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Gap Arena starting...");

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut sink: Box<dyn FrameSink> = if config.capture.enabled {
        let run_name = FrameRecorder::run_name(config.seed);
        let recorder = FrameRecorder::new(&config.capture.dir, &run_name)
            .context("failed to prepare capture directory")?;
        Box::new(recorder)
    } else {
        Box::new(NullSink)
    };

    let mut driver = Driver::new(config).context("invalid configuration")?;
    let summary = if cli.paced {
        driver.run_paced(sink.as_mut(), &mut NeverQuit, Some(cli.ticks))
    } else {
        driver.run(sink.as_mut(), &mut NeverQuit, Some(cli.ticks))
    }
    .context("simulation aborted")?;

    println!(
        "{} ticks, {} bodies alive ({} escaped, {} spawned, {} left the viewport, {} reflections)",
        summary.ticks,
        summary.bodies,
        summary.counts.escaped,
        summary.counts.spawned,
        summary.counts.left_viewport,
        summary.counts.reflected
    );
    Ok(())
}
