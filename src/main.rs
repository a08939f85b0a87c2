//! Headless driver for the sandbox.
//!
//! Runs the simulation for a fixed number of ticks with the player parked
//! at its start position and writes every `--every`th frame to stdout as a
//! JSON line.
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::info;
use wanderers::{init_logging, BeliefInbox, LogSink, SimConfig, Simulation, ThoughtFeed, PLAYER_START};

/// Wandering humans, seen from above
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,
    /// Seed for the random source
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Emit one frame every N ticks
    #[arg(long, default_value_t = 1)]
    every: u64,
    /// Feed periodic external thoughts into the crowd
    #[arg(long)]
    external_thoughts: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    let mut simulation =
        Simulation::seeded(config, args.seed).context("building the simulation")?;
    let mut feed = args
        .external_thoughts
        .then(|| ThoughtFeed::new(simulation.config().thought_interval));
    let mut inbox = BeliefInbox::default();
    let player = Vec3::from_array(PLAYER_START);
    let every = args.every.max(1);

    info!(
        "running {} tick(s) with {} human(s)",
        args.ticks,
        simulation.humans().len()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for tick in 1..=args.ticks {
        if let Some(source) = feed.as_mut() {
            let ids: Vec<_> = simulation.ids().collect();
            source.poll(args.dt, ids, simulation.rng_mut(), &mut inbox);
        }
        let frame = simulation.step_with_inbox(args.dt, player, &mut inbox, &mut LogSink);
        if tick % every == 0 {
            serde_json::to_writer(&mut out, &frame).context("encoding frame")?;
            out.write_all(b"\n").context("writing frame")?;
        }
    }
    out.flush().context("flushing output")?;

    if simulation.void_mode() {
        info!("the void was entered");
    }
    Ok(())
}
