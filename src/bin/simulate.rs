use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fleetdispatch::*;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Runs a seeded drone field to completion and prints the dispatcher summary.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
	/// Optional JSON file overriding `DispatcherConfig` defaults.
	#[arg(long, env = "FLEETDISPATCH_CONFIG")]
	config: Option<PathBuf>,

	#[arg(long, default_value_t = 5)]
	drones: u32,

	#[arg(long, default_value_t = 50)]
	tasks: u32,

	#[arg(long, default_value_t = 42)]
	seed: u64,

	/// Simulated milliseconds per frame.
	#[arg(long, default_value_t = 16)]
	frame_ms: u64,

	#[arg(long, default_value_t = 200_000)]
	max_frames: u64,

	/// Use the exact assignment solver instead of the greedy matcher.
	#[arg(long)]
	hungarian: bool,

	/// Emit logs as JSON lines.
	#[arg(long)]
	json_logs: bool,

	/// Print the per-drone and per-task panel at the end.
	#[arg(long)]
	panel: bool,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	if args.json_logs {
		fmt().json().with_env_filter(filter).init();
	} else {
		fmt().with_env_filter(filter).init();
	}

	let mut config = match &args.config {
		Some(path) => DispatcherConfig::from_json_file(path)
			.with_context(|| format!("load config: {}", path.display()))?,
		None => DispatcherConfig::default(),
	};
	if args.hungarian {
		config.strategy = MatchStrategy::Hungarian;
	}

	let mut sim = Simulation::from_seed(config, args.drones, args.tasks, args.seed)
		.context("build seeded field")?;
	info!(drones = args.drones, tasks = args.tasks, seed = args.seed, "simulation started");

	let frames = sim.run_to_completion(args.frame_ms, args.max_frames)?;
	let report = sim.dispatcher.export_metrics();
	match frames {
		Some(n) => info!(frames = n, sim_ms = sim.dispatcher.now_ms(), "all tasks completed"),
		None => info!(frames = sim.frames(), pending = report.pending_tasks, "frame budget exhausted"),
	}

	println!("{}", format_summary(&report));
	if args.panel {
		for line in format_side_panel(&sim.dispatcher) {
			println!("{line}");
		}
	}
	println!("{}", report.to_json()?);
	Ok(())
}
