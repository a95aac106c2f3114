//! Forwarding-state routing CLI
//!
//! Drives a [`fstate_routing::RouterController`] over a chosen demo
//! topology and writes per-timestep forwarding-delta and bandwidth files.
//!
//! Usage:
//!   fstate-cli --config config.json
//!   fstate-cli --topology walker --algorithm anchor_lmsr --output-dir out/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use fstate_routing::config::{Algorithm, RouterConfig};
use fstate_routing::controller::RouterController;
use fstate_routing::snapshot::GraphProvider;
use fstate_routing::synthetic::{static_topology, with_ground_stations, FixedSequenceProvider};
use fstate_routing::types::GslCandidate;

mod walker_provider;
use walker_provider::WalkerGraphProvider;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TopologyKind {
    /// 3x3 plus-grid with two ground stations, unchanging over time.
    Grid,
    /// Walker-Delta HALO constellation, propagated with SGP4 each step.
    Walker,
}

#[derive(Parser, Debug)]
#[command(
    name = "fstate-cli",
    about = "Compute delta-encoded forwarding tables for a LEO constellation mesh"
)]
struct Args {
    /// Run configuration as JSON (spec schema); omit to use `--topology`'s built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Demo topology to route over when `--config` is not given.
    #[arg(long, value_enum, default_value_t = TopologyKind::Grid)]
    topology: TopologyKind,

    /// Override the configured algorithm.
    #[arg(long)]
    algorithm: Option<String>,

    /// Override the configured look-ahead window size.
    #[arg(long)]
    lookahead_steps: Option<u32>,

    /// Override the configured anchor set (comma-separated satellite ids).
    #[arg(long, value_delimiter = ',')]
    anchor_set: Option<Vec<u32>>,

    /// Override the configured output directory.
    #[arg(long)]
    output_dir: Option<String>,

    /// Number of timesteps to run; overrides the configured duration.
    #[arg(long)]
    steps: Option<u64>,

    /// Verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let topology = args.topology;

    let (mut config, provider): (RouterConfig, Box<dyn GraphProvider>) = match &args.config {
        Some(path) => {
            let config = RouterConfig::load_file(path)
                .with_context(|| format!("loading config file {}", path.display()))?;
            let provider = build_provider(topology, config.num_satellites, config.num_ground_stations);
            (config, provider)
        }
        None => default_run(topology),
    };

    if let Some(algorithm) = &args.algorithm {
        config.algorithm = algorithm
            .parse()
            .with_context(|| format!("unknown algorithm {algorithm:?}"))?;
    }
    if let Some(k) = args.lookahead_steps {
        config.lookahead_steps = k;
    }
    if let Some(anchors) = args.anchor_set {
        config.anchor_set = anchors;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    config.validate().context("invalid run configuration")?;

    let num_steps = args.steps.unwrap_or_else(|| config.num_steps().max(1));
    let output_dir = PathBuf::from(&config.output_dir);

    info!(
        algorithm = ?config.algorithm,
        satellites = config.num_satellites,
        ground_stations = config.num_ground_stations,
        steps = num_steps,
        "starting forwarding-state run"
    );

    let mut controller = RouterController::new(config)?;
    for step in 0..num_steps {
        controller.step(provider.as_ref(), step, &output_dir)?;
        info!(timestep = step, "step complete");
    }

    info!("run complete, output written to {}", output_dir.display());
    Ok(())
}

/// Build a default `RouterConfig` + provider pair for `--topology` when no
/// `--config` file was given (SPEC_FULL.md §2 `cli` SUPPLEMENT).
fn default_run(topology: TopologyKind) -> (RouterConfig, Box<dyn GraphProvider>) {
    let (num_satellites, num_ground_stations) = match topology {
        TopologyKind::Grid => (9, 2),
        TopologyKind::Walker => (12, 8),
    };
    let provider = build_provider(topology, num_satellites, num_ground_stations);
    let config = RouterConfig {
        num_satellites,
        num_ground_stations,
        time_step_ns: 1_000_000_000,
        duration_s: 10,
        max_gsl_length_m: 2_000_000.0,
        max_isl_length_m: 6_000_000.0,
        algorithm: Algorithm::FreeGs,
        lookahead_steps: 10,
        anchor_set: Vec::new(),
        output_dir: "output".to_string(),
        emit_sat_to_sat: true,
    };
    (config, provider)
}

fn build_provider(topology: TopologyKind, expected_sats: u32, expected_gs: u32) -> Box<dyn GraphProvider> {
    match topology {
        TopologyKind::Grid => Box::new(grid_demo_provider(expected_sats, expected_gs)),
        TopologyKind::Walker => Box::new(WalkerGraphProvider::new(2_000_000.0, 6_000_000.0, 1_000_000_000)),
    }
}

/// A static 3x3 plus-grid with two ground stations each visible to two
/// disjoint corner satellites — the demo topology from spec.md §8
/// scenario B, replayed unchanged at every timestep.
fn grid_demo_provider(num_satellites: u32, num_ground_stations: u32) -> FixedSequenceProvider {
    let cols = 3u32;
    let rows = (num_satellites + cols - 1) / cols;
    let id = |r: u32, c: u32| r * cols + c;

    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let node = id(r, c);
            if node >= num_satellites {
                continue;
            }
            if c + 1 < cols && id(r, c + 1) < num_satellites {
                edges.push((node, id(r, c + 1), 1_000_000.0));
            }
            if r + 1 < rows && id(r + 1, c) < num_satellites {
                edges.push((node, id(r + 1, c), 1_000_000.0));
            }
        }
    }

    let corners = [id(0, 0), id(0, cols.min(3) - 1), id(rows.min(3) - 1, 0)];
    let gs_in_range: Vec<Vec<GslCandidate>> = (0..num_ground_stations)
        .map(|gid| {
            let sat = corners[gid as usize % corners.len()].min(num_satellites.saturating_sub(1));
            vec![GslCandidate {
                distance_m: 500_000.0,
                sat_id: sat,
            }]
        })
        .collect();

    let base = static_topology(num_satellites, 0, &edges, Vec::new());
    let snapshot = with_ground_stations(base, gs_in_range);
    FixedSequenceProvider::new(vec![snapshot])
}
