//! Headless chase demo.
//!
//! Builds a lattice, scatters pursuers and evaders over it and runs a fixed
//! number of frames. Pursuers steer by queueing the axis towards their
//! nearest evader; evaders within the capture radius of a pursuer are
//! marked captured. A JSON summary is logged at the end.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use glam::{Vec2, Vec3};
use log::{debug, info};
use pathchase::{
    init_logging, Cardinal, ChaseConfig, LiveInput, MovementSystem, PathGraph, SeededRng,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Graph-constrained chase simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON file with tunables; defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for spawn placement and evader decisions
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Lattice columns
    #[arg(long, default_value_t = 8)]
    cols: usize,
    /// Lattice rows
    #[arg(long, default_value_t = 8)]
    rows: usize,
    /// Distance between lattice nodes
    #[arg(long, default_value_t = 10.0)]
    spacing: f32,
    /// Number of pursuers
    #[arg(long, default_value_t = 2)]
    pursuers: usize,
    /// Number of evaders
    #[arg(long, default_value_t = 6)]
    evaders: usize,
    /// Pursuer-to-evader distance that counts as a capture
    #[arg(long, default_value_t = 1.0)]
    capture_radius: f32,
    /// Resolve each frame against positions captured before it
    #[arg(long)]
    snapshot: bool,
}

#[derive(Serialize)]
struct Summary {
    frames: u32,
    evaders: usize,
    captured: usize,
    stalled: usize,
    captures: Vec<Capture>,
}

#[derive(Serialize)]
struct Capture {
    frame: u32,
    evader: usize,
    pursuer: usize,
}

fn load_config(path: Option<&PathBuf>) -> Result<ChaseConfig> {
    let Some(path) = path else {
        return Ok(ChaseConfig::default());
    };
    let config = ChaseConfig::from_path(path)
        .with_context(|| format!("loading tunables from {}", path.display()))?;
    info!("loaded tunables from {}", path.display());
    Ok(config)
}

/// Idle live input: a pursuer that cannot carry on simply stops until the
/// host queues a new turn.
const fn idle(_slot: usize) -> LiveInput {
    LiveInput::NONE
}

fn scatter(rng: &mut ChaCha8Rng, extent: Vec2) -> Vec3 {
    let x = rng.random::<f32>() * extent.x;
    let z = rng.random::<f32>() * extent.y;
    Vec3::new(x, 0.0, z)
}

/// Cardinal direction of the dominant axis from `from` to `to`.
fn towards(from: Vec2, to: Vec2) -> Option<Cardinal> {
    let delta = to - from;
    let axis = if delta.x.abs() >= delta.y.abs() {
        Vec2::new(delta.x, 0.0)
    } else {
        Vec2::new(0.0, delta.y)
    };
    Cardinal::from_vector(axis)
}

fn steer_pursuers(system: &mut MovementSystem) {
    let targets: Vec<Vec2> = system
        .evaders()
        .iter()
        .filter(|e| !e.captured && e.state.is_snapped())
        .map(|e| e.state.ground())
        .collect();
    let plans: Vec<(usize, Cardinal)> = system
        .pursuers()
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let here = p.state.ground();
            let target = targets
                .iter()
                .copied()
                .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)))?;
            towards(here, target).map(|dir| (i, dir))
        })
        .collect();
    for (i, dir) in plans {
        if system.pursuer(i).and_then(|p| p.queued) != Some(dir) {
            system.queue_direction(i, dir);
        }
    }
}

fn resolve_captures(system: &mut MovementSystem, radius: f32, frame: u32) -> Vec<Capture> {
    let hunters: Vec<(usize, Vec2)> = system
        .pursuers()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.active && p.state.is_snapped())
        .map(|(i, p)| (i, p.state.ground()))
        .collect();
    let caught: Vec<Capture> = system
        .evaders()
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.captured)
        .filter_map(|(evader, e)| {
            let here = e.state.ground();
            hunters
                .iter()
                .find(|(_, at)| at.distance(here) <= radius)
                .map(|&(pursuer, _)| Capture {
                    frame,
                    evader,
                    pursuer,
                })
        })
        .collect();
    for capture in &caught {
        info!(
            "frame {}: pursuer {} captured evader {}",
            capture.frame, capture.pursuer, capture.evader
        );
        system.set_captured(capture.evader, true);
    }
    caught
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(args.dt > 0.0, "--dt must be positive, got {}", args.dt);

    let config = load_config(args.config.as_ref())?;
    config.validate()?;
    let graph = PathGraph::lattice(args.cols, args.rows, args.spacing)
        .context("building the demo lattice")?;
    #[expect(
        clippy::cast_precision_loss,
        reason = "Lattice dimensions are far below f32 precision limits."
    )]
    let extent = Vec2::new(
        args.cols.saturating_sub(1) as f32 * args.spacing,
        args.rows.saturating_sub(1) as f32 * args.spacing,
    );

    let mut system = MovementSystem::new(Arc::new(graph), config)
        .with_rng(SeededRng::new(args.seed))
        .with_input(idle);
    let mut placement = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(1));
    for _ in 0..args.pursuers {
        system.spawn_pursuer(scatter(&mut placement, extent));
    }
    for _ in 0..args.evaders {
        system.spawn_evader(scatter(&mut placement, extent));
    }
    debug!("{system:?}");

    let mut captures = Vec::new();
    for frame in 0..args.frames {
        steer_pursuers(&mut system);
        if args.snapshot {
            system.step_snapshot(args.dt);
        } else {
            system.step(args.dt);
        }
        captures.extend(resolve_captures(&mut system, args.capture_radius, frame));
        if system.evaders().iter().all(|e| e.captured) {
            info!("all evaders captured after {} frames", frame + 1);
            break;
        }
    }

    let summary = Summary {
        frames: args.frames,
        evaders: system.evaders().len(),
        captured: system.evaders().iter().filter(|e| e.captured).count(),
        stalled: system.evaders().iter().filter(|e| e.stalled).count(),
        captures,
    };
    info!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
