//! ladder_walk: one agent crosses a walled yard and climbs onto a ledge.
//!
//! Usage: `ladder_walk [config.json]`.  The optional document is a
//! `NavConfig`; missing fields keep their defaults.  Set `RUST_LOG=debug`
//! to see planner and executor decisions.

mod level;

use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;

use tn_core::{AgentId, MovementMode, NavConfig};
use tn_motion::{Body, EventLog, MovementExecutor, MovementObserver};

use level::{Ledge, build_level};

// ── Constants ─────────────────────────────────────────────────────────────────

const DT:        f32   = 1.0 / 30.0;
const MAX_TICKS: usize = 10_000;
const REPORT_EVERY: usize = 15;

// ── Observers ─────────────────────────────────────────────────────────────────

/// Prints lifecycle events as they happen.
struct Announcer;

impl MovementObserver for Announcer {
    fn on_movement_finished(&mut self) {
        println!("  ** movement finished");
    }

    fn on_movement_mode_changed(&mut self, old: MovementMode, new: MovementMode) {
        println!("  ** mode {old} -> {new}");
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn load_config() -> Result<NavConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(NavConfig::default());
    };
    let file = File::open(&path).with_context(|| format!("opening {path}"))?;
    let config: NavConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {path}"))?;
    info!("loaded configuration from {path}");
    Ok(config.validated()?)
}

fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;
    let size = config.grid.tile_size;

    let mut level = build_level(config.grid.clone())?;
    let ledge = Ledge { tile_size: size, height: level.ledge_height };
    let placed = level.grid.generate_transient_tiles(&ledge, level.ledge_anchor, size * 3.0);
    println!(
        "grid: {} tiles ({} transient), tile size {size}",
        level.grid.len(),
        placed
    );

    let mut exec = MovementExecutor::new(AgentId(0), config.movement.clone());
    let log = EventLog::new();
    exec.add_observer(Box::new(Announcer));
    exec.add_observer(Box::new(log.clone()));

    let start = level.grid.tile(level.start).context("start tile missing")?.location;
    let mut body = Body::at(start);
    let graph = exec.graph(&level.grid, &level.walls);

    let in_range = exec.tiles_in_range(&graph, &body);
    println!("reachable within {}: {} tiles", config.movement.movement_range, in_range.len());
    for &t in in_range.tiles() {
        println!("  {t}  cost {:.0}", in_range.cost(t).unwrap_or(f32::NAN));
    }

    if !exec.can_move_to(&graph, &body, level.goal) {
        bail!("goal {} is unreachable", level.goal);
    }
    let t0 = Instant::now();
    if !exec.move_to(&graph, &body, level.goal) {
        bail!("failed to plan a path to {}", level.goal);
    }
    if let Some(plan) = exec.active_plan() {
        println!(
            "plan: {} tiles -> {} waypoints, length {:.0}, cost {:.0} ({:.2?})",
            plan.path.len(),
            plan.waypoints.len(),
            plan.length(),
            plan.cost(),
            t0.elapsed()
        );
        for seg in &plan.segments {
            println!("  [{:>6.1}, {:>6.1})  {:?}", seg.start, seg.end, seg.modes);
        }
    }

    let mut ticks = 0;
    while exec.is_moving() {
        exec.tick(&mut body, DT);
        ticks += 1;
        if ticks % REPORT_EVERY == 0 {
            println!(
                "  t={:>5.2}s  {:<12} at ({:.0}, {:.0}, {:.0}), {:.0} to go",
                ticks as f32 * DT,
                exec.mode(),
                body.location.x,
                body.location.y,
                body.location.z,
                exec.remaining_distance()
            );
        }
        if ticks >= MAX_TICKS {
            bail!("agent still moving after {MAX_TICKS} ticks");
        }
    }

    println!(
        "arrived on {:?} at ({:.0}, {:.0}, {:.0}) after {ticks} ticks, {} events",
        exec.current_tile(),
        body.location.x,
        body.location.y,
        body.location.z,
        log.events().len()
    );
    Ok(())
}
