#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Rampart session headlessly.

mod args;
mod config;

use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;
use rampart_core::{Event, SimulationState, WaveId};
use rampart_simulation::Simulation;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{args::Cli, config::RunConfig};

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(&cli)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    ensure!(cli.dt_ms > 0, "--dt-ms must be positive");

    let mut config = RunConfig::load(cli.config.as_deref())?;
    if let Some(movement) = cli.movement {
        config.simulation.movement = movement.into();
    }
    if let Some(rule) = cli.placement_rule {
        config.simulation.placement = rule.into();
    }
    if let Some(currency) = cli.currency {
        config.simulation.starting_currency = currency;
    }

    let map = config.map.load_map(cli.map.as_deref())?;
    let mut simulation = Simulation::new(map, &config.simulation)?;

    for placement in &cli.placements {
        let _ = simulation.select_tower(placement.kind);
        for event in simulation.place_tower(placement.tile) {
            if let Event::TowerPlacementRejected { tile, reason, .. } = event {
                warn!(kind = ?placement.kind, ?tile, %reason, "placement_skipped");
                // Drop the pending selection so the next placement starts clean.
                if simulation.snapshot().selection == Some(placement.kind) {
                    let _ = simulation.select_tower(placement.kind);
                }
            }
        }
    }

    let _ = simulation.start_wave(WaveId::new(cli.wave));
    let dt = Duration::from_millis(cli.dt_ms);

    let mut defeated = 0_u32;
    for _ in 0..cli.ticks {
        let events = simulation.step(dt);
        defeated += events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDefeated { .. }))
            .count() as u32;
        if simulation.snapshot().state == SimulationState::Defeated {
            break;
        }
    }

    let snapshot = simulation.snapshot();
    let ticks = snapshot.tick;
    info!(
        ticks,
        wave = snapshot.wave.map_or(0, |wave| wave.get()),
        health = snapshot.player.health,
        currency = snapshot.player.currency,
        towers = snapshot.towers.len(),
        enemies = snapshot.enemies.len(),
        defeated,
        state = ?snapshot.state,
        "session_finished"
    );
    println!(
        "ticks={ticks} wave={} health={} currency={} towers={} enemies={} defeated={defeated} state={:?}",
        snapshot.wave.map_or(0, |wave| wave.get()),
        snapshot.player.health,
        snapshot.player.currency,
        snapshot.towers.len(),
        snapshot.enemies.len(),
        snapshot.state,
    );

    Ok(())
}
