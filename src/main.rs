//! Headless runner that loads a scenario and steps the simulation.

use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use kcc_sim::{init_logging, KccSimPlugin, KinematicState, Npc, Platform, Player, Scenario};
use log::info;

const DEMO_SCENARIO: &str = include_str!("../scenarios/demo.json");

/// Runs the platform and processor simulation headless for a number of ticks
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario JSON file; the built-in demo is used when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Number of fixed ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn report(world: &mut World) {
    let mut players = world.query::<(Entity, &Player, &Transform, &KinematicState)>();
    for (entity, player, transform, kcc) in players.iter(world) {
        info!(
            "player {} ({entity}) at {} grounded={}",
            player.player_ref.0, transform.translation, kcc.is_grounded
        );
    }
    let mut npcs = world.query_filtered::<(Entity, &Transform), With<Npc>>();
    for (entity, transform) in npcs.iter(world) {
        info!("npc {entity} at {}", transform.translation);
    }
    let mut platforms = world.query::<(Entity, &Platform, &Transform)>();
    for (entity, platform, transform) in platforms.iter(world) {
        info!(
            "platform {entity} at {} heading to waypoint {} with {} riders",
            transform.translation,
            platform.motion.current_waypoint,
            platform.riders.len()
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::from_json(DEMO_SCENARIO).context("parsing built-in demo scenario")?,
    };

    let mut app = App::new();
    app.add_plugins(KccSimPlugin);
    scenario.spawn(app.world_mut());

    for _ in 0..args.ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }
    info!("simulated {} ticks", args.ticks);
    report(app.world_mut());
    Ok(())
}
