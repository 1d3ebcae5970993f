#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that runs a Tile Defence simulation.

mod ascii;
mod settings;

use std::{fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tile_defence_core::{Command, Event, TileCoord};
use tile_defence_rendering::Scene;
use tile_defence_system_builder::{Builder, BuilderInput};
use tile_defence_system_spawning::Enemies;
use tile_defence_system_tower_targeting::TowerTargeting;
use tile_defence_world::{self as world, query, GridController};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "tile-defence")]
#[command(about = "Runs a headless Tile Defence simulation and prints the final grid")]
struct Args {
    /// TOML file overriding grid, navigator and tower settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulation steps to run
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Length of a simulation step in milliseconds
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,

    /// Tower to place before the simulation starts, as ROW,COL
    #[arg(long = "build", value_name = "ROW,COL", value_parser = parse_tile)]
    builds: Vec<TileCoord>,

    /// Pointer click in world units, replayed as a click plus a build key
    /// press, as X,Y
    #[arg(long = "click", value_name = "X,Y", value_parser = parse_point)]
    clicks: Vec<(i32, i32)>,

    /// Log filter, overriding RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn parse_pair<T>(value: &str) -> Result<(T, T), String>
where
    T: FromStr,
    T::Err: Display,
{
    let (first, second) = value
        .split_once(',')
        .ok_or_else(|| format!("expected two comma separated values, got `{value}`"))?;
    let first = first
        .trim()
        .parse()
        .map_err(|error| format!("invalid value `{first}`: {error}"))?;
    let second = second
        .trim()
        .parse()
        .map_err(|error| format!("invalid value `{second}`: {error}"))?;
    Ok((first, second))
}

fn parse_tile(value: &str) -> Result<TileCoord, String> {
    parse_pair(value).map(|(row, column)| TileCoord::new(row, column))
}

fn parse_point(value: &str) -> Result<(i32, i32), String> {
    parse_pair(value)
}

#[derive(Debug, Default)]
struct Tally {
    spawned: usize,
    arrived: usize,
    hits: usize,
}

/// Entry point for the Tile Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let grid = settings.grid();
    let columns = usize::try_from(grid.columns).context("grid too wide")?;
    let mut controller = GridController::new(grid).context("failed to initialise the grid")?;
    let mut enemies = Enemies::new(settings.navigator());
    let mut targeting = TowerTargeting::new(settings.tower());
    let mut shots = Vec::new();

    let mut events = Vec::new();
    place_towers(&mut controller, &args.builds, &args.clicks, &mut events);
    for event in &events {
        match event {
            Event::TowerPlaced { tile, .. } => info!(?tile, "tower placed"),
            Event::TowerPlacementRejected { tile, reason } => {
                warn!(?tile, ?reason, "tower placement rejected");
            }
            _ => {}
        }
    }
    targeting.handle(&events, |position| enemies.nearest(position), &mut shots);

    let tally = simulate(
        &mut controller,
        &mut enemies,
        &mut targeting,
        args.ticks,
        Duration::from_millis(args.dt_ms),
    );
    info!(
        spawned = tally.spawned,
        arrived = tally.arrived,
        hits = tally.hits,
        remaining = enemies.len(),
        path_length = ?query::path_length(&controller),
        "simulation finished"
    );

    print!("{}", ascii::render(&Scene::capture(&controller), columns));
    println!(
        "spawned {} | reached base {} | destroyed {} | active {}",
        tally.spawned,
        tally.arrived,
        tally.hits,
        enemies.len()
    );
    Ok(())
}

/// Applies the requested builds, then replays each click through the builder
/// input layer as a click with the build key pressed and released.
fn place_towers(
    controller: &mut GridController,
    builds: &[TileCoord],
    clicks: &[(i32, i32)],
    events: &mut Vec<Event>,
) {
    let mut commands: Vec<Command> = builds
        .iter()
        .map(|&tile| Command::RequestBuildAt { tile })
        .collect();

    let mut builder = Builder::new();
    for &click in clicks {
        builder.handle(BuilderInput::new(Some(click), true), &mut commands);
        builder.handle(BuilderInput::default(), &mut commands);
    }

    for command in commands {
        world::apply(controller, command, events);
    }
}

/// Runs the tick, spawn, navigate, target loop. Shots resolve instantly.
fn simulate(
    controller: &mut GridController,
    enemies: &mut Enemies,
    targeting: &mut TowerTargeting,
    ticks: u32,
    dt: Duration,
) -> Tally {
    let mut tally = Tally::default();
    let base = query::path_view(controller).position_of(query::base_tile(controller));
    let mut events = Vec::new();
    let mut arrived = Vec::new();
    let mut shots = Vec::new();

    for _ in 0..ticks {
        events.clear();
        world::apply(controller, Command::Tick { dt }, &mut events);
        tally.spawned += events
            .iter()
            .filter(|event| matches!(event, Event::EnemySpawnRequested { .. }))
            .count();

        let path = query::path_view(controller);
        enemies.handle(&events, &path);
        if let Some(base) = base {
            arrived.clear();
            enemies.update(dt, &path, base, &mut arrived);
            tally.arrived += arrived.len();
        }

        shots.clear();
        targeting.handle(&events, |position| enemies.nearest(position), &mut shots);
        for shot in &shots {
            if enemies.remove(shot.enemy) {
                tally.hits += 1;
                info!(
                    tower = shot.tower.get(),
                    enemy = shot.enemy.get(),
                    "enemy destroyed"
                );
            }
        }
    }
    tally
}
