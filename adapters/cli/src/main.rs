#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless chase session.
//!
//! A built-in demo level is pumped through the session state machine, the
//! world rule engine, and the enemy steering system at a fixed frame rate.
//! The player follows a simple coin-seeking autopilot; every event the world
//! emits is printed with its frame number.

mod demo;

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use maze_chase_core::{Command, Event};
use maze_chase_system_session::{Session, SessionState};
use maze_chase_system_steering::Steering;
use maze_chase_world::{apply, query, World};

/// Headless runner for the chase rule engine.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Runs a headless chase session on the demo level")]
struct Args {
    /// Number of frames to simulate before giving up.
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Seed for the enemy steering RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Spare lives granted to the player.
    #[arg(long, default_value_t = 2)]
    lives: u32,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.fps > 0.0, "fps must be positive");

    let layout = demo::layout();
    let mut world = World::from_layout(&layout).context("demo layout rejected by the world")?;
    let mut session = Session::new(args.lives);
    let mut steering = Steering::new(args.seed);
    let dt = Duration::from_secs_f32(1.0 / args.fps);

    let mut events: Vec<Event> = Vec::new();
    for frame in 0..args.frames {
        let mut commands = Vec::new();
        session.advance(dt, &events, &mut commands);
        if let Some(command) = autopilot(&world) {
            commands.push(command);
        }
        let actors = query::actor_view(&world);
        steering.handle(
            &events,
            &actors,
            query::passability(&world),
            query::flow(&world),
            &mut commands,
        );

        events.clear();
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        for event in &events {
            report(frame, event);
        }

        match session.state() {
            SessionState::Victory => {
                println!("frame {frame}: level cleared, score {}", query::score(&world));
                return Ok(());
            }
            SessionState::GameOver => {
                println!("frame {frame}: game over, score {}", query::score(&world));
                return Ok(());
            }
            _ => {}
        }
    }

    println!(
        "frame budget exhausted: score {}, {} coins left, {} lives left",
        query::score(&world),
        query::coins_remaining(&world),
        session.lives(),
    );
    Ok(())
}

/// Steers the player toward the nearest remaining coin.
fn autopilot(world: &World) -> Option<Command> {
    let player = query::actor_view(world).player().clone();
    if !player.target_reached {
        return None;
    }
    let target = query::coin_cells(world)
        .into_iter()
        .min_by_key(|cell| cell.manhattan_distance(player.cell))?;
    let direction = query::flow(world).direction(target, player.cell)?;
    Some(Command::SetPlayerIntent {
        direction: Some(direction),
    })
}

fn report(frame: u32, event: &Event) {
    match event {
        Event::TimeAdvanced { .. } => {}
        Event::CoinEaten {
            actor,
            cell,
            remaining,
        } => println!(
            "frame {frame}: actor {} ate the coin at ({}, {}), {remaining} left",
            actor.get(),
            cell.column(),
            cell.row(),
        ),
        Event::PowerUpConsumed { actor, kind, cell } => println!(
            "frame {frame}: actor {} picked up {kind:?} at ({}, {})",
            actor.get(),
            cell.column(),
            cell.row(),
        ),
        Event::EffectActivated { kind } => println!("frame {frame}: {kind:?} activated"),
        Event::EffectExpired { kind } => println!("frame {frame}: {kind:?} expired"),
        Event::WallsShattered { cells } => {
            println!("frame {frame}: {} walls shattered", cells.len());
        }
        Event::EnemyEaten { actor } => {
            println!("frame {frame}: enemy {} eaten", actor.get());
        }
        Event::EnemyFelled { actor } => {
            println!("frame {frame}: enemy {} felled", actor.get());
        }
        Event::EnemyRevived { actor } => {
            println!("frame {frame}: enemy {} revived", actor.get());
        }
        Event::PlayerDied { cause } => println!("frame {frame}: player died ({cause:?})"),
        Event::PlayerRespawned => println!("frame {frame}: player respawned"),
        Event::TeleportTraversed {
            actor, from, to, ..
        } => println!(
            "frame {frame}: actor {} teleported ({}, {}) -> ({}, {})",
            actor.get(),
            from.column(),
            from.row(),
            to.column(),
            to.row(),
        ),
        Event::LevelCleared => println!("frame {frame}: all coins collected"),
    }
}
