#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy steering system.
//!
//! Each enemy archetype maps to one decision strategy: random walking with a
//! tunable reluctance to backtrack, flow-field pursuit of the player, or
//! reactive flight from nearby rivals. The system is pure apart from its
//! seeded RNG: it consumes world events plus read-only views and emits
//! `Steer` commands for the world to arbitrate.

use maze_chase_core::{
    is_anti_direction, CellCoord, Command, Direction, EnemyKind, Event,
};
use maze_chase_world::query::{ActorSnapshot, ActorView, FlowView, PassabilityView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Manhattan radius, in cells, within which a hunter locks onto the player.
const HUNT_AWARENESS_RADIUS: u32 = 7;
/// Distance, in world units, at which a rival reacts to another enemy.
const RIVAL_THREAT_RADIUS: f32 = 2.5;
/// Direction rotations a threatened rival tries before giving up a tick.
const RIVAL_ROTATION_LIMIT: u8 = 4;

/// Backtrack-rejection chance, in percent, per strategy.
const WANDERER_NO_RETURN_CHANCE: u8 = 95;
const PHANTOM_NO_RETURN_CHANCE: u8 = 85;
const FALLBACK_NO_RETURN_CHANCE: u8 = 75;

/// Pure system that decides enemy movement and emits steer commands.
#[derive(Debug)]
pub struct Steering {
    rng: ChaCha8Rng,
}

impl Steering {
    /// Creates a steering system with a deterministic seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Consumes world events and immutable views to emit steer commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        actors: &ActorView,
        passability: PassabilityView<'_>,
        flow: FlowView<'_>,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let player_cell = actors.player().cell;
        for snapshot in actors.iter() {
            let Some(kind) = snapshot.kind else {
                continue;
            };
            if snapshot.frozen || snapshot.dead {
                continue;
            }
            let decision = match kind {
                EnemyKind::Wanderer => {
                    self.random_walk(snapshot, passability, WANDERER_NO_RETURN_CHANCE)
                }
                EnemyKind::Phantom => {
                    self.random_walk(snapshot, passability, PHANTOM_NO_RETURN_CHANCE)
                }
                EnemyKind::Hunter => self.hunt(snapshot, player_cell, passability, flow),
                EnemyKind::Rival => self.reactive_chase(snapshot, actors, passability),
            };
            if let Some(direction) = decision {
                out.push(Command::Steer {
                    actor: snapshot.id,
                    direction,
                });
            }
        }
    }

    fn random_walk(
        &mut self,
        snapshot: &ActorSnapshot,
        passability: PassabilityView<'_>,
        no_return_chance: u8,
    ) -> Option<Direction> {
        if !snapshot.target_reached {
            return None;
        }
        self.draw_walk_direction(snapshot, passability, no_return_chance)
    }

    /// Draws directions until a passable one survives the no-return roll.
    ///
    /// A rejected anti-direction rotates to the next direction instead of
    /// redrawing, which biases escapes over U-turns the same way repeated
    /// rolls would while keeping the loop short.
    fn draw_walk_direction(
        &mut self,
        snapshot: &ActorSnapshot,
        passability: PassabilityView<'_>,
        no_return_chance: u8,
    ) -> Option<Direction> {
        let can_step = |direction: Direction| step_allowed(snapshot, passability, direction);
        if !Direction::ALL.into_iter().any(|direction| can_step(direction)) {
            return None;
        }
        if no_return_chance >= 100
            && !Direction::ALL
                .into_iter()
                .any(|direction| can_step(direction) && !is_anti_direction(snapshot.direction, direction))
        {
            // Only the U-turn is open and it is always rejected.
            return None;
        }

        loop {
            let mut direction = Direction::ALL[self.rng.gen_range(0..4)];
            while is_anti_direction(snapshot.direction, direction)
                && self.rng.gen_range(0..100) < no_return_chance
            {
                direction = direction.rotated();
            }
            if can_step(direction) {
                return Some(direction);
            }
        }
    }

    fn hunt(
        &mut self,
        snapshot: &ActorSnapshot,
        player_cell: CellCoord,
        passability: PassabilityView<'_>,
        flow: FlowView<'_>,
    ) -> Option<Direction> {
        if !snapshot.target_reached {
            return None;
        }
        if snapshot.cell.manhattan_distance(player_cell) <= HUNT_AWARENESS_RADIUS {
            if let Some(direction) = flow.direction(player_cell, snapshot.cell) {
                if step_allowed(snapshot, passability, direction) {
                    return Some(direction);
                }
            }
        }
        self.draw_walk_direction(snapshot, passability, FALLBACK_NO_RETURN_CHANCE)
    }

    fn reactive_chase(
        &mut self,
        snapshot: &ActorSnapshot,
        actors: &ActorView,
        passability: PassabilityView<'_>,
    ) -> Option<Direction> {
        for other in actors.iter() {
            if other.id == snapshot.id || other.kind.is_none() {
                continue;
            }
            if other.vulnerable || other.dead {
                continue;
            }
            if snapshot.position.distance(other.position) >= RIVAL_THREAT_RADIUS {
                continue;
            }

            let bad = direction_toward(snapshot.cell, other.cell);
            if snapshot.target_reached {
                let mut direction = Direction::ALL[self.rng.gen_range(0..4)];
                let mut rotations = 0;
                while (direction == bad || !step_allowed(snapshot, passability, direction))
                    && rotations <= RIVAL_ROTATION_LIMIT
                {
                    direction = direction.rotated();
                    rotations += 1;
                }
                if rotations > RIVAL_ROTATION_LIMIT {
                    return None;
                }
                return Some(direction);
            }
            if snapshot.direction == Some(bad) {
                // Mid-move flight: the world snaps the reversal target.
                return Some(bad.opposite());
            }
            return None;
        }

        if !snapshot.target_reached {
            return None;
        }
        self.draw_walk_direction(snapshot, passability, FALLBACK_NO_RETURN_CHANCE)
    }
}

/// Direction from `from` toward `threat`, row axis first; co-located cells
/// resolve West.
fn direction_toward(from: CellCoord, threat: CellCoord) -> Direction {
    if threat.row() < from.row() {
        Direction::South
    } else if threat.row() > from.row() {
        Direction::North
    } else if threat.column() > from.column() {
        Direction::East
    } else {
        Direction::West
    }
}

fn step_allowed(
    snapshot: &ActorSnapshot,
    passability: PassabilityView<'_>,
    direction: Direction,
) -> bool {
    snapshot.cell.neighbor(direction).is_some_and(|cell| {
        passability.can_enter(cell, snapshot.water_accessible, snapshot.wall_accessible)
    })
}
