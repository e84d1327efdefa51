#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! It also fixes the grid geometry: cells are squares of [`CELL_SIZE`] world
//! units, actors move continuously between cell centers, and
//! [`render_position`] is the affine map from grid space into render space.

use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Side length of a single square grid cell in world units.
pub const CELL_SIZE: f32 = 3.0;

/// Default travel speed of an actor in world units per second.
pub const BASE_SPEED: f32 = 6.5;

/// Default proximity radius used for pickup and contact tests.
///
/// Contact tests compare Euclidean distance against this radius instead of
/// exact cell-index equality, which tolerates near-miss alignment between
/// continuously moving actors.
pub const AFFECT_DISTANCE: f32 = 1.3;

/// Cardinal movement directions available to actors.
///
/// The declaration order is the rotation order: [`Direction::rotated`] steps
/// to the next variant, wrapping from `South` back to `West`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing row indices.
    South,
}

impl Direction {
    /// All four directions in rotation order.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
    ];

    /// Direction sharing this direction's axis with the opposite sense.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
        }
    }

    /// Next direction in rotation order, wrapping around.
    #[must_use]
    pub const fn rotated(self) -> Direction {
        match self {
            Direction::West => Direction::North,
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
        }
    }

    /// Signed `(column, row)` offset of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
        }
    }

    /// Unit travel vector of this direction in continuous grid space.
    #[must_use]
    pub fn axis(self) -> Vec2 {
        let (column, row) = self.delta();
        Vec2::new(column as f32, row as f32)
    }
}

/// Reports whether `candidate` is the anti-direction of `current`.
///
/// The anti-direction shares an axis with the current travel direction but
/// points the opposite way; `current == None` has no anti-direction.
#[must_use]
pub fn is_anti_direction(current: Option<Direction>, candidate: Direction) -> bool {
    current == Some(candidate.opposite())
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Neighbor cell one step in the provided direction.
    ///
    /// Returns `None` when the step would leave the coordinate space at
    /// zero; the upper bound is the grid's to enforce.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.delta();
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(CellCoord::new(column, row))
    }
}

/// Terrain classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Solid wall blocking ground-bound actors.
    Wall,
    /// Ordinary walkable floor.
    Floor,
    /// Liquid surface; passable only to water-accessible actors, lethal to
    /// the player.
    Liquid,
    /// Invisible barrier rendered as floor.
    InvisibleWallWithFloor,
    /// Invisible barrier rendered as a gap.
    InvisibleWallEmpty,
}

impl CellKind {
    /// Reports whether this kind behaves as a wall for passability purposes.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(
            self,
            CellKind::Wall | CellKind::InvisibleWallWithFloor | CellKind::InvisibleWallEmpty
        )
    }
}

/// Unique identifier assigned to an actor (the player or an enemy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Identifier the world always assigns to the player actor.
    pub const PLAYER: ActorId = ActorId(0);

    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy archetypes; each kind fixes an AI strategy and accessibility flags
/// at actor creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground-bound random walker.
    Wanderer,
    /// Random walker that floats over liquid and walls.
    Phantom,
    /// Flow-field pursuer that locks onto the player within an awareness
    /// radius.
    Hunter,
    /// Reactive chaser that shuns other enemies and competes for pickups.
    Rival,
}

/// Reference-counted state axes an actor can hold simultaneously.
///
/// Each axis carries an activation counter rather than a boolean so that
/// overlapping activations nest; an axis is active while its counter is
/// greater than zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateAxis {
    /// Movement and decisions suspended.
    Frozen,
    /// Edible by the player instead of lethal.
    Vulnerable,
    /// Removed from play, pending revival.
    Dead,
}

impl StateAxis {
    /// Number of state axes.
    pub const COUNT: usize = 3;

    /// Dense index of the axis within per-actor counter arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Kinds of power-ups (and power-downs) that can occupy a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Renders all enemies vulnerable for a fixed time.
    Pentagram,
    /// Freezes all enemies in place for a fixed time.
    Freeze,
    /// Doubles the player's travel speed for a fixed time.
    Acceleration,
    /// Pickup with no rule-engine effect.
    Life,
    /// Shatters nearby walls and fells nearby enemies instantly.
    Bomb,
    /// Pickup with no rule-engine effect.
    Jackhammer,
    /// Pickup with no rule-engine effect.
    Teeth,
    /// Debuff halving the player's travel speed for a fixed time.
    Slow,
}

impl PowerUpKind {
    /// Number of power-up kinds, for dense per-kind counter arrays.
    pub const COUNT: usize = 8;

    /// Dense index of the kind within per-kind counter arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Color shared by a pair of linked teleports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeleportColor {
    /// Red pad pair.
    Red,
    /// Green pad pair.
    Green,
    /// Blue pad pair.
    Blue,
    /// Purple pad pair.
    Purple,
}

/// Reasons the player can die during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Contact with a liquid cell's center.
    Drowned,
    /// Contact with a live, non-vulnerable enemy.
    Enemy,
    /// Caught by an active gargoyle fire beam.
    GargoyleBeam,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the full simulation by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Advances only the gargoyle oscillators.
    ///
    /// Emitted instead of [`Command::Tick`] while the session plays a death
    /// or teleport animation: hazards oscillate on an independent period,
    /// unaffected by player or enemy state.
    AdvanceHazards {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Records the direction the player wants to travel next.
    SetPlayerIntent {
        /// Desired direction, or `None` to clear the intent.
        direction: Option<Direction>,
    },
    /// Requests that an enemy actor steer toward the provided direction.
    Steer {
        /// Identifier of the actor attempting to steer.
        actor: ActorId,
        /// Direction of travel for the attempted move.
        direction: Direction,
    },
    /// Relocates an actor to the provided cell, teleport-style.
    RelocateActor {
        /// Identifier of the actor to relocate.
        actor: ActorId,
        /// Destination cell.
        cell: CellCoord,
    },
    /// Returns the player to the spawn cell and resets every enemy.
    ///
    /// Issued by the session once the death animation's recovery phase
    /// begins and a life remains.
    RespawnPlayer,
    /// Rebuilds the flow-field cache from the current grid topology.
    RebuildFlowField,
}

/// Events broadcast by the world after processing commands.
///
/// Events double as the fire-and-forget trigger surface for audio, particle,
/// and mesh effects; the world never consumes a response to them.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor consumed a coin.
    CoinEaten {
        /// Identifier of the consuming actor.
        actor: ActorId,
        /// Cell the coin occupied.
        cell: CellCoord,
        /// Number of coins still active after the pickup.
        remaining: u32,
    },
    /// Confirms that an actor consumed a power-up.
    PowerUpConsumed {
        /// Identifier of the consuming actor.
        actor: ActorId,
        /// Kind of power-up consumed.
        kind: PowerUpKind,
        /// Cell the power-up occupied.
        cell: CellCoord,
    },
    /// Announces that a power-up kind's global effect became active.
    EffectActivated {
        /// Kind whose activation counter rose from zero.
        kind: PowerUpKind,
    },
    /// Announces that a power-up kind's global effect reverted.
    EffectExpired {
        /// Kind whose activation counter returned to zero.
        kind: PowerUpKind,
    },
    /// Reports wall cells converted to floor by a bomb.
    ///
    /// External mesh generation rebuilds the affected geometry in response.
    WallsShattered {
        /// Cells that changed from wall to floor.
        cells: Vec<CellCoord>,
    },
    /// Confirms that the player ate a vulnerable enemy.
    EnemyEaten {
        /// Identifier of the eaten enemy.
        actor: ActorId,
    },
    /// Confirms that an enemy gained a death-state increment.
    EnemyFelled {
        /// Identifier of the felled enemy.
        actor: ActorId,
    },
    /// Confirms that a felled enemy returned to play at its spawn.
    EnemyRevived {
        /// Identifier of the revived enemy.
        actor: ActorId,
    },
    /// Reports that the player died this tick.
    PlayerDied {
        /// What killed the player.
        cause: DeathCause,
    },
    /// Confirms that the player returned to the spawn cell.
    PlayerRespawned,
    /// Confirms that an actor traversed a teleport pair.
    TeleportTraversed {
        /// Identifier of the traversing actor.
        actor: ActorId,
        /// Cell of the entered pad.
        from: CellCoord,
        /// Cell of the paired exit pad.
        to: CellCoord,
        /// Color shared by the pair.
        color: TeleportColor,
    },
    /// Announces that the last active coin was consumed.
    LevelCleared,
}

/// Continuous grid-space center of the provided cell.
#[must_use]
pub fn cell_center(cell: CellCoord) -> Vec2 {
    Vec2::new(
        CELL_SIZE * cell.column() as f32,
        CELL_SIZE * cell.row() as f32,
    )
}

/// Grid cell whose center lies closest to the provided continuous position.
///
/// Returns `None` for positions outside the non-negative quadrant; the
/// caller's grid bounds still apply.
#[must_use]
pub fn nearest_cell(position: Vec2) -> Option<CellCoord> {
    let column = position.x / CELL_SIZE + 0.5;
    let row = position.y / CELL_SIZE + 0.5;
    if column < 0.0 || row < 0.0 {
        return None;
    }
    Some(CellCoord::new(column as u32, row as u32))
}

/// Maps a continuous grid-space position into render space.
///
/// The mapping is a fixed affine transform: the grid's column axis becomes
/// render X, the grid's row axis becomes negative render Z, and the caller
/// supplies the constant height on render Y.
#[must_use]
pub fn render_position(grid: Vec2, height: f32) -> Vec3 {
    Vec3::new(grid.x, height, -grid.y)
}
