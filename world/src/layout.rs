//! Level input contract.
//!
//! A [`LevelLayout`] is the in-memory description handed over by an external
//! level loader: the cell grid plus every placement the world instantiates.
//! Validation covers shape only (dimensions, bounds, teleport pairing);
//! semantic quality of a level is the loader's concern.

use maze_chase_core::{CellCoord, CellKind, Direction, EnemyKind, PowerUpKind, TeleportColor};
use thiserror::Error;

/// Complete description of a level, as produced by an external loader.
#[derive(Clone, Debug)]
pub struct LevelLayout {
    /// Number of columns in the cell grid.
    pub width: u32,
    /// Number of rows in the cell grid.
    pub height: u32,
    /// Row-major cell kinds; index `row * width + column`.
    pub cells: Vec<CellKind>,
    /// Cells holding a coin.
    pub coins: Vec<CellCoord>,
    /// Power-up placements.
    pub power_ups: Vec<PowerUpPlacement>,
    /// Teleport pad placements; exactly two pads per used color.
    pub teleports: Vec<TeleportPlacement>,
    /// Gargoyle hazard descriptors.
    pub gargoyles: Vec<GargoyleLayout>,
    /// Enemy spawn placements.
    pub enemies: Vec<EnemyPlacement>,
    /// Cell the player spawns on and respawns to.
    pub player_spawn: CellCoord,
}

/// A power-up of a given kind occupying a cell.
#[derive(Clone, Copy, Debug)]
pub struct PowerUpPlacement {
    /// Kind of power-up.
    pub kind: PowerUpKind,
    /// Cell the power-up occupies.
    pub cell: CellCoord,
}

/// One teleport pad; pads sharing a color are linked into a pair.
#[derive(Clone, Copy, Debug)]
pub struct TeleportPlacement {
    /// Pair color.
    pub color: TeleportColor,
    /// Cell the pad occupies.
    pub cell: CellCoord,
}

/// Descriptor of a gargoyle beam hazard.
#[derive(Clone, Copy, Debug)]
pub struct GargoyleLayout {
    /// Cell the beam originates from.
    pub cell: CellCoord,
    /// Direction the beam fires in.
    pub direction: Direction,
    /// Full beam length in cells.
    pub length_in_cells: u32,
    /// Duration of the firing phase in seconds.
    pub fire_time: f32,
    /// Duration of the resting phase in seconds.
    pub rest_time: f32,
}

/// An enemy of a given kind spawning on a cell.
#[derive(Clone, Copy, Debug)]
pub struct EnemyPlacement {
    /// Enemy archetype.
    pub kind: EnemyKind,
    /// Spawn cell; also the revival point.
    pub cell: CellCoord,
}

/// Shape violations detected while instantiating a layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The cell vector does not match the declared dimensions.
    #[error("expected {expected} cells for a {width}x{height} grid, found {found}")]
    CellCountMismatch {
        /// Declared grid width.
        width: u32,
        /// Declared grid height.
        height: u32,
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually provided.
        found: usize,
    },
    /// A placement lies outside the grid.
    #[error("{label} at column {column}, row {row} lies outside the {width}x{height} grid")]
    PlacementOutOfBounds {
        /// What was placed.
        label: &'static str,
        /// Column of the offending placement.
        column: u32,
        /// Row of the offending placement.
        row: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// The player spawn is not a floor cell.
    #[error("player spawn at column {column}, row {row} is not a floor cell")]
    SpawnNotFloor {
        /// Column of the spawn cell.
        column: u32,
        /// Row of the spawn cell.
        row: u32,
    },
    /// A teleport color is used by a number of pads other than two.
    #[error("teleport color {color:?} appears {count} times, expected exactly two pads")]
    TeleportPairMismatch {
        /// Offending color.
        color: TeleportColor,
        /// Number of pads carrying the color.
        count: usize,
    },
}

/// A linked pair of teleport pads sharing a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TeleportPair {
    pub(crate) color: TeleportColor,
    pub(crate) first: CellCoord,
    pub(crate) second: CellCoord,
}

impl LevelLayout {
    /// Checks the layout's shape against the world's preconditions.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let expected = (self.width as usize) * (self.height as usize);
        if self.cells.len() != expected {
            return Err(LayoutError::CellCountMismatch {
                width: self.width,
                height: self.height,
                expected,
                found: self.cells.len(),
            });
        }

        self.check_bounds("player spawn", self.player_spawn)?;
        if self.kind_at(self.player_spawn) != Some(CellKind::Floor) {
            return Err(LayoutError::SpawnNotFloor {
                column: self.player_spawn.column(),
                row: self.player_spawn.row(),
            });
        }
        for cell in &self.coins {
            self.check_bounds("coin", *cell)?;
        }
        for placement in &self.power_ups {
            self.check_bounds("power-up", placement.cell)?;
        }
        for placement in &self.teleports {
            self.check_bounds("teleport", placement.cell)?;
        }
        for gargoyle in &self.gargoyles {
            self.check_bounds("gargoyle", gargoyle.cell)?;
        }
        for placement in &self.enemies {
            self.check_bounds("enemy spawn", placement.cell)?;
        }

        for color in [
            TeleportColor::Red,
            TeleportColor::Green,
            TeleportColor::Blue,
            TeleportColor::Purple,
        ] {
            let count = self
                .teleports
                .iter()
                .filter(|placement| placement.color == color)
                .count();
            if count != 0 && count != 2 {
                return Err(LayoutError::TeleportPairMismatch { color, count });
            }
        }

        Ok(())
    }

    /// Links same-color pads into pairs; call only after validation.
    pub(crate) fn paired_teleports(&self) -> Vec<TeleportPair> {
        let mut pairs = Vec::new();
        for (index, placement) in self.teleports.iter().enumerate() {
            for earlier in &self.teleports[..index] {
                if earlier.color == placement.color {
                    pairs.push(TeleportPair {
                        color: placement.color,
                        first: earlier.cell,
                        second: placement.cell,
                    });
                }
            }
        }
        pairs
    }

    /// Kind of the cell at the provided coordinate, if in bounds.
    pub fn kind_at(&self, cell: CellCoord) -> Option<CellKind> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let index = (cell.row() as usize) * (self.width as usize) + cell.column() as usize;
        self.cells.get(index).copied()
    }

    fn check_bounds(&self, label: &'static str, cell: CellCoord) -> Result<(), LayoutError> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return Err(LayoutError::PlacementOutOfBounds {
                label,
                column: cell.column(),
                row: cell.row(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
