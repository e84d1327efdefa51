//! Continuous-position navigation primitive shared by the player and
//! enemies.
//!
//! A traveller interpolates between the centers of adjacent grid cells. The
//! move legality gate and the motion integrator are separate operations so
//! that steering policies can probe the grid without committing to a move.

use glam::Vec2;
use maze_chase_core::{cell_center, nearest_cell, CellCoord, Direction};

use crate::Grid;

#[derive(Debug)]
pub(crate) struct Traveller {
    position: Vec2,
    target: Vec2,
    start: Vec2,
    velocity: Vec2,
    direction: Option<Direction>,
    speed: f32,
    target_reached: bool,
    water_accessible: bool,
    wall_accessible: bool,
    affect_distance: f32,
}

impl Traveller {
    pub(crate) fn new(
        cell: CellCoord,
        speed: f32,
        water_accessible: bool,
        wall_accessible: bool,
        affect_distance: f32,
    ) -> Self {
        let center = cell_center(cell);
        Self {
            position: center,
            target: center,
            start: center,
            velocity: Vec2::ZERO,
            direction: None,
            speed,
            target_reached: true,
            water_accessible,
            wall_accessible,
            affect_distance,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub(crate) fn target_reached(&self) -> bool {
        self.target_reached
    }

    pub(crate) fn speed(&self) -> f32 {
        self.speed
    }

    pub(crate) fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        if !self.target_reached {
            self.retarget_velocity();
        }
    }

    pub(crate) fn water_accessible(&self) -> bool {
        self.water_accessible
    }

    pub(crate) fn wall_accessible(&self) -> bool {
        self.wall_accessible
    }

    /// Grid cell whose center lies closest to the current position.
    pub(crate) fn map_position(&self) -> CellCoord {
        nearest_cell(self.position).unwrap_or(CellCoord::new(0, 0))
    }

    /// Cell the traveller is heading to; the current cell when idle.
    pub(crate) fn target_cell(&self) -> CellCoord {
        nearest_cell(self.target).unwrap_or_else(|| self.map_position())
    }

    /// Reports whether one step in the provided direction lands on a cell
    /// this traveller may enter.
    pub(crate) fn is_move_possible(&self, grid: &Grid, direction: Direction) -> bool {
        match self.map_position().neighbor(direction) {
            Some(cell) => grid.can_enter(cell, self.water_accessible, self.wall_accessible),
            None => false,
        }
    }

    /// Starts a move without a legality check; callers gate through
    /// [`Traveller::is_move_possible`] first.
    pub(crate) fn move_toward(&mut self, direction: Direction) {
        self.direction = Some(direction);
        self.start = self.position;
        self.target_reached = false;
        let origin = self.map_position();
        let destination = origin.neighbor(direction).unwrap_or(origin);
        self.target = cell_center(destination);
        self.retarget_velocity();
    }

    /// Starts a move when legal, reporting whether the move was taken.
    pub(crate) fn try_move(&mut self, grid: &Grid, direction: Direction) -> bool {
        if !self.is_move_possible(grid, direction) {
            return false;
        }
        self.move_toward(direction);
        true
    }

    /// Reverses travel along the current axis, snapping the logical target
    /// back to the cell being left so that arrival state stays consistent.
    pub(crate) fn reverse(&mut self) {
        let Some(direction) = self.direction else {
            return;
        };
        let snap = Some(self.map_position()) != nearest_cell(self.target);
        self.move_toward(direction.opposite());
        if snap {
            self.target = cell_center(self.map_position());
            self.retarget_velocity();
        }
    }

    /// Integrates motion over the elapsed time.
    ///
    /// Overshoot past the target flips the sign of the remaining-travel dot
    /// product, which clamps the position exactly onto the target center.
    pub(crate) fn update(&mut self, dt: f32) {
        if self.target_reached {
            return;
        }
        self.position += self.velocity * dt;
        if (self.target - self.position).dot(self.velocity) <= 0.0 {
            self.position = self.target;
            self.velocity = Vec2::ZERO;
            self.target_reached = true;
        }
    }

    /// Proximity test used for pickups and contact damage.
    pub(crate) fn is_close_to_affect(&self, point: Vec2) -> bool {
        self.position.distance(point) < self.affect_distance
    }

    /// Relocates the traveller instantly, teleport-style.
    pub(crate) fn set_position(&mut self, cell: CellCoord) {
        let center = cell_center(cell);
        self.position = center;
        self.target = center;
        self.start = center;
        self.velocity = Vec2::ZERO;
        self.direction = None;
        self.target_reached = true;
    }

    fn retarget_velocity(&mut self) {
        let axis = (self.target - self.position).normalize_or_zero();
        self.velocity = axis * self.speed;
        if axis == Vec2::ZERO {
            self.target_reached = true;
        }
    }
}
