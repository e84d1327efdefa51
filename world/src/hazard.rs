//! Gargoyle beam hazards.
//!
//! A gargoyle alternates between a firing phase, during which its beam grows
//! linearly from the origin to full length, and a resting phase. The last
//! 0.2 s of fire is a fade that stays lethal until `fire_time`, and rest is
//! stretched by the same window. The oscillator advances on real time even
//! while the session plays an animation.

use glam::Vec2;
use maze_chase_core::{Direction, CELL_SIZE};

/// Grace window appended to both phases, in seconds.
const FADE_GRACE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GargoylePhase {
    Fire,
    Rest,
}

#[derive(Debug)]
pub(crate) struct Gargoyle {
    origin: Vec2,
    direction: Direction,
    total_length: f32,
    fire_time: f32,
    rest_time: f32,
    phase: GargoylePhase,
    current_time: f32,
    fading: bool,
}

impl Gargoyle {
    pub(crate) fn new(
        origin: Vec2,
        direction: Direction,
        length_in_cells: u32,
        fire_time: f32,
        rest_time: f32,
    ) -> Self {
        Self {
            origin,
            direction,
            total_length: length_in_cells as f32 * CELL_SIZE,
            fire_time,
            rest_time,
            phase: GargoylePhase::Rest,
            current_time: 0.0,
            fading: false,
        }
    }

    /// Advances the fire/rest oscillator by the elapsed time.
    pub(crate) fn advance(&mut self, dt: f32) {
        self.current_time += dt;
        match self.phase {
            GargoylePhase::Fire => {
                if self.current_time > self.fire_time && self.fading {
                    self.phase = GargoylePhase::Rest;
                    self.current_time = 0.0;
                    self.fading = false;
                } else if self.current_time > self.fire_time - FADE_GRACE && !self.fading {
                    self.fading = true;
                }
            }
            GargoylePhase::Rest => {
                if self.current_time > self.rest_time + FADE_GRACE {
                    self.phase = GargoylePhase::Fire;
                    self.current_time = 0.0;
                }
            }
        }
    }

    /// Reports whether the beam currently reaches the provided position.
    ///
    /// The position is projected onto the beam axis; a hit requires a
    /// positive projection within the grown reach (with one cell of slack at
    /// the tip) and a perpendicular offset below `affect_distance`.
    pub(crate) fn catches(&self, position: Vec2, affect_distance: f32) -> bool {
        if self.phase != GargoylePhase::Fire {
            return false;
        }
        let axis = self.direction.axis();
        let projection = (position - self.origin).dot(axis);
        let reach = self.total_length * (self.current_time / self.fire_time);
        if projection <= 0.0 || projection - CELL_SIZE > reach {
            return false;
        }
        let beam_point = self.origin + axis * projection;
        position.distance(beam_point) < affect_distance
    }

    pub(crate) fn origin(&self) -> Vec2 {
        self.origin
    }

    pub(crate) fn orientation(&self) -> Direction {
        self.direction
    }

    pub(crate) fn firing(&self) -> bool {
        self.phase == GargoylePhase::Fire
    }

    /// Fraction of the full beam length currently grown, clamped for
    /// presentation.
    pub(crate) fn reach_fraction(&self) -> f32 {
        match self.phase {
            GargoylePhase::Fire => (self.current_time / self.fire_time).min(1.0),
            GargoylePhase::Rest => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::AFFECT_DISTANCE;

    fn beam() -> Gargoyle {
        // Origin at a cell center, firing East, four cells long.
        Gargoyle::new(Vec2::new(0.0, 0.0), Direction::East, 4, 2.0, 1.0)
    }

    fn advance_by(gargoyle: &mut Gargoyle, total: f32, step: f32) {
        let mut elapsed = 0.0;
        while elapsed < total {
            gargoyle.advance(step);
            elapsed += step;
        }
    }

    #[test]
    fn starts_resting_and_ignites_after_rest_plus_grace() {
        let mut gargoyle = beam();
        assert!(!gargoyle.firing());
        advance_by(&mut gargoyle, 1.1, 0.05);
        assert!(!gargoyle.firing());
        advance_by(&mut gargoyle, 0.2, 0.05);
        assert!(gargoyle.firing());
    }

    #[test]
    fn fading_fire_stays_lethal_until_fire_time() {
        let mut gargoyle = beam();
        advance_by(&mut gargoyle, 1.3, 0.05);
        assert!(gargoyle.firing());

        // 1.9s into the fire phase: inside the fade window, still lethal.
        advance_by(&mut gargoyle, 1.85, 0.05);
        assert!(gargoyle.firing());

        // Just past fire_time the fading beam goes out.
        advance_by(&mut gargoyle, 0.25, 0.05);
        assert!(!gargoyle.firing());
    }

    #[test]
    fn beam_reach_grows_linearly_during_fire() {
        let mut gargoyle = beam();
        advance_by(&mut gargoyle, 1.3, 0.05);
        assert!(gargoyle.firing());
        assert!(gargoyle.reach_fraction() < 0.2);

        let tip = Vec2::new(4.0 * CELL_SIZE, 0.0);
        assert!(!gargoyle.catches(tip, AFFECT_DISTANCE));

        advance_by(&mut gargoyle, 1.8, 0.05);
        assert!(gargoyle.catches(tip, AFFECT_DISTANCE));
    }

    #[test]
    fn resting_beam_never_catches() {
        let gargoyle = beam();
        assert!(!gargoyle.catches(Vec2::new(CELL_SIZE, 0.0), AFFECT_DISTANCE));
    }

    #[test]
    fn points_behind_the_origin_are_safe() {
        let mut gargoyle = beam();
        advance_by(&mut gargoyle, 3.0, 0.05);
        assert!(gargoyle.firing());
        assert!(!gargoyle.catches(Vec2::new(-CELL_SIZE, 0.0), AFFECT_DISTANCE));
    }

    #[test]
    fn perpendicular_offset_beyond_affect_distance_is_safe() {
        let mut gargoyle = beam();
        advance_by(&mut gargoyle, 3.0, 0.05);
        assert!(gargoyle.firing());
        let on_axis = Vec2::new(2.0 * CELL_SIZE, 0.0);
        assert!(gargoyle.catches(on_axis, AFFECT_DISTANCE));
        let offset = Vec2::new(2.0 * CELL_SIZE, AFFECT_DISTANCE + 0.1);
        assert!(!gargoyle.catches(offset, AFFECT_DISTANCE));
    }
}
