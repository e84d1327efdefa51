#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Maze Chase.
//!
//! The world owns the grid, the actors with their continuous-position
//! travellers, pickups, teleports, gargoyle hazards, the flow-field cache,
//! and all timed effects. Adapters and systems mutate it exclusively through
//! [`apply`]; reads go through the [`query`] module's snapshot views.

use maze_chase_core::{
    cell_center, is_anti_direction, ActorId, CellCoord, CellKind, Command, DeathCause, Direction,
    EnemyKind, Event, PowerUpKind, StateAxis, TeleportColor, AFFECT_DISTANCE, BASE_SPEED,
};

use crate::{
    hazard::Gargoyle,
    layout::{LayoutError, LevelLayout},
    navigation::FlowFieldCache,
    traveller::Traveller,
};

mod hazard;
mod navigation;
mod traveller;

pub mod layout;

/// Lifetime of every timed power-up effect, in seconds.
const EFFECT_DURATION: f32 = 10.0;
/// Time a felled enemy stays out of play before reviving at its spawn.
const REVIVE_TIME: f32 = 70.0;
/// Chebyshev radius, in cells, of the bomb's wall-clearing blast.
const BOMB_WALL_RADIUS: u32 = 2;
/// Radius, in world units around the player, of the bomb's kill blast.
const BOMB_KILL_RADIUS: f32 = 9.0;
/// Points awarded for a coin.
const COIN_POINTS: u32 = 10;
/// Points awarded for eating a vulnerable enemy.
const EATEN_ENEMY_POINTS: u32 = 10;

const PLAYER_INDEX: usize = 0;

/// Dense grid of cell kinds backing passability and the flow field.
#[derive(Debug)]
pub(crate) struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    pub(crate) fn from_cells(width: u32, height: u32, cells: Vec<CellKind>) -> Self {
        Self {
            width,
            height,
            cells,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Passability under the provided accessibility flags.
    pub(crate) fn can_enter(&self, cell: CellCoord, water: bool, wall: bool) -> bool {
        match self.kind(cell) {
            Some(CellKind::Floor) => true,
            Some(CellKind::Liquid) => water,
            Some(kind) if kind.is_wall() => wall,
            _ => false,
        }
    }

    fn set_kind(&mut self, cell: CellCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = kind;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        Some((cell.row() as usize) * (self.width as usize) + cell.column() as usize)
    }
}

#[derive(Debug)]
struct Actor {
    id: ActorId,
    kind: Option<EnemyKind>,
    traveller: Traveller,
    state_counts: [u8; StateAxis::COUNT],
    spawn: CellCoord,
    revive_remaining: f32,
    inside_teleport: bool,
}

impl Actor {
    fn is_state_active(&self, axis: StateAxis) -> bool {
        self.state_counts[axis.index()] > 0
    }

    fn increase_state(&mut self, axis: StateAxis) {
        self.state_counts[axis.index()] = self.state_counts[axis.index()].saturating_add(1);
    }

    fn reset_state(&mut self, axis: StateAxis) {
        self.state_counts[axis.index()] = 0;
    }
}

#[derive(Debug)]
struct Coin {
    cell: CellCoord,
    eaten: bool,
}

#[derive(Debug)]
struct PowerUpPickup {
    kind: PowerUpKind,
    cell: CellCoord,
    eaten: bool,
}

#[derive(Debug)]
struct TeleportPad {
    color: TeleportColor,
    cell: CellCoord,
    exit: CellCoord,
}

#[derive(Debug)]
struct Affector {
    kind: PowerUpKind,
    remaining: f32,
}

/// Authoritative simulation state for one loaded level.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    flow: FlowFieldCache,
    actors: Vec<Actor>,
    coins: Vec<Coin>,
    power_ups: Vec<PowerUpPickup>,
    teleports: Vec<TeleportPad>,
    gargoyles: Vec<Gargoyle>,
    affectors: Vec<Affector>,
    activation_counts: [u8; PowerUpKind::COUNT],
    last_speed_power_up: Option<PowerUpKind>,
    score: u32,
    coins_remaining: u32,
    player_intent: Option<Direction>,
    player_alive: bool,
}

impl World {
    /// Instantiates a world from a validated level layout.
    ///
    /// The player receives [`ActorId::PLAYER`]; enemies receive ascending
    /// identifiers in placement order. The flow field is built once here.
    pub fn from_layout(layout: &LevelLayout) -> Result<Self, LayoutError> {
        layout.validate()?;

        let grid = Grid::from_cells(layout.width, layout.height, layout.cells.clone());

        let mut actors = Vec::with_capacity(layout.enemies.len() + 1);
        actors.push(Actor {
            id: ActorId::PLAYER,
            kind: None,
            // The player may step onto liquid; drowning is the rule
            // engine's job, not the move gate's.
            traveller: Traveller::new(
                layout.player_spawn,
                BASE_SPEED,
                true,
                false,
                AFFECT_DISTANCE,
            ),
            state_counts: [0; StateAxis::COUNT],
            spawn: layout.player_spawn,
            revive_remaining: 0.0,
            inside_teleport: false,
        });
        for (offset, placement) in layout.enemies.iter().enumerate() {
            let (water, wall) = match placement.kind {
                EnemyKind::Phantom => (true, true),
                _ => (false, false),
            };
            actors.push(Actor {
                id: ActorId::new(offset as u32 + 1),
                kind: Some(placement.kind),
                traveller: Traveller::new(placement.cell, BASE_SPEED, water, wall, AFFECT_DISTANCE),
                state_counts: [0; StateAxis::COUNT],
                spawn: placement.cell,
                revive_remaining: 0.0,
                inside_teleport: false,
            });
        }

        let coins: Vec<Coin> = layout
            .coins
            .iter()
            .map(|cell| Coin {
                cell: *cell,
                eaten: false,
            })
            .collect();
        let coins_remaining = coins.len() as u32;

        let power_ups = layout
            .power_ups
            .iter()
            .map(|placement| PowerUpPickup {
                kind: placement.kind,
                cell: placement.cell,
                eaten: false,
            })
            .collect();

        let mut teleports = Vec::new();
        for pair in layout.paired_teleports() {
            teleports.push(TeleportPad {
                color: pair.color,
                cell: pair.first,
                exit: pair.second,
            });
            teleports.push(TeleportPad {
                color: pair.color,
                cell: pair.second,
                exit: pair.first,
            });
        }

        let gargoyles = layout
            .gargoyles
            .iter()
            .map(|descriptor| {
                Gargoyle::new(
                    cell_center(descriptor.cell),
                    descriptor.direction,
                    descriptor.length_in_cells,
                    descriptor.fire_time,
                    descriptor.rest_time,
                )
            })
            .collect();

        let mut world = Self {
            grid,
            flow: FlowFieldCache::new(),
            actors,
            coins,
            power_ups,
            teleports,
            gargoyles,
            affectors: Vec::new(),
            activation_counts: [0; PowerUpKind::COUNT],
            last_speed_power_up: None,
            score: 0,
            coins_remaining,
            player_intent: None,
            player_alive: true,
        };
        world.rebuild_flow();
        Ok(world)
    }

    fn tick(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        self.drive_player();
        self.integrate_actors(dt, out_events);
        for gargoyle in &mut self.gargoyles {
            gargoyle.advance(dt);
        }
        self.tick_affectors(dt, out_events);
        if self.player_alive {
            self.player_cell_interactions(out_events);
        }
        self.rival_interactions(out_events);
        if self.player_alive {
            self.player_death_check(out_events);
        }
    }

    /// Player steering policy: on arrival try the stored intent before
    /// continuing straight; mid-move only an axis reversal is honored.
    fn drive_player(&mut self) {
        if !self.player_alive {
            return;
        }
        let intent = self.player_intent;
        let grid = &self.grid;
        let traveller = &mut self.actors[PLAYER_INDEX].traveller;
        if traveller.target_reached() {
            if let Some(direction) = intent {
                if traveller.try_move(grid, direction) {
                    return;
                }
            }
            if let Some(direction) = traveller.direction() {
                let _ = traveller.try_move(grid, direction);
            }
        } else if let Some(direction) = intent {
            if is_anti_direction(traveller.direction(), direction) {
                traveller.reverse();
            }
        }
    }

    fn integrate_actors(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let player_alive = self.player_alive;
        for actor in self.actors.iter_mut() {
            if actor.kind.is_none() {
                if player_alive {
                    actor.traveller.update(dt);
                }
                continue;
            }
            if actor.is_state_active(StateAxis::Dead) {
                actor.revive_remaining -= dt;
                if actor.revive_remaining <= 0.0 {
                    actor.state_counts = [0; StateAxis::COUNT];
                    let spawn = actor.spawn;
                    actor.traveller.set_position(spawn);
                    out_events.push(Event::EnemyRevived { actor: actor.id });
                }
                continue;
            }
            if actor.is_state_active(StateAxis::Frozen) {
                continue;
            }
            actor.traveller.update(dt);
        }
    }

    fn tick_affectors(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.affectors.len() {
            self.affectors[index].remaining -= dt;
            if self.affectors[index].remaining <= 0.0 {
                let kind = self.affectors.remove(index).kind;
                self.deactivate_effect(kind, out_events);
            } else {
                index += 1;
            }
        }
    }

    /// Pops one activation of `kind`; the global effect reverts only when
    /// the activation counter returns to zero.
    fn deactivate_effect(&mut self, kind: PowerUpKind, out_events: &mut Vec<Event>) {
        let slot = &mut self.activation_counts[kind.index()];
        let was_active = *slot > 0;
        // Speed affectors outlive their counter when a rival cancels it;
        // any other kind reaching zero early is an accounting bug.
        debug_assert!(
            was_active || matches!(kind, PowerUpKind::Acceleration | PowerUpKind::Slow),
            "{kind:?} deactivated with no live activation"
        );
        if was_active {
            *slot -= 1;
        }
        if *slot > 0 {
            return;
        }
        // A stale affector whose counter was already zeroed still runs the
        // revert below, but the expiry was announced when it was canceled.
        if was_active {
            out_events.push(Event::EffectExpired { kind });
        }
        match kind {
            PowerUpKind::Pentagram => {
                for actor in self.actors.iter_mut().skip(1) {
                    actor.reset_state(StateAxis::Vulnerable);
                }
            }
            PowerUpKind::Freeze => {
                for actor in self.actors.iter_mut().skip(1) {
                    actor.reset_state(StateAxis::Frozen);
                }
            }
            PowerUpKind::Acceleration | PowerUpKind::Slow => {
                if self.last_speed_power_up == Some(kind) {
                    self.actors[PLAYER_INDEX].traveller.set_speed(BASE_SPEED);
                }
            }
            _ => {}
        }
    }

    fn player_cell_interactions(&mut self, out_events: &mut Vec<Event>) {
        let (cell, near_center, target_reached) = {
            let traveller = &self.actors[PLAYER_INDEX].traveller;
            let cell = traveller.map_position();
            (
                cell,
                traveller.is_close_to_affect(cell_center(cell)),
                traveller.target_reached(),
            )
        };

        if !near_center {
            self.actors[PLAYER_INDEX].inside_teleport = false;
            return;
        }

        let _ = self.eat_coin_at(cell, ActorId::PLAYER, out_events);
        if let Some(kind) = self.take_power_up(cell) {
            out_events.push(Event::PowerUpConsumed {
                actor: ActorId::PLAYER,
                kind,
                cell,
            });
            self.activate_power_up(kind, cell, None, out_events);
        }

        if target_reached && !self.actors[PLAYER_INDEX].inside_teleport {
            if let Some(pad_index) = self.teleports.iter().position(|pad| pad.cell == cell) {
                let (exit, color, from) = {
                    let pad = &self.teleports[pad_index];
                    (pad.exit, pad.color, pad.cell)
                };
                self.actors[PLAYER_INDEX].traveller.set_position(exit);
                self.actors[PLAYER_INDEX].inside_teleport = true;
                out_events.push(Event::TeleportTraversed {
                    actor: ActorId::PLAYER,
                    from,
                    to: exit,
                    color,
                });
            }
        }
    }

    fn rival_interactions(&mut self, out_events: &mut Vec<Event>) {
        for index in 1..self.actors.len() {
            let (is_rival, dead) = {
                let actor = &self.actors[index];
                (
                    actor.kind == Some(EnemyKind::Rival),
                    actor.is_state_active(StateAxis::Dead),
                )
            };
            if !is_rival || dead {
                continue;
            }

            let (id, cell, position, near_center, vulnerable) = {
                let actor = &self.actors[index];
                let cell = actor.traveller.map_position();
                (
                    actor.id,
                    cell,
                    actor.traveller.position(),
                    actor.traveller.is_close_to_affect(cell_center(cell)),
                    actor.is_state_active(StateAxis::Vulnerable),
                )
            };

            if near_center {
                let _ = self.eat_coin_at(cell, id, out_events);
                if let Some(kind) = self.take_power_up(cell) {
                    out_events.push(Event::PowerUpConsumed {
                        actor: id,
                        kind,
                        cell,
                    });
                    self.activate_power_up(kind, cell, Some(id), out_events);
                }
            }

            if !vulnerable
                && self
                    .gargoyles
                    .iter()
                    .any(|gargoyle| gargoyle.catches(position, AFFECT_DISTANCE))
            {
                self.actors[index].increase_state(StateAxis::Vulnerable);
                self.activation_counts[PowerUpKind::Pentagram.index()] = self.activation_counts
                    [PowerUpKind::Pentagram.index()]
                .saturating_add(1);
                self.affectors.push(Affector {
                    kind: PowerUpKind::Pentagram,
                    remaining: EFFECT_DURATION,
                });
            }

            for other in 1..self.actors.len() {
                if other == index {
                    continue;
                }
                let (other_dead, other_vulnerable, contact) = {
                    let other_actor = &self.actors[other];
                    (
                        other_actor.is_state_active(StateAxis::Dead),
                        other_actor.is_state_active(StateAxis::Vulnerable),
                        other_actor.traveller.is_close_to_affect(position),
                    )
                };
                if other_dead || !contact {
                    continue;
                }
                if other_vulnerable {
                    self.fell_enemy(other);
                    let other_id = self.actors[other].id;
                    out_events.push(Event::EnemyFelled { actor: other_id });
                } else {
                    self.fell_enemy(index);
                    out_events.push(Event::EnemyFelled { actor: id });
                    break;
                }
            }
        }
    }

    fn player_death_check(&mut self, out_events: &mut Vec<Event>) {
        let (position, cell, near_center) = {
            let traveller = &self.actors[PLAYER_INDEX].traveller;
            let cell = traveller.map_position();
            (
                traveller.position(),
                cell,
                traveller.is_close_to_affect(cell_center(cell)),
            )
        };

        if near_center && self.grid.kind(cell) == Some(CellKind::Liquid) {
            self.kill_player(DeathCause::Drowned, out_events);
            return;
        }

        for index in 1..self.actors.len() {
            let (dead, vulnerable, contact) = {
                let enemy = &self.actors[index];
                (
                    enemy.is_state_active(StateAxis::Dead),
                    enemy.is_state_active(StateAxis::Vulnerable),
                    enemy.traveller.is_close_to_affect(position),
                )
            };
            if dead || !contact {
                continue;
            }
            if vulnerable {
                self.fell_enemy(index);
                self.score += EATEN_ENEMY_POINTS;
                let id = self.actors[index].id;
                out_events.push(Event::EnemyEaten { actor: id });
            } else {
                self.kill_player(DeathCause::Enemy, out_events);
                return;
            }
        }

        if self
            .gargoyles
            .iter()
            .any(|gargoyle| gargoyle.catches(position, AFFECT_DISTANCE))
        {
            self.kill_player(DeathCause::GargoyleBeam, out_events);
        }
    }

    fn kill_player(&mut self, cause: DeathCause, out_events: &mut Vec<Event>) {
        self.player_alive = false;
        out_events.push(Event::PlayerDied { cause });
    }

    fn fell_enemy(&mut self, index: usize) {
        let actor = &mut self.actors[index];
        if actor.is_state_active(StateAxis::Dead) {
            return;
        }
        actor.increase_state(StateAxis::Dead);
        actor.revive_remaining = REVIVE_TIME;
    }

    fn eat_coin_at(&mut self, cell: CellCoord, actor: ActorId, out_events: &mut Vec<Event>) -> bool {
        let Some(coin) = self
            .coins
            .iter_mut()
            .find(|coin| !coin.eaten && coin.cell == cell)
        else {
            return false;
        };
        coin.eaten = true;
        self.coins_remaining -= 1;
        if actor == ActorId::PLAYER {
            self.score += COIN_POINTS;
        }
        out_events.push(Event::CoinEaten {
            actor,
            cell,
            remaining: self.coins_remaining,
        });
        if self.coins_remaining == 0 {
            out_events.push(Event::LevelCleared);
        }
        true
    }

    fn take_power_up(&mut self, cell: CellCoord) -> Option<PowerUpKind> {
        let pickup = self
            .power_ups
            .iter_mut()
            .find(|pickup| !pickup.eaten && pickup.cell == cell)?;
        pickup.eaten = true;
        Some(pickup.kind)
    }

    /// Applies a power-up's effect; `eater` names the consuming enemy, or
    /// `None` when the player ate it.
    fn activate_power_up(
        &mut self,
        kind: PowerUpKind,
        cell: CellCoord,
        eater: Option<ActorId>,
        out_events: &mut Vec<Event>,
    ) {
        self.activation_counts[kind.index()] =
            self.activation_counts[kind.index()].saturating_add(1);
        if self.activation_counts[kind.index()] == 1 && is_timed(kind) {
            out_events.push(Event::EffectActivated { kind });
        }
        match kind {
            PowerUpKind::Pentagram => {
                self.affectors.push(Affector {
                    kind,
                    remaining: EFFECT_DURATION,
                });
                for actor in self.actors.iter_mut().skip(1) {
                    if Some(actor.id) != eater {
                        actor.increase_state(StateAxis::Vulnerable);
                    }
                }
            }
            PowerUpKind::Freeze => {
                self.affectors.push(Affector {
                    kind,
                    remaining: EFFECT_DURATION,
                });
                for actor in self.actors.iter_mut().skip(1) {
                    if Some(actor.id) != eater {
                        actor.increase_state(StateAxis::Frozen);
                    }
                }
                if eater.is_some() {
                    // An enemy claimed the freeze; the player pays with a
                    // matching slow debuff.
                    self.activate_power_up(PowerUpKind::Slow, cell, None, out_events);
                }
            }
            PowerUpKind::Acceleration => {
                self.affectors.push(Affector {
                    kind,
                    remaining: EFFECT_DURATION,
                });
                self.actors[PLAYER_INDEX]
                    .traveller
                    .set_speed(BASE_SPEED * 2.0);
                self.cancel_speed_rival(PowerUpKind::Slow, out_events);
                self.last_speed_power_up = Some(kind);
            }
            PowerUpKind::Slow => {
                self.affectors.push(Affector {
                    kind,
                    remaining: EFFECT_DURATION,
                });
                self.actors[PLAYER_INDEX]
                    .traveller
                    .set_speed(BASE_SPEED * 0.5);
                self.cancel_speed_rival(PowerUpKind::Acceleration, out_events);
                self.last_speed_power_up = Some(kind);
            }
            PowerUpKind::Bomb => {
                self.shatter_walls(cell, out_events);
                let player_position = self.actors[PLAYER_INDEX].traveller.position();
                for index in 1..self.actors.len() {
                    let (dead, position, id) = {
                        let enemy = &self.actors[index];
                        (
                            enemy.is_state_active(StateAxis::Dead),
                            enemy.traveller.position(),
                            enemy.id,
                        )
                    };
                    if dead || position.distance(player_position) >= BOMB_KILL_RADIUS {
                        continue;
                    }
                    self.fell_enemy(index);
                    out_events.push(Event::EnemyFelled { actor: id });
                }
            }
            PowerUpKind::Life | PowerUpKind::Jackhammer | PowerUpKind::Teeth => {}
        }
    }

    /// Zeroes the competing speed effect's activation counter; its affectors
    /// keep running but revert nothing on expiry.
    fn cancel_speed_rival(&mut self, rival: PowerUpKind, out_events: &mut Vec<Event>) {
        if self.activation_counts[rival.index()] > 0 {
            self.activation_counts[rival.index()] = 0;
            out_events.push(Event::EffectExpired { kind: rival });
        }
    }

    fn shatter_walls(&mut self, center: CellCoord, out_events: &mut Vec<Event>) {
        let mut shattered = Vec::new();
        let column_low = center.column().saturating_sub(BOMB_WALL_RADIUS);
        let row_low = center.row().saturating_sub(BOMB_WALL_RADIUS);
        for column in column_low..=center.column() + BOMB_WALL_RADIUS {
            for row in row_low..=center.row() + BOMB_WALL_RADIUS {
                let cell = CellCoord::new(column, row);
                if self.grid.kind(cell) == Some(CellKind::Wall) {
                    self.grid.set_kind(cell, CellKind::Floor);
                    shattered.push(cell);
                }
            }
        }
        if shattered.is_empty() {
            return;
        }
        out_events.push(Event::WallsShattered { cells: shattered });
        self.rebuild_flow();
    }

    fn steer(&mut self, id: ActorId, direction: Direction) {
        let Some(index) = self.actors.iter().position(|actor| actor.id == id) else {
            return;
        };
        if index == PLAYER_INDEX {
            return;
        }
        let grid = &self.grid;
        let actor = &mut self.actors[index];
        if actor.is_state_active(StateAxis::Dead) || actor.is_state_active(StateAxis::Frozen) {
            return;
        }
        if actor.traveller.target_reached() {
            let _ = actor.traveller.try_move(grid, direction);
        } else if is_anti_direction(actor.traveller.direction(), direction) {
            actor.traveller.reverse();
        }
    }

    fn relocate(&mut self, id: ActorId, cell: CellCoord) {
        if let Some(actor) = self.actors.iter_mut().find(|actor| actor.id == id) {
            actor.traveller.set_position(cell);
        }
    }

    fn respawn_player(&mut self, out_events: &mut Vec<Event>) {
        {
            let player = &mut self.actors[PLAYER_INDEX];
            let spawn = player.spawn;
            player.traveller.set_position(spawn);
            player.inside_teleport = false;
        }
        self.player_intent = None;
        self.player_alive = true;
        for actor in self.actors.iter_mut().skip(1) {
            actor.state_counts = [0; StateAxis::COUNT];
            actor.revive_remaining = 0.0;
            let spawn = actor.spawn;
            actor.traveller.set_position(spawn);
        }

        // Movement and state effects do not survive a death; acceleration
        // does, matching the effect table.
        let mut index = 0;
        while index < self.affectors.len() {
            let kind = self.affectors[index].kind;
            if matches!(
                kind,
                PowerUpKind::Slow | PowerUpKind::Freeze | PowerUpKind::Pentagram
            ) {
                let _ = self.affectors.remove(index);
                self.deactivate_effect(kind, out_events);
            } else {
                index += 1;
            }
        }

        out_events.push(Event::PlayerRespawned);
    }

    fn rebuild_flow(&mut self) {
        let grid = &self.grid;
        self.flow.rebuild_with(grid.width(), grid.height(), |cell| {
            grid.kind(cell) == Some(CellKind::Floor)
        });
    }
}

const fn is_timed(kind: PowerUpKind) -> bool {
    matches!(
        kind,
        PowerUpKind::Pentagram | PowerUpKind::Freeze | PowerUpKind::Acceleration | PowerUpKind::Slow
    )
}

/// Executes a command against the world, appending resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.tick(dt.as_secs_f32(), out_events);
        }
        Command::AdvanceHazards { dt } => {
            for gargoyle in &mut world.gargoyles {
                gargoyle.advance(dt.as_secs_f32());
            }
        }
        Command::SetPlayerIntent { direction } => {
            world.player_intent = direction;
        }
        Command::Steer { actor, direction } => {
            world.steer(actor, direction);
        }
        Command::RelocateActor { actor, cell } => {
            world.relocate(actor, cell);
        }
        Command::RespawnPlayer => {
            world.respawn_player(out_events);
        }
        Command::RebuildFlowField => {
            world.rebuild_flow();
        }
    }
}

pub mod query {
    //! Read-only snapshot views over the world.

    use glam::Vec2;
    use maze_chase_core::{ActorId, CellCoord, Direction, EnemyKind, PowerUpKind, StateAxis};

    use super::{FlowFieldCache, Grid, World, PLAYER_INDEX};

    /// Captures a read-only view of every actor in the world.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        let snapshots = world
            .actors
            .iter()
            .map(|actor| ActorSnapshot {
                id: actor.id,
                kind: actor.kind,
                cell: actor.traveller.map_position(),
                target_cell: actor.traveller.target_cell(),
                position: actor.traveller.position(),
                direction: actor.traveller.direction(),
                target_reached: actor.traveller.target_reached(),
                speed: actor.traveller.speed(),
                frozen: actor.is_state_active(StateAxis::Frozen),
                vulnerable: actor.is_state_active(StateAxis::Vulnerable),
                dead: actor.is_state_active(StateAxis::Dead),
                water_accessible: actor.traveller.water_accessible(),
                wall_accessible: actor.traveller.wall_accessible(),
            })
            .collect();
        ActorView { snapshots }
    }

    /// Exposes the grid's passability under per-actor accessibility flags.
    #[must_use]
    pub fn passability(world: &World) -> PassabilityView<'_> {
        PassabilityView { grid: &world.grid }
    }

    /// Exposes flow-field lookups against the current cache.
    #[must_use]
    pub fn flow(world: &World) -> FlowView<'_> {
        FlowView { cache: &world.flow }
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Number of coins still active in the level.
    #[must_use]
    pub fn coins_remaining(world: &World) -> u32 {
        world.coins_remaining
    }

    /// Cells of every coin not yet eaten.
    #[must_use]
    pub fn coin_cells(world: &World) -> Vec<CellCoord> {
        world
            .coins
            .iter()
            .filter(|coin| !coin.eaten)
            .map(|coin| coin.cell)
            .collect()
    }

    /// Reports whether the player is alive (not mid-death).
    #[must_use]
    pub fn player_alive(world: &World) -> bool {
        world.player_alive
    }

    /// Reports whether a power-up kind's global effect is currently active.
    #[must_use]
    pub fn effect_active(world: &World, kind: PowerUpKind) -> bool {
        world.activation_counts[kind.index()] > 0
    }

    /// Remaining seconds of every live timed effect, keyed by power-up kind.
    ///
    /// Stacked activations of one kind collapse to the longest timer;
    /// affectors whose activation was cancelled by a rival speed effect
    /// are omitted.
    #[must_use]
    pub fn effect_timers(world: &World) -> Vec<(PowerUpKind, f32)> {
        let mut timers: Vec<(PowerUpKind, f32)> = Vec::new();
        for affector in &world.affectors {
            if world.activation_counts[affector.kind.index()] == 0 {
                continue;
            }
            match timers.iter_mut().find(|(kind, _)| *kind == affector.kind) {
                Some(entry) => entry.1 = entry.1.max(affector.remaining),
                None => timers.push((affector.kind, affector.remaining)),
            }
        }
        timers
    }

    /// Snapshots of every gargoyle hazard, for presentation and tests.
    #[must_use]
    pub fn gargoyle_view(world: &World) -> Vec<GargoyleSnapshot> {
        world
            .gargoyles
            .iter()
            .map(|gargoyle| GargoyleSnapshot {
                origin: gargoyle.origin(),
                direction: gargoyle.orientation(),
                firing: gargoyle.firing(),
                reach_fraction: gargoyle.reach_fraction(),
            })
            .collect()
    }

    /// Read-only snapshot describing all actors.
    #[derive(Clone, Debug)]
    pub struct ActorView {
        snapshots: Vec<ActorSnapshot>,
    }

    impl ActorView {
        /// Iterator over the captured snapshots, player first.
        pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
            self.snapshots.iter()
        }

        /// Snapshot of the player actor.
        #[must_use]
        pub fn player(&self) -> &ActorSnapshot {
            &self.snapshots[PLAYER_INDEX]
        }

        /// Snapshot of the actor with the provided identifier.
        #[must_use]
        pub fn get(&self, id: ActorId) -> Option<&ActorSnapshot> {
            self.snapshots.iter().find(|snapshot| snapshot.id == id)
        }
    }

    /// Immutable representation of a single actor's state.
    #[derive(Clone, Debug)]
    pub struct ActorSnapshot {
        /// Identifier of the actor.
        pub id: ActorId,
        /// Enemy archetype, or `None` for the player.
        pub kind: Option<EnemyKind>,
        /// Grid cell closest to the actor's position.
        pub cell: CellCoord,
        /// Cell the actor is travelling toward; the current cell when idle.
        pub target_cell: CellCoord,
        /// Continuous grid-space position.
        pub position: Vec2,
        /// Current travel direction, if moving or recently moved.
        pub direction: Option<Direction>,
        /// Whether the actor rests exactly on its target cell center.
        pub target_reached: bool,
        /// Current travel speed in world units per second.
        pub speed: f32,
        /// Whether the frozen axis is active.
        pub frozen: bool,
        /// Whether the vulnerable axis is active.
        pub vulnerable: bool,
        /// Whether the dead axis is active.
        pub dead: bool,
        /// Whether the actor may enter liquid cells.
        pub water_accessible: bool,
        /// Whether the actor may enter wall cells.
        pub wall_accessible: bool,
    }

    /// Read-only passability oracle over the current grid.
    #[derive(Clone, Copy, Debug)]
    pub struct PassabilityView<'a> {
        grid: &'a Grid,
    }

    impl PassabilityView<'_> {
        /// Whether an actor with the provided accessibility flags may enter
        /// the cell.
        #[must_use]
        pub fn can_enter(&self, cell: CellCoord, water: bool, wall: bool) -> bool {
            self.grid.can_enter(cell, water, wall)
        }

        /// Grid dimensions as `(width, height)`.
        #[must_use]
        pub fn dimensions(&self) -> (u32, u32) {
            (self.grid.width(), self.grid.height())
        }
    }

    /// Read-only lookups against the flow-field cache.
    #[derive(Clone, Copy, Debug)]
    pub struct FlowView<'a> {
        cache: &'a FlowFieldCache,
    }

    impl FlowView<'_> {
        /// Direction one step closer to `target` from `from`, if any.
        #[must_use]
        pub fn direction(&self, target: CellCoord, from: CellCoord) -> Option<Direction> {
            self.cache.direction(target, from)
        }
    }

    /// Immutable representation of one gargoyle hazard.
    #[derive(Clone, Copy, Debug)]
    pub struct GargoyleSnapshot {
        /// Beam origin in continuous grid space.
        pub origin: Vec2,
        /// Direction the beam fires in.
        pub direction: Direction,
        /// Whether the beam is in its firing phase.
        pub firing: bool,
        /// Fraction of the full beam length currently grown.
        pub reach_fraction: f32,
    }
}
