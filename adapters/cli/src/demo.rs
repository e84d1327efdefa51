//! Built-in demo level.
//!
//! The layout is drawn as character art and parsed into a [`LevelLayout`].
//! Rows are listed north-first, so the art reads the way the level plays.

use maze_chase_core::{CellCoord, CellKind, Direction, EnemyKind, PowerUpKind, TeleportColor};
use maze_chase_world::layout::{
    EnemyPlacement, GargoyleLayout, LevelLayout, PowerUpPlacement, TeleportPlacement,
};

const ART: &[&str] = &[
    "#############",
    "#t....A....t#",
    "#.###.#.###.#",
    "#.#w.....f#.#",
    "#.#.##~##.#.#",
    "#.#h..r..Z#.#",
    "#.###.#.###.#",
    "#P....B....S#",
    "#############",
];

/// Parses the built-in demo art into a layout.
pub(crate) fn layout() -> LevelLayout {
    let height = ART.len() as u32;
    let width = ART[0].len() as u32;

    let mut cells = vec![CellKind::Floor; (width * height) as usize];
    let mut coins = Vec::new();
    let mut power_ups = Vec::new();
    let mut teleports = Vec::new();
    let mut enemies = Vec::new();
    let mut player_spawn = CellCoord::new(1, 1);

    // ART lists the north row first; grid rows count up from the south.
    for (line_index, line) in ART.iter().enumerate() {
        let row = height - 1 - line_index as u32;
        for (column, glyph) in line.chars().enumerate() {
            let cell = CellCoord::new(column as u32, row);
            match glyph {
                '#' => cells[(row * width + column as u32) as usize] = CellKind::Wall,
                '~' => cells[(row * width + column as u32) as usize] = CellKind::Liquid,
                '.' => coins.push(cell),
                'P' => player_spawn = cell,
                'w' => enemies.push(EnemyPlacement {
                    kind: EnemyKind::Wanderer,
                    cell,
                }),
                'f' => enemies.push(EnemyPlacement {
                    kind: EnemyKind::Phantom,
                    cell,
                }),
                'h' => enemies.push(EnemyPlacement {
                    kind: EnemyKind::Hunter,
                    cell,
                }),
                'r' => enemies.push(EnemyPlacement {
                    kind: EnemyKind::Rival,
                    cell,
                }),
                't' => teleports.push(TeleportPlacement {
                    color: TeleportColor::Blue,
                    cell,
                }),
                'A' => power_ups.push(PowerUpPlacement {
                    kind: PowerUpKind::Acceleration,
                    cell,
                }),
                'B' => power_ups.push(PowerUpPlacement {
                    kind: PowerUpKind::Bomb,
                    cell,
                }),
                'S' => power_ups.push(PowerUpPlacement {
                    kind: PowerUpKind::Slow,
                    cell,
                }),
                'V' => power_ups.push(PowerUpPlacement {
                    kind: PowerUpKind::Pentagram,
                    cell,
                }),
                'Z' => power_ups.push(PowerUpPlacement {
                    kind: PowerUpKind::Freeze,
                    cell,
                }),
                _ => {}
            }
        }
    }

    LevelLayout {
        width,
        height,
        cells,
        coins,
        power_ups,
        teleports,
        gargoyles: vec![GargoyleLayout {
            cell: CellCoord::new(12, 5),
            direction: Direction::West,
            length_in_cells: 5,
            fire_time: 2.0,
            rest_time: 3.0,
        }],
        enemies,
        player_spawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_layout_is_well_formed() {
        let layout = layout();
        assert_eq!(layout.validate(), Ok(()));
        assert_eq!(layout.enemies.len(), 4);
        assert_eq!(layout.teleports.len(), 2);
        assert!(!layout.coins.is_empty());
    }

    #[test]
    fn art_rows_are_rectangular() {
        for line in ART {
            assert_eq!(line.len(), ART[0].len());
        }
    }
}
