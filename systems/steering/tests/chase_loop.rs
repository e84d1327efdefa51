//! Full-loop exercise of the world rule engine under steering control.

use std::time::Duration;

use maze_chase_core::{CellCoord, CellKind, Command, EnemyKind, Event};
use maze_chase_system_steering::Steering;
use maze_chase_world::layout::{EnemyPlacement, LevelLayout};
use maze_chase_world::{apply, query, World};

const ART: &[&str] = &[
    "###########",
    "#.........#",
    "#.###.###.#",
    "#.........#",
    "#.###.###.#",
    "#.........#",
    "###########",
];

fn arena() -> LevelLayout {
    let height = ART.len() as u32;
    let width = ART[0].len() as u32;
    let mut cells = vec![CellKind::Floor; (width * height) as usize];
    for (line_index, line) in ART.iter().enumerate() {
        let row = height - 1 - line_index as u32;
        for (column, glyph) in line.chars().enumerate() {
            if glyph == '#' {
                cells[(row * width + column as u32) as usize] = CellKind::Wall;
            }
        }
    }
    LevelLayout {
        width,
        height,
        cells,
        coins: Vec::new(),
        power_ups: Vec::new(),
        teleports: Vec::new(),
        gargoyles: Vec::new(),
        enemies: vec![
            EnemyPlacement {
                kind: EnemyKind::Wanderer,
                cell: CellCoord::new(9, 5),
            },
            EnemyPlacement {
                kind: EnemyKind::Phantom,
                cell: CellCoord::new(9, 1),
            },
            EnemyPlacement {
                kind: EnemyKind::Hunter,
                cell: CellCoord::new(5, 3),
            },
            EnemyPlacement {
                kind: EnemyKind::Rival,
                cell: CellCoord::new(1, 5),
            },
        ],
        player_spawn: CellCoord::new(1, 1),
    }
}

#[test]
fn enemies_roam_without_leaving_legal_terrain() {
    let layout = arena();
    let mut world = World::from_layout(&layout).unwrap();
    let mut steering = Steering::new(42);

    let mut events: Vec<Event> = Vec::new();
    let mut cells_visited = 0usize;
    let mut last_cells = Vec::new();
    for _ in 0..600 {
        let mut commands = vec![Command::Tick {
            dt: Duration::from_secs_f32(1.0 / 60.0),
        }];
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

        let actors = query::actor_view(&world);
        let mut cells = Vec::new();
        for snapshot in actors.iter() {
            let Some(kind) = snapshot.kind else { continue };
            // Ground-bound enemies must stay off walls; the phantom may
            // cross them but never leave the grid.
            assert!(snapshot.cell.column() < layout.width);
            assert!(snapshot.cell.row() < layout.height);
            if kind != EnemyKind::Phantom {
                let kind_at = layout.kind_at(snapshot.cell).unwrap();
                assert!(
                    !kind_at.is_wall(),
                    "{kind:?} ended up inside a wall at {:?}",
                    snapshot.cell
                );
            }
            cells.push(snapshot.cell);
        }
        if cells != last_cells {
            cells_visited += 1;
            last_cells = cells;
        }
    }

    // Ten simulated seconds at walking speed must produce movement.
    assert!(cells_visited > 10, "enemies never roamed");
}

#[test]
fn a_hunter_corners_a_stationary_player() {
    let layout = arena();
    let mut world = World::from_layout(&layout).unwrap();
    let mut steering = Steering::new(7);

    let player_cell = CellCoord::new(1, 1);
    let hunter = query::actor_view(&world)
        .iter()
        .find(|snapshot| snapshot.kind == Some(EnemyKind::Hunter))
        .map(|snapshot| snapshot.id)
        .unwrap();

    let mut events: Vec<Event> = Vec::new();
    let mut caught = false;
    for _ in 0..1200 {
        let mut commands = vec![Command::Tick {
            dt: Duration::from_secs_f32(1.0 / 60.0),
        }];
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
        if events
            .iter()
            .any(|event| matches!(event, Event::PlayerDied { .. }))
        {
            caught = true;
            break;
        }
        let snapshot = query::actor_view(&world);
        let hunter_cell = snapshot.get(hunter).unwrap().cell;
        if hunter_cell.manhattan_distance(player_cell) == 0 {
            caught = true;
            break;
        }
    }
    assert!(caught, "hunter never reached the idle player");
}
