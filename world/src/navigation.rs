//! Flow-field pathfinding over the floor cells of the grid.
//!
//! The cache holds one direction field per reachable target cell. A field
//! answers "from this cell, which way is one step closer to the target" in
//! constant time, so pursuit steering never searches at decision time. The
//! cache is rebuilt wholesale when the topology changes and is never patched
//! incrementally.

use std::collections::{HashMap, VecDeque};

use maze_chase_core::{CellCoord, Direction};

const UNREACHABLE: u16 = u16::MAX;

/// Neighbor probe order used when deriving a cell's best direction; the
/// first neighbor lying exactly one step closer to the target wins.
const DESCENT_PRIORITY: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

#[derive(Debug, Default, PartialEq)]
pub(crate) struct FlowFieldCache {
    width: u32,
    height: u32,
    fields: HashMap<CellCoord, Vec<Option<Direction>>>,
}

impl FlowFieldCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces every field from the provided floor predicate.
    pub(crate) fn rebuild_with<F>(&mut self, width: u32, height: u32, is_floor: F)
    where
        F: Fn(CellCoord) -> bool,
    {
        self.width = width;
        self.height = height;
        self.fields.clear();

        let cell_count = (width as usize) * (height as usize);
        let mut floor = vec![false; cell_count];
        for row in 0..height {
            for column in 0..width {
                let cell = CellCoord::new(column, row);
                floor[self.index(cell)] = is_floor(cell);
            }
        }

        for row in 0..height {
            for column in 0..width {
                let target = CellCoord::new(column, row);
                if !floor[self.index(target)] {
                    continue;
                }
                let field = self.field_toward(target, &floor);
                let _ = self.fields.insert(target, field);
            }
        }
    }

    /// Direction one step closer to `target` from `from`, or `None` when no
    /// path exists or either cell is off the floor.
    pub(crate) fn direction(&self, target: CellCoord, from: CellCoord) -> Option<Direction> {
        if !self.in_bounds(from) {
            return None;
        }
        let field = self.fields.get(&target)?;
        field[self.index(from)]
    }

    fn field_toward(&self, target: CellCoord, floor: &[bool]) -> Vec<Option<Direction>> {
        let mut distance = vec![UNREACHABLE; floor.len()];
        distance[self.index(target)] = 0;
        let mut frontier = VecDeque::new();
        frontier.push_back(target);
        while let Some(cell) = frontier.pop_front() {
            let next_distance = distance[self.index(cell)] + 1;
            for direction in DESCENT_PRIORITY {
                let Some(neighbor) = cell.neighbor(direction) else {
                    continue;
                };
                if !self.in_bounds(neighbor) || !floor[self.index(neighbor)] {
                    continue;
                }
                if distance[self.index(neighbor)] != UNREACHABLE {
                    continue;
                }
                distance[self.index(neighbor)] = next_distance;
                frontier.push_back(neighbor);
            }
        }

        let mut field = vec![None; floor.len()];
        for (index, slot) in field.iter_mut().enumerate() {
            let here = distance[index];
            if here == UNREACHABLE || here == 0 || !floor[index] {
                continue;
            }
            let cell = self.cell_at(index);
            for direction in DESCENT_PRIORITY {
                let Some(neighbor) = cell.neighbor(direction) else {
                    continue;
                };
                if !self.in_bounds(neighbor) {
                    continue;
                }
                let neighbor_distance = distance[self.index(neighbor)];
                if neighbor_distance != UNREACHABLE && neighbor_distance + 1 == here {
                    *slot = Some(direction);
                    break;
                }
            }
        }
        field
    }

    fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    fn index(&self, cell: CellCoord) -> usize {
        (cell.row() as usize) * (self.width as usize) + cell.column() as usize
    }

    fn cell_at(&self, index: usize) -> CellCoord {
        let width = self.width as usize;
        CellCoord::new((index % width) as u32, (index / width) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Row-major over rows 0..height; '#' blocks, '.' is floor.
    fn cache_from_rows(rows: &[&str]) -> FlowFieldCache {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let grid: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.bytes().map(|byte| byte == b'.').collect())
            .collect();
        let mut cache = FlowFieldCache::new();
        cache.rebuild_with(width, height, |cell| {
            grid[cell.row() as usize][cell.column() as usize]
        });
        cache
    }

    fn walk_length(cache: &FlowFieldCache, target: CellCoord, mut from: CellCoord) -> u32 {
        let mut steps = 0;
        while from != target {
            let direction = cache
                .direction(target, from)
                .unwrap_or_else(|| panic!("no direction from {from:?}"));
            from = from.neighbor(direction).unwrap();
            steps += 1;
            assert!(steps < 100, "walk did not terminate");
        }
        steps
    }

    #[test]
    fn greedy_descent_reaches_the_target_on_a_shortest_path() {
        let cache = cache_from_rows(&[
            ".....", //
            "####.", //
            ".....", //
        ]);
        // The wall row forces the long way around: 10 steps, not Manhattan 2.
        let target = CellCoord::new(0, 0);
        let from = CellCoord::new(0, 2);
        assert_eq!(walk_length(&cache, target, from), 10);
    }

    #[test]
    fn every_reachable_cell_descends_to_the_target() {
        let cache = cache_from_rows(&[
            "....", //
            ".##.", //
            "....", //
        ]);
        let target = CellCoord::new(3, 0);
        for row in 0..3 {
            for column in 0..4 {
                let from = CellCoord::new(column, row);
                if from == target || cache.direction(target, from).is_none() {
                    continue;
                }
                let _ = walk_length(&cache, target, from);
            }
        }
    }

    #[test]
    fn unreachable_cells_yield_no_direction() {
        let cache = cache_from_rows(&[
            ".#.", //
            ".#.", //
            ".#.", //
        ]);
        let target = CellCoord::new(0, 0);
        assert_eq!(cache.direction(target, CellCoord::new(2, 0)), None);
        assert_eq!(cache.direction(target, CellCoord::new(1, 0)), None);
    }

    #[test]
    fn target_cell_itself_yields_no_direction() {
        let cache = cache_from_rows(&["...", "...", "..."]);
        let target = CellCoord::new(1, 1);
        assert_eq!(cache.direction(target, target), None);
    }

    #[test]
    fn off_grid_and_off_floor_lookups_miss_safely() {
        let cache = cache_from_rows(&[
            "..", //
            ".#", //
        ]);
        assert_eq!(
            cache.direction(CellCoord::new(0, 0), CellCoord::new(5, 5)),
            None
        );
        assert_eq!(
            cache.direction(CellCoord::new(1, 1), CellCoord::new(0, 0)),
            None
        );
        assert_eq!(
            cache.direction(CellCoord::new(0, 0), CellCoord::new(1, 1)),
            None
        );
    }

    #[test]
    fn descent_priority_breaks_ties_deterministically() {
        let cache = cache_from_rows(&[
            "...", //
            "...", //
            "...", //
        ]);
        // Diagonal offset: both a row step and a column step shorten the
        // path, so the row axis must win.
        assert_eq!(
            cache.direction(CellCoord::new(2, 2), CellCoord::new(1, 1)),
            Some(Direction::North)
        );
        assert_eq!(
            cache.direction(CellCoord::new(0, 0), CellCoord::new(1, 1)),
            Some(Direction::South)
        );
    }

    #[test]
    fn rebuilds_without_topology_changes_are_identical() {
        let rows = &[
            ".....", //
            ".#.#.", //
            ".....", //
        ];
        let first = cache_from_rows(rows);
        let second = cache_from_rows(rows);
        assert_eq!(first, second);
    }
}
