use crate::config::SimConfig;
use crate::plant::Plant;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Integer cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Fixed classification of a grid cell, set once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Field,
    SeederRest,
    Storage,
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub cx: i32,
    pub cy: i32,
    pub kind: TileKind,
    /// The cell exclusively owns its plant; only drone arrival effects and
    /// `World::sprinkle_plants` change occupancy.
    pub plant: Option<Plant>,
}

impl Cell {
    pub fn pos(&self) -> GridPos {
        GridPos::new(self.cx, self.cy)
    }

    pub fn is_empty_field(&self) -> bool {
        self.kind == TileKind::Field && self.plant.is_none()
    }

    pub fn has_ripe_plant(&self) -> bool {
        self.kind == TileKind::Field && self.plant.as_ref().is_some_and(|p| p.is_ripe())
    }
}

const NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const NEIGHBORS_8: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Dense row-major cell grid. Tile kinds are immutable after construction;
/// only plant occupancy changes at runtime.
pub struct Grid {
    cols: i32,
    rows: i32,
    tile_size: i32,
    diagonals: bool,
    seeder_rest: GridPos,
    storage: GridPos,
    cells: Vec<Cell>,
}

impl Grid {
    /// Expects a validated config; station coordinates must be in bounds.
    pub fn new(config: &SimConfig) -> Self {
        let mut cells = Vec::with_capacity(config.cols as usize * config.rows as usize);
        for y in 0..config.rows {
            for x in 0..config.cols {
                cells.push(Cell {
                    cx: x,
                    cy: y,
                    kind: TileKind::Field,
                    plant: None,
                });
            }
        }
        let mut grid = Self {
            cols: config.cols,
            rows: config.rows,
            tile_size: config.tile_size,
            diagonals: config.allow_diagonals,
            seeder_rest: config.seeder_rest,
            storage: config.storage,
            cells,
        };
        grid.cell_mut(config.seeder_rest).kind = TileKind::SeederRest;
        grid.cell_mut(config.storage).kind = TileKind::Storage;
        grid
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn seeder_rest(&self) -> GridPos {
        self.seeder_rest
    }

    pub fn storage(&self) -> GridPos {
        self.storage
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    fn index(&self, pos: GridPos) -> usize {
        (pos.y * self.cols + pos.x) as usize
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        self.in_bounds(pos).then(|| &self.cells[self.index(pos)])
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    fn cell_mut(&mut self, pos: GridPos) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Pixel-space center of a cell.
    pub fn cell_center(&self, pos: GridPos) -> [f64; 2] {
        let half = self.tile_size as f64 / 2.0;
        [
            pos.x as f64 * self.tile_size as f64 + half,
            pos.y as f64 * self.tile_size as f64 + half,
        ]
    }

    /// Cell containing a pixel-space position, clamped to the grid.
    pub fn pos_at(&self, position: [f64; 2]) -> GridPos {
        let cx = ((position[0] / self.tile_size as f64) as i32).clamp(0, self.cols - 1);
        let cy = ((position[1] / self.tile_size as f64) as i32).clamp(0, self.rows - 1);
        GridPos::new(cx, cy)
    }

    /// Breadth-first search for the closest cell satisfying `pred`, starting
    /// at (and including) `origin`. Neighbor enumeration order is fixed
    /// (+x, -x, +y, -y, then diagonals when enabled), so among equal-distance
    /// candidates the first discovered wins and the result is deterministic.
    /// Returns `None` iff no cell matches.
    pub fn nearest<F>(&self, origin: GridPos, pred: F) -> Option<GridPos>
    where
        F: Fn(&Cell) -> bool,
    {
        debug_assert!(self.in_bounds(origin), "search origin out of bounds");
        let neighbors: &[(i32, i32)] = if self.diagonals {
            &NEIGHBORS_8
        } else {
            &NEIGHBORS_4
        };
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        visited[self.index(origin)] = true;
        queue.push_back(origin);
        while let Some(pos) = queue.pop_front() {
            let cell = &self.cells[self.index(pos)];
            if pred(cell) {
                return Some(pos);
            }
            for &(dx, dy) in neighbors {
                let next = GridPos::new(pos.x + dx, pos.y + dy);
                if self.in_bounds(next) && !visited[self.index(next)] {
                    visited[self.index(next)] = true;
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
