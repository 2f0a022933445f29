use crate::grid::GridPos;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Immutable simulation configuration, built once at startup and passed by
/// reference into `World`, `Grid`, and plant/drone constructors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub cols: i32,
    pub rows: i32,
    /// Edge length of a cell in pixel space; drone positions and speeds are
    /// expressed in pixels.
    pub tile_size: i32,

    pub seeder_rest: GridPos,
    pub storage: GridPos,

    pub seeder_count: usize,
    pub seeder_capacity: u32,
    pub seeder_speed_tiles: f64,

    pub harvester_count: usize,
    pub harvester_capacity: u32,
    pub harvester_speed_tiles: f64,

    /// Growth stages per plant; the last stage is ripe/terminal.
    pub plant_stages: usize,
    pub stage_seconds_min: f64,
    pub stage_seconds_max: f64,
    /// When set (and at least `plant_stages` long), every plant copies this
    /// table instead of rolling random per-stage durations.
    pub fixed_stage_seconds: Option<Vec<f64>>,

    pub allow_diagonals: bool,
    /// Non-negative values seed a reproducible generator; negative requests
    /// OS randomness.
    pub seed: i64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 12,
            tile_size: 32,
            seeder_rest: GridPos::new(1, 1),
            storage: GridPos::new(18, 10),
            seeder_count: 5,
            seeder_capacity: 5,
            seeder_speed_tiles: 4.0,
            harvester_count: 3,
            harvester_capacity: 5,
            harvester_speed_tiles: 4.2,
            plant_stages: 4,
            stage_seconds_min: 2.5,
            stage_seconds_max: 6.0,
            fixed_stage_seconds: None,
            allow_diagonals: false,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidGridSize { cols: i32, rows: i32 },
    GridTooLarge { max: usize, actual: usize },
    InvalidTileSize { tile_size: i32 },
    StationOutOfBounds { station: &'static str, pos: GridPos },
    StationsOverlap { pos: GridPos },
    InvalidCapacity { station: &'static str },
    InvalidSpeed { station: &'static str, speed: f64 },
    InvalidStageCount { stages: usize },
    InvalidStageBounds { min: f64, max: f64 },
    InvalidFixedStageTable,
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidGridSize { cols, rows } => {
                write!(f, "grid extents ({cols}x{rows}) must be positive")
            }
            SimConfigError::GridTooLarge { max, actual } => {
                write!(f, "grid cell count ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::InvalidTileSize { tile_size } => {
                write!(f, "tile_size ({tile_size}) must be positive")
            }
            SimConfigError::StationOutOfBounds { station, pos } => {
                write!(f, "{station} station ({}, {}) lies outside the grid", pos.x, pos.y)
            }
            SimConfigError::StationsOverlap { pos } => {
                write!(
                    f,
                    "seeder rest and storage stations both occupy ({}, {})",
                    pos.x, pos.y
                )
            }
            SimConfigError::InvalidCapacity { station } => {
                write!(f, "{station} capacity must be positive")
            }
            SimConfigError::InvalidSpeed { station, speed } => {
                write!(f, "{station} speed ({speed}) must be positive and finite")
            }
            SimConfigError::InvalidStageCount { stages } => {
                write!(f, "plant_stages ({stages}) must be at least 2")
            }
            SimConfigError::InvalidStageBounds { min, max } => {
                write!(f, "stage duration bounds [{min}, {max}] must be positive and ordered")
            }
            SimConfigError::InvalidFixedStageTable => {
                write!(
                    f,
                    "fixed_stage_seconds must cover every stage with positive durations"
                )
            }
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_GRID_CELLS: usize = 1_000_000;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(SimConfigError::InvalidGridSize {
                cols: self.cols,
                rows: self.rows,
            });
        }
        let cell_count = self.cols as usize * self.rows as usize;
        if cell_count > Self::MAX_GRID_CELLS {
            return Err(SimConfigError::GridTooLarge {
                max: Self::MAX_GRID_CELLS,
                actual: cell_count,
            });
        }
        if self.tile_size <= 0 {
            return Err(SimConfigError::InvalidTileSize {
                tile_size: self.tile_size,
            });
        }
        if !self.in_bounds(self.seeder_rest) {
            return Err(SimConfigError::StationOutOfBounds {
                station: "seeder rest",
                pos: self.seeder_rest,
            });
        }
        if !self.in_bounds(self.storage) {
            return Err(SimConfigError::StationOutOfBounds {
                station: "storage",
                pos: self.storage,
            });
        }
        if self.seeder_rest == self.storage {
            return Err(SimConfigError::StationsOverlap {
                pos: self.storage,
            });
        }
        if self.seeder_capacity == 0 {
            return Err(SimConfigError::InvalidCapacity { station: "seeder" });
        }
        if self.harvester_capacity == 0 {
            return Err(SimConfigError::InvalidCapacity {
                station: "harvester",
            });
        }
        if !(self.seeder_speed_tiles > 0.0 && self.seeder_speed_tiles.is_finite()) {
            return Err(SimConfigError::InvalidSpeed {
                station: "seeder",
                speed: self.seeder_speed_tiles,
            });
        }
        if !(self.harvester_speed_tiles > 0.0 && self.harvester_speed_tiles.is_finite()) {
            return Err(SimConfigError::InvalidSpeed {
                station: "harvester",
                speed: self.harvester_speed_tiles,
            });
        }
        if self.plant_stages < 2 {
            return Err(SimConfigError::InvalidStageCount {
                stages: self.plant_stages,
            });
        }
        match &self.fixed_stage_seconds {
            Some(table) => {
                if table.len() < self.plant_stages || table.iter().any(|&d| !(d > 0.0)) {
                    return Err(SimConfigError::InvalidFixedStageTable);
                }
            }
            None => {
                if !(self.stage_seconds_min > 0.0)
                    || !(self.stage_seconds_max >= self.stage_seconds_min)
                {
                    return Err(SimConfigError::InvalidStageBounds {
                        min: self.stage_seconds_min,
                        max: self.stage_seconds_max,
                    });
                }
            }
        }
        Ok(())
    }

    fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }
}
