use super::World;
use crate::agent::DroneRole;
use crate::grid::{GridPos, TileKind};
use serde::{Deserialize, Serialize};

/// Per-tick aggregate of field and fleet state.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FieldStats {
    pub tick: usize,
    pub plant_count: usize,
    pub ripe_count: usize,
    pub empty_field_count: usize,
    pub planted_this_tick: usize,
    pub harvested_this_tick: usize,
    pub total_planted: usize,
    pub total_harvested: usize,
    /// Seeds sitting in seeder hoppers.
    pub seeds_in_hand: u32,
    /// Harvested units still riding in harvesters.
    pub cargo_in_transit: u32,
}

/// One grid cell as a renderer sees it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CellView {
    pub cx: i32,
    pub cy: i32,
    pub kind: TileKind,
    pub plant_stage: Option<usize>,
    pub ripe: bool,
}

/// One drone as a renderer sees it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DroneView {
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub load: u32,
    pub capacity: u32,
    pub target: Option<GridPos>,
    pub status: String,
}

/// Full read surface for a frame: every cell plus every drone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: usize,
    pub cols: i32,
    pub rows: i32,
    pub cells: Vec<CellView>,
    pub drones: Vec<DroneView>,
}

fn default_schema_version() -> u32 {
    1
}

/// Output of a headless batch run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub dt: f64,
    pub sample_every: usize,
    pub total_planted: usize,
    pub total_harvested: usize,
    pub samples: Vec<FieldStats>,
}

impl World {
    pub(crate) fn collect_stats(&self) -> FieldStats {
        let mut plant_count = 0;
        let mut ripe_count = 0;
        let mut empty_field_count = 0;
        for cell in self.grid.cells() {
            match &cell.plant {
                Some(plant) => {
                    plant_count += 1;
                    if plant.is_ripe() {
                        ripe_count += 1;
                    }
                }
                None => {
                    if cell.kind == TileKind::Field {
                        empty_field_count += 1;
                    }
                }
            }
        }

        let mut seeds_in_hand = 0;
        let mut cargo_in_transit = 0;
        for drone in &self.drones {
            match drone.role {
                DroneRole::Seeder { seeds } => seeds_in_hand += seeds,
                DroneRole::Harvester { cargo } => cargo_in_transit += cargo,
            }
        }

        FieldStats {
            tick: self.tick_index,
            plant_count,
            ripe_count,
            empty_field_count,
            planted_this_tick: self.planted_last_tick,
            harvested_this_tick: self.harvested_last_tick,
            total_planted: self.total_planted,
            total_harvested: self.total_harvested,
            seeds_in_hand,
            cargo_in_transit,
        }
    }

    pub fn stats(&self) -> FieldStats {
        self.collect_stats()
    }

    /// Serialize-friendly frame of the entire world for a renderer.
    pub fn snapshot(&self) -> WorldSnapshot {
        let cells = self
            .grid
            .cells()
            .map(|cell| CellView {
                cx: cell.cx,
                cy: cell.cy,
                kind: cell.kind,
                plant_stage: cell.plant.as_ref().map(|p| p.stage),
                ripe: cell.has_ripe_plant(),
            })
            .collect();
        let drones = self
            .drones
            .iter()
            .map(|drone| DroneView {
                kind: drone.role.name().to_string(),
                x: drone.position[0],
                y: drone.position[1],
                load: drone.role.load(),
                capacity: drone.capacity,
                target: drone.target,
                status: drone.status(),
            })
            .collect();
        WorldSnapshot {
            tick: self.tick_index,
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            cells,
            drones,
        }
    }
}
