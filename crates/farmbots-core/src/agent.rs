use crate::config::SimConfig;
use crate::grid::{Grid, GridPos, TileKind};
use crate::plant::PlantSpecies;
use rand::Rng;

/// Within one pixel of a cell center counts as arrived.
const ARRIVAL_EPSILON_SQ: f64 = 1.0;

/// Per-kind drone state: the load each role carries between field and
/// station.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DroneRole {
    Seeder { seeds: u32 },
    Harvester { cargo: u32 },
}

impl DroneRole {
    pub fn name(&self) -> &'static str {
        match self {
            DroneRole::Seeder { .. } => "seeder",
            DroneRole::Harvester { .. } => "harvester",
        }
    }

    pub fn load(&self) -> u32 {
        match self {
            DroneRole::Seeder { seeds } => *seeds,
            DroneRole::Harvester { cargo } => *cargo,
        }
    }
}

/// What a drone did on arriving at its target this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArriveEffect {
    Planted,
    Harvested,
    Refilled,
    Unloaded,
}

/// An autonomous field drone. Movement state is shared between roles; only
/// the decide/arrive logic differs per `DroneRole`.
#[derive(Clone, Debug)]
pub struct Drone {
    pub position: [f64; 2],
    pub target: Option<GridPos>,
    pub capacity: u32,
    speed_px_per_sec: f64,
    pub role: DroneRole,
}

impl Drone {
    /// A seeder starts at the rest station center with a full seed hopper.
    pub fn seeder(grid: &Grid, config: &SimConfig) -> Self {
        Self {
            position: grid.cell_center(grid.seeder_rest()),
            target: None,
            capacity: config.seeder_capacity,
            speed_px_per_sec: config.seeder_speed_tiles * config.tile_size as f64,
            role: DroneRole::Seeder {
                seeds: config.seeder_capacity,
            },
        }
    }

    /// A harvester starts empty at the storage station center.
    pub fn harvester(grid: &Grid, config: &SimConfig) -> Self {
        Self {
            position: grid.cell_center(grid.storage()),
            target: None,
            capacity: config.harvester_capacity,
            speed_px_per_sec: config.harvester_speed_tiles * config.tile_size as f64,
            role: DroneRole::Harvester { cargo: 0 },
        }
    }

    /// Pick the next target cell. Out of supplies (or with nothing matching
    /// in the field) a drone falls back to its home station; otherwise it
    /// heads for the nearest matching cell.
    pub fn decide(&mut self, grid: &Grid) {
        let origin = grid.pos_at(self.position);
        self.target = Some(match &self.role {
            DroneRole::Seeder { seeds } => {
                if *seeds == 0 {
                    grid.seeder_rest()
                } else {
                    grid.nearest(origin, |c| c.is_empty_field())
                        .unwrap_or_else(|| grid.seeder_rest())
                }
            }
            DroneRole::Harvester { cargo } => {
                if *cargo >= self.capacity {
                    grid.storage()
                } else {
                    grid.nearest(origin, |c| c.has_ripe_plant())
                        .unwrap_or_else(|| grid.storage())
                }
            }
        });
    }

    fn at_cell_center(&self, center: [f64; 2]) -> bool {
        let dx = center[0] - self.position[0];
        let dy = center[1] - self.position[1];
        dx * dx + dy * dy < ARRIVAL_EPSILON_SQ
    }

    /// Constant-speed movement toward a cell center, snapping exactly onto
    /// it rather than overshooting.
    fn move_towards(&mut self, center: [f64; 2], dt: f64) {
        let dx = center[0] - self.position[0];
        let dy = center[1] - self.position[1];
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-6 {
            return;
        }
        let step = self.speed_px_per_sec * dt;
        if step >= len {
            self.position = center;
        } else {
            self.position[0] += dx / len * step;
            self.position[1] += dy / len * step;
        }
    }

    /// One decide/move/act cycle. Arrival applies the role effect to the
    /// grid and immediately re-decides; a target that no longer matches
    /// expectations (another drone got there first) just re-decides.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        grid: &mut Grid,
        species: &PlantSpecies,
        rng: &mut R,
    ) -> Option<ArriveEffect> {
        if self.target.is_none() {
            self.decide(grid);
        }
        let Some(target) = self.target else {
            return None;
        };

        self.move_towards(grid.cell_center(target), dt);
        if !self.at_cell_center(grid.cell_center(target)) {
            return None;
        }

        let effect = self.arrive(target, grid, species, rng);
        self.decide(grid);
        effect
    }

    fn arrive<R: Rng + ?Sized>(
        &mut self,
        target: GridPos,
        grid: &mut Grid,
        species: &PlantSpecies,
        rng: &mut R,
    ) -> Option<ArriveEffect> {
        let capacity = self.capacity;
        let Some(cell) = grid.get_mut(target) else {
            return None;
        };
        match &mut self.role {
            DroneRole::Seeder { seeds } => {
                if cell.kind == TileKind::SeederRest {
                    *seeds = capacity;
                    Some(ArriveEffect::Refilled)
                } else if cell.is_empty_field() && *seeds > 0 {
                    cell.plant = Some(species.sprout(rng));
                    *seeds -= 1;
                    Some(ArriveEffect::Planted)
                } else {
                    None
                }
            }
            DroneRole::Harvester { cargo } => {
                if cell.kind == TileKind::Storage {
                    *cargo = 0;
                    Some(ArriveEffect::Unloaded)
                } else if cell.has_ripe_plant() {
                    cell.plant = None;
                    *cargo += 1;
                    Some(ArriveEffect::Harvested)
                } else {
                    None
                }
            }
        }
    }

    /// One-line human-readable state for debug HUDs.
    pub fn status(&self) -> String {
        let unit = match self.role {
            DroneRole::Seeder { .. } => "seeds",
            DroneRole::Harvester { .. } => "cargo",
        };
        let target = match self.target {
            Some(pos) => pos.to_string(),
            None => "(none)".to_string(),
        };
        format!(
            "{} {}={}/{} target={}",
            self.role.name(),
            unit,
            self.role.load(),
            self.capacity,
            target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn setup() -> (Grid, PlantSpecies, SimConfig, ChaCha12Rng) {
        let config = SimConfig {
            cols: 5,
            rows: 5,
            seeder_rest: GridPos::new(0, 0),
            storage: GridPos::new(4, 4),
            fixed_stage_seconds: Some(vec![1.0; 4]),
            ..SimConfig::default()
        };
        let grid = Grid::new(&config);
        let species = PlantSpecies::basic(&config);
        let rng = ChaCha12Rng::seed_from_u64(config.seed as u64);
        (grid, species, config, rng)
    }

    #[test]
    fn seeder_without_seeds_targets_rest_station() {
        let (grid, _, config, _) = setup();
        let mut drone = Drone::seeder(&grid, &config);
        drone.role = DroneRole::Seeder { seeds: 0 };
        drone.position = grid.cell_center(GridPos::new(3, 3));
        drone.decide(&grid);
        assert_eq!(drone.target, Some(grid.seeder_rest()));
    }

    #[test]
    fn full_harvester_targets_storage() {
        let (mut grid, _, config, _) = setup();
        let mut ripe = crate::plant::Plant::new(vec![1.0, 1.0]);
        ripe.grow(1.0);
        grid.get_mut(GridPos::new(2, 2)).unwrap().plant = Some(ripe);

        let mut drone = Drone::harvester(&grid, &config);
        drone.role = DroneRole::Harvester {
            cargo: config.harvester_capacity,
        };
        drone.decide(&grid);
        assert_eq!(drone.target, Some(grid.storage()));
    }

    #[test]
    fn movement_snaps_to_center_without_overshoot() {
        let (grid, _, config, _) = setup();
        let mut drone = Drone::seeder(&grid, &config);
        let center = grid.cell_center(GridPos::new(3, 0));
        // Huge dt: must land exactly on the center.
        drone.move_towards(center, 1000.0);
        assert_eq!(drone.position, center);
        // Small dt from the rest station: strictly between start and target.
        let mut drone = Drone::seeder(&grid, &config);
        let start = drone.position;
        drone.move_towards(center, 0.01);
        assert!(drone.position[0] > start[0]);
        assert!(drone.position[0] < center[0]);
        assert_eq!(drone.position[1], center[1]);
    }

    #[test]
    fn seeder_plants_on_arrival_and_spends_a_seed() {
        let (mut grid, species, config, mut rng) = setup();
        let mut drone = Drone::seeder(&grid, &config);
        let target = GridPos::new(1, 0);
        drone.position = grid.cell_center(target);
        drone.target = Some(target);

        let effect = drone.update(0.0, &mut grid, &species, &mut rng);
        assert_eq!(effect, Some(ArriveEffect::Planted));
        let planted = grid.get(target).unwrap().plant.as_ref().unwrap();
        assert_eq!(planted.stage, 0);
        assert_eq!(drone.role, DroneRole::Seeder { seeds: config.seeder_capacity - 1 });
    }

    #[test]
    fn harvester_removes_ripe_plant_and_takes_cargo() {
        let (mut grid, species, config, mut rng) = setup();
        let target = GridPos::new(2, 2);
        let mut ripe = crate::plant::Plant::new(vec![1.0, 1.0]);
        ripe.grow(1.0);
        grid.get_mut(target).unwrap().plant = Some(ripe);

        let mut drone = Drone::harvester(&grid, &config);
        drone.position = grid.cell_center(target);
        drone.target = Some(target);

        let effect = drone.update(0.0, &mut grid, &species, &mut rng);
        assert_eq!(effect, Some(ArriveEffect::Harvested));
        assert!(grid.get(target).unwrap().plant.is_none());
        assert_eq!(drone.role, DroneRole::Harvester { cargo: 1 });
    }

    #[test]
    fn contested_target_just_redecides() {
        let (mut grid, species, config, mut rng) = setup();
        let target = GridPos::new(2, 2);
        let mut drone = Drone::harvester(&grid, &config);
        drone.position = grid.cell_center(target);
        drone.target = Some(target);

        // No ripe plant here anymore: no effect, but a fresh target is set.
        let effect = drone.update(0.0, &mut grid, &species, &mut rng);
        assert_eq!(effect, None);
        assert_eq!(drone.target, Some(grid.storage()));
    }

    #[test]
    fn refill_happens_immediately_at_rest() {
        let (mut grid, species, config, mut rng) = setup();
        let mut drone = Drone::seeder(&grid, &config);
        drone.role = DroneRole::Seeder { seeds: 0 };
        drone.target = Some(grid.seeder_rest());

        let effect = drone.update(0.0, &mut grid, &species, &mut rng);
        assert_eq!(effect, Some(ArriveEffect::Refilled));
        assert_eq!(
            drone.role,
            DroneRole::Seeder { seeds: config.seeder_capacity }
        );
        // Re-decide already ran: with seeds in hand the next target is a
        // field cell, not the rest station.
        assert_ne!(drone.target, Some(grid.seeder_rest()));
    }

    #[test]
    fn status_reads_like_a_hud_line() {
        let (grid, _, config, _) = setup();
        let mut drone = Drone::seeder(&grid, &config);
        drone.target = Some(GridPos::new(4, 2));
        assert_eq!(drone.status(), "seeder seeds=5/5 target=(4,2)");
    }
}
