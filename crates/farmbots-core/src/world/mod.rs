pub mod metrics;

pub use metrics::*;

use crate::agent::{ArriveEffect, Drone};
use crate::config::{SimConfig, SimConfigError};
use crate::grid::{Grid, GridPos};
use crate::plant::PlantSpecies;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    InvalidSampleEvery,
    InvalidDt,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            RunError::InvalidDt => write!(f, "dt must be positive and finite"),
            RunError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            RunError::TooManySamples { max, actual } => {
                write!(f, "sample count ({actual}) exceeds supported maximum ({max})")
            }
        }
    }
}

impl Error for RunError {}

/// The whole simulation: grid, plants (owned by their cells), and the drone
/// fleet. An external loop drives it by calling `advance` with real elapsed
/// seconds and reads the snapshot/stats surface to render.
pub struct World {
    pub(crate) grid: Grid,
    pub(crate) drones: Vec<Drone>,
    pub(crate) species: PlantSpecies,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) tick_index: usize,
    pub(crate) planted_last_tick: usize,
    pub(crate) harvested_last_tick: usize,
    pub(crate) total_planted: usize,
    pub(crate) total_harvested: usize,
}

impl World {
    pub const MAX_RUN_STEPS: usize = 1_000_000;
    pub const MAX_RUN_SAMPLES: usize = 50_000;

    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;
        let grid = Grid::new(&config);
        let species = PlantSpecies::basic(&config);

        // Seeders first, then harvesters; creation order is also the
        // per-tick update order, which resolves same-target races.
        let mut drones = Vec::with_capacity(config.seeder_count + config.harvester_count);
        for _ in 0..config.seeder_count {
            drones.push(Drone::seeder(&grid, &config));
        }
        for _ in 0..config.harvester_count {
            drones.push(Drone::harvester(&grid, &config));
        }

        let rng = if config.seed >= 0 {
            ChaCha12Rng::seed_from_u64(config.seed as u64)
        } else {
            ChaCha12Rng::from_os_rng()
        };

        Ok(Self {
            grid,
            drones,
            species,
            config,
            rng,
            tick_index: 0,
            planted_last_tick: 0,
            harvested_last_tick: 0,
            total_planted: 0,
            total_harvested: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn tick_index(&self) -> usize {
        self.tick_index
    }

    pub fn total_planted(&self) -> usize {
        self.total_planted
    }

    pub fn total_harvested(&self) -> usize {
        self.total_harvested
    }

    /// Advance the simulation by `dt` seconds: every plant grows first, then
    /// every drone runs its decide/move/act cycle in fixed creation order.
    /// A very large `dt` advances each plant at most one stage and lets
    /// drones snap directly onto their targets; that is correct behavior,
    /// not a bug.
    pub fn advance(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0, "advance requires a non-negative delta");
        let dt = dt.max(0.0);
        self.tick_index = self.tick_index.saturating_add(1);
        self.planted_last_tick = 0;
        self.harvested_last_tick = 0;

        for cell in self.grid.cells_mut() {
            if let Some(plant) = cell.plant.as_mut() {
                plant.grow(dt);
            }
        }

        for drone in &mut self.drones {
            match drone.update(dt, &mut self.grid, &self.species, &mut self.rng) {
                Some(ArriveEffect::Planted) => {
                    self.planted_last_tick += 1;
                    self.total_planted += 1;
                }
                Some(ArriveEffect::Harvested) => {
                    self.harvested_last_tick += 1;
                    self.total_harvested += 1;
                }
                _ => {}
            }
        }
    }

    /// Debug command: drop up to `count` stage-0 plants on uniformly random
    /// empty field cells, giving each plant at most 200 placement attempts.
    /// Exhausted budgets are skipped silently. Returns how many were placed.
    pub fn sprinkle_plants(&mut self, count: usize) -> usize {
        let mut placed = 0;
        for _ in 0..count {
            for _ in 0..200 {
                let pos = GridPos::new(
                    self.rng.random_range(0..self.grid.cols()),
                    self.rng.random_range(0..self.grid.rows()),
                );
                if !self.grid.get(pos).is_some_and(|c| c.is_empty_field()) {
                    continue;
                }
                let plant = self.species.sprout(&mut self.rng);
                if let Some(cell) = self.grid.get_mut(pos) {
                    cell.plant = Some(plant);
                    self.total_planted += 1;
                    placed += 1;
                }
                break;
            }
        }
        placed
    }

    pub fn run(&mut self, steps: usize, dt: f64, sample_every: usize) -> RunSummary {
        self.try_run(steps, dt, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Step the world `steps` times with a fixed `dt`, sampling `FieldStats`
    /// every `sample_every` ticks plus the final tick.
    pub fn try_run(
        &mut self,
        steps: usize,
        dt: f64,
        sample_every: usize,
    ) -> Result<RunSummary, RunError> {
        if sample_every == 0 {
            return Err(RunError::InvalidSampleEvery);
        }
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(RunError::InvalidDt);
        }
        if steps > Self::MAX_RUN_STEPS {
            return Err(RunError::TooManySteps {
                max: Self::MAX_RUN_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_RUN_SAMPLES {
            return Err(RunError::TooManySamples {
                max: Self::MAX_RUN_SAMPLES,
                actual: estimated_samples,
            });
        }

        let planted_before = self.total_planted;
        let harvested_before = self.total_harvested;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.advance(dt);
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_stats());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            dt,
            sample_every,
            total_planted: self.total_planted - planted_before,
            total_harvested: self.total_harvested - harvested_before,
            samples,
        })
    }
}
