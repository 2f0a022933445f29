use crate::config::SimConfig;
use rand::Rng;

/// Per-species growth parameters, built once from config. Only one species
/// ("basic") exists; each plant instance still copies or rolls its own
/// duration table from these.
#[derive(Clone, Debug)]
pub struct PlantSpecies {
    pub id: &'static str,
    pub stages: usize,
    fixed_stage_seconds: Option<Vec<f64>>,
    stage_seconds_min: f64,
    stage_seconds_max: f64,
}

impl PlantSpecies {
    pub fn basic(config: &SimConfig) -> Self {
        Self {
            id: "basic",
            stages: config.plant_stages,
            fixed_stage_seconds: config.fixed_stage_seconds.clone(),
            stage_seconds_min: config.stage_seconds_min,
            stage_seconds_max: config.stage_seconds_max,
        }
    }

    /// Per-instance duration table: the configured fixed table when present,
    /// otherwise one uniform draw per stage from the configured bounds.
    pub fn roll_stage_seconds<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        match &self.fixed_stage_seconds {
            Some(table) if table.len() >= self.stages => table[..self.stages].to_vec(),
            _ => (0..self.stages)
                .map(|_| {
                    let t = rng.random::<f64>();
                    self.stage_seconds_min + (self.stage_seconds_max - self.stage_seconds_min) * t
                })
                .collect(),
        }
    }

    pub fn sprout<R: Rng + ?Sized>(&self, rng: &mut R) -> Plant {
        Plant::new(self.roll_stage_seconds(rng))
    }
}

/// A growing plant occupying one cell. Stage is 0-based; the last stage is
/// ripe and terminal.
#[derive(Clone, Debug)]
pub struct Plant {
    pub stage: usize,
    pub timer: f64,
    pub stage_seconds: Vec<f64>,
}

impl Plant {
    pub fn new(stage_seconds: Vec<f64>) -> Self {
        debug_assert!(stage_seconds.len() >= 2, "plants need at least two stages");
        Self {
            stage: 0,
            timer: 0.0,
            stage_seconds,
        }
    }

    pub fn stages(&self) -> usize {
        self.stage_seconds.len()
    }

    pub fn is_ripe(&self) -> bool {
        self.stage + 1 >= self.stage_seconds.len()
    }

    /// Advance the growth timer. When the current stage's duration elapses
    /// the excess carries into the next stage, but a single call advances at
    /// most one stage. Ripe plants never change.
    pub fn grow(&mut self, dt: f64) {
        if self.is_ripe() {
            return;
        }
        self.timer += dt;
        let duration = self.stage_seconds[self.stage];
        if self.timer >= duration {
            self.timer -= duration;
            self.stage = (self.stage + 1).min(self.stage_seconds.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn stage_is_monotonic_and_capped() {
        let mut plant = Plant::new(vec![1.0, 1.0, 1.0]);
        let mut last_stage = plant.stage;
        for _ in 0..100 {
            plant.grow(0.7);
            assert!(plant.stage >= last_stage);
            assert!(plant.stage <= 2);
            last_stage = plant.stage;
        }
        assert!(plant.is_ripe());
    }

    #[test]
    fn excess_time_carries_over_one_stage_per_call() {
        let mut plant = Plant::new(vec![2.0, 2.0, 2.0]);
        // A single 4-second call covers two full durations but advances once,
        // carrying the remainder.
        plant.grow(4.0);
        assert_eq!(plant.stage, 1);
        assert_eq!(plant.timer, 2.0);
        // The carried 2 seconds complete stage 1 on the next call.
        plant.grow(0.0);
        assert_eq!(plant.stage, 2);
        assert!(plant.is_ripe());
    }

    #[test]
    fn two_exact_duration_calls_advance_twice() {
        let mut plant = Plant::new(vec![3.0, 3.0, 3.0]);
        plant.grow(3.0);
        assert_eq!(plant.stage, 1);
        plant.grow(3.0);
        assert_eq!(plant.stage, 2);
    }

    #[test]
    fn terminal_stage_is_inert() {
        let mut plant = Plant::new(vec![1.0, 1.0, 1.0]);
        plant.grow(1.0);
        plant.grow(1.0);
        assert!(plant.is_ripe());
        let stage = plant.stage;
        plant.grow(100.0);
        assert_eq!(plant.stage, stage);
        assert!(plant.is_ripe());
    }

    #[test]
    fn three_stage_plant_ripens_after_two_seconds() {
        let mut plant = Plant::new(vec![1.0, 1.0, 1.0]);
        let mut elapsed = 0.0;
        while elapsed < 2.0 {
            assert!(!plant.is_ripe());
            plant.grow(0.25);
            elapsed += 0.25;
        }
        assert!(plant.is_ripe());
    }

    #[test]
    fn species_rolls_durations_within_bounds() {
        let config = SimConfig::default();
        let species = PlantSpecies::basic(&config);
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let table = species.roll_stage_seconds(&mut rng);
        assert_eq!(table.len(), config.plant_stages);
        for &d in &table {
            assert!(d >= config.stage_seconds_min && d < config.stage_seconds_max);
        }
    }

    #[test]
    fn species_honors_fixed_table() {
        let config = SimConfig {
            plant_stages: 3,
            fixed_stage_seconds: Some(vec![1.0, 2.0, 3.0, 4.0]),
            ..SimConfig::default()
        };
        let species = PlantSpecies::basic(&config);
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        assert_eq!(species.roll_stage_seconds(&mut rng), vec![1.0, 2.0, 3.0]);
    }
}
