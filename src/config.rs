use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

pub mod constant {
    pub(crate) const CAPACITY: u32 = 3;
    pub(crate) const MUTATION_RATE: f32 = 0.025;
    pub(crate) const SEED: u64 = 42;
    pub(crate) const GRID_SIZE: i32 = 50;
    pub(crate) const MATERIAL_DENSITY: f64 = 0.08;
    pub(crate) const MAX_CELL_TIME: u32 = 6;
    pub(crate) const SPREAD_FACTOR: i32 = 31;
    pub(crate) const CHECKPOINT_CSV: &str = "optimiser_checkpoints.csv";
}

/// Search radius as a function of the grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Radius {
    Fixed(i32),
    /// `offset + n / divisor`
    Linear { offset: i32, divisor: i32 },
    /// `n * factor`
    Scaled(i32),
}

impl Radius {
    pub fn apply(self, n: i32) -> i32 {
        match self {
            Radius::Fixed(r) => r,
            Radius::Linear { offset, divisor } => offset + n / divisor.max(1),
            Radius::Scaled(factor) => n * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborLimit {
    Bounded(usize),
    Unbounded,
}

/// How far and for how many neighbors the path store searches per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub radius: Radius,
    pub neighbors: NeighborLimit,
}

impl StoreConfig {
    pub const fn new(radius: Radius, neighbors: NeighborLimit) -> Self {
        Self { radius, neighbors }
    }

    pub fn radius(&self, n: i32) -> i32 {
        self.radius.apply(n)
    }

    pub fn neighbor_limit(&self) -> usize {
        match self.neighbors {
            NeighborLimit::Bounded(limit) => limit,
            NeighborLimit::Unbounded => usize::MAX,
        }
    }

    /// First pass: `5 + n/2` around each point, 7 neighbors.
    pub fn primary() -> Self {
        Self::new(
            Radius::Linear {
                offset: 5,
                divisor: 2,
            },
            NeighborLimit::Bounded(7),
        )
    }

    /// Later composer seasons search the whole grid.
    pub fn secondary() -> Self {
        Self::new(Radius::Scaled(2), NeighborLimit::Bounded(7))
    }

    /// Optimiser scopes want every pair.
    pub fn exhaustive() -> Self {
        Self::new(Radius::Scaled(2), NeighborLimit::Unbounded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimiserConfig {
    pub cycles: usize,
    /// Cycles at which the scope, population and generations grow.
    pub widen_at: Vec<usize>,
    pub base_scope: usize,
    pub scope_step: usize,
    pub trials: usize,
    pub base_population: usize,
    pub population_step: usize,
    pub base_generations: usize,
    pub generation_step: usize,
    pub elitism: f32,
    pub check_interval: usize,
    pub spread_factor: i32,
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        OptimiserConfig {
            cycles: 2200,
            widen_at: vec![1198, 1798],
            base_scope: 9,
            scope_step: 3,
            trials: 14,
            base_population: 150,
            population_step: 50,
            base_generations: 120,
            generation_step: 60,
            elitism: 0.025,
            check_interval: 100,
            spread_factor: constant::SPREAD_FACTOR,
        }
    }
}

impl OptimiserConfig {
    pub fn with_cycles(mut self, cycles: usize) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_population(mut self, base: usize, step: usize) -> Self {
        self.base_population = base;
        self.population_step = step;
        self
    }

    pub fn with_generations(mut self, base: usize, step: usize) -> Self {
        self.base_generations = base;
        self.generation_step = step;
        self
    }

    pub fn with_check_interval(mut self, interval: usize) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn scope_size(&self, widen: usize) -> usize {
        self.base_scope + self.scope_step * widen
    }

    pub fn population(&self, widen: usize) -> usize {
        self.base_population + self.population_step * widen
    }

    pub fn generations(&self, widen: usize) -> usize {
        self.base_generations + self.generation_step * widen
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_interval == 0 {
            return Err(RoutingError::InvalidConfig(
                "check_interval must be non-zero".to_string(),
            ));
        }
        if self.base_population < 2 {
            return Err(RoutingError::InvalidConfig(
                "population needs at least two genomes".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.elitism) {
            return Err(RoutingError::InvalidConfig(format!(
                "elitism {} must be in [0, 1)",
                self.elitism
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub seed: u64,
    pub primary: StoreConfig,
    pub secondary: StoreConfig,
    pub exhaustive: StoreConfig,
    pub optimiser: OptimiserConfig,
    /// Depot handling time per delivery, `None` means half the grid size.
    pub processing_duration: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            seed: constant::SEED,
            primary: StoreConfig::primary(),
            secondary: StoreConfig::secondary(),
            exhaustive: StoreConfig::exhaustive(),
            optimiser: OptimiserConfig::default(),
            processing_duration: None,
        }
    }
}

impl PlannerConfig {
    pub fn processing_duration(&self, n: i32) -> u32 {
        self.processing_duration.unwrap_or((n / 2).max(0) as u32)
    }
}
