#![allow(dead_code)]

use grid_vrp::config::{OptimiserConfig, PlannerConfig};
use grid_vrp::domain::types::Point;
use grid_vrp::fixtures::GridWorld;

/// Uniform 5x5 grid with three neighboring units near the middle.
pub fn three_close_points() -> GridWorld {
    GridWorld::new(5, Point::new(0, 0))
        .with_material(Point::new(2, 2), 1)
        .with_material(Point::new(2, 3), 1)
        .with_material(Point::new(3, 2), 1)
}

/// Three close units plus one far outside the first search radius.
pub fn close_points_and_outlier() -> GridWorld {
    GridWorld::new(20, Point::new(0, 0))
        .with_material(Point::new(1, 1), 1)
        .with_material(Point::new(1, 2), 1)
        .with_material(Point::new(2, 1), 1)
        .with_material(Point::new(19, 19), 1)
}

/// Planner settings small enough for tests.
pub fn quick_config(cycles: usize) -> PlannerConfig {
    PlannerConfig {
        seed: 7,
        optimiser: OptimiserConfig::default()
            .with_cycles(cycles)
            .with_trials(3)
            .with_population(24, 8)
            .with_generations(15, 5)
            .with_check_interval(10),
        ..PlannerConfig::default()
    }
}
