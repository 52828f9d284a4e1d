use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::constant::{CAPACITY, MATERIAL_DENSITY, MAX_CELL_TIME};
use crate::domain::types::Point;
use crate::domain::world::World;
use crate::error::{Result, RoutingError};

/// In-memory square grid. Cell vectors are row-major (`y * size + x`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWorld {
    size: i32,
    depot: Point,
    times: Vec<u32>,
    materials: Vec<u32>,
}

impl GridWorld {
    /// Grid where every cell costs one time unit and nothing lies around.
    pub fn new(size: i32, depot: Point) -> Self {
        let cells = (size.max(0) as usize).pow(2);
        Self {
            size,
            depot,
            times: vec![1; cells],
            materials: vec![0; cells],
        }
    }

    pub fn with_time(mut self, p: Point, time: u32) -> Self {
        let i = p.index(self.size);
        self.times[i] = time;
        self
    }

    pub fn with_material(mut self, p: Point, units: u32) -> Self {
        let i = p.index(self.size);
        self.materials[i] = units;
        self
    }

    /// Seeded random grid with the depot in the middle.
    pub fn random(size: i32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let depot = Point::new(size / 2, size / 2);
        let mut world = GridWorld::new(size, depot);
        for y in 0..size {
            for x in 0..size {
                let p = Point::new(x, y);
                let i = p.index(size);
                world.times[i] = rng.gen_range(1..=MAX_CELL_TIME);
                if p != depot && rng.gen_bool(MATERIAL_DENSITY) {
                    world.materials[i] = rng.gen_range(1..=CAPACITY);
                }
            }
        }
        info!(
            "Generated {}x{} grid (seed {}): {} material cells, {} units",
            size,
            size,
            seed,
            world.material_points().len(),
            world.total_material()
        );
        world
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let world: GridWorld =
            serde_json::from_str(json).map_err(|e| RoutingError::InvalidWorld(e.to_string()))?;
        world.validate()?;
        Ok(world)
    }

    pub fn validate(&self) -> Result<()> {
        let cells = (self.size.max(0) as usize).pow(2);
        if self.size <= 0 {
            return Err(RoutingError::InvalidWorld(format!(
                "grid size {} must be positive",
                self.size
            )));
        }
        if self.times.len() != cells || self.materials.len() != cells {
            return Err(RoutingError::InvalidWorld(format!(
                "expected {} cells, got {} times and {} materials",
                cells,
                self.times.len(),
                self.materials.len()
            )));
        }
        if !self.depot.in_grid(self.size) {
            return Err(RoutingError::InvalidWorld(format!(
                "depot {} lies outside the grid",
                self.depot
            )));
        }
        if self.has_material(self.depot) {
            return Err(RoutingError::InvalidWorld(format!(
                "depot {} holds material",
                self.depot
            )));
        }
        if let Some(i) = self.times.iter().position(|&t| t == 0) {
            return Err(RoutingError::InvalidWorld(format!(
                "cell {} has no traversal time",
                i
            )));
        }
        if let Some(i) = self.materials.iter().position(|&m| m > CAPACITY) {
            return Err(RoutingError::InvalidWorld(format!(
                "cell {} holds more than {} units",
                i, CAPACITY
            )));
        }
        Ok(())
    }

    /// Removes up to `max` units from `p` and returns how many were taken.
    pub fn take_material(&mut self, p: Point, max: u32) -> u32 {
        if !p.in_grid(self.size) {
            return 0;
        }
        let i = p.index(self.size);
        let taken = self.materials[i].min(max);
        self.materials[i] -= taken;
        taken
    }
}

impl World for GridWorld {
    fn size(&self) -> i32 {
        self.size
    }

    fn time_at(&self, p: Point) -> u32 {
        if p.in_grid(self.size) {
            self.times[p.index(self.size)]
        } else {
            0
        }
    }

    fn material_at(&self, p: Point) -> u32 {
        if p.in_grid(self.size) {
            self.materials[p.index(self.size)]
        } else {
            0
        }
    }

    fn depot(&self) -> Point {
        self.depot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_world() {
        let a = GridWorld::random(12, 5);
        let b = GridWorld::random(12, 5);
        assert_eq!(a, b);
        assert!(a.validate().is_ok());
        assert!(!a.has_material(a.depot()));
    }

    #[test]
    fn json_round_trip_is_validated() {
        let world = GridWorld::new(3, Point::new(0, 0)).with_material(Point::new(2, 2), 2);
        let json = serde_json::to_string(&world).unwrap();
        assert_eq!(GridWorld::from_json(&json).unwrap(), world);

        let bad = GridWorld::new(3, Point::new(1, 1)).with_material(Point::new(1, 1), 1);
        let json = serde_json::to_string(&bad).unwrap();
        assert!(matches!(
            GridWorld::from_json(&json),
            Err(RoutingError::InvalidWorld(_))
        ));
        assert!(GridWorld::from_json("{ \"size\": 2 }").is_err());
    }
}
