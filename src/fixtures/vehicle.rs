use tracing::warn;

use crate::config::constant::CAPACITY;
use crate::domain::types::{Direction, Point};
use crate::domain::world::{Vehicle, World};
use crate::fixtures::data_generator::GridWorld;

/// Vehicle driving over its own copy of a grid, emptying cells as it gathers.
#[derive(Debug, Clone)]
pub struct SimulatedVehicle {
    world: GridWorld,
    position: Point,
    load: u32,
    delivered: u32,
    elapsed: u64,
    moves: usize,
}

impl SimulatedVehicle {
    /// Starts at the depot with an empty load.
    pub fn new(world: GridWorld) -> Self {
        let position = world.depot();
        Self {
            world,
            position,
            load: 0,
            delivered: 0,
            elapsed: 0,
            moves: 0,
        }
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    /// Sum of the times of every cell entered.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Units still lying on the grid.
    pub fn remaining(&self) -> u32 {
        self.world.total_material()
    }
}

impl Vehicle for SimulatedVehicle {
    fn position(&self) -> Point {
        self.position
    }

    fn step(&mut self, dir: Direction) {
        let next = self.position.offset(dir);
        if !next.in_grid(self.world.size()) {
            warn!("Refusing to leave the grid at {} going {:?}", self.position, dir);
            return;
        }
        self.position = next;
        self.elapsed += self.world.time_at(next) as u64;
        self.moves += 1;
    }

    fn gather(&mut self) {
        let space = CAPACITY - self.load;
        let taken = self.world.take_material(self.position, space);
        self.load += taken;
        if self.world.has_material(self.position) {
            warn!(
                "Left {} units at {}, vehicle is full",
                self.world.material_at(self.position),
                self.position
            );
        }
    }

    fn unload(&mut self) {
        if self.position != self.world.depot() {
            warn!("Cannot unload at {}, not the depot", self.position);
            return;
        }
        self.delivered += self.load;
        self.load = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gathers_only_what_fits() {
        let world = GridWorld::new(3, Point::new(0, 0))
            .with_material(Point::new(1, 0), 2)
            .with_material(Point::new(2, 0), 2);
        let mut vehicle = SimulatedVehicle::new(world);
        vehicle.step(Direction::Right);
        vehicle.gather();
        vehicle.step(Direction::Right);
        vehicle.gather();
        assert_eq!(vehicle.load(), 3);
        assert_eq!(vehicle.remaining(), 1);

        vehicle.unload();
        assert_eq!(vehicle.delivered(), 0);
        vehicle.step(Direction::Left);
        vehicle.step(Direction::Left);
        vehicle.unload();
        assert_eq!(vehicle.delivered(), 3);
        assert_eq!(vehicle.elapsed(), 4);
    }
}
