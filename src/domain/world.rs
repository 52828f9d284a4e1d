use itertools::iproduct;

use crate::domain::types::{Direction, Point};

/// Read-only view of the grid the planner works on.
pub trait World {
    /// Side length `N` of the square grid.
    fn size(&self) -> i32;

    /// Time the vehicle needs to move onto `p`.
    fn time_at(&self, p: Point) -> u32;

    /// Material units lying at `p`.
    fn material_at(&self, p: Point) -> u32;

    fn depot(&self) -> Point;

    fn has_material(&self, p: Point) -> bool {
        self.material_at(p) > 0
    }

    /// All cells holding material, x-major then y.
    fn material_points(&self) -> Vec<Point> {
        let n = self.size();
        iproduct!(0..n, 0..n)
            .map(|(x, y)| Point::new(x, y))
            .filter(|&p| self.has_material(p))
            .collect()
    }

    fn total_material(&self) -> u32 {
        self.material_points()
            .into_iter()
            .map(|p| self.material_at(p))
            .sum()
    }
}

/// The actuator that executes a plan one cell at a time.
pub trait Vehicle {
    fn position(&self) -> Point;

    fn step(&mut self, dir: Direction);

    /// Pick up whatever fits from the current cell.
    fn gather(&mut self);

    fn unload(&mut self);
}
