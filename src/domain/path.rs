use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::domain::types::{Point, Step};
use crate::domain::world::Vehicle;
use crate::error::{Result, RoutingError};

/// Ordered steps from an origin cell to a destination cell.
///
/// Costs are kept in half time units: every cell between the ends counts
/// twice, the two end cells once each. That cost is the same in both
/// directions, and around a closed tour it adds up to twice the time the
/// vehicle actually spends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
    half_time: u32,
}

impl Path {
    /// Builds a path from origin-first steps. Panics on an empty step list.
    pub fn new(steps: Vec<Step>) -> Self {
        assert!(!steps.is_empty(), "a path needs at least its origin step");
        let half_time = match steps.len() {
            1 => 0,
            n => {
                let doubled: u32 = steps.iter().map(|s| 2 * s.time).sum();
                doubled - steps[0].time - steps[n - 1].time
            }
        };
        Self { steps, half_time }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Direction-free leg cost in half time units.
    pub fn time_cost(&self) -> u32 {
        self.half_time
    }

    /// Time spent driving this path in its own direction.
    pub fn driven_time(&self) -> u32 {
        self.steps.iter().skip(1).map(|s| s.time).sum()
    }

    pub fn origin(&self) -> Point {
        self.steps[0].point
    }

    pub fn destination(&self) -> Point {
        self.steps[self.steps.len() - 1].point
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Same cells in reverse, each keeping its own time.
    pub fn invert(&self) -> Path {
        let n = self.steps.len();
        let mut steps = Vec::with_capacity(n);
        let last = &self.steps[n - 1];
        steps.push(Step::origin(last.point, last.time));
        for i in 1..n {
            let leaving = &self.steps[n - i];
            let cell = &self.steps[n - 1 - i];
            steps.push(Step {
                point: cell.point,
                direction: leaving.direction.map(|d| d.opposite()),
                time: cell.time,
            });
        }
        Path {
            steps,
            half_time: self.half_time,
        }
    }

    /// Moves the vehicle along every step. The vehicle must stand on the origin.
    pub fn drive<V: Vehicle + ?Sized>(&self, vehicle: &mut V) -> Result<()> {
        if vehicle.position() != self.origin() {
            return Err(RoutingError::VehicleOffPath {
                expected: self.origin(),
                actual: vehicle.position(),
            });
        }
        trace!("driving {}", self);
        for step in &self.steps[1..] {
            if let Some(dir) = step.direction {
                vehicle.step(dir);
            }
        }
        Ok(())
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Cheaper first, ties by endpoints so sorting stays deterministic.
impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.half_time
            .cmp(&other.half_time)
            .then_with(|| self.destination().cmp(&other.destination()))
            .then_with(|| self.origin().cmp(&other.origin()))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "orig={} dest={} steps={} half_time={}",
            self.origin(),
            self.destination(),
            self.step_count(),
            self.half_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Direction;

    fn sample() -> Path {
        Path::new(vec![
            Step::origin(Point::new(0, 0), 3),
            Step::new(Point::new(1, 0), Direction::Right, 4),
            Step::new(Point::new(1, 1), Direction::Down, 2),
            Step::new(Point::new(2, 1), Direction::Right, 7),
        ])
    }

    #[test]
    fn inverted_steps_arrive_from_the_previous_cell() {
        let inverted = sample().invert();
        let steps = inverted.steps();
        for pair in steps.windows(2) {
            assert_eq!(pair[0].point.dir_to(pair[1].point), pair[1].direction);
        }
        assert_eq!(inverted.origin(), Point::new(2, 1));
        assert_eq!(inverted.destination(), Point::new(0, 0));
        assert_eq!(inverted.invert(), sample());
    }

    #[test]
    fn both_directions_share_the_half_time_cost() {
        let forward = sample();
        let back = forward.invert();
        assert_eq!(forward.driven_time(), 13);
        assert_eq!(back.driven_time(), 9);
        assert_eq!(forward.time_cost(), 22);
        assert_eq!(back.time_cost(), forward.time_cost());
        assert_eq!(forward.driven_time() + back.driven_time(), forward.time_cost());
    }

    #[test]
    fn single_step_path_costs_nothing() {
        let p = Path::new(vec![Step::origin(Point::new(4, 4), 5)]);
        assert_eq!(p.time_cost(), 0);
        assert_eq!(p.driven_time(), 0);
        assert_eq!(p.invert(), p);
    }
}
