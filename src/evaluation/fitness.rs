use crate::config::constant::CAPACITY;
use crate::error::{Result, RoutingError};
use crate::evaluation::penalty::{capacity_excess, infeasible_time};

/// Dense times for the positions of one neighborhood, indexed like the genome.
/// Inputs are half time units, as cached by the path store.
#[derive(Debug, Clone)]
pub struct TourTimes {
    depot: Vec<u32>,
    edges: Vec<Vec<u32>>,
    materials: Vec<u32>,
    penalty: u64,
}

impl TourTimes {
    pub fn new(depot: Vec<u32>, edges: Vec<Vec<u32>>, materials: Vec<u32>, n: i32) -> Self {
        Self {
            depot,
            edges,
            materials,
            penalty: infeasible_time(n),
        }
    }

    pub fn len(&self) -> usize {
        self.depot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depot.is_empty()
    }

    /// Whether one genome group fits into the vehicle.
    pub fn is_feasible(&self, group: &[usize]) -> bool {
        let carried: Vec<u32> = group.iter().map(|&i| self.materials[i]).collect();
        capacity_excess(&carried, CAPACITY) == 0
    }

    /// Driving time of the tour encoded by a group of one to three indices.
    pub fn group_time(&self, group: &[usize]) -> u64 {
        if !self.is_feasible(group) {
            return self.penalty;
        }
        let half: u64 = match *group {
            [a] => 2 * self.depot[a] as u64,
            [a, b] => self.depot[a] as u64 + self.edges[a][b] as u64 + self.depot[b] as u64,
            [a, m, b] => {
                self.depot[a] as u64
                    + self.edges[a][m] as u64
                    + self.edges[m][b] as u64
                    + self.depot[b] as u64
            }
            _ => return self.penalty,
        };
        half / 2
    }

    /// Sum over all groups of three, the last group may be shorter.
    pub fn genome_time(&self, genes: &[usize]) -> u64 {
        genes
            .chunks(3)
            .map(|group| self.group_time(group))
            .fold(0, u64::saturating_add)
    }

    pub fn genome_feasible(&self, genes: &[usize]) -> bool {
        genes.chunks(3).all(|group| self.is_feasible(group))
    }
}

/// Higher is better. A zero time means the lookup is corrupt.
pub fn find_fitness(time: u64) -> Result<f64> {
    if time == 0 {
        return Err(RoutingError::ZeroTimeGenome);
    }
    Ok(1.0 / time as f64)
}
