use std::cmp::Ordering;

use rand::Rng;

use crate::error::{Result, RoutingError};
use crate::solver::genetic::genome::Genome;

#[derive(Debug, Clone)]
pub struct Entity {
    pub genome: Genome,
    pub fitness: f64,
}

/// Fixed-size generation of scored genomes.
#[derive(Debug, Clone)]
pub struct Population {
    entities: Vec<Entity>,
    size: usize,
    elitism_count: usize,
}

impl Population {
    pub fn new(size: usize, elitism: f32) -> Self {
        Self {
            entities: Vec::with_capacity(size),
            size,
            elitism_count: (size as f32 * elitism) as usize,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn elitism_count(&self) -> usize {
        self.elitism_count
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn replace(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }

    pub fn fitness_sum(&self) -> f64 {
        self.entities.iter().map(|e| e.fitness).sum()
    }

    /// Entities sorted best first; equal fitness keeps population order.
    pub fn ranked(&self) -> Vec<&Entity> {
        let mut ranked: Vec<&Entity> = self.entities.iter().collect();
        ranked.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
        ranked
    }

    pub fn best(&self) -> Result<&Entity> {
        self.ranked()
            .into_iter()
            .next()
            .ok_or(RoutingError::EmptyPopulation)
    }

    /// Roulette-wheel pick proportional to fitness.
    pub fn select_parent<R: Rng + ?Sized>(&self, fitness_sum: f64, rng: &mut R) -> Result<&Entity> {
        if self.entities.is_empty() {
            return Err(RoutingError::EmptyPopulation);
        }
        if fitness_sum <= 0.0 {
            return Ok(&self.entities[rng.gen_range(0..self.entities.len())]);
        }
        let value = rng.gen_range(0.0..fitness_sum);
        let mut sum = 0.0;
        for entity in &self.entities {
            sum += entity.fitness;
            if sum > value {
                return Ok(entity);
            }
        }
        // Float rounding can leave the running sum just under `value`.
        self.entities
            .last()
            .filter(|_| value - sum < 1e-9)
            .ok_or(RoutingError::SelectionOverflow(fitness_sum))
    }
}
