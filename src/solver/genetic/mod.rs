pub mod genome;
pub mod population;

use rand::Rng;
use tracing::trace;

use crate::error::Result;
use genome::Genome;
use population::{Entity, Population};

/// Scores genomes for a [`GeneticSystem`]. Higher fitness is better.
pub trait FitnessModel {
    fn genome_len(&self) -> usize;

    fn fitness(&self, genome: &Genome) -> Result<f64>;
}

/// Elitist genetic algorithm with roulette selection and ordered crossover.
pub struct GeneticSystem<'m, M: FitnessModel> {
    model: &'m M,
    population: Population,
}

impl<'m, M: FitnessModel> GeneticSystem<'m, M> {
    pub fn new(model: &'m M, amount: usize, elitism: f32) -> Self {
        Self {
            model,
            population: Population::new(amount, elitism),
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    fn entity(&self, genome: Genome) -> Result<Entity> {
        let fitness = self.model.fitness(&genome)?;
        Ok(Entity { genome, fitness })
    }

    /// Fills the population with random permutations.
    pub fn init_population<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let len = self.model.genome_len();
        let entities = (0..self.population.size())
            .map(|_| self.entity(Genome::random(len, rng)))
            .collect::<Result<Vec<_>>>()?;
        self.population.replace(entities);
        Ok(())
    }

    pub fn next_generation<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let size = self.population.size();
        let mut next: Vec<Entity> = self
            .population
            .ranked()
            .into_iter()
            .take(self.population.elitism_count())
            .cloned()
            .collect();

        let fitness_sum = self.population.fitness_sum();
        while next.len() < size {
            let a = self.population.select_parent(fitness_sum, rng)?;
            let b = self.population.select_parent(fitness_sum, rng)?;
            let (mut first, mut second) = a.genome.ordered_crossover(&b.genome, rng);
            first.mutate(rng);
            second.mutate(rng);
            next.push(self.entity(first)?);
            if next.len() < size {
                next.push(self.entity(second)?);
            }
        }
        self.population.replace(next);
        Ok(())
    }

    /// Evolves a fresh population and returns the best genome of the last one.
    pub fn run<R: Rng + ?Sized>(&mut self, generations: usize, rng: &mut R) -> Result<Genome> {
        self.init_population(rng)?;
        for _ in 0..generations {
            self.next_generation(rng)?;
        }
        let best = self.population.best()?;
        trace!("best genome fitness {:.6}", best.fitness);
        Ok(best.genome.clone())
    }
}
