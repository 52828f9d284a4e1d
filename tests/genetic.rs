use std::collections::BTreeSet;

use grid_vrp::solver::genetic::genome::{ordered_crossover_at, Genome};
use grid_vrp::solver::genetic::{FitnessModel, GeneticSystem};
use grid_vrp::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

fn is_permutation(genome: &Genome, size: usize) -> bool {
    let genes: BTreeSet<usize> = genome.genes().iter().copied().collect();
    genome.len() == size && genes == (0..size).collect()
}

#[rstest]
#[case(vec![0, 1, 2, 3, 4, 5, 6], vec![6, 4, 2, 0, 5, 3, 1])]
#[case(vec![3, 1, 0, 2], vec![2, 0, 3, 1])]
fn crossover_children_are_permutations_for_every_cut(
    #[case] a: Vec<usize>,
    #[case] b: Vec<usize>,
) {
    let size = a.len();
    let (a, b) = (Genome::new(a), Genome::new(b));
    for start in 0..=size {
        for end in start..=size {
            let (child_a, child_b) = ordered_crossover_at(&a, &b, start, end);
            assert!(is_permutation(&child_a, size), "cut {}..{}", start, end);
            assert!(is_permutation(&child_b, size), "cut {}..{}", start, end);
            assert_eq!(child_a.genes()[start..end], a.genes()[start..end]);
            assert_eq!(child_b.genes()[start..end], b.genes()[start..end]);
        }
    }
}

/// Rewards genomes whose first groups hold the small indices.
struct FrontLoaded {
    len: usize,
}

impl FitnessModel for FrontLoaded {
    fn genome_len(&self) -> usize {
        self.len
    }

    fn fitness(&self, genome: &Genome) -> Result<f64> {
        let cost: usize = genome
            .genes()
            .iter()
            .enumerate()
            .map(|(i, &g)| i.abs_diff(g))
            .sum();
        Ok(1.0 / (1.0 + cost as f64))
    }
}

#[rstest]
fn evolution_never_loses_its_best_genome() {
    let model = FrontLoaded { len: 9 };
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut system = GeneticSystem::new(&model, 40, 0.1);
    system.init_population(&mut rng).unwrap();
    let mut best = system.population().best().unwrap().fitness;

    for _ in 0..30 {
        system.next_generation(&mut rng).unwrap();
        let current = system.population().best().unwrap().fitness;
        assert!(current >= best);
        best = current;
    }
    for entity in system.population().entities() {
        assert!(is_permutation(&entity.genome, 9));
    }
}

#[rstest]
fn same_seed_evolves_the_same_winner() {
    let model = FrontLoaded { len: 8 };
    let run = |seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        GeneticSystem::new(&model, 30, 0.1).run(20, &mut rng).unwrap()
    };
    assert_eq!(run(5), run(5));
}
