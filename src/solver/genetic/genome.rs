use rand::Rng;

use crate::config::constant::MUTATION_RATE;
use crate::utils::{reset_lookup, shuffled_indices};

/// A permutation of `0..len`, read in groups of three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    genes: Vec<usize>,
}

impl Genome {
    pub fn new(genes: Vec<usize>) -> Self {
        Self { genes }
    }

    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self::new(shuffled_indices(len, rng))
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of tours the genome decodes into; the last one may be short.
    pub fn group_count(&self) -> usize {
        self.genes.len().div_ceil(3)
    }

    /// Exchange mutation, applied with a small fixed probability.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if rng.gen::<f32>() <= MUTATION_RATE {
            self.exchange(rng);
        }
    }

    fn exchange<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.genes.len();
        if len < 2 {
            return;
        }
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len - 1);
        self.genes.swap(a, b);
    }

    /// Ordered crossover with random cut points.
    pub fn ordered_crossover<R: Rng + ?Sized>(&self, other: &Genome, rng: &mut R) -> (Genome, Genome) {
        let size = self.genes.len();
        if size < 2 {
            return (self.clone(), other.clone());
        }
        let n1 = rng.gen_range(0..size - 1);
        let n2 = rng.gen_range(0..size);
        ordered_crossover_at(self, other, n1.min(n2), n1.max(n2))
    }
}

/// Copies `start..end` of each parent into its child, then fills the other
/// positions from `end` onwards (wrapping) with the other parent's genes in
/// their order, skipping genes the child already holds.
pub fn ordered_crossover_at(a: &Genome, b: &Genome, start: usize, end: usize) -> (Genome, Genome) {
    let size = a.genes.len();
    // A segment spanning the whole genome leaves nothing to fill.
    if end.saturating_sub(start) >= size {
        return (a.clone(), b.clone());
    }
    let mut used = Vec::new();
    let child_a = fill_child(&a.genes, &b.genes, start, end, size, &mut used);
    let child_b = fill_child(&b.genes, &a.genes, start, end, size, &mut used);
    (Genome::new(child_a), Genome::new(child_b))
}

fn fill_child(
    parent: &[usize],
    donor: &[usize],
    start: usize,
    end: usize,
    size: usize,
    used: &mut Vec<bool>,
) -> Vec<usize> {
    reset_lookup(used, size);
    let mut child = vec![0; size];
    for i in start..end {
        child[i] = parent[i];
        used[parent[i]] = true;
    }

    let mut cursor = 0;
    for i in 0..size {
        let index = (end + i) % size;
        if index == start && i > 0 {
            break;
        }
        while used[donor[(end + cursor) % size]] {
            cursor += 1;
        }
        let gene = donor[(end + cursor) % size];
        child[index] = gene;
        used[gene] = true;
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_permutation(genome: &Genome) -> bool {
        let mut sorted = genome.genes().to_vec();
        sorted.sort_unstable();
        sorted == (0..genome.len()).collect::<Vec<_>>()
    }

    #[test]
    fn crossover_keeps_the_segment_and_donor_order() {
        let a = Genome::new(vec![0, 1, 2, 3, 4, 5]);
        let b = Genome::new(vec![5, 3, 1, 0, 4, 2]);
        let (child_a, child_b) = ordered_crossover_at(&a, &b, 2, 4);
        assert_eq!(&child_a.genes()[2..4], &[2, 3]);
        assert_eq!(&child_b.genes()[2..4], &[1, 0]);
        // Filled from index 4 with b's genes from index 4 on, minus 2 and 3.
        assert_eq!(child_a.genes(), &[1, 0, 2, 3, 4, 5]);
        assert!(is_permutation(&child_b));
    }

    #[test]
    fn whole_genome_segment_copies_the_parents() {
        let a = Genome::new(vec![0, 1, 2, 3]);
        let b = Genome::new(vec![3, 2, 1, 0]);
        let (child_a, child_b) = ordered_crossover_at(&a, &b, 0, 4);
        assert_eq!(child_a, a);
        assert_eq!(child_b, b);
    }

    #[test]
    fn random_crossover_and_mutation_keep_permutations() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut a = Genome::random(10, &mut rng);
        let b = Genome::random(10, &mut rng);
        for _ in 0..200 {
            let (mut x, y) = a.ordered_crossover(&b, &mut rng);
            x.mutate(&mut rng);
            assert!(is_permutation(&x) && is_permutation(&y));
            a = x;
        }
    }

    #[test]
    fn group_count_rounds_up() {
        assert_eq!(Genome::new(vec![0, 1, 2, 3]).group_count(), 2);
        assert_eq!(Genome::new(vec![0, 1, 2]).group_count(), 1);
        assert_eq!(Genome::new(vec![]).group_count(), 0);
    }
}
