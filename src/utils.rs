use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

/// Random permutation of `0..len`.
pub fn shuffled_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

/// Fills `lookup` with `false` and resizes it to `len`.
pub fn reset_lookup(lookup: &mut Vec<bool>, len: usize) {
    lookup.clear();
    lookup.resize(len, false);
}

pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis >= 1000 {
        format!("{:.3} s", d.as_secs_f64())
    } else {
        format!("{} ms", millis)
    }
}
