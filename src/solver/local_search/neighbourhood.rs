use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cluster::Cluster;
use crate::domain::types::Point;
use crate::solver::local_search::container::ClusterContainer;

/// One sampled neighborhood: a seed container and some of its neighbors.
#[derive(Debug, Clone)]
pub struct Scope {
    ids: Vec<usize>,
    positions: Vec<Point>,
    original_time: u32,
}

impl Scope {
    /// Adds shuffled neighbors of `seed` until `max_size` is reached. Every
    /// neighbor counts as three points and at most one tour that is not
    /// Normal may join, since the genome only decodes a short group at its end.
    pub fn select<R: Rng + ?Sized>(
        seed: usize,
        containers: &[ClusterContainer],
        max_size: usize,
        rng: &mut R,
    ) -> Scope {
        let main = &containers[seed];
        let mut special = !main.cluster().is_normal();
        let mut ids = vec![seed];
        let mut positions = main.cluster().points();

        let mut neighbors: Vec<usize> = main.neighbor_ids().iter().copied().collect();
        neighbors.shuffle(rng);

        let mut size = 0;
        for id in neighbors {
            if size >= max_size {
                break;
            }
            let cluster = containers[id].cluster();
            if !cluster.is_normal() {
                if special {
                    continue;
                }
                special = true;
            }
            size += 3;
            positions.extend(cluster.points());
            ids.push(id);
        }

        let original_time = Cluster::sum_time(ids.iter().map(|&id| containers[id].cluster()));
        Scope {
            ids,
            positions,
            original_time,
        }
    }

    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn range(&self) -> BTreeSet<Point> {
        self.positions.iter().copied().collect()
    }

    pub fn original_time(&self) -> u32 {
        self.original_time
    }
}
