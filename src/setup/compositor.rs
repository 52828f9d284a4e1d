use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::constant::CAPACITY;
use crate::domain::cluster::{compare_by_cost, Cluster};
use crate::domain::path::Path;
use crate::domain::world::World;
use crate::setup::season::CompositorSeason;

/// What to do with a seed that no tour can be built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedFallback {
    /// Leave it for a later, wider season.
    Skip,
    /// Send the vehicle for it alone.
    Solo,
}

/// Greedy grouping of a season's points into tours of at most `CAPACITY` units.
pub struct ClusterCompositor<'a> {
    season: &'a mut CompositorSeason,
    spread_factor: i32,
}

impl<'a> ClusterCompositor<'a> {
    pub fn new(season: &'a mut CompositorSeason, spread_factor: i32) -> Self {
        Self {
            season,
            spread_factor,
        }
    }

    /// One pass over the seeds, cheapest depot path first. Every emitted
    /// cluster consumes its points from the season.
    pub fn try_create<W: World + ?Sized>(
        &mut self,
        world: &W,
        fallback: SeedFallback,
    ) -> Vec<Cluster> {
        let mut clusters = Vec::new();

        if self.season.remaining_count() == 1 {
            let last = self
                .season
                .best_paths()
                .iter()
                .find(|p| self.season.is_remaining(p.origin()))
                .cloned();
            if let Some(last) = last {
                let cluster = Cluster::solo(&last);
                self.season.consume(&cluster.points());
                clusters.push(cluster);
            }
            return clusters;
        }

        let seeds = self.season.best_paths().to_vec();
        for seed in &seeds {
            if !self.season.is_remaining(seed.origin()) {
                continue;
            }
            let factor = self.spread_factor;
            let best = self
                .candidates(seed, world)
                .into_iter()
                .min_by(|a, b| compare_by_cost(a, b, factor));

            let chosen = match (best, fallback) {
                (Some(cluster), _) => cluster,
                (None, SeedFallback::Solo) => Cluster::solo(seed),
                (None, SeedFallback::Skip) => {
                    trace!("no tour around {}, skipped", seed.origin());
                    continue;
                }
            };
            self.season.consume(&chosen.points());
            clusters.push(chosen);
        }

        debug!(
            "Composed {} clusters, {} points left",
            clusters.len(),
            self.season.remaining_count()
        );
        clusters
    }

    /// Every tour that starts at the seed of `to_depot` and stays within capacity.
    fn candidates<W: World + ?Sized>(&self, to_depot: &Path, world: &W) -> Vec<Cluster> {
        let season = &*self.season;
        let seed = to_depot.origin();
        let from_depot = to_depot.invert();
        let seed_material = world.material_at(seed);
        let mut candidates = Vec::new();

        let Some(first_legs) = season.neighbors(seed) else {
            return candidates;
        };

        for first in first_legs {
            let mid = first.destination();
            let Some(mid_to_depot) = season.to_depot(mid) else {
                continue;
            };
            let carried = seed_material + world.material_at(mid);
            if carried > CAPACITY {
                continue;
            }
            let double = || Cluster::new(from_depot.clone(), mid_to_depot.clone(), vec![first.clone()]);
            if carried == CAPACITY || season.remaining_count() <= 2 {
                candidates.push(double());
                continue;
            }

            let mut extended = false;
            for second in season.neighbors(mid).unwrap_or_default() {
                let last = second.destination();
                if last == seed || last == mid {
                    continue;
                }
                let Some(last_to_depot) = season.to_depot(last) else {
                    continue;
                };
                if carried + world.material_at(last) > CAPACITY {
                    continue;
                }
                candidates.push(Cluster::new(
                    from_depot.clone(),
                    last_to_depot.clone(),
                    vec![first.clone(), second.clone()],
                ));
                extended = true;
            }
            if !extended {
                candidates.push(double());
            }
        }
        candidates
    }
}
