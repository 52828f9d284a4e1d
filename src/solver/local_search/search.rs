use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, span, trace, Level};

use crate::config::{OptimiserConfig, StoreConfig};
use crate::distance::search::PathFinder;
use crate::distance::store::PathStore;
use crate::domain::cluster::{compare_by_cost, Chunk, Cluster};
use crate::domain::types::Point;
use crate::domain::world::World;
use crate::error::{Result, RoutingError};
use crate::setup::season::CompositorSeason;
use crate::solver::genetic::GeneticSystem;

use super::container::ClusterContainer;
use super::neighbourhood::Scope;
use super::state::{Checkpoint, State};
use super::variant::OptimiserVariant;

/// Improves a set of tours by regrouping small neighborhoods of them with a
/// genetic search and keeping every regrouping that is strictly faster.
pub struct ClusterOptimiser<'a, W: World + ?Sized> {
    world: &'a W,
    store: &'a mut PathStore,
    finder: &'a mut PathFinder,
    config: OptimiserConfig,
    store_config: StoreConfig,
    containers: Vec<ClusterContainer>,
    cluster_by_pos: BTreeMap<Point, usize>,
    queue: BTreeSet<(i64, usize, u64)>,
    state: State,
    checkpoints: Vec<Checkpoint>,
}

impl<'a, W: World + ?Sized> ClusterOptimiser<'a, W> {
    pub fn new(
        mut clusters: Vec<Cluster>,
        world: &'a W,
        store: &'a mut PathStore,
        finder: &'a mut PathFinder,
        config: OptimiserConfig,
        store_config: StoreConfig,
    ) -> Result<Self> {
        let factor = config.spread_factor;
        clusters.sort_by(|a, b| compare_by_cost(a, b, factor));

        let mut cluster_by_pos = BTreeMap::new();
        let containers: Vec<ClusterContainer> = clusters
            .into_iter()
            .enumerate()
            .map(|(id, cluster)| {
                for p in cluster.points() {
                    cluster_by_pos.insert(p, id);
                }
                ClusterContainer::new(id, cluster)
            })
            .collect();

        let mut optimiser = Self {
            world,
            store,
            finder,
            config,
            store_config,
            containers,
            cluster_by_pos,
            queue: BTreeSet::new(),
            state: State::default(),
            checkpoints: Vec::new(),
        };

        let positions: BTreeSet<Point> = optimiser.store.all_neighbors().keys().copied().collect();
        optimiser.update_neighbors(&positions)?;
        for id in 0..optimiser.containers.len() {
            optimiser.enqueue(id);
        }
        Ok(optimiser)
    }

    pub fn containers(&self) -> &[ClusterContainer] {
        &self.containers
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn container_of(&self, p: Point) -> Result<usize> {
        self.cluster_by_pos
            .get(&p)
            .copied()
            .ok_or(RoutingError::UnassignedPoint(p))
    }

    fn enqueue(&mut self, id: usize) {
        let container = &self.containers[id];
        let cost = container.cluster().cost(self.config.spread_factor);
        self.queue.insert((cost, id, container.version()));
    }

    /// Links the tours of every point in `positions` with the tours of its
    /// neighbors, in both directions.
    fn update_neighbors(&mut self, positions: &BTreeSet<Point>) -> Result<()> {
        for &pos in positions {
            let Some(paths) = self.store.neighbors(pos) else {
                continue;
            };
            let id = self.container_of(pos)?;
            for path in paths {
                let neighbor_pos = path.destination();
                let neighbor = self.container_of(neighbor_pos)?;
                self.containers[id].add_neighbor(neighbor, neighbor_pos);
                self.containers[neighbor].add_neighbor(id, pos);
            }
        }
        Ok(())
    }

    /// Cheapest tour still waiting in the queue, or any tour once it is empty.
    fn next_seed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        while let Some((_, id, version)) = self.queue.pop_first() {
            if self.containers[id].version() == version {
                return id;
            }
        }
        rng.gen_range(0..self.containers.len())
    }

    pub fn total_time(&self) -> u32 {
        Cluster::sum_time(self.containers.iter().map(ClusterContainer::cluster))
    }

    /// Runs the configured cycles and returns the improved tours.
    pub fn process<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<(Vec<Cluster>, Vec<Checkpoint>)> {
        let span = span!(Level::INFO, "optimiser");
        let _enter = span.enter();

        if self.containers.is_empty() || self.config.cycles == 0 {
            return Ok((self.into_clusters(), Vec::new()));
        }
        self.config.validate()?;
        info!(
            "Start optimiser: {} clusters, total time {}",
            self.containers.len(),
            self.total_time()
        );

        let mut widen = 0;
        for cycle in 0..self.config.cycles {
            if self.config.widen_at.contains(&cycle) {
                widen += 1;
                debug!("Widening neighborhoods to level {}", widen);
                continue;
            }
            self.run_cycle(widen, rng)?;

            if cycle % self.config.check_interval == self.config.check_interval - 1 {
                let checkpoint = self.state.dump(cycle + 1, self.total_time());
                checkpoint.log();
                let stalled = self
                    .checkpoints
                    .last()
                    .is_some_and(|previous| previous.successes == checkpoint.successes);
                self.checkpoints.push(checkpoint);
                if stalled {
                    info!("No improvement since the last checkpoint, stopping");
                    break;
                }
            }
        }

        info!(
            "End optimiser: total time {}, {} successes",
            self.total_time(),
            self.state.successes
        );
        let checkpoints = std::mem::take(&mut self.checkpoints);
        Ok((self.into_clusters(), checkpoints))
    }

    fn run_cycle<R: Rng + ?Sized>(&mut self, widen: usize, rng: &mut R) -> Result<()> {
        let seed = self.next_seed(rng);
        let scope = Scope::select(seed, &self.containers, self.config.scope_size(widen), rng);

        let started = Instant::now();
        let season = CompositorSeason::from_range(
            &mut *self.store,
            &scope.range(),
            self.world,
            &mut *self.finder,
            &self.store_config,
        )?;
        let variant =
            OptimiserVariant::new(season, scope.positions().to_vec(), &*self.store, self.world)?;
        self.state.path_time += started.elapsed();

        let started = Instant::now();
        let population = self.config.population(widen);
        let generations = self.config.generations(widen);
        let mut best: Option<Chunk> = None;
        for _ in 0..self.config.trials {
            let genome = GeneticSystem::new(&variant, population, self.config.elitism)
                .run(generations, rng)?;
            let Some(chunk) = variant.decode(&genome)? else {
                continue;
            };
            if best.as_ref().map_or(true, |b| chunk.time() < b.time()) {
                best = Some(chunk);
            }
        }
        self.state.cluster_time += started.elapsed();

        let Some(chunk) = best else {
            trace!("no feasible regrouping around container {}", seed);
            self.state.record_infeasible();
            return Ok(());
        };
        let diff = scope.original_time() as i64 - chunk.time() as i64;
        trace!(
            "scope of {} tours around {}: {} -> {}",
            scope.ids().len(),
            seed,
            scope.original_time(),
            chunk.time()
        );
        if self.state.record(diff) {
            self.apply(&scope, chunk)?;
        }
        Ok(())
    }

    /// Puts the clusters of `chunk` into the scope's slots, cheapest old tour
    /// first, and rebuilds the adjacency of every point the change touched.
    fn apply(&mut self, scope: &Scope, chunk: Chunk) -> Result<()> {
        let clusters = chunk.into_clusters();
        if clusters.len() != scope.ids().len() {
            return Err(RoutingError::ChunkMismatch {
                expected: scope.ids().len(),
                actual: clusters.len(),
            });
        }

        let factor = self.config.spread_factor;
        let mut ids = scope.ids().to_vec();
        ids.sort_by(|&a, &b| {
            compare_by_cost(self.containers[a].cluster(), self.containers[b].cluster(), factor)
        });

        let mut touched = BTreeSet::new();
        for (&id, cluster) in ids.iter().zip(clusters) {
            let container = &mut self.containers[id];
            touched.extend(container.neighbor_positions().iter().copied());
            touched.extend(container.cluster().points());
            for p in cluster.points() {
                self.cluster_by_pos.insert(p, id);
            }
            container.replace(cluster);
        }
        for &id in &ids {
            touched.extend(self.containers[id].cluster().points());
        }

        self.update_neighbors(&touched)?;
        for id in ids {
            self.enqueue(id);
        }
        Ok(())
    }

    fn into_clusters(self) -> Vec<Cluster> {
        self.containers
            .into_iter()
            .map(ClusterContainer::into_cluster)
            .collect()
    }
}
