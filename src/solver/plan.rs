use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, info, span, Level};

use crate::config::constant::CAPACITY;
use crate::config::{NeighborLimit, PlannerConfig, StoreConfig};
use crate::distance::search::PathFinder;
use crate::distance::store::PathStore;
use crate::domain::bundle::Bundle;
use crate::domain::cluster::Cluster;
use crate::domain::types::Point;
use crate::domain::world::World;
use crate::error::{Result, RoutingError};
use crate::setup::init::{setup, Setup};
use crate::solver::local_search::{Checkpoint, ClusterOptimiser};

/// Bundles before and after optimisation.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub initial: Bundle,
    pub optimised: Bundle,
    pub checkpoints: Vec<Checkpoint>,
}

/// Composes the first tours and improves them with the local search.
pub fn plan_bundle<W, R>(world: &W, config: &PlannerConfig, rng: &mut R) -> Result<PlanReport>
where
    W: World + ?Sized,
    R: Rng + ?Sized,
{
    let Setup {
        mut finder,
        mut store,
        clusters,
    } = setup(world, config)?;

    let processing_duration = config.processing_duration(world.size());
    let initial = Bundle::new(clusters.clone(), processing_duration);
    info!(
        "Initial bundle: {} tours, time {} (penalty {})",
        initial.clusters().len(),
        initial.time(),
        initial.penalty()
    );

    let optimiser = ClusterOptimiser::new(
        clusters,
        world,
        &mut store,
        &mut finder,
        config.optimiser.clone(),
        config.exhaustive,
    )?;
    let (clusters, checkpoints) = optimiser.process(rng)?;

    let optimised = Bundle::new(clusters, processing_duration);
    info!(
        "Optimised bundle: {} tours, time {} (penalty {})",
        optimised.clusters().len(),
        optimised.time(),
        optimised.penalty()
    );

    Ok(PlanReport {
        initial,
        optimised,
        checkpoints,
    })
}

/// Nearest-first baseline: from wherever the vehicle stands, drive to the
/// closest cell that still holds material until the load is full or the grid
/// is empty, then take the cached depot path home.
pub fn plan_straight<W: World + ?Sized>(world: &W, config: &PlannerConfig) -> Result<Bundle> {
    let span = span!(Level::INFO, "straight");
    let _guard = span.enter();

    let mut finder = PathFinder::new(world);
    let depot_only = StoreConfig::new(config.primary.radius, NeighborLimit::Bounded(0));
    let store = PathStore::build(world, &mut finder, &depot_only)?;

    let mut remaining: BTreeMap<Point, u32> = world
        .material_points()
        .into_iter()
        .map(|p| (p, world.material_at(p)))
        .collect();
    let mut left: u32 = remaining.values().sum();
    let mut clusters = Vec::new();

    while left > 0 {
        let target = left.min(CAPACITY);
        let mut load = 0;
        let mut position = world.depot();
        let mut legs = Vec::new();

        while load < target {
            let Some(path) = finder.find_nearest(world, position, |p| {
                remaining.get(&p).is_some_and(|&units| units > 0)
            }) else {
                break;
            };
            position = path.destination();
            let units = remaining.entry(position).or_default();
            let taken = (*units).min(CAPACITY - load);
            *units -= taken;
            load += taken;
            legs.push(path);
        }

        if legs.is_empty() {
            return Err(RoutingError::UnreachableMaterial(position));
        }
        let from_depot = legs.remove(0);
        let to_depot = store.depot_path(position)?.clone();
        let cluster = Cluster::new(from_depot, to_depot, legs);
        debug!("straight tour of {} units, time {}", load, cluster.total_time());
        clusters.push(cluster);
        left -= load;
    }

    let bundle = Bundle::new(clusters, config.processing_duration(world.size()));
    info!(
        "Straight bundle: {} tours, time {} (penalty {})",
        bundle.clusters().len(),
        bundle.time(),
        bundle.penalty()
    );
    Ok(bundle)
}
