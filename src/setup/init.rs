use tracing::{debug, info, span, Level};

use crate::config::PlannerConfig;
use crate::distance::search::PathFinder;
use crate::distance::store::PathStore;
use crate::domain::cluster::Cluster;
use crate::domain::world::World;
use crate::error::Result;
use crate::setup::compositor::{ClusterCompositor, SeedFallback};
use crate::setup::season::CompositorSeason;

/// Caches and first tours the optimiser starts from.
#[derive(Debug)]
pub struct Setup {
    pub finder: PathFinder,
    pub store: PathStore,
    pub clusters: Vec<Cluster>,
}

/// Builds the path store and groups every material cell into a tour.
///
/// The first season only knows the nearby neighbors found while building the
/// store. Points it could not place are carried into wider seasons until none
/// are left; a season that places nothing hands its seeds out as solo tours.
pub fn setup<W: World + ?Sized>(world: &W, config: &PlannerConfig) -> Result<Setup> {
    let span = span!(Level::INFO, "setup");
    let _enter = span.enter();

    let factor = config.optimiser.spread_factor;
    let mut finder = PathFinder::new(world);
    let mut store = PathStore::build(world, &mut finder, &config.primary)?;

    let mut season = CompositorSeason::from_store(&store);
    let mut clusters =
        ClusterCompositor::new(&mut season, factor).try_create(world, SeedFallback::Skip);
    info!(
        "First season: {} clusters, {} points left",
        clusters.len(),
        season.remaining_count()
    );

    let mut pass = 1;
    while season.has_remaining() {
        pass += 1;
        season =
            CompositorSeason::from_season(&season, &mut store, world, &mut finder, &config.secondary)?;
        let mut created =
            ClusterCompositor::new(&mut season, factor).try_create(world, SeedFallback::Skip);
        if created.is_empty() {
            debug!("Season {} placed nothing, falling back to solo tours", pass);
            created =
                ClusterCompositor::new(&mut season, factor).try_create(world, SeedFallback::Solo);
        }
        clusters.extend(created);
    }

    info!(
        "Setup completed: {} clusters after {} seasons, {} units",
        clusters.len(),
        pass,
        clusters.iter().map(|c| c.material(world)).sum::<u32>()
    );
    Ok(Setup {
        finder,
        store,
        clusters,
    })
}
