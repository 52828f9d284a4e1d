use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::distance::matrix::TimeLookup;
use crate::distance::search::PathFinder;
use crate::domain::path::Path;
use crate::domain::types::Point;
use crate::domain::world::World;
use crate::error::{Result, RoutingError};

/// Append-only cache of every path the planner has searched for.
///
/// A pair of points is stored once per direction. The path found first wins
/// and its inverse is stored with it, so both directions always share one time.
#[derive(Debug, Clone)]
pub struct PathStore {
    depot_paths: BTreeMap<Point, Path>,
    neighbors: BTreeMap<Point, Vec<Path>>,
    all_paths: BTreeMap<(Point, Point), Path>,
    lookup: TimeLookup,
}

impl PathStore {
    /// Depot paths for every material cell plus its nearest material neighbors.
    pub fn build<W: World + ?Sized>(
        world: &W,
        finder: &mut PathFinder,
        config: &StoreConfig,
    ) -> Result<Self> {
        let n = world.size();
        let from_depot: BTreeMap<Point, Path> = finder
            .paths_from_depot(world)
            .into_iter()
            .map(|p| (p.destination(), p))
            .collect();

        let materials = world.material_points();
        let mut store = PathStore {
            depot_paths: BTreeMap::new(),
            neighbors: BTreeMap::new(),
            all_paths: BTreeMap::new(),
            lookup: TimeLookup::with_capacity(materials.len()),
        };

        for pos in materials {
            let delivery = from_depot
                .get(&pos)
                .ok_or(RoutingError::UnreachableMaterial(pos))?
                .invert();
            let found = finder.create_paths(
                world,
                pos,
                |p| p != pos && world.has_material(p),
                config.neighbor_limit(),
                config.radius(n),
            );
            let mut neighbors = Vec::with_capacity(found.len());
            for path in &found {
                neighbors.push(store.register(path)?);
            }
            store.lookup.set_depot(pos, delivery.time_cost());
            store.neighbors.insert(pos, neighbors);
            store.depot_paths.insert(pos, delivery);
        }

        info!(
            "Path store built: {} material cells, {} cached pairs",
            store.depot_paths.len(),
            store.pair_count()
        );
        Ok(store)
    }

    /// Stores `path` and its inverse unless the pair is known, then returns the
    /// stored `origin -> destination` path.
    fn register(&mut self, path: &Path) -> Result<Path> {
        let (a, b) = (path.origin(), path.destination());
        let forward = self
            .all_paths
            .entry((a, b))
            .or_insert_with(|| path.clone())
            .clone();
        let backward = self
            .all_paths
            .entry((b, a))
            .or_insert_with(|| forward.invert())
            .time_cost();
        self.lookup.set_edge(a, b, forward.time_cost())?;
        self.lookup.set_edge(b, a, backward)?;
        Ok(forward)
    }

    /// Neighbor lists restricted to `range`. Known pairs are reused, the search
    /// only runs for points of the range that `pos` has no path to yet.
    pub fn search_neighbors<W: World + ?Sized>(
        &mut self,
        range: &BTreeSet<Point>,
        world: &W,
        finder: &mut PathFinder,
        config: &StoreConfig,
    ) -> Result<BTreeMap<Point, Vec<Path>>> {
        let n = world.size();
        let mut result = BTreeMap::new();
        let mut searched = 0usize;

        for &pos in range {
            let mut neighbors = Vec::new();
            let mut unknown = BTreeSet::new();
            for &other in range {
                if other == pos {
                    continue;
                }
                match self.all_paths.get(&(pos, other)) {
                    Some(path) => neighbors.push(path.clone()),
                    None => {
                        unknown.insert(other);
                    }
                }
            }

            let limit = config.neighbor_limit().min(unknown.len());
            if limit > 0 {
                let mut destinations: Vec<Point> = unknown.iter().copied().collect();
                destinations.push(pos);
                let found = finder.create_paths_in_bounds(
                    world,
                    pos,
                    |p| p != pos && world.has_material(p) && unknown.contains(&p),
                    &destinations,
                    limit,
                    config.radius(n),
                );
                searched += found.len();
                for path in &found {
                    neighbors.push(self.register(path)?);
                }
            }
            result.insert(pos, neighbors);
        }

        debug!(
            "Neighbors for {} points, {} new paths searched",
            range.len(),
            searched
        );
        Ok(result)
    }

    pub fn depot_path(&self, p: Point) -> Result<&Path> {
        self.depot_paths
            .get(&p)
            .ok_or(RoutingError::MissingDepotPath(p))
    }

    pub fn depot_paths(&self) -> &BTreeMap<Point, Path> {
        &self.depot_paths
    }

    /// Neighbors found while building the store.
    pub fn neighbors(&self, p: Point) -> Option<&[Path]> {
        self.neighbors.get(&p).map(Vec::as_slice)
    }

    pub fn all_neighbors(&self) -> &BTreeMap<Point, Vec<Path>> {
        &self.neighbors
    }

    pub fn path_between(&self, a: Point, b: Point) -> Option<&Path> {
        self.all_paths.get(&(a, b))
    }

    pub fn pair_count(&self) -> usize {
        self.all_paths.len()
    }

    pub fn lookup(&self) -> &TimeLookup {
        &self.lookup
    }
}
