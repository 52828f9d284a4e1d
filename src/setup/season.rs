use std::collections::{BTreeMap, BTreeSet};

use crate::config::StoreConfig;
use crate::distance::search::PathFinder;
use crate::distance::store::PathStore;
use crate::domain::path::Path;
use crate::domain::types::Point;
use crate::domain::world::World;
use crate::error::{Result, RoutingError};

/// Unassigned points of one composer pass with their depot and neighbor paths.
#[derive(Debug, Clone)]
pub struct CompositorSeason {
    remaining: BTreeMap<Point, Path>,
    neighbors: BTreeMap<Point, Vec<Path>>,
    best_paths: Vec<Path>,
}

impl CompositorSeason {
    fn new(remaining: BTreeMap<Point, Path>, neighbors: BTreeMap<Point, Vec<Path>>) -> Self {
        let mut best_paths: Vec<Path> = remaining.values().cloned().collect();
        best_paths.sort();
        Self {
            remaining,
            neighbors,
            best_paths,
        }
    }

    /// Every material cell with the neighbors found when the store was built.
    pub fn from_store(store: &PathStore) -> Self {
        Self::new(store.depot_paths().clone(), store.all_neighbors().clone())
    }

    /// Points left over by `previous`, with neighbors searched again among them.
    pub fn from_season<W: World + ?Sized>(
        previous: &CompositorSeason,
        store: &mut PathStore,
        world: &W,
        finder: &mut PathFinder,
        config: &StoreConfig,
    ) -> Result<Self> {
        let range: BTreeSet<Point> = previous.remaining.keys().copied().collect();
        let neighbors = store.search_neighbors(&range, world, finder, config)?;
        Ok(Self::new(previous.remaining.clone(), neighbors))
    }

    pub fn from_range<W: World + ?Sized>(
        store: &mut PathStore,
        range: &BTreeSet<Point>,
        world: &W,
        finder: &mut PathFinder,
        config: &StoreConfig,
    ) -> Result<Self> {
        let mut remaining = BTreeMap::new();
        for &p in range {
            remaining.insert(p, store.depot_path(p)?.clone());
        }
        let neighbors = store.search_neighbors(range, world, finder, config)?;
        Ok(Self::new(remaining, neighbors))
    }

    pub fn has_remaining(&self) -> bool {
        !self.remaining.is_empty()
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_remaining(&self, p: Point) -> bool {
        self.remaining.contains_key(&p)
    }

    /// Depot paths of the season's points, cheapest first. Consumed points
    /// stay in this list.
    pub fn best_paths(&self) -> &[Path] {
        &self.best_paths
    }

    pub fn to_depot(&self, p: Point) -> Option<&Path> {
        self.remaining.get(&p)
    }

    pub fn neighbors(&self, p: Point) -> Option<&[Path]> {
        self.neighbors.get(&p).map(Vec::as_slice)
    }

    /// Path `a -> b`, taken from the neighbors of `a` or inverted from those of `b`.
    pub fn path_between(&self, a: Point, b: Point) -> Result<Path> {
        let find = |from: Point, to: Point| {
            self.neighbors
                .get(&from)
                .and_then(|paths| paths.iter().find(|p| p.destination() == to))
        };
        if let Some(path) = find(a, b) {
            return Ok(path.clone());
        }
        find(b, a)
            .map(Path::invert)
            .ok_or(RoutingError::MissingEdge { from: a, to: b })
    }

    /// Removes the points for good.
    pub fn consume(&mut self, points: &[Point]) {
        for p in points {
            self.remaining.remove(p);
            self.neighbors.remove(p);
        }
    }
}
