use std::collections::BTreeSet;

use tracing::trace;

use crate::distance::bounds::Bounds;
use crate::domain::path::Path;
use crate::domain::types::{Direction, Point, Step};
use crate::domain::world::World;

/// Search state of one cell. Created on first visit and kept for the lifetime
/// of the finder; `queued` and `closed` hold the run in which they were set.
#[derive(Debug, Clone)]
struct Node {
    point: Point,
    time: u32,
    g: u64,
    root: Option<usize>,
    key: (u64, u64),
    queued: u64,
    closed: u64,
}

/// Dijkstra over the grid with a cell cache shared between runs.
#[derive(Debug)]
pub struct PathFinder {
    n: i32,
    depot: Point,
    cost_multiplier: u64,
    nodes: Vec<Option<Node>>,
    run: u64,
}

impl PathFinder {
    pub fn new<W: World + ?Sized>(world: &W) -> Self {
        let n = world.size();
        let cells = (n.max(0) as usize).pow(2);
        Self {
            n,
            depot: world.depot(),
            cost_multiplier: cells as u64,
            nodes: vec![None; cells],
            run: 0,
        }
    }

    pub fn size(&self) -> i32 {
        self.n
    }

    fn node<W: World + ?Sized>(&mut self, world: &W, p: Point) -> usize {
        let idx = p.index(self.n);
        if self.nodes[idx].is_none() {
            self.nodes[idx] = Some(Node {
                point: p,
                time: world.time_at(p),
                g: 0,
                root: None,
                key: (0, 0),
                queued: 0,
                closed: 0,
            });
        }
        idx
    }

    fn get(&self, idx: usize) -> &Node {
        self.nodes[idx]
            .as_ref()
            .unwrap_or_else(|| unreachable!("node {} read before it was created", idx))
    }

    fn get_mut(&mut self, idx: usize) -> &mut Node {
        self.nodes[idx]
            .as_mut()
            .unwrap_or_else(|| unreachable!("node {} read before it was created", idx))
    }

    /// Explores from `start` in non-decreasing accumulated time and hands every
    /// cell accepted by `is_destination` to `consume`, until it returns `Some`
    /// or no cell is left. Cells rejected by `valid_neighbor` are never entered.
    pub fn find_path<W, D, V, C, T>(
        &mut self,
        world: &W,
        start: Point,
        is_destination: D,
        valid_neighbor: V,
        mut consume: C,
    ) -> Option<T>
    where
        W: World + ?Sized,
        D: Fn(Point) -> bool,
        V: Fn(Point) -> bool,
        C: FnMut(Path) -> Option<T>,
    {
        if !start.in_grid(self.n) {
            return None;
        }
        self.run += 1;
        let run = self.run;
        let mut seq = 0u64;
        let mut open: BTreeSet<(u64, u64, usize)> = BTreeSet::new();

        let origin = self.node(world, start);
        {
            let node = self.get_mut(origin);
            node.g = 0;
            node.root = None;
            node.key = (0, seq);
            node.queued = run;
        }
        open.insert((0, seq, origin));

        while let Some((_, _, idx)) = open.pop_first() {
            let (point, g) = {
                let node = self.get(idx);
                (node.point, node.g)
            };

            if is_destination(point) {
                if let Some(result) = consume(self.build_path(idx)) {
                    return Some(result);
                }
            }

            for dir in Direction::ALL {
                let next = point.offset(dir);
                if !next.in_grid(self.n) {
                    continue;
                }
                let next_idx = self.node(world, next);
                if self.get(next_idx).closed == run || !valid_neighbor(next) {
                    continue;
                }

                let multiplier = self.cost_multiplier;
                let node = self.get_mut(next_idx);
                let candidate = g + node.time as u64;
                if node.queued == run {
                    if candidate >= node.g {
                        continue;
                    }
                    open.remove(&(node.key.0, node.key.1, next_idx));
                }
                seq += 1;
                node.g = candidate;
                node.root = Some(idx);
                node.key = (candidate * multiplier, seq);
                node.queued = run;
                open.insert((node.key.0, node.key.1, next_idx));
            }

            self.get_mut(idx).closed = run;
        }
        None
    }

    fn build_path(&self, idx: usize) -> Path {
        let mut steps = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = self.get(i);
            let step = match node.root {
                Some(root) => {
                    let from = self.get(root).point;
                    match from.dir_to(node.point) {
                        Some(dir) => Step::new(node.point, dir, node.time),
                        None => Step::origin(node.point, node.time),
                    }
                }
                None => Step::origin(node.point, node.time),
            };
            steps.push(step);
            current = node.root;
        }
        steps.reverse();
        Path::new(steps)
    }

    /// Up to `limit` nearest destinations inside the strict window of `radius`
    /// around `start`, cheapest first.
    pub fn create_paths<W, D>(
        &mut self,
        world: &W,
        start: Point,
        is_destination: D,
        limit: usize,
        radius: i32,
    ) -> Vec<Path>
    where
        W: World + ?Sized,
        D: Fn(Point) -> bool,
    {
        let mut paths = Vec::new();
        if limit == 0 {
            return paths;
        }
        self.find_path(
            world,
            start,
            is_destination,
            |p| p.within(start, radius),
            |path| {
                paths.push(path);
                (paths.len() >= limit).then_some(())
            },
        );
        trace!("{} paths from {} within {}", paths.len(), start, radius);
        paths
    }

    /// Like [`create_paths`](Self::create_paths) but bounded by the rectangle
    /// around `destinations`, grown by `5 + N / divisor`.
    pub fn create_paths_in_bounds<W, D>(
        &mut self,
        world: &W,
        start: Point,
        is_destination: D,
        destinations: &[Point],
        limit: usize,
        expansion_divisor: i32,
    ) -> Vec<Path>
    where
        W: World + ?Sized,
        D: Fn(Point) -> bool,
    {
        let mut paths = Vec::new();
        if limit == 0 {
            return paths;
        }
        let expansion = 5 + self.n / expansion_divisor.max(1);
        let Some(bounds) = Bounds::around(destinations, expansion, self.n) else {
            return paths;
        };
        self.find_path(
            world,
            start,
            is_destination,
            |p| bounds.contains(p),
            |path| {
                paths.push(path);
                (paths.len() >= limit).then_some(())
            },
        );
        paths
    }

    /// Single nearest destination, unbounded.
    pub fn find_nearest<W, D>(&mut self, world: &W, start: Point, is_destination: D) -> Option<Path>
    where
        W: World + ?Sized,
        D: Fn(Point) -> bool,
    {
        self.find_path(world, start, is_destination, |_| true, Some)
    }

    /// Paths from the depot to every material cell, cheapest first.
    pub fn paths_from_depot<W: World + ?Sized>(&mut self, world: &W) -> Vec<Path> {
        let depot = self.depot;
        let limit = world.material_points().len();
        let mut paths = Vec::with_capacity(limit);
        if limit == 0 {
            return paths;
        }
        self.find_path(
            world,
            depot,
            |p| p != depot && world.has_material(p),
            |_| true,
            |path| {
                paths.push(path);
                (paths.len() >= limit).then_some(())
            },
        );
        paths
    }
}
