use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::domain::path::Path;
use crate::domain::types::Point;
use crate::domain::world::{Vehicle, World};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    /// Origin, one material cell in between, destination.
    Normal,
    /// A single cell visited and returned from.
    Solo,
    /// Two cells with a direct leg between them.
    Double,
}

/// The distinguished cells of a tour. Origin and destination are unordered.
#[derive(Debug, Clone, Copy)]
struct Combination {
    origin: Point,
    material: Option<Point>,
    destination: Point,
}

impl Combination {
    fn key(&self) -> (Point, Point, Option<Point>) {
        let (a, b) = if self.origin <= self.destination {
            (self.origin, self.destination)
        } else {
            (self.destination, self.origin)
        };
        (a, b, self.material)
    }

    fn spread(&self) -> i32 {
        let ax = self.origin.diff_x(self.destination);
        let ay = self.origin.diff_y(self.destination);
        let (w, h) = match self.material {
            Some(m) => (
                m.diff_x(self.destination).max(m.diff_x(self.origin)),
                m.diff_y(self.destination).max(m.diff_y(self.origin)),
            ),
            None => (0, 0),
        };
        ax.max(w) + ay.max(h)
    }

    fn points(&self) -> Vec<Point> {
        match self.material {
            Some(m) => vec![self.origin, m, self.destination],
            None if self.origin == self.destination => vec![self.origin],
            None => vec![self.origin, self.destination],
        }
    }
}

/// A depot-to-depot delivery tour: `[depot -> first, legs.., last -> depot]`.
#[derive(Debug, Clone)]
pub struct Cluster {
    paths: Vec<Path>,
    total_time: u32,
    combination: Combination,
    spread: i32,
}

impl Cluster {
    pub fn new(from_depot: Path, to_depot: Path, legs: Vec<Path>) -> Self {
        let combination = Combination {
            origin: from_depot.destination(),
            material: if legs.len() > 1 {
                Some(legs[0].destination())
            } else {
                None
            },
            destination: to_depot.origin(),
        };
        let mut paths = Vec::with_capacity(legs.len() + 2);
        paths.push(from_depot);
        paths.extend(legs);
        paths.push(to_depot);
        // A closed tour counts every cell twice in half units.
        let total_time = paths.iter().map(Path::time_cost).sum::<u32>() / 2;
        Self {
            paths,
            total_time,
            spread: combination.spread(),
            combination,
        }
    }

    /// Tour that visits only the cell `to_depot` starts from.
    pub fn solo(to_depot: &Path) -> Self {
        Self::new(to_depot.invert(), to_depot.clone(), vec![])
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn total_time(&self) -> u32 {
        self.total_time
    }

    pub fn spread(&self) -> i32 {
        self.spread
    }

    /// Ranking value, never used as a time.
    pub fn cost(&self, factor: i32) -> i64 {
        (self.total_time as i64 + self.spread as i64 * factor as i64).abs()
    }

    pub fn points(&self) -> Vec<Point> {
        self.combination.points()
    }

    pub fn kind(&self) -> ClusterKind {
        match self.combination.points().len() {
            3 => ClusterKind::Normal,
            2 => ClusterKind::Double,
            _ => ClusterKind::Solo,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.kind() == ClusterKind::Normal
    }

    pub fn material<W: World + ?Sized>(&self, world: &W) -> u32 {
        self.points().iter().map(|p| world.material_at(*p)).sum()
    }

    /// Drives the whole tour and unloads at the depot.
    pub fn drive<V: Vehicle + ?Sized, W: World + ?Sized>(
        &self,
        vehicle: &mut V,
        world: &W,
    ) -> Result<()> {
        for path in &self.paths {
            path.drive(vehicle)?;
            if world.has_material(path.destination()) {
                vehicle.gather();
            }
        }
        vehicle.unload();
        Ok(())
    }

    pub fn sum_time<'a>(clusters: impl IntoIterator<Item = &'a Cluster>) -> u32 {
        clusters.into_iter().map(Cluster::total_time).sum()
    }
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.combination.key() == other.combination.key()
    }
}

impl Eq for Cluster {}

impl Hash for Cluster {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.combination.key().hash(state);
    }
}

/// Orders clusters by a spread-weighted cost, then by their points.
pub fn compare_by_cost(a: &Cluster, b: &Cluster, factor: i32) -> Ordering {
    a.cost(factor)
        .cmp(&b.cost(factor))
        .then_with(|| a.combination.key().cmp(&b.combination.key()))
}

/// Candidate regrouping of a neighborhood's points into new tours.
#[derive(Debug, Clone)]
pub struct Chunk {
    clusters: Vec<Cluster>,
    time: u32,
}

impl Chunk {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        let time = Cluster::sum_time(&clusters);
        Self { clusters, time }
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;
    use crate::domain::types::Step;

    /// Uniform-time walk, x first then y.
    fn walk(from: Point, to: Point) -> Path {
        let mut steps = vec![Step::origin(from, 1)];
        let mut at = from;
        while at != to {
            let next = if at.x != to.x {
                Point::new(at.x + (to.x - at.x).signum(), at.y)
            } else {
                Point::new(at.x, at.y + (to.y - at.y).signum())
            };
            if let Some(dir) = at.dir_to(next) {
                steps.push(Step::new(next, dir, 1));
            }
            at = next;
        }
        Path::new(steps)
    }

    fn tour(points: &[Point]) -> Cluster {
        let depot = Point::new(0, 0);
        let legs = points.windows(2).map(|w| walk(w[0], w[1])).collect();
        Cluster::new(
            walk(depot, points[0]),
            walk(points[points.len() - 1], depot),
            legs,
        )
    }

    fn hash_of(cluster: &Cluster) -> u64 {
        let mut hasher = DefaultHasher::new();
        cluster.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn double_tours_match_in_either_direction() {
        let (a, b) = (Point::new(2, 1), Point::new(1, 3));
        let forward = tour(&[a, b]);
        let backward = tour(&[b, a]);
        assert_eq!(forward.kind(), ClusterKind::Double);
        assert_eq!(forward, backward);
        assert_eq!(hash_of(&forward), hash_of(&backward));
        assert_eq!(forward.total_time(), backward.total_time());
    }

    #[test]
    fn normal_tours_match_on_swapped_ends_only() {
        let (a, m, b) = (Point::new(3, 1), Point::new(3, 2), Point::new(2, 2));
        let forward = tour(&[a, m, b]);
        let swapped = tour(&[b, m, a]);
        let other_middle = tour(&[m, a, b]);

        assert_eq!(forward.kind(), ClusterKind::Normal);
        assert_eq!(forward, swapped);
        assert_eq!(hash_of(&forward), hash_of(&swapped));
        assert_ne!(forward, other_middle);
        assert_ne!(hash_of(&forward), hash_of(&other_middle));
    }

    #[test]
    fn solo_tour_is_a_round_trip() {
        let p = Point::new(2, 3);
        let solo = Cluster::solo(&walk(p, Point::new(0, 0)));
        assert_eq!(solo.kind(), ClusterKind::Solo);
        assert_eq!(solo.points(), vec![p]);
        assert_eq!(solo.total_time(), 10);
        assert_eq!(solo.spread(), 0);
    }
}
