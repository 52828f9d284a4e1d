use crate::distance::store::PathStore;
use crate::domain::cluster::{Chunk, Cluster};
use crate::domain::path::Path;
use crate::domain::types::Point;
use crate::domain::world::World;
use crate::error::{Result, RoutingError};
use crate::evaluation::fitness::{find_fitness, TourTimes};
use crate::setup::season::CompositorSeason;
use crate::solver::genetic::genome::Genome;
use crate::solver::genetic::FitnessModel;

/// A neighborhood prepared for the genetic search: its points in genome
/// index order, their paths, and a dense time table over them.
#[derive(Debug, Clone)]
pub struct OptimiserVariant {
    season: CompositorSeason,
    positions: Vec<Point>,
    materials: Vec<u32>,
    times: TourTimes,
}

impl OptimiserVariant {
    pub fn new<W: World + ?Sized>(
        season: CompositorSeason,
        positions: Vec<Point>,
        store: &PathStore,
        world: &W,
    ) -> Result<Self> {
        let lookup = store.lookup();
        let mut depot = Vec::with_capacity(positions.len());
        let mut edges = Vec::with_capacity(positions.len());
        for &from in &positions {
            depot.push(lookup.to_depot(from)?);
            let row = positions
                .iter()
                .map(|&to| if from == to { Ok(0) } else { lookup.edge(from, to) })
                .collect::<Result<Vec<u32>>>()?;
            edges.push(row);
        }
        let materials: Vec<u32> = positions.iter().map(|&p| world.material_at(p)).collect();
        let times = TourTimes::new(depot, edges, materials.clone(), world.size());
        Ok(Self {
            season,
            positions,
            materials,
            times,
        })
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn times(&self) -> &TourTimes {
        &self.times
    }

    fn depot_path(&self, p: Point) -> Result<&Path> {
        self.season
            .to_depot(p)
            .ok_or(RoutingError::MissingDepotPath(p))
    }

    fn group_to_cluster(&self, group: &[usize]) -> Result<Cluster> {
        match *group {
            [a] => Ok(Cluster::solo(self.depot_path(self.positions[a])?)),
            [a, b] => {
                let (origin, destination) = (self.positions[a], self.positions[b]);
                Ok(Cluster::new(
                    self.depot_path(origin)?.invert(),
                    self.depot_path(destination)?.clone(),
                    vec![self.season.path_between(origin, destination)?],
                ))
            }
            [a, m, b] => {
                // The heavier end goes last so the lighter cells are emptied first.
                let (a, b) = if self.materials[a] > self.materials[b] {
                    (b, a)
                } else {
                    (a, b)
                };
                let (origin, material, destination) =
                    (self.positions[a], self.positions[m], self.positions[b]);
                Ok(Cluster::new(
                    self.depot_path(origin)?.invert(),
                    self.depot_path(destination)?.clone(),
                    vec![
                        self.season.path_between(origin, material)?,
                        self.season.path_between(material, destination)?,
                    ],
                ))
            }
            _ => Err(RoutingError::ChunkMismatch {
                expected: 3,
                actual: group.len(),
            }),
        }
    }

    /// Tours encoded by `genome`, or `None` when one of them is over capacity.
    pub fn decode(&self, genome: &Genome) -> Result<Option<Chunk>> {
        if !self.times.genome_feasible(genome.genes()) {
            return Ok(None);
        }
        let clusters = genome
            .genes()
            .chunks(3)
            .map(|group| self.group_to_cluster(group))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(Chunk::new(clusters)))
    }
}

impl FitnessModel for OptimiserVariant {
    fn genome_len(&self) -> usize {
        self.positions.len()
    }

    fn fitness(&self, genome: &Genome) -> Result<f64> {
        find_fitness(self.times.genome_time(genome.genes()))
    }
}
