use std::collections::BTreeSet;

use crate::domain::cluster::Cluster;
use crate::domain::types::Point;

/// Slot of the optimiser holding one tour. The id is the slot index and never
/// changes; `version` grows every time the slot gets a new cluster.
#[derive(Debug, Clone)]
pub struct ClusterContainer {
    id: usize,
    version: u64,
    cluster: Cluster,
    neighbor_ids: BTreeSet<usize>,
    neighbor_positions: BTreeSet<Point>,
}

impl ClusterContainer {
    pub fn new(id: usize, cluster: Cluster) -> Self {
        Self {
            id,
            version: 0,
            cluster,
            neighbor_ids: BTreeSet::new(),
            neighbor_positions: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn into_cluster(self) -> Cluster {
        self.cluster
    }

    /// Puts a new cluster in the slot and forgets the old adjacency.
    pub fn replace(&mut self, cluster: Cluster) -> Cluster {
        self.version += 1;
        self.neighbor_ids.clear();
        self.neighbor_positions.clear();
        std::mem::replace(&mut self.cluster, cluster)
    }

    pub fn add_neighbor(&mut self, id: usize, pos: Point) {
        if id == self.id {
            return;
        }
        self.neighbor_ids.insert(id);
        self.neighbor_positions.insert(pos);
    }

    pub fn neighbor_ids(&self) -> &BTreeSet<usize> {
        &self.neighbor_ids
    }

    pub fn neighbor_positions(&self) -> &BTreeSet<Point> {
        &self.neighbor_positions
    }
}
