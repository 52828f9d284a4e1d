use tracing::info;

use crate::domain::cluster::Cluster;
use crate::domain::world::{Vehicle, World};
use crate::error::Result;
use crate::evaluation::penalty::idle_penalty;

/// The complete route plan.
#[derive(Debug, Clone)]
pub struct Bundle {
    clusters: Vec<Cluster>,
    penalty: u32,
    time: u32,
}

impl Bundle {
    pub fn new(clusters: Vec<Cluster>, processing_duration: u32) -> Self {
        let penalty = idle_penalty(&clusters, processing_duration);
        let time = Cluster::sum_time(&clusters) + penalty;
        Self {
            clusters,
            penalty,
            time,
        }
    }

    /// Tour time plus idle penalty.
    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    /// Drives every tour in order.
    pub fn drive<V: Vehicle + ?Sized, W: World + ?Sized>(
        &self,
        vehicle: &mut V,
        world: &W,
    ) -> Result<()> {
        info!("Driving {} tours", self.clusters.len());
        for cluster in &self.clusters {
            cluster.drive(vehicle, world)?;
        }
        Ok(())
    }
}
