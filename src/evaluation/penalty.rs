use crate::domain::cluster::Cluster;

/// Idle time charged for every tour shorter than the depot's processing duration.
pub fn idle_penalty(clusters: &[Cluster], processing_duration: u32) -> u32 {
    clusters
        .iter()
        .map(|c| processing_duration.saturating_sub(c.total_time()))
        .sum()
}

/// Units over `capacity` carried by one tour.
pub fn capacity_excess(materials: &[u32], capacity: u32) -> u32 {
    materials.iter().sum::<u32>().saturating_sub(capacity)
}

/// Time charged for a tour that cannot be driven, `n^4` so it never wins.
pub fn infeasible_time(n: i32) -> u64 {
    (n.max(1) as u64).saturating_pow(4)
}
