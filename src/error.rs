use thiserror::Error;

use crate::domain::types::Point;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("point {0} was never registered in the time lookup")]
    UnknownPoint(Point),

    #[error("no edge cached from {from} to {to}")]
    MissingEdge { from: Point, to: Point },

    #[error("edge {from} -> {to} cached as {cached} but found again as {found}")]
    AsymmetricEdge {
        from: Point,
        to: Point,
        cached: u32,
        found: u32,
    },

    #[error("no depot path cached for {0}")]
    MissingDepotPath(Point),

    #[error("material at {0} cannot be reached from the depot")]
    UnreachableMaterial(Point),

    #[error("point {0} is not owned by any cluster")]
    UnassignedPoint(Point),

    #[error("genome evaluated to zero travel time")]
    ZeroTimeGenome,

    #[error("population is empty, no genome to select")]
    EmptyPopulation,

    #[error("roulette selection ran past the fitness sum {0}")]
    SelectionOverflow(f64),

    #[error("chunk holds {actual} clusters but the scope replaces {expected}")]
    ChunkMismatch { expected: usize, actual: usize },

    #[error("vehicle at {actual} but the path starts at {expected}")]
    VehicleOffPath { expected: Point, actual: Point },

    #[error("invalid world: {0}")]
    InvalidWorld(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RoutingError>;
