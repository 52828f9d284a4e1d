pub mod container;
pub mod neighbourhood;
pub mod search;
pub mod state;
pub mod variant;

pub use search::ClusterOptimiser;
pub use state::{Checkpoint, State};
