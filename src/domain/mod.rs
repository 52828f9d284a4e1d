pub mod bundle;
pub mod cluster;
pub mod path;
pub mod types;
pub mod world;
