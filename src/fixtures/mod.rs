pub mod data_generator;
pub mod vehicle;

pub use data_generator::GridWorld;
pub use vehicle::SimulatedVehicle;
