pub mod bounds;
pub mod matrix;
pub mod search;
pub mod store;
