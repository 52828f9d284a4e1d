pub mod genetic;
pub mod local_search;
pub mod plan;
pub mod run;
