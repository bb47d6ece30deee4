//! Graph and pheromone data model.
//!
//! - [`Graph`] — complete undirected graph; owns the edge arena
//! - [`Edge`] — fixed distance plus mutable pheromone level
//! - [`PheromoneSnapshot`] — owned copy of all pheromone levels for observers

mod complete;
mod edge;

pub use complete::Graph;
pub use edge::{normalize, Edge, EdgeId, PheromoneSnapshot, INITIAL_PHEROMONE};
