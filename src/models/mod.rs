//! Domain model types for the traveling salesman problem.
//!
//! Nodes carry an index fixed at construction and a coordinate pair; tours
//! are closed node-index sequences with their total length.

mod node;
mod tour;

pub use node::Node;
pub use tour::Tour;
