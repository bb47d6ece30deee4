//! # u-antcolony
//!
//! Approximate traveling salesman solver using ant colony optimization.
//! Ants build closed tours over a complete graph, guided by pheromone that
//! evaporates every iteration and is reinforced along good tours.
//!
//! ## Modules
//!
//! - [`models`] — Node and Tour types
//! - [`distance`] — Euclidean, great-circle, and closure-based metrics
//! - [`graph`] — Complete graph with per-edge pheromone
//! - [`colony`] — Ants, colony solver, configuration, and observers
//! - [`error`] — Error taxonomy
//!
//! # Examples
//!
//! ```
//! use u_antcolony::colony::AcoConfig;
//! use u_antcolony::models::Node;
//!
//! let nodes = vec![
//!     Node::new(0, 0.0, 0.0),
//!     Node::new(1, 0.0, 1.0),
//!     Node::new(2, 1.0, 1.0),
//!     Node::new(3, 1.0, 0.0),
//! ];
//! let config = AcoConfig::default().with_beta(2.0).with_seed(7);
//! let result = u_antcolony::solve(nodes, &config).unwrap();
//! assert_eq!(result.best_path().first(), result.best_path().last());
//! ```

pub mod colony;
pub mod distance;
pub mod error;
pub mod graph;
pub mod models;

pub use error::{AcoError, Result};

use colony::{AcoConfig, AcoResult, AntColony};
use distance::DistanceMetric;
use graph::Graph;
use models::Node;

/// Solves a Euclidean TSP instance.
pub fn solve(nodes: Vec<Node>, config: &AcoConfig) -> Result<AcoResult> {
    AntColony::new(Graph::euclidean(nodes)?, config.clone())?.run()
}

/// Solves a TSP instance under a custom distance metric.
///
/// ```
/// use u_antcolony::colony::AcoConfig;
/// use u_antcolony::distance::GreatCircle;
/// use u_antcolony::models::Node;
///
/// let capitals = vec![
///     Node::from_lat_lng(0, 52.37, 4.89).with_name("Amsterdam"),
///     Node::from_lat_lng(1, 50.85, 4.35).with_name("Brussels"),
///     Node::from_lat_lng(2, 48.86, 2.35).with_name("Paris"),
///     Node::from_lat_lng(3, 51.51, -0.13).with_name("London"),
/// ];
/// let config = AcoConfig::default().with_seed(3);
/// let result = u_antcolony::solve_with_metric(capitals, &GreatCircle::kilometers(), &config).unwrap();
/// assert_eq!(result.best_path().len(), 5);
/// ```
pub fn solve_with_metric<M>(nodes: Vec<Node>, metric: &M, config: &AcoConfig) -> Result<AcoResult>
where
    M: DistanceMetric + ?Sized,
{
    AntColony::new(Graph::new(nodes, metric)?, config.clone())?.run()
}
