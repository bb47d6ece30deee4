//! A single ant: tour construction and local pheromone deposit.

use rand::Rng;

use crate::error::{AcoError, Result};
use crate::graph::{EdgeId, Graph};
use crate::models::Tour;

/// An agent that builds one closed tour per iteration.
///
/// The ant only reads the graph while constructing, so every ant of an
/// iteration sees the same pheromone levels. Pheromone is written back
/// afterwards through [`Ant::deposit_pheromone`].
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_antcolony::colony::Ant;
/// use u_antcolony::graph::Graph;
/// use u_antcolony::models::Node;
///
/// let graph = Graph::euclidean(vec![
///     Node::new(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0),
///     Node::new(2, 1.0, 1.0),
/// ])
/// .unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let mut ant = Ant::new();
/// ant.initialize(&graph, 1).unwrap();
/// ant.construct_tour(&graph, 1.0, 1.0, 1.0, &mut rng).unwrap();
///
/// assert_eq!(ant.path().len(), 4);
/// assert_eq!(ant.path().first(), ant.path().last());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ant {
    position: usize,
    nodes_to_visit: Vec<usize>,
    distance: f64,
    path: Vec<usize>,
    edges_visited: Vec<EdgeId>,
}

impl Ant {
    /// Creates an idle ant; call [`Ant::initialize`] before constructing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the ant on `start` with every other node left to visit.
    pub fn initialize(&mut self, graph: &Graph, start: usize) -> Result<()> {
        if !graph.contains(start) {
            return Err(AcoError::InvalidStart(start));
        }
        self.position = start;
        self.nodes_to_visit.clear();
        self.nodes_to_visit
            .extend(graph.node_indices().filter(|&i| i != start));
        self.distance = 0.0;
        self.path.clear();
        self.path.push(start);
        self.edges_visited.clear();
        Ok(())
    }

    /// Visits every remaining node, then returns to the start.
    ///
    /// Edges taken while visiting are recorded for the deposit; the closing
    /// edge back to the start only adds its distance.
    pub fn construct_tour<R: Rng + ?Sized>(
        &mut self,
        graph: &Graph,
        alpha: f64,
        beta: f64,
        d_mean: f64,
        rng: &mut R,
    ) -> Result<()> {
        while !self.nodes_to_visit.is_empty() {
            let next = graph.select_next(
                self.position,
                &self.nodes_to_visit,
                alpha,
                beta,
                d_mean,
                rng,
            )?;
            if let Some(pos) = self.nodes_to_visit.iter().position(|&i| i == next) {
                self.nodes_to_visit.remove(pos);
            }
            let id = graph.edge_id(self.position, next)?;
            self.edges_visited.push(id);
            self.distance += graph.edge_at(id).distance();
            self.path.push(next);
            self.position = next;
        }

        if let Some(&start) = self.path.first() {
            if self.path.len() > 1 {
                self.distance += graph.distance(self.position, start)?;
                self.path.push(start);
                self.position = start;
            }
        }
        Ok(())
    }

    /// Adds `amount / distance` to every edge this ant recorded.
    ///
    /// Does nothing for an ant that has not moved.
    pub fn deposit_pheromone(&self, graph: &mut Graph, amount: f64) {
        if self.distance > 0.0 {
            graph.deposit(&self.edges_visited, amount / self.distance);
        }
    }

    /// Current node.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Nodes not yet visited.
    pub fn nodes_to_visit(&self) -> &[usize] {
        &self.nodes_to_visit
    }

    /// Length travelled so far (the full tour once constructed).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Visited node indices in order.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Edges recorded for the pheromone deposit.
    pub fn edges_visited(&self) -> &[EdgeId] {
        &self.edges_visited
    }

    /// Copies the constructed tour out of the ant.
    pub fn tour(&self) -> Tour {
        Tour::new(self.path.clone(), self.distance)
    }
}
