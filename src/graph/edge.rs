//! Edge records and the pheromone snapshot.

use serde::{Deserialize, Serialize};

/// Initial pheromone level of every edge.
pub const INITIAL_PHEROMONE: f64 = 1.0;

/// Stable position of an edge in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Arena position.
    pub fn get(self) -> usize {
        self.0
    }
}

/// An undirected edge between two distinct nodes.
///
/// The endpoints are stored normalized as `(min, max)` node index. The
/// distance is fixed at construction; only the pheromone level changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    nodes: (usize, usize),
    distance: f64,
    pheromone: f64,
}

impl Edge {
    pub(crate) fn new(i: usize, j: usize, distance: f64) -> Self {
        Self {
            nodes: normalize(i, j),
            distance,
            pheromone: INITIAL_PHEROMONE,
        }
    }

    /// Endpoints as `(min, max)` node index.
    pub fn nodes(&self) -> (usize, usize) {
        self.nodes
    }

    /// Length of this edge.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Current pheromone level.
    pub fn pheromone(&self) -> f64 {
        self.pheromone
    }

    /// Selection weight `pheromone^alpha * (d_mean / distance)^beta`.
    pub fn weight(&self, alpha: f64, beta: f64, d_mean: f64) -> f64 {
        self.pheromone.powf(alpha) * (d_mean / self.distance).powf(beta)
    }

    /// Natural log of [`Edge::weight`], finite or `-inf` (zero pheromone).
    ///
    /// A zero exponent contributes nothing, matching `x^0 == 1`.
    pub fn log_weight(&self, alpha: f64, beta: f64, d_mean: f64) -> f64 {
        let term = |base: f64, exp: f64| if exp == 0.0 { 0.0 } else { exp * base.ln() };
        term(self.pheromone, alpha) + term(d_mean / self.distance, beta)
    }

    pub(crate) fn evaporate(&mut self, keep: f64) {
        self.pheromone *= keep;
    }

    pub(crate) fn reinforce(&mut self, amount: f64) {
        self.pheromone += amount;
    }
}

/// Orders a node-index pair as `(min, max)`.
pub fn normalize(i: usize, j: usize) -> (usize, usize) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

/// An owned copy of every edge's pheromone level, keyed by normalized
/// node-index pair and sorted by key.
///
/// # Examples
///
/// ```
/// use u_antcolony::graph::Graph;
/// use u_antcolony::models::Node;
///
/// let graph = Graph::euclidean(vec![
///     Node::new(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0),
///     Node::new(2, 0.0, 1.0),
/// ])
/// .unwrap();
/// let snapshot = graph.snapshot_pheromones();
/// assert_eq!(snapshot.len(), 3);
/// assert_eq!(snapshot.get(2, 0), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneSnapshot {
    levels: Vec<((usize, usize), f64)>,
}

impl PheromoneSnapshot {
    pub(crate) fn from_edges(edges: &[Edge]) -> Self {
        let mut levels: Vec<_> = edges.iter().map(|e| (e.nodes(), e.pheromone())).collect();
        levels.sort_by_key(|&(key, _)| key);
        Self { levels }
    }

    /// Pheromone on the edge between `i` and `j`, in either order.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let key = normalize(i, j);
        self.levels
            .binary_search_by_key(&key, |&(k, _)| k)
            .ok()
            .map(|pos| self.levels[pos].1)
    }

    /// Number of edges captured.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if no edges were captured.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// `((min, max), pheromone)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.levels.iter().copied()
    }

    /// Sum of all pheromone levels.
    pub fn total(&self) -> f64 {
        self.levels.iter().map(|&(_, p)| p).sum()
    }

    /// Largest pheromone level, `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.levels.iter().map(|&(_, p)| p).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(3, 1), (1, 3));
        assert_eq!(normalize(1, 3), (1, 3));
    }

    #[test]
    fn test_edge_new_normalizes() {
        let e = Edge::new(5, 2, 3.0);
        assert_eq!(e.nodes(), (2, 5));
        assert_eq!(e.distance(), 3.0);
        assert_eq!(e.pheromone(), INITIAL_PHEROMONE);
    }

    #[test]
    fn test_weight() {
        let mut e = Edge::new(0, 1, 2.0);
        e.reinforce(1.0);
        // 2^1 * (4/2)^2
        assert!((e.weight(1.0, 2.0, 4.0) - 8.0).abs() < 1e-12);
        // alpha = 0 ignores pheromone
        assert!((e.weight(0.0, 1.0, 4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_weight() {
        let mut e = Edge::new(0, 1, 2.0);
        e.reinforce(1.0);
        assert!((e.log_weight(1.0, 2.0, 4.0) - 8f64.ln()).abs() < 1e-12);
        // stays finite where the plain weight overflows
        assert!(e.weight(1.0, 2000.0, 4.0).is_infinite());
        assert!((e.log_weight(1.0, 2000.0, 4.0) - (2f64.ln() + 2000.0 * 2f64.ln())).abs() < 1e-9);
        e.evaporate(0.0);
        assert_eq!(e.log_weight(1.0, 1.0, 4.0), f64::NEG_INFINITY);
        assert!((e.log_weight(0.0, 1.0, 4.0) - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_evaporate_and_reinforce() {
        let mut e = Edge::new(0, 1, 1.0);
        e.evaporate(0.5);
        assert!((e.pheromone() - 0.5).abs() < 1e-12);
        e.reinforce(0.25);
        assert!((e.pheromone() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_lookup_and_stats() {
        let mut edges = vec![Edge::new(1, 2, 1.0), Edge::new(0, 2, 1.0), Edge::new(0, 1, 1.0)];
        edges[0].reinforce(2.0);
        let snap = PheromoneSnapshot::from_edges(&edges);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.get(2, 1), Some(3.0));
        assert_eq!(snap.get(0, 5), None);
        assert!((snap.total() - 5.0).abs() < 1e-12);
        assert_eq!(snap.max(), Some(3.0));
        let keys: Vec<_> = snap.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (1, 2)]);
    }
}
