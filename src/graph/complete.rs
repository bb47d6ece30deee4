//! Complete weighted graph with per-edge pheromone.

use std::collections::HashMap;

use rand::Rng;

use crate::distance::{DistanceMetric, Euclidean};
use crate::error::{AcoError, Result};
use crate::models::Node;

use super::edge::{Edge, EdgeId, PheromoneSnapshot};

/// A fully connected, undirected TSP graph.
///
/// Owns the nodes and one [`Edge`] per unordered node pair, stored in a
/// dense triangular arena over node slots. Node indices may be sparse;
/// slots follow the order in which nodes were supplied.
///
/// # Examples
///
/// ```
/// use u_antcolony::graph::Graph;
/// use u_antcolony::models::Node;
///
/// let mut graph = Graph::euclidean(vec![
///     Node::new(0, 0.0, 0.0),
///     Node::new(1, 3.0, 4.0),
///     Node::new(2, 6.0, 0.0),
/// ])
/// .unwrap();
/// assert_eq!(graph.num_edges(), 3);
/// assert_eq!(graph.edge(1, 0).unwrap().distance(), 5.0);
///
/// graph.evaporate(0.5).unwrap();
/// assert_eq!(graph.edge(0, 2).unwrap().pheromone(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    slots: HashMap<usize, usize>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds the graph, computing every pair distance once with `metric`.
    ///
    /// Fails with [`AcoError::InvalidGraph`] for fewer than 2 nodes, a
    /// duplicate node index, or a distinct pair whose distance is not a
    /// finite positive number.
    pub fn new<M>(nodes: Vec<Node>, metric: &M) -> Result<Self>
    where
        M: DistanceMetric + ?Sized,
    {
        let n = nodes.len();
        if n < 2 {
            return Err(AcoError::InvalidGraph(format!(
                "need at least 2 nodes, got {n}"
            )));
        }

        let mut slots = HashMap::with_capacity(n);
        for (slot, node) in nodes.iter().enumerate() {
            if slots.insert(node.index(), slot).is_some() {
                return Err(AcoError::InvalidGraph(format!(
                    "duplicate node index {}",
                    node.index()
                )));
            }
        }

        let mut edges = Vec::with_capacity(n * (n - 1) / 2);
        for hi in 1..n {
            for lo in 0..hi {
                let (a, b) = (&nodes[lo], &nodes[hi]);
                let d = metric.distance(a, b);
                if !d.is_finite() || d <= 0.0 {
                    return Err(AcoError::InvalidGraph(format!(
                        "distance between nodes {} and {} must be positive, got {d}",
                        a.index(),
                        b.index()
                    )));
                }
                edges.push(Edge::new(a.index(), b.index(), d));
            }
        }

        Ok(Self {
            nodes,
            slots,
            edges,
        })
    }

    /// Builds the graph with [`Euclidean`] distances.
    pub fn euclidean(nodes: Vec<Node>) -> Result<Self> {
        Self::new(nodes, &Euclidean)
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, always `n * (n - 1) / 2`.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in the order they were supplied.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node indices in the order they were supplied.
    pub fn node_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().map(Node::index)
    }

    /// Looks up a node by index.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.slots.get(&index).map(|&slot| &self.nodes[slot])
    }

    /// Returns `true` if `index` names a node of this graph.
    pub fn contains(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    /// All edges in arena order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Arena id of the edge between `i` and `j`, in either order.
    pub fn edge_id(&self, i: usize, j: usize) -> Result<EdgeId> {
        let not_found = AcoError::NotFound { from: i, to: j };
        let (Some(&si), Some(&sj)) = (self.slots.get(&i), self.slots.get(&j)) else {
            return Err(not_found);
        };
        if si == sj {
            return Err(not_found);
        }
        let (lo, hi) = if si < sj { (si, sj) } else { (sj, si) };
        Ok(EdgeId(hi * (hi - 1) / 2 + lo))
    }

    /// The edge between `i` and `j`, in either order.
    pub fn edge(&self, i: usize, j: usize) -> Result<&Edge> {
        self.edge_id(i, j).map(|id| &self.edges[id.0])
    }

    /// The edge stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different graph with more edges.
    pub fn edge_at(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Distance between `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        self.edge(i, j).map(Edge::distance)
    }

    /// Arithmetic mean of all edge distances.
    pub fn mean_edge_distance(&self) -> f64 {
        let total: f64 = self.edges.iter().map(Edge::distance).sum();
        total / self.edges.len() as f64
    }

    /// Total length of a node-index path, summing consecutive pairs.
    ///
    /// Pass a closed path (first == last) to measure a tour.
    pub fn tour_length(&self, path: &[usize]) -> Result<f64> {
        path.windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }

    /// Selection weights of every candidate reachable from `from`, rescaled
    /// so the largest is `1`.
    ///
    /// Weights are combined in log space, so an exponent large enough to
    /// overflow `(d_mean / distance)^beta` still ranks the candidates.
    /// Returns `None` when every weight is zero.
    fn scaled_weights(
        &self,
        from: usize,
        candidates: &[usize],
        alpha: f64,
        beta: f64,
        d_mean: f64,
    ) -> Result<Option<Vec<f64>>> {
        let log_weights = candidates
            .iter()
            .map(|&c| self.edge(from, c).map(|e| e.log_weight(alpha, beta, d_mean)))
            .collect::<Result<Vec<f64>>>()?;
        let max = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return Ok(None);
        }
        Ok(Some(log_weights.into_iter().map(|lw| (lw - max).exp()).collect()))
    }

    /// Probability of moving from `from` to each candidate, in candidate
    /// order.
    ///
    /// Falls back to a uniform distribution when every weight is zero.
    pub fn selection_probabilities(
        &self,
        from: usize,
        candidates: &[usize],
        alpha: f64,
        beta: f64,
        d_mean: f64,
    ) -> Result<Vec<f64>> {
        if candidates.is_empty() {
            return Err(AcoError::NoCandidates(from));
        }
        let Some(weights) = self.scaled_weights(from, candidates, alpha, beta, d_mean)? else {
            let uniform = 1.0 / candidates.len() as f64;
            return Ok(vec![uniform; candidates.len()]);
        };
        let total: f64 = weights.iter().sum();
        Ok(weights.into_iter().map(|w| w / total).collect())
    }

    /// Samples the next node among `candidates` by roulette wheel over
    /// `pheromone^alpha * (d_mean / distance)^beta`.
    ///
    /// A single candidate is returned without drawing from `rng`.
    pub fn select_next<R: Rng + ?Sized>(
        &self,
        from: usize,
        candidates: &[usize],
        alpha: f64,
        beta: f64,
        d_mean: f64,
        rng: &mut R,
    ) -> Result<usize> {
        match candidates {
            [] => return Err(AcoError::NoCandidates(from)),
            [only] => {
                self.edge_id(from, *only)?;
                return Ok(*only);
            }
            _ => {}
        }

        let Some(weights) = self.scaled_weights(from, candidates, alpha, beta, d_mean)? else {
            return Ok(candidates[rng.random_range(0..candidates.len())]);
        };
        let total: f64 = weights.iter().sum();

        let mut pick = rng.random::<f64>() * total;
        for (&c, &w) in candidates.iter().zip(&weights) {
            if pick < w {
                return Ok(c);
            }
            pick -= w;
        }
        // rounding left `pick` past the last bucket
        let last = candidates
            .iter()
            .zip(&weights)
            .rev()
            .find(|&(_, &w)| w > 0.0)
            .map_or(candidates[candidates.len() - 1], |(&c, _)| c);
        Ok(last)
    }

    /// Multiplies every pheromone level by `1 - rho`.
    pub fn evaporate(&mut self, rho: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&rho) {
            return Err(AcoError::InvalidConfig(format!(
                "rho must lie in [0, 1], got {rho}"
            )));
        }
        let keep = 1.0 - rho;
        for edge in &mut self.edges {
            edge.evaporate(keep);
        }
        Ok(())
    }

    /// Adds `amount` to the pheromone of each listed edge.
    ///
    /// # Panics
    ///
    /// Panics if an id came from a different graph with more edges.
    pub fn deposit(&mut self, edges: &[EdgeId], amount: f64) {
        for id in edges {
            self.edges[id.0].reinforce(amount);
        }
    }

    /// Owned copy of the current pheromone levels.
    pub fn snapshot_pheromones(&self) -> PheromoneSnapshot {
        PheromoneSnapshot::from_edges(&self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::GreatCircle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square() -> Graph {
        Graph::euclidean(vec![
            Node::new(0, 0.0, 0.0),
            Node::new(1, 0.0, 1.0),
            Node::new(2, 1.0, 1.0),
            Node::new(3, 1.0, 0.0),
        ])
        .expect("valid square")
    }

    #[test]
    fn test_complete_edge_set() {
        let g = square();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 6);
        let mut keys: Vec<_> = g.edges().iter().map(Edge::nodes).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn test_edge_direction_independent() {
        let g = square();
        assert_eq!(g.edge_id(0, 2), g.edge_id(2, 0));
        assert!((g.distance(2, 0).expect("edge") - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(g.edge(3, 1).expect("edge").nodes(), (1, 3));
    }

    #[test]
    fn test_edge_not_found() {
        let g = square();
        assert_eq!(g.edge(0, 9).unwrap_err(), AcoError::NotFound { from: 0, to: 9 });
        assert!(g.edge(2, 2).is_err());
    }

    #[test]
    fn test_too_few_nodes() {
        let err = Graph::euclidean(vec![Node::new(0, 0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidGraph(_)));
        assert!(Graph::euclidean(Vec::new()).is_err());
    }

    #[test]
    fn test_coincident_nodes_rejected() {
        let err = Graph::euclidean(vec![Node::new(0, 1.0, 1.0), Node::new(1, 1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidGraph(_)));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let err = Graph::euclidean(vec![Node::new(0, 0.0, 0.0), Node::new(0, 1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidGraph(_)));
    }

    #[test]
    fn test_non_finite_distance_rejected() {
        let metric = |_: &Node, _: &Node| f64::NAN;
        let nodes = vec![Node::new(0, 0.0, 0.0), Node::new(1, 1.0, 0.0)];
        assert!(Graph::new(nodes, &metric).is_err());
    }

    #[test]
    fn test_sparse_indices() {
        let g = Graph::euclidean(vec![
            Node::new(10, 0.0, 0.0),
            Node::new(4, 3.0, 4.0),
            Node::new(7, 0.0, 8.0),
        ])
        .expect("valid");
        assert!(g.contains(7));
        assert!(!g.contains(0));
        assert_eq!(g.node(4).map(Node::x), Some(3.0));
        assert_eq!(g.node_indices().collect::<Vec<_>>(), vec![10, 4, 7]);
        assert!((g.distance(10, 4).expect("edge") - 5.0).abs() < 1e-12);
        assert_eq!(g.edge(7, 10).expect("edge").nodes(), (7, 10));
    }

    #[test]
    fn test_great_circle_graph() {
        let g = Graph::new(
            vec![
                Node::from_lat_lng(0, 48.8566, 2.3522),
                Node::from_lat_lng(1, 51.5074, -0.1278),
            ],
            &GreatCircle::kilometers(),
        )
        .expect("valid");
        assert!((g.distance(0, 1).expect("edge") - 343.5).abs() < 1.0);
    }

    #[test]
    fn test_tour_length() {
        let g = square();
        let len = g.tour_length(&[0, 1, 2, 3, 0]).expect("valid tour");
        assert!((len - 4.0).abs() < 1e-12);
        assert!(g.tour_length(&[0, 5, 0]).is_err());
        assert_eq!(g.tour_length(&[0]).expect("single node"), 0.0);
    }

    #[test]
    fn test_mean_edge_distance() {
        let g = square();
        let expected = (4.0 + 2.0 * 2f64.sqrt()) / 6.0;
        assert!((g.mean_edge_distance() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_evaporate() {
        let mut g = square();
        g.evaporate(0.1).expect("valid rho");
        for e in g.edges() {
            assert!((e.pheromone() - 0.9).abs() < 1e-12);
        }
        g.evaporate(0.0).expect("valid rho");
        assert!((g.edges()[0].pheromone() - 0.9).abs() < 1e-12);
        g.evaporate(1.0).expect("valid rho");
        assert!(g.edges().iter().all(|e| e.pheromone() == 0.0));
    }

    #[test]
    fn test_evaporate_out_of_range() {
        let mut g = square();
        assert!(matches!(g.evaporate(1.5), Err(AcoError::InvalidConfig(_))));
        assert!(matches!(g.evaporate(-0.1), Err(AcoError::InvalidConfig(_))));
        assert!(g.evaporate(f64::NAN).is_err());
    }

    #[test]
    fn test_deposit() {
        let mut g = square();
        let id = g.edge_id(1, 2).expect("edge");
        g.deposit(&[id, id], 0.25);
        assert!((g.edge(2, 1).expect("edge").pheromone() - 1.5).abs() < 1e-12);
        assert_eq!(g.edge(0, 1).expect("edge").pheromone(), 1.0);
    }

    #[test]
    fn test_snapshot_does_not_alias() {
        let mut g = square();
        let before = g.snapshot_pheromones();
        g.evaporate(0.5).expect("valid rho");
        assert_eq!(before.get(0, 1), Some(1.0));
        assert_eq!(g.snapshot_pheromones().get(0, 1), Some(0.5));
    }

    #[test]
    fn test_probabilities_favor_short_edges() {
        let g = square();
        let p = g
            .selection_probabilities(0, &[1, 2, 3], 1.0, 2.0, 1.0)
            .expect("valid");
        // weights 1, 1/2, 1 -> 0.4, 0.2, 0.4
        assert!((p[0] - 0.4).abs() < 1e-12);
        assert!((p[1] - 0.2).abs() < 1e-12);
        assert!((p[2] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_zero_ignores_pheromone() {
        let g1 = square();
        let mut g2 = square();
        let id = g2.edge_id(0, 2).expect("edge");
        g2.deposit(&[id], 50.0);
        g2.evaporate(0.3).expect("valid rho");

        let p1 = g1.selection_probabilities(0, &[1, 2, 3], 0.0, 2.0, 1.5).expect("valid");
        let p2 = g2.selection_probabilities(0, &[1, 2, 3], 0.0, 2.0, 1.5).expect("valid");
        for (a, b) in p1.iter().zip(&p2) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let mut g = square();
        g.evaporate(1.0).expect("valid rho");
        let p = g.selection_probabilities(0, &[1, 2, 3], 1.0, 1.0, 1.0).expect("valid");
        assert!(p.iter().all(|&x| (x - 1.0 / 3.0).abs() < 1e-12));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let next = g.select_next(0, &[1, 2, 3], 1.0, 1.0, 1.0, &mut rng).expect("valid");
            assert!([1, 2, 3].contains(&next));
        }
    }

    #[test]
    fn test_overflowing_weight_keeps_nearest() {
        let g = Graph::euclidean(vec![
            Node::new(0, 0.0, 0.0),
            Node::new(1, 1.0, 0.0),
            Node::new(2, 100.0, 0.0),
        ])
        .expect("valid");
        assert!(g.edge(0, 1).expect("edge").weight(1.0, 400.0, 10.0).is_infinite());

        let p = g.selection_probabilities(0, &[1, 2], 1.0, 400.0, 10.0).expect("valid");
        assert_eq!(p, vec![1.0, 0.0]);

        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..1000 {
            assert_eq!(g.select_next(0, &[1, 2], 1.0, 400.0, 10.0, &mut rng), Ok(1));
        }
    }

    #[test]
    fn test_select_next_single_candidate() {
        let g = square();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(g.select_next(0, &[3], 1.0, 1.0, 1.0, &mut rng), Ok(3));
        assert!(g.select_next(0, &[9], 1.0, 1.0, 1.0, &mut rng).is_err());
        assert_eq!(
            g.select_next(0, &[], 1.0, 1.0, 1.0, &mut rng),
            Err(AcoError::NoCandidates(0))
        );
    }

    #[test]
    fn test_select_next_never_picks_zero_weight() {
        // only edge (0, 1) keeps any pheromone
        let mut g = square();
        let keep = g.edge_id(0, 1).expect("edge");
        g.evaporate(1.0).expect("valid rho");
        g.deposit(&[keep], 1.0);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(g.select_next(0, &[1, 2, 3], 1.0, 1.0, 1.0, &mut rng), Ok(1));
        }
    }

    #[test]
    fn test_select_next_frequencies() {
        let g = square();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 4];
        let trials = 20_000;
        for _ in 0..trials {
            let next = g.select_next(0, &[1, 2, 3], 1.0, 2.0, 1.0, &mut rng).expect("valid");
            counts[next] += 1;
        }
        let diag = counts[2] as f64 / trials as f64;
        assert!((diag - 0.2).abs() < 0.02, "diagonal frequency {diag}");
    }
}
