//! The colony solve loop.
//!
//! # Algorithm
//!
//! 1. **Seed**: one ant builds a tour from node 0 with a unit heuristic
//!    scale. Its length divided by the node count becomes `d_mean`, and the
//!    tour is the first best-known solution.
//! 2. **Iterate** `n_iterations` times:
//!    - shuffle the start nodes and hand them out round-robin;
//!    - every ant builds a tour against the same pheromone state;
//!    - evaporate all edges by `rho`;
//!    - every ant deposits `(best / n_ants) / own_distance` on its edges,
//!      with `best` frozen before the iteration's deposits;
//!    - adopt the shortest tour of the iteration if it beats the best;
//!    - notify the observer.
//!
//! # Reproducibility
//!
//! Each ant gets its own RNG seeded from the colony RNG, so a fixed `seed`
//! produces the same result whether or not construction runs in parallel.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AcoError, Result};
use crate::graph::Graph;
use crate::models::Tour;

use super::ant::Ant;
use super::config::{AcoConfig, HeuristicScale};
use super::observer::{IterationEvent, IterationObserver, IterationRecord};

/// Iterations between progress log lines.
const PROGRESS_EVERY: usize = 100;

/// Outcome of a colony run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoResult {
    /// Shortest closed tour found.
    pub best: Tour,
    /// Iterations completed.
    pub iterations: usize,
    /// Best-known distance after each iteration; non-increasing.
    pub best_distance_history: Vec<f64>,
}

impl AcoResult {
    /// Closed best tour, first == last.
    pub fn best_path(&self) -> &[usize] {
        self.best.path()
    }

    /// Length of the best tour.
    pub fn best_distance(&self) -> f64 {
        self.best.distance()
    }
}

/// Ant colony solver for one graph.
///
/// Owns the graph, the ant population and the RNG. [`AntColony::run`]
/// performs the configured number of iterations; [`AntColony::step`] runs
/// one at a time, and [`AntColony::history`] exposes the run as a lazy
/// iterator. Iteration boundaries are the only places a run can stop.
///
/// # Examples
///
/// ```
/// use u_antcolony::colony::{AcoConfig, AntColony};
/// use u_antcolony::graph::Graph;
/// use u_antcolony::models::Node;
///
/// let graph = Graph::euclidean(vec![
///     Node::new(0, 0.0, 0.0),
///     Node::new(1, 0.0, 1.0),
///     Node::new(2, 1.0, 1.0),
///     Node::new(3, 1.0, 0.0),
/// ])
/// .unwrap();
/// let config = AcoConfig::default()
///     .with_beta(2.0)
///     .with_n_ants(10)
///     .with_n_iterations(20)
///     .with_seed(42);
///
/// let result = AntColony::new(graph, config).unwrap().run().unwrap();
/// assert_eq!(result.best_path().len(), 5);
/// assert!((result.best_distance() - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct AntColony {
    graph: Graph,
    config: AcoConfig,
    rng: StdRng,
    ants: Vec<Ant>,
    starts: Vec<usize>,
    d_mean: f64,
    best: Tour,
    iteration: usize,
    best_distance_history: Vec<f64>,
}

impl AntColony {
    /// Validates `config` and seeds the colony.
    pub fn new(graph: Graph, config: AcoConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let start = seed_start(&graph)?;
        let mut scout = Ant::new();
        scout.initialize(&graph, start)?;
        scout.construct_tour(&graph, config.alpha, config.beta, 1.0, &mut rng)?;
        let seed_tour = scout.tour();

        let d_mean = match config.heuristic_scale {
            HeuristicScale::InitialTour => seed_tour.distance() / graph.num_nodes() as f64,
            HeuristicScale::MeanEdge => graph.mean_edge_distance(),
        };

        info!(
            "colony: start n={} ants={} iterations={} seed_tour={:.3} d_mean={:.3}",
            graph.num_nodes(),
            config.n_ants,
            config.n_iterations,
            seed_tour.distance(),
            d_mean
        );

        let starts = graph.node_indices().collect();
        let ants = vec![Ant::new(); config.n_ants];
        Ok(Self {
            graph,
            config,
            rng,
            ants,
            starts,
            d_mean,
            best: seed_tour,
            iteration: 0,
            best_distance_history: Vec::new(),
        })
    }

    /// The graph, with its current pheromone levels.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The validated configuration.
    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Heuristic scale factor used by every selection.
    pub fn d_mean(&self) -> f64 {
        self.d_mean
    }

    /// Best tour found so far.
    pub fn best(&self) -> &Tour {
        &self.best
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns `true` once the configured iteration count is reached.
    pub fn is_done(&self) -> bool {
        self.iteration >= self.config.n_iterations
    }

    /// Runs one iteration and returns whether it improved the best tour.
    ///
    /// Once the configured iteration count is reached this does nothing and
    /// returns `Ok(false)`.
    pub fn step(&mut self) -> Result<bool> {
        if self.is_done() {
            return Ok(false);
        }
        let AcoConfig {
            alpha, beta, rho, ..
        } = self.config;

        self.starts.shuffle(&mut self.rng);
        let seeds: Vec<u64> = (0..self.ants.len()).map(|_| self.rng.random()).collect();
        construct_all(
            &mut self.ants,
            &self.graph,
            &self.starts,
            &seeds,
            (alpha, beta, self.d_mean),
        )?;

        self.graph.evaporate(rho)?;

        let budget = self.best.distance() / self.ants.len() as f64;
        for ant in &self.ants {
            ant.deposit_pheromone(&mut self.graph, budget);
        }

        let mut improved = false;
        for ant in &self.ants {
            if ant.distance() < self.best.distance() {
                self.best = ant.tour();
                improved = true;
            }
        }

        if improved {
            info!(
                "colony: iteration {} new best distance={:.6}",
                self.iteration,
                self.best.distance()
            );
        }
        if self.iteration % PROGRESS_EVERY == 0 {
            debug!(
                "colony: iteration {}/{}",
                self.iteration, self.config.n_iterations
            );
        }

        self.best_distance_history.push(self.best.distance());
        self.iteration += 1;
        Ok(improved)
    }

    /// Runs the remaining iterations without an observer.
    pub fn run(self) -> Result<AcoResult> {
        self.run_with(&mut |_: &IterationEvent<'_>| {})
    }

    /// Runs the remaining iterations, notifying `observer` after each one.
    ///
    /// Observer errors and panics are logged and otherwise ignored.
    pub fn run_with<O>(mut self, observer: &mut O) -> Result<AcoResult>
    where
        O: IterationObserver + ?Sized,
    {
        while !self.is_done() {
            let improved = self.step()?;
            let event = IterationEvent::new(self.iteration - 1, &self.best, improved, &self.graph);
            match panic::catch_unwind(AssertUnwindSafe(|| observer.on_iteration(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("colony: observer failed at iteration {}: {e}", event.iteration);
                }
                Err(_) => {
                    warn!("colony: observer panicked at iteration {}", event.iteration);
                }
            }
        }
        Ok(self.into_result())
    }

    /// Lazily yields one [`IterationRecord`] per remaining iteration.
    ///
    /// Dropping the iterator early stops the run at an iteration boundary.
    pub fn history(self) -> History {
        History {
            colony: self,
            failed: false,
        }
    }

    /// Final result from the state reached so far.
    pub fn into_result(self) -> AcoResult {
        info!(
            "colony: complete iterations={} best_distance={:.6}",
            self.iteration,
            self.best.distance()
        );
        AcoResult {
            best: self.best,
            iterations: self.iteration,
            best_distance_history: self.best_distance_history,
        }
    }
}

/// Lazy per-iteration history of a colony run; see [`AntColony::history`].
#[derive(Debug)]
pub struct History {
    colony: AntColony,
    failed: bool,
}

impl History {
    /// The colony, at the last completed iteration.
    pub fn colony(&self) -> &AntColony {
        &self.colony
    }

    /// Stops iterating and returns the result reached so far.
    pub fn into_result(self) -> AcoResult {
        self.colony.into_result()
    }
}

impl Iterator for History {
    type Item = Result<IterationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.colony.is_done() {
            return None;
        }
        match self.colony.step() {
            Ok(improved) => {
                let c = &self.colony;
                let event = IterationEvent::new(c.iteration - 1, &c.best, improved, &c.graph);
                Some(Ok(event.to_record()))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Node 0 when present, otherwise the first node supplied.
fn seed_start(graph: &Graph) -> Result<usize> {
    if graph.contains(0) {
        return Ok(0);
    }
    graph
        .node_indices()
        .next()
        .ok_or_else(|| AcoError::InvalidGraph("graph has no nodes".to_string()))
}

fn construct_one(
    ant: &mut Ant,
    graph: &Graph,
    start: usize,
    seed: u64,
    (alpha, beta, d_mean): (f64, f64, f64),
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    ant.initialize(graph, start)?;
    ant.construct_tour(graph, alpha, beta, d_mean, &mut rng)
}

#[cfg(feature = "parallel")]
fn construct_all(
    ants: &mut [Ant],
    graph: &Graph,
    starts: &[usize],
    seeds: &[u64],
    params: (f64, f64, f64),
) -> Result<()> {
    ants.par_iter_mut()
        .zip(seeds.par_iter())
        .enumerate()
        .try_for_each(|(k, (ant, &seed))| {
            construct_one(ant, graph, starts[k % starts.len()], seed, params)
        })
}

#[cfg(not(feature = "parallel"))]
fn construct_all(
    ants: &mut [Ant],
    graph: &Graph,
    starts: &[usize],
    seeds: &[u64],
    params: (f64, f64, f64),
) -> Result<()> {
    ants.iter_mut()
        .zip(seeds)
        .enumerate()
        .try_for_each(|(k, (ant, &seed))| {
            construct_one(ant, graph, starts[k % starts.len()], seed, params)
        })
}
