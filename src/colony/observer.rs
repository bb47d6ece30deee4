//! Per-iteration progress reporting.

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, PheromoneSnapshot};
use crate::models::Tour;

/// Error type observers may return; the colony logs it and carries on.
pub type ObserverError = Box<dyn Error + Send + Sync>;

/// State of the colony at the end of one iteration, borrowed for the
/// duration of an [`IterationObserver`] call.
#[derive(Debug, Clone, Copy)]
pub struct IterationEvent<'a> {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Best tour found so far.
    pub best: &'a Tour,
    /// Whether this iteration improved on the previous best.
    pub improved: bool,
    graph: &'a Graph,
}

impl<'a> IterationEvent<'a> {
    pub(crate) fn new(iteration: usize, best: &'a Tour, improved: bool, graph: &'a Graph) -> Self {
        Self {
            iteration,
            best,
            improved,
            graph,
        }
    }

    /// The colony graph after this iteration's pheromone update.
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Copies the pheromone levels; only pay for it when needed.
    pub fn pheromones(&self) -> PheromoneSnapshot {
        self.graph.snapshot_pheromones()
    }

    /// Owned copy of this event, including a pheromone snapshot.
    pub fn to_record(&self) -> IterationRecord {
        IterationRecord {
            iteration: self.iteration,
            pheromones: self.pheromones(),
            best_path: self.best.path().to_vec(),
            best_distance: self.best.distance(),
            improved: self.improved,
        }
    }
}

/// Owned per-iteration history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Pheromone levels after the iteration's update.
    pub pheromones: PheromoneSnapshot,
    /// Best closed tour so far.
    pub best_path: Vec<usize>,
    /// Length of `best_path`.
    pub best_distance: f64,
    /// Whether this iteration improved on the previous best.
    pub improved: bool,
}

/// Receives a notification at the end of every iteration.
///
/// Notifications are fire-and-forget: an `Err` or a panic is logged and the
/// solve continues. Panics can only be caught when the crate is built with
/// `panic = "unwind"`. Closures taking an [`IterationEvent`] are observers too.
///
/// # Examples
///
/// ```
/// use u_antcolony::colony::{AcoConfig, AntColony, IterationEvent};
/// use u_antcolony::graph::Graph;
/// use u_antcolony::models::Node;
///
/// let graph = Graph::euclidean(vec![
///     Node::new(0, 0.0, 0.0),
///     Node::new(1, 1.0, 0.0),
///     Node::new(2, 1.0, 1.0),
///     Node::new(3, 0.0, 1.0),
/// ])
/// .unwrap();
/// let config = AcoConfig::default().with_n_iterations(5).with_seed(1);
///
/// let mut distances = Vec::new();
/// let mut observer = |e: &IterationEvent<'_>| distances.push(e.best.distance());
/// AntColony::new(graph, config).unwrap().run_with(&mut observer);
/// assert_eq!(distances.len(), 5);
/// ```
pub trait IterationObserver {
    /// Called once per iteration after the pheromone update.
    fn on_iteration(&mut self, event: &IterationEvent<'_>) -> Result<(), ObserverError>;
}

impl<F> IterationObserver for F
where
    F: FnMut(&IterationEvent<'_>),
{
    fn on_iteration(&mut self, event: &IterationEvent<'_>) -> Result<(), ObserverError> {
        self(event);
        Ok(())
    }
}

/// Observer that keeps every iteration as an [`IterationRecord`].
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    records: Vec<IterationRecord>,
    improvements_only: bool,
}

impl HistoryRecorder {
    /// Records every iteration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records only iterations that found a new best tour.
    pub fn improvements_only() -> Self {
        Self {
            records: Vec::new(),
            improvements_only: true,
        }
    }

    /// Records captured so far.
    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    /// Consumes the recorder, returning its records.
    pub fn into_records(self) -> Vec<IterationRecord> {
        self.records
    }
}

impl IterationObserver for HistoryRecorder {
    fn on_iteration(&mut self, event: &IterationEvent<'_>) -> Result<(), ObserverError> {
        if !self.improvements_only || event.improved {
            self.records.push(event.to_record());
        }
        Ok(())
    }
}
