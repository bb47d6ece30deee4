//! Closed tour type.

use serde::{Deserialize, Serialize};

/// A closed tour: a node-index sequence that starts and ends at the same
/// node, with its total length.
///
/// # Examples
///
/// ```
/// use u_antcolony::models::Tour;
///
/// let tour = Tour::new(vec![0, 2, 1, 0], 7.5);
/// assert_eq!(tour.start(), Some(0));
/// assert_eq!(tour.num_nodes(), 3);
/// assert!(tour.is_closed());
/// assert_eq!(tour.legs().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    path: Vec<usize>,
    distance: f64,
}

impl Tour {
    /// Creates a tour from an already-closed path and its length.
    pub fn new(path: Vec<usize>, distance: f64) -> Self {
        Self { path, distance }
    }

    /// Node indices in visit order, first == last.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Total tour length.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// First node of the tour.
    pub fn start(&self) -> Option<usize> {
        self.path.first().copied()
    }

    /// Number of distinct nodes visited (the closing repeat is not counted).
    pub fn num_nodes(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Returns `true` if the path returns to its start.
    pub fn is_closed(&self) -> bool {
        self.path.len() >= 2 && self.path.first() == self.path.last()
    }

    /// Consecutive `(from, to)` pairs, including the closing leg.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    /// Consumes the tour, returning `(path, distance)`.
    pub fn into_parts(self) -> (Vec<usize>, f64) {
        (self.path, self.distance)
    }
}
