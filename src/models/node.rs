//! Node type.

use serde::{Deserialize, Serialize};

/// A city in a TSP instance.
///
/// The index is fixed at construction and must be unique within a graph;
/// indices may be sparse. Coordinates are domain-agnostic: planar `x`/`y`,
/// or longitude/latitude in degrees for geographic input (see
/// [`Node::from_lat_lng`]).
///
/// # Examples
///
/// ```
/// use u_antcolony::models::Node;
///
/// let a = Node::new(0, 0.0, 0.0);
/// let b = Node::new(1, 3.0, 4.0).with_name("b");
/// assert_eq!(b.index(), 1);
/// assert_eq!(b.name(), Some("b"));
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    index: usize,
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Node {
    /// Creates a node with planar coordinates.
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self {
            index,
            x,
            y,
            name: None,
        }
    }

    /// Creates a geographic node; stores `x = lng`, `y = lat` (degrees).
    pub fn from_lat_lng(index: usize, lat: f64, lng: f64) -> Self {
        Self::new(index, lng, lat)
    }

    /// Attaches a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Node index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// X-coordinate (longitude for geographic nodes).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate (latitude for geographic nodes).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Latitude in degrees, for nodes built with [`Node::from_lat_lng`].
    pub fn lat(&self) -> f64 {
        self.y
    }

    /// Longitude in degrees, for nodes built with [`Node::from_lat_lng`].
    pub fn lng(&self) -> f64 {
        self.x
    }

    /// Display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
