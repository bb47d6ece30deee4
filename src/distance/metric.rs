//! Pluggable distance metrics.

use crate::models::Node;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A symmetric, deterministic distance between two nodes.
///
/// Implementations must return `0` only for identical locations and the same
/// value for `(a, b)` and `(b, a)`. Graphs evaluate the metric exactly once
/// per node pair, at construction.
///
/// Any `Fn(&Node, &Node) -> f64` is a metric:
///
/// ```
/// use u_antcolony::distance::DistanceMetric;
/// use u_antcolony::models::Node;
///
/// let manhattan = |a: &Node, b: &Node| (a.x() - b.x()).abs() + (a.y() - b.y()).abs();
/// let d = manhattan.distance(&Node::new(0, 0.0, 0.0), &Node::new(1, 3.0, 4.0));
/// assert_eq!(d, 7.0);
/// ```
pub trait DistanceMetric {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &Node, b: &Node) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(&Node, &Node) -> f64,
{
    fn distance(&self, a: &Node, b: &Node) -> f64 {
        self(a, b)
    }
}

/// Straight-line distance on the `(x, y)` plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, a: &Node, b: &Node) -> f64 {
        a.distance_to(b)
    }
}

/// Haversine great-circle distance for nodes holding `x = lng`, `y = lat`
/// in degrees.
///
/// # Examples
///
/// ```
/// use u_antcolony::distance::{DistanceMetric, GreatCircle};
/// use u_antcolony::models::Node;
///
/// let paris = Node::from_lat_lng(0, 48.8566, 2.3522);
/// let london = Node::from_lat_lng(1, 51.5074, -0.1278);
/// let km = GreatCircle::kilometers().distance(&paris, &london);
/// assert!((km - 343.5).abs() < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircle {
    radius: f64,
}

impl GreatCircle {
    /// Great-circle metric on a sphere of the given radius.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Earth, in kilometers.
    pub fn kilometers() -> Self {
        Self::new(EARTH_RADIUS_M / 1000.0)
    }

    /// Sphere radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Default for GreatCircle {
    /// Earth, in meters.
    fn default() -> Self {
        Self::new(EARTH_RADIUS_M)
    }
}

impl DistanceMetric for GreatCircle {
    fn distance(&self, a: &Node, b: &Node) -> f64 {
        let (lat1, lat2) = (a.lat().to_radians(), b.lat().to_radians());
        let dlat = (b.lat() - a.lat()).to_radians();
        let dlng = (b.lng() - a.lng()).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlng / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        // rounding can push h a hair above 1 for antipodal points
        2.0 * self.radius * h.min(1.0).sqrt().asin()
    }
}
