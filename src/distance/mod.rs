//! Distance metrics.
//!
//! Euclidean distance is the default; [`GreatCircle`] handles geographic
//! coordinates and any closure over two nodes can stand in for either.

mod metric;

pub use metric::{DistanceMetric, Euclidean, GreatCircle, EARTH_RADIUS_M};
