//! Spatial bookkeeping for the drawing layer: which locations are visible,
//! how large their markers are and which one a pick lands on.

pub mod index;
pub mod marker;

pub use index::{GeoPoint, IndexEntry, Marker, SpatialIndex};
pub use marker::{default_marker_radius, marker_radius, DEFAULT_GROWTH_RATE, DEFAULT_MAX_RADIUS};
