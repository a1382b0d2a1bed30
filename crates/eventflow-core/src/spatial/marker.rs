//! Marker sizing.

pub const DEFAULT_MAX_RADIUS: f64 = 15.0;
pub const DEFAULT_GROWTH_RATE: f64 = 0.1;

/// Display radius for a marker of the given weight:
/// `max_radius - (max_radius - 2) * exp(-growth_rate * weight)`.
///
/// Starts at 2 for weight 0 and approaches `max_radius` from below.
pub fn marker_radius(weight: f64, max_radius: f64, growth_rate: f64) -> f64 {
    max_radius - (max_radius - 2.0) * (-growth_rate * weight).exp()
}

/// `marker_radius` with the default maximum and growth rate.
pub fn default_marker_radius(weight: f64) -> f64 {
    marker_radius(weight, DEFAULT_MAX_RADIUS, DEFAULT_GROWTH_RATE)
}
