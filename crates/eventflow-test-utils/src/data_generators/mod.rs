//! Test data generators for event graphs.
//!
//! Fixed scenarios with hand-checked expectations, and seeded random graphs
//! for property-style tests.

mod graphs;
mod scenario;

pub use graphs::*;
pub use scenario::*;
