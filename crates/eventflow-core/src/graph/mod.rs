//! The event graph engine.

pub mod coloring;
pub mod derive;
pub mod event_graph;
pub mod set_ops;

pub use coloring::{viridis_hex, NO_COLOR};
pub use derive::edges_from_triples;
pub use event_graph::{BuildOptions, DerivedColumns, EventGraph};
pub use set_ops::Cooccurrence;
