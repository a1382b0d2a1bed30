//! Testing utilities for the Eventflow graph engine.
//!
//! Data generators for scenario and randomized graphs, fakes of the loader
//! and resolver seams, and `mockall` mocks of the same seams.

pub mod data_generators;
pub mod fakes;
pub mod mocks;

/// Re-export commonly used types for convenience
pub use mockall;

pub use data_generators::{
    date, random_graph_data, scenario_graph, scenario_locations, scenario_store, scenario_triples,
};
pub use fakes::{CallLog, FakeActorResolver, FakeGraphLoader};
pub use mocks::{MockActorResolver, MockGraphLoader};
