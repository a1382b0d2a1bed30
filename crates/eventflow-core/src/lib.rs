//! Eventflow Core - time-windowed event graphs over historical
//! actor-location-date data
//!
//! Each actor's itinerary is a directed graph: nodes are locations, edges are
//! moves from one location to the next with departure and arrival dates. An
//! `EventGraph` keeps the full record and a reduced view restricted to a
//! date window, with recency colors derived from the window. A
//! `GraphCollection` loads graphs lazily through injected seams, and a
//! `SpatialIndex` supports nearest-location picking over everything drawn.

#![forbid(unsafe_code)]

// Core modules
pub mod collection;
pub mod data;
pub mod graph;
pub mod spatial;
pub mod traits;

// Sources and file formats
pub mod io;
pub mod storage;

// Ambient
pub mod config;
pub mod logging;

// Re-export key types
pub use collection::{GraphCollection, Graphs};
pub use data::{
    Actor, ActorId, CollectionError, DateWindow, Edge, EdgeId, EventGraphError, GraphData, LocationId, Node,
    ResolvedWindow, SessionError, Triple,
};
pub use graph::{BuildOptions, Cooccurrence, EventGraph};
pub use spatial::{marker_radius, GeoPoint, Marker, SpatialIndex};
pub use traits::{ActorRef, ActorResolver, GraphLoader, LoaderFn};

pub use config::{ConfigError, EventflowConfig};
pub use logging::init_tracing;
