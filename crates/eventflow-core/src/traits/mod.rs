//! Seams to the outside world: where graph data and actor records come from.

pub mod loader;
pub mod resolver;

pub use loader::{GraphLoader, LoaderFn};
pub use resolver::{resolve_in, ActorRef, ActorResolver, EXTERNAL_ID_PREFIX};
