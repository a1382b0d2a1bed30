//! GraphLoader trait: where a collection gets an actor's graph data from

use std::rc::Rc;

use crate::data::{ActorId, GraphData};

/// Supplies the node and edge records of one actor.
pub trait GraphLoader {
    /// Loads the graph data of `actor`.
    ///
    /// Contract: Receives the actor's canonical numeric id. Returns empty
    /// `GraphData` (no nodes or no edges) when the actor has no qualifying
    /// events; that is not an error. Errors are reserved for failures of the
    /// underlying source. Timeouts and retries are the implementation's
    /// business.
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData>;
}

impl<T: GraphLoader + ?Sized> GraphLoader for Rc<T> {
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData> {
        (**self).load_graph(actor)
    }
}

impl<T: GraphLoader + ?Sized> GraphLoader for Box<T> {
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData> {
        (**self).load_graph(actor)
    }
}

/// Adapts a plain function or closure into a `GraphLoader`.
pub struct LoaderFn<F>(pub F);

impl<F> GraphLoader for LoaderFn<F>
where
    F: Fn(ActorId) -> anyhow::Result<GraphData>,
{
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData> {
        (self.0)(actor)
    }
}
