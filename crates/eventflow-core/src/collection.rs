//! The set of actors under study and a lazily filled cache of their graphs.
//!
//! Actors are resolved once, when they are added. Graphs are fetched through
//! the injected `GraphLoader` the first time they are asked for and cached
//! for the lifetime of the collection: each actor is loaded at most once
//! unless it is removed or the collection is cleared. Actors whose loader
//! result is empty are remembered as such and skipped.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::data::{Actor, ActorId, CollectionError};
use crate::graph::EventGraph;
use crate::traits::{ActorRef, ActorResolver, GraphLoader};

pub struct GraphCollection {
    resolver: Box<dyn ActorResolver>,
    loader: Box<dyn GraphLoader>,
    order: Vec<ActorId>,
    actors: HashMap<ActorId, Actor>,
    cache: HashMap<ActorId, EventGraph>,
    without_data: HashSet<ActorId>,
}

impl GraphCollection {
    pub fn new(
        resolver: impl ActorResolver + 'static,
        loader: impl GraphLoader + 'static,
    ) -> Self {
        Self {
            resolver: Box::new(resolver),
            loader: Box::new(loader),
            order: Vec::new(),
            actors: HashMap::new(),
            cache: HashMap::new(),
            without_data: HashSet::new(),
        }
    }

    /// Creates a collection and resolves `refs` into it.
    pub fn with_actors<I, R>(
        refs: I,
        resolver: impl ActorResolver + 'static,
        loader: impl GraphLoader + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ActorRef>,
    {
        let mut collection = Self::new(resolver, loader);
        collection.update_actor_list(refs);
        collection
    }

    /// Resolves and adds actors. References that resolve to an actor already
    /// present, or to nothing, are skipped. Cached graphs are never replaced.
    /// Returns the ids that were added, in order.
    pub fn update_actor_list<I, R>(&mut self, refs: I) -> Vec<ActorId>
    where
        I: IntoIterator<Item = R>,
        R: Into<ActorRef>,
    {
        let mut added = Vec::new();
        for reference in refs {
            let reference = reference.into();
            let actor = self.resolver.resolve(&reference);
            if !actor.is_resolved() {
                info!(reference = %reference, "Skipping unresolved actor reference");
                continue;
            }
            if self.actors.contains_key(&actor.id) {
                continue;
            }
            debug!(actor = %actor.id, name = %actor.name, "Added actor");
            added.push(actor.id);
            self.order.push(actor.id);
            self.actors.insert(actor.id, actor);
        }
        added
    }

    /// Drops an actor and its cached graph. Absent ids are ignored.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        self.cache.remove(&id);
        self.without_data.remove(&id);
        let removed = self.actors.remove(&id);
        if removed.is_some() {
            self.order.retain(|a| *a != id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.actors.clear();
        self.cache.clear();
        self.without_data.clear();
    }

    /// Inserts a pre-built graph, replacing any cached graph for the actor.
    /// The actor must be resolved.
    pub fn add(&mut self, actor: Actor, graph: EventGraph) -> Result<(), CollectionError> {
        if !actor.is_resolved() {
            return Err(CollectionError::UnresolvedActor(actor.name));
        }
        let id = actor.id;
        if !self.actors.contains_key(&id) {
            self.order.push(id);
        }
        self.actors.insert(id, actor);
        self.without_data.remove(&id);
        self.cache.insert(id, graph);
        Ok(())
    }

    pub fn get_actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_cache_entry(&self, id: ActorId) -> Option<&EventGraph> {
        self.cache.get(&id)
    }

    pub fn get_cache_entry_mut(&mut self, id: ActorId) -> Option<&mut EventGraph> {
        self.cache.get_mut(&id)
    }

    /// Actors in insertion order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.order.iter().filter_map(|id| self.actors.get(id))
    }

    pub fn num_actors(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cached `(actor, graph)` pairs in insertion order. Never loads.
    pub fn iter_cached(&self) -> impl Iterator<Item = (&Actor, &EventGraph)> {
        self.order
            .iter()
            .filter_map(|id| Some((self.actors.get(id)?, self.cache.get(id)?)))
    }

    /// The first actor, in insertion order, that has neither a cached graph
    /// nor a known empty result.
    pub fn next_unresolved(&self) -> Option<ActorId> {
        self.order
            .iter()
            .copied()
            .find(|id| !self.cache.contains_key(id) && !self.without_data.contains(id))
    }

    /// Returns the cached graph of `id`, loading it first if needed. `None`
    /// when the actor is unknown or has no data.
    pub fn resolve_and_cache(&mut self, id: ActorId) -> Result<Option<&mut EventGraph>, CollectionError> {
        if self.ensure_loaded(id)? {
            Ok(self.cache.get_mut(&id))
        } else {
            Ok(None)
        }
    }

    /// Loads `id` into the cache unless it is already there. Returns whether
    /// a graph is available afterwards.
    fn ensure_loaded(&mut self, id: ActorId) -> Result<bool, CollectionError> {
        if self.cache.contains_key(&id) {
            return Ok(true);
        }
        if !self.actors.contains_key(&id) || self.without_data.contains(&id) {
            return Ok(false);
        }

        let data = self
            .loader
            .load_graph(id)
            .map_err(|source| CollectionError::Load { actor: id, source })?;
        if data.is_empty() {
            info!(actor = %id, "No graph data for actor, skipping");
            self.without_data.insert(id);
            return Ok(false);
        }

        let graph = EventGraph::from_data(data)
            .map_err(|source| CollectionError::Graph { actor: id, source })?;
        debug!(actor = %id, edges = graph.base_edges().len(), "Cached graph");
        self.cache.insert(id, graph);
        Ok(true)
    }

    /// A pass over `(actor, graph)` pairs in insertion order that loads
    /// missing graphs on the way. Every call starts a fresh pass; graphs
    /// already cached are not fetched again.
    pub fn graphs(&mut self) -> Graphs<'_> {
        Graphs {
            collection: self,
            position: 0,
        }
    }

    /// Runs `f` on every available graph, loading as needed. Stops at the
    /// first loader or schema error.
    pub fn for_each_graph<F>(&mut self, mut f: F) -> Result<(), CollectionError>
    where
        F: FnMut(&Actor, &mut EventGraph),
    {
        let mut graphs = self.graphs();
        while let Some(pair) = graphs.next_pair() {
            let (actor, graph) = pair?;
            f(actor, graph);
        }
        Ok(())
    }

    /// Loads every actor's graph. Returns the ids that have one.
    pub fn load_all(&mut self) -> Result<Vec<ActorId>, CollectionError> {
        let mut loaded = Vec::new();
        self.for_each_graph(|actor, _| loaded.push(actor.id))?;
        Ok(loaded)
    }
}

/// Cursor returned by `GraphCollection::graphs`.
///
/// Each item borrows the collection mutably, so this is a lending cursor
/// rather than an `Iterator`: call `next_pair` in a `while let` loop.
pub struct Graphs<'a> {
    collection: &'a mut GraphCollection,
    position: usize,
}

impl Graphs<'_> {
    /// Advances to the next actor with a graph. Actors without data are
    /// skipped; a loader or schema error is yielded and the pass moves on.
    pub fn next_pair(&mut self) -> Option<Result<(&Actor, &mut EventGraph), CollectionError>> {
        let id = loop {
            let id = *self.collection.order.get(self.position)?;
            self.position += 1;
            match self.collection.ensure_loaded(id) {
                Ok(true) => break id,
                Ok(false) => continue,
                Err(err) => return Some(Err(err)),
            }
        };

        let collection = &mut *self.collection;
        let actor = collection.actors.get(&id)?;
        let graph = collection.cache.get_mut(&id)?;
        Some(Ok((actor, graph)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Edge, EdgeId, GraphData, LocationId, Node};
    use crate::traits::{resolve_in, LoaderFn};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Roster(Vec<Actor>);

    impl ActorResolver for Roster {
        fn resolve(&self, reference: &ActorRef) -> Actor {
            resolve_in(&self.0, reference)
        }
    }

    fn roster() -> Roster {
        Roster(vec![
            Actor::new(ActorId(1), Some("Q1".to_string()), "Ada"),
            Actor::new(ActorId(2), Some("Q2".to_string()), "Ben"),
            Actor::new(ActorId(3), None, "Cy"),
        ])
    }

    fn data_for(actor: ActorId) -> GraphData {
        let day = |d| NaiveDate::from_ymd_opt(1900, 1, d).unwrap();
        GraphData::new(
            vec![
                Node::new(LocationId(10), "Paris", "Q90", 48.8566, 2.3522),
                Node::new(LocationId(20), "Vienna", "Q1741", 48.2082, 16.3738),
            ],
            vec![Edge::new(
                EdgeId::new(actor, 0),
                LocationId(10),
                day(1),
                LocationId(20),
                day(9),
            )],
        )
    }

    /// Loader with data for actors 1 and 2 that records every call.
    fn counting_loader() -> (LoaderFn<impl Fn(ActorId) -> anyhow::Result<GraphData>>, Rc<RefCell<Vec<ActorId>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&calls);
        let loader = LoaderFn(move |actor: ActorId| -> anyhow::Result<GraphData> {
            log.borrow_mut().push(actor);
            Ok(match actor.0 {
                1 | 2 => data_for(actor),
                _ => GraphData::empty(),
            })
        });
        (loader, calls)
    }

    #[test]
    fn test_update_actor_list_dedups_and_skips_unresolved() {
        let (loader, _) = counting_loader();
        let mut collection = GraphCollection::new(roster(), loader);
        let added = collection.update_actor_list(["1", "Q1", "Ben", "Nobody", "Q999"]);
        assert_eq!(added, vec![ActorId(1), ActorId(2)]);
        assert_eq!(collection.num_actors(), 2);
        assert!(collection.get_actor(ActorId::UNRESOLVED).is_none());
    }

    #[test]
    fn test_graphs_loads_each_actor_once() {
        let (loader, calls) = counting_loader();
        let mut collection = GraphCollection::with_actors([ActorId(1), ActorId(2), ActorId(3)], roster(), loader);

        let mut seen = Vec::new();
        let mut graphs = collection.graphs();
        while let Some(pair) = graphs.next_pair() {
            let (actor, _) = pair.unwrap();
            seen.push(actor.id);
        }
        // actor 3 has no data and is skipped
        assert_eq!(seen, vec![ActorId(1), ActorId(2)]);

        assert_eq!(collection.load_all().unwrap(), vec![ActorId(1), ActorId(2)]);
        assert_eq!(*calls.borrow(), vec![ActorId(1), ActorId(2), ActorId(3)]);
        assert!(collection.get_cache_entry(ActorId(3)).is_none());
    }

    #[test]
    fn test_remove_actor_drops_cache_and_is_idempotent() {
        let (loader, _) = counting_loader();
        let mut collection = GraphCollection::with_actors([ActorId(1), ActorId(2)], roster(), loader);
        collection.load_all().unwrap();

        assert!(collection.remove_actor(ActorId(1)).is_some());
        assert!(collection.get_cache_entry(ActorId(1)).is_none());
        assert!(collection.remove_actor(ActorId(1)).is_none());
        let ids: Vec<_> = collection.actors().map(|a| a.id).collect();
        assert_eq!(ids, vec![ActorId(2)]);
    }

    #[test]
    fn test_clear() {
        let (loader, _) = counting_loader();
        let mut collection = GraphCollection::with_actors([ActorId(1), ActorId(2)], roster(), loader);
        collection.load_all().unwrap();
        collection.clear();
        assert!(collection.is_empty());
        assert_eq!(collection.iter_cached().count(), 0);
    }

    #[test]
    fn test_add_rejects_unresolved_actor() {
        let (loader, _) = counting_loader();
        let mut collection = GraphCollection::new(roster(), loader);
        let err = collection
            .add(Actor::unresolved(), EventGraph::empty())
            .unwrap_err();
        assert!(matches!(err, CollectionError::UnresolvedActor(_)));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_add_prebuilt_graph_skips_loader() {
        let (loader, calls) = counting_loader();
        let mut collection = GraphCollection::new(roster(), loader);
        let graph = EventGraph::from_data(data_for(ActorId(7))).unwrap();
        collection
            .add(Actor::new(ActorId(7), None, "Dee"), graph)
            .unwrap();

        assert_eq!(collection.load_all().unwrap(), vec![ActorId(7)]);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_next_unresolved_and_resolve_and_cache() {
        let (loader, calls) = counting_loader();
        let mut collection = GraphCollection::with_actors([ActorId(3), ActorId(1)], roster(), loader);

        assert_eq!(collection.next_unresolved(), Some(ActorId(3)));
        assert!(collection.resolve_and_cache(ActorId(3)).unwrap().is_none());
        assert_eq!(collection.next_unresolved(), Some(ActorId(1)));
        assert!(collection.resolve_and_cache(ActorId(1)).unwrap().is_some());
        assert_eq!(collection.next_unresolved(), None);

        assert!(collection.resolve_and_cache(ActorId(1)).unwrap().is_some());
        assert!(collection.resolve_and_cache(ActorId(42)).unwrap().is_none());
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_loader_error_is_reported_and_pass_continues() {
        let loader = LoaderFn(|actor: ActorId| -> anyhow::Result<GraphData> {
            if actor == ActorId(1) {
                anyhow::bail!("source offline");
            }
            Ok(data_for(actor))
        });
        let mut collection = GraphCollection::with_actors([ActorId(1), ActorId(2)], roster(), loader);

        let mut graphs = collection.graphs();
        let first = graphs.next_pair().unwrap();
        assert!(matches!(first, Err(CollectionError::Load { actor: ActorId(1), .. })));
        let (actor, _) = graphs.next_pair().unwrap().unwrap();
        assert_eq!(actor.id, ActorId(2));
        assert!(graphs.next_pair().is_none());
    }

    #[test]
    fn test_graphs_hands_out_mutable_graphs() {
        use crate::data::DateWindow;
        use crate::graph::BuildOptions;

        let (loader, _) = counting_loader();
        let mut collection = GraphCollection::with_actors([ActorId(1)], roster(), loader);
        collection
            .for_each_graph(|_, graph| {
                graph.build(&DateWindow::full(), BuildOptions::default());
            })
            .unwrap();
        let graph = collection.get_cache_entry(ActorId(1)).unwrap();
        assert!(graph.edges()[0].color.is_some());
    }
}
