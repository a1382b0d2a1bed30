//! Hand-written fakes of the collection seams.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use anyhow::anyhow;
use eventflow_core::data::{Actor, ActorId, GraphData};
use eventflow_core::traits::{resolve_in, ActorRef, ActorResolver, GraphLoader};

/// Shared record of the actor ids a loader was asked for, in call order.
pub type CallLog = Rc<RefCell<Vec<ActorId>>>;

/// Loader serving canned graph data. Unknown actors have no data.
#[derive(Debug, Clone, Default)]
pub struct FakeGraphLoader {
    graphs: HashMap<ActorId, GraphData>,
    failing: HashSet<ActorId>,
    calls: CallLog,
}

impl FakeGraphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(mut self, actor: ActorId, data: GraphData) -> Self {
        self.graphs.insert(actor, data);
        self
    }

    /// Makes every load of `actor` fail.
    pub fn failing_for(mut self, actor: ActorId) -> Self {
        self.failing.insert(actor);
        self
    }

    /// Handle on the call log that stays valid after the loader is moved
    /// into a collection.
    pub fn calls(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    pub fn call_count(&self, actor: ActorId) -> usize {
        self.calls.borrow().iter().filter(|id| **id == actor).count()
    }
}

impl GraphLoader for FakeGraphLoader {
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData> {
        self.calls.borrow_mut().push(actor);
        if self.failing.contains(&actor) {
            return Err(anyhow!("source unavailable for actor {actor}"));
        }
        Ok(self.graphs.get(&actor).cloned().unwrap_or_default())
    }
}

/// Resolver over a fixed list of actors.
#[derive(Debug, Clone, Default)]
pub struct FakeActorResolver {
    actors: Vec<Actor>,
}

impl FakeActorResolver {
    pub fn new(actors: Vec<Actor>) -> Self {
        Self { actors }
    }

    pub fn with_actor(mut self, id: i64, external_id: Option<&str>, name: &str) -> Self {
        self.actors
            .push(Actor::new(ActorId(id), external_id.map(str::to_string), name));
        self
    }
}

impl ActorResolver for FakeActorResolver {
    fn resolve(&self, reference: &ActorRef) -> Actor {
        resolve_in(&self.actors, reference)
    }
}
