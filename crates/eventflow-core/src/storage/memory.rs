use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::data::{Actor, ActorId, GraphData, LocationId, Node, Triple};
use crate::graph::edges_from_triples;
use crate::traits::{resolve_in, ActorRef, ActorResolver, GraphLoader};

/// In-memory store of actors, locations and raw observations
#[derive(Debug, Clone, Default)]
pub struct MemoryTripleStore {
    actors: Vec<Actor>,
    locations: BTreeMap<LocationId, Node>,
    triples: Vec<Triple>,
}

impl MemoryTripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor(&mut self, actor: Actor) -> &mut Self {
        self.actors.push(actor);
        self
    }

    /// Registers a location. A later location with the same id replaces the
    /// earlier one.
    pub fn add_location(&mut self, node: Node) -> &mut Self {
        self.locations.insert(node.id, node.without_derived());
        self
    }

    pub fn add_triple(&mut self, triple: Triple) -> &mut Self {
        self.triples.push(triple);
        self
    }

    pub fn extend_triples<I: IntoIterator<Item = Triple>>(&mut self, triples: I) -> &mut Self {
        self.triples.extend(triples);
        self
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn location(&self, id: LocationId) -> Option<&Node> {
        self.locations.get(&id)
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    fn located(&self, id: LocationId) -> bool {
        self.locations
            .get(&id)
            .map(Node::has_coordinates)
            .unwrap_or(false)
    }
}

impl ActorResolver for MemoryTripleStore {
    fn resolve(&self, reference: &ActorRef) -> Actor {
        resolve_in(&self.actors, reference)
    }
}

impl GraphLoader for MemoryTripleStore {
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData> {
        let derived = edges_from_triples(actor, &self.triples);
        let total = derived.len();
        let edges: Vec<_> = derived
            .into_iter()
            .filter(|e| self.located(e.from_node) && self.located(e.to_node))
            .collect();
        if edges.len() < total {
            warn!(
                actor = %actor,
                dropped = total - edges.len(),
                "Dropped edges touching locations without coordinates"
            );
        }
        if edges.is_empty() {
            debug!(actor = %actor, "No located observations");
            return Ok(GraphData::empty());
        }

        let touched: BTreeSet<LocationId> = edges.iter().flat_map(|e| [e.from_node, e.to_node]).collect();
        let nodes = touched
            .into_iter()
            .filter_map(|id| self.locations.get(&id).cloned())
            .collect();
        Ok(GraphData::new(nodes, edges))
    }
}
