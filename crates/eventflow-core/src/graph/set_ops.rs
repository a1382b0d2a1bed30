//! Set operations between two actors' reduced views.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{EventGraphError, LocationId, Node};
use crate::graph::event_graph::EventGraph;

/// Two actors leaving the same location on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooccurrence {
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub label: String,
    pub external_id: String,
}

impl EventGraph {
    /// Locations and dates where both graphs have an edge departing, matched
    /// on `(fromNode, fromDate)` over the reduced views. Results follow this
    /// graph's edge order without repeats. `None` when nothing matches.
    pub fn cooccurrence(&self, other: &EventGraph) -> Option<Vec<Cooccurrence>> {
        let departures: HashSet<(LocationId, NaiveDate)> = other
            .edges()
            .iter()
            .map(|e| (e.from_node, e.from_date))
            .collect();

        let mut seen = HashSet::new();
        let matches: Vec<Cooccurrence> = self
            .edges()
            .iter()
            .map(|e| (e.from_node, e.from_date))
            .filter(|key| departures.contains(key) && seen.insert(*key))
            .filter_map(|(location_id, date)| {
                let node = self.node(location_id)?;
                Some(Cooccurrence {
                    location_id,
                    date,
                    label: node.label.clone(),
                    external_id: node.external_id.clone(),
                })
            })
            .collect();

        if matches.is_empty() {
            None
        } else {
            Some(matches)
        }
    }

    /// A new graph holding the edges present in both reduced views (matched
    /// on `(fromNode, fromDate, toNode, toDate)`) and their endpoint nodes.
    /// Edges keep this graph's identifiers. Derived attributes are dropped;
    /// call `build` on the result to recompute them.
    pub fn intersect(&self, other: &EventGraph) -> Result<EventGraph, EventGraphError> {
        let theirs: HashSet<_> = other.edges().iter().map(|e| e.key()).collect();
        let shared: Vec<_> = self
            .edges()
            .iter()
            .filter(|e| theirs.contains(&e.key()))
            .cloned()
            .collect();

        let mut nodes: BTreeMap<LocationId, Node> = BTreeMap::new();
        for node in self.nodes().iter().chain(other.nodes()) {
            nodes.entry(node.id).or_insert_with(|| node.without_derived());
        }

        EventGraph::new(nodes.into_values().collect(), shared)
    }
}
