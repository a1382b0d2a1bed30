//! Record types for locations, visit edges, actors and raw observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::identifiers::{ActorId, EdgeId, LocationId};

/// A location. `color` and `degree` are derived from the active window and
/// are only set on the reduced view of a built graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: LocationId,
    pub label: String,
    pub external_id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<u32>,
}

impl Node {
    pub fn new(
        id: LocationId,
        label: impl Into<String>,
        external_id: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            external_id: external_id.into(),
            lat,
            lon,
            color: None,
            degree: None,
        }
    }

    /// Compares the base columns only.
    pub fn core_eq(&self, other: &Node) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.external_id == other.external_id
            && self.lat == other.lat
            && self.lon == other.lon
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Copy with the derived columns cleared.
    pub fn without_derived(&self) -> Node {
        Node {
            color: None,
            degree: None,
            ..self.clone()
        }
    }
}

/// A transition from one location to the next in an actor's itinerary.
/// `color` is the recency color assigned by the last build, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from_node: LocationId,
    pub from_date: NaiveDate,
    pub to_node: LocationId,
    pub to_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        from_node: LocationId,
        from_date: NaiveDate,
        to_node: LocationId,
        to_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            from_node,
            from_date,
            to_node,
            to_date,
            color: None,
        }
    }

    pub fn actor_id(&self) -> ActorId {
        self.id.actor
    }

    /// The `(fromNode, fromDate, toNode, toDate)` tuple edges are matched on.
    pub fn key(&self) -> (LocationId, NaiveDate, LocationId, NaiveDate) {
        (self.from_node, self.from_date, self.to_node, self.to_date)
    }

    /// Compares the exported base columns (actor and the 4-tuple). The edge's
    /// sequence number is not part of the comparison.
    pub fn core_eq(&self, other: &Edge) -> bool {
        self.actor_id() == other.actor_id() && self.key() == other.key()
    }

    pub fn without_derived(&self) -> Edge {
        Edge {
            color: None,
            ..self.clone()
        }
    }
}

/// A resolved actor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub external_id: Option<String>,
    pub name: String,
}

impl Actor {
    pub fn new(id: ActorId, external_id: Option<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            external_id,
            name: name.into(),
        }
    }

    /// The record resolvers hand back when nothing matches.
    pub fn unresolved() -> Self {
        Self {
            id: ActorId::UNRESOLVED,
            external_id: None,
            name: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.id.is_resolved()
    }
}

/// A primary observation: an actor seen at a location on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub actor: ActorId,
    pub location: LocationId,
    pub date: NaiveDate,
}

impl Triple {
    pub fn new(actor: ActorId, location: LocationId, date: NaiveDate) -> Self {
        Self {
            actor,
            location,
            date,
        }
    }
}

/// Node and edge records as returned by a loader. Empty nodes or empty edges
/// means "no data for this actor".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphData {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() || self.edges.is_empty()
    }
}
