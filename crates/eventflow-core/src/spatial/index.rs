//! Incrementally maintained point index over the locations currently drawn.
//!
//! Every visible edge contributes its two endpoints. An entry tracks how many
//! visible edges touch the location (`degree`), a display weight that only
//! grows (`radius`) and the most recent recency color seen for it. Entries
//! whose degree drops to zero are pruned. Points live in an R-tree so that
//! picking the location nearest to a query point stays logarithmic.

use std::collections::{BTreeMap, HashMap};

use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SpatialConfig;
use crate::data::{ActorId, Edge, EdgeId, LocationId, Node};
use crate::graph::{EventGraph, NO_COLOR};
use crate::spatial::marker::marker_radius;

type IndexedPoint = GeomWithData<[f64; 2], LocationId>;

/// A point in geographic degrees. Distances are plain Euclidean distances in
/// the same units, with longitude on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn of(node: &Node) -> Self {
        Self::new(node.lat, node.lon)
    }

    pub fn distance(&self, other: &GeoPoint) -> f64 {
        (self.lon - other.lon).hypot(self.lat - other.lat)
    }

    fn xy(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub point: GeoPoint,
    pub label: String,
    pub external_id: String,
    /// Display weight: 1 on insertion, +1 for every further arrival.
    pub radius: u32,
    /// Visible edges touching the location.
    pub degree: u32,
    /// Highest recency scale seen for the location.
    pub color: f64,
}

/// What a renderer needs to draw one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub location: LocationId,
    pub point: GeoPoint,
    pub radius: f64,
    pub color: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy)]
struct IndexedEdge {
    from: LocationId,
    to: LocationId,
}

/// Edges are identified by the actor they were drawn for plus their own id,
/// so graphs whose edge ids overlap can be drawn side by side.
type EdgeKey = (ActorId, EdgeId);

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    settings: SpatialConfig,
    entries: BTreeMap<LocationId, IndexEntry>,
    tree: RTree<IndexedPoint>,
    edges: HashMap<EdgeKey, IndexedEdge>,
    actor_edges: HashMap<ActorId, Vec<EdgeId>>,
}

impl SpatialIndex {
    pub fn new(settings: SpatialConfig) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Records a newly visible edge, filed under the edge's own actor.
    /// Returns false if the edge is already indexed.
    pub fn add_edge_endpoints(&mut self, edge: &Edge, from: &Node, to: &Node) -> bool {
        self.insert_edge(edge.actor_id(), edge, from, to)
    }

    /// Records every edge of `graph`'s reduced view under `actor`. Returns
    /// the number of edges added.
    pub fn add_graph(&mut self, actor: ActorId, graph: &EventGraph) -> usize {
        let nodes: HashMap<LocationId, &Node> = graph.nodes().iter().map(|n| (n.id, n)).collect();
        let mut added = 0;
        for edge in graph.edges() {
            let (Some(from), Some(to)) = (nodes.get(&edge.from_node), nodes.get(&edge.to_node))
            else {
                continue;
            };
            if self.insert_edge(actor, edge, from, to) {
                added += 1;
            }
        }
        trace!(actor = %actor, added, locations = self.entries.len(), "Indexed graph");
        added
    }

    fn insert_edge(&mut self, actor: ActorId, edge: &Edge, from: &Node, to: &Node) -> bool {
        if self.edges.contains_key(&(actor, edge.id)) {
            return false;
        }
        self.touch(from, false);
        self.touch(to, true);
        self.edges.insert(
            (actor, edge.id),
            IndexedEdge {
                from: from.id,
                to: to.id,
            },
        );
        self.actor_edges.entry(actor).or_default().push(edge.id);
        true
    }

    fn touch(&mut self, node: &Node, arrival: bool) {
        let color = node.color.unwrap_or(NO_COLOR);
        if let Some(entry) = self.entries.get_mut(&node.id) {
            entry.degree += 1;
            if arrival {
                entry.radius += 1;
            }
            // recency never regresses
            entry.color = entry.color.max(color);
            return;
        }

        let point = GeoPoint::of(node);
        if point.is_finite() {
            self.tree.insert(GeomWithData::new(point.xy(), node.id));
        }
        self.entries.insert(
            node.id,
            IndexEntry {
                point,
                label: node.label.clone(),
                external_id: node.external_id.clone(),
                radius: 1,
                degree: 1,
                color,
            },
        );
    }

    /// Hides the given edges, each looked up under its own actor as filed by
    /// `add_edge_endpoints`: both endpoints lose one degree per edge, then
    /// locations left without visible edges are pruned. Unknown ids are
    /// ignored. Radius and color are left as they are. Returns the number of
    /// edges removed.
    pub fn remove_actor_edges(&mut self, ids: &[EdgeId]) -> usize {
        let removed = ids
            .iter()
            .filter(|id| self.remove_edge(id.actor, **id))
            .count();
        self.prune();
        removed
    }

    /// Hides every edge indexed for `actor`.
    pub fn hide_actor(&mut self, actor: ActorId) -> usize {
        let ids = self.actor_edges.get(&actor).cloned().unwrap_or_default();
        let removed = ids.iter().filter(|id| self.remove_edge(actor, **id)).count();
        self.actor_edges.remove(&actor);
        self.prune();
        removed
    }

    fn remove_edge(&mut self, owner: ActorId, id: EdgeId) -> bool {
        let Some(indexed) = self.edges.remove(&(owner, id)) else {
            return false;
        };
        for location in [indexed.from, indexed.to] {
            if let Some(entry) = self.entries.get_mut(&location) {
                entry.degree = entry.degree.saturating_sub(1);
            }
        }
        if let Some(owned) = self.actor_edges.get_mut(&owner) {
            owned.retain(|e| *e != id);
        }
        true
    }

    fn prune(&mut self) {
        let dead: Vec<LocationId> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.degree == 0)
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            if let Some(entry) = self.entries.remove(&id) {
                if entry.point.is_finite() {
                    self.tree.remove(&GeomWithData::new(entry.point.xy(), id));
                }
                trace!(location = %id, "Pruned location");
            }
        }
    }

    /// The indexed location closest to `query`, if it is strictly closer
    /// than `tolerance`.
    pub fn nearest_point(&self, query: GeoPoint, tolerance: f64) -> Option<(LocationId, &IndexEntry)> {
        if !query.is_finite() {
            return None;
        }
        let nearest = self.tree.nearest_neighbor(&query.xy())?;
        let id = nearest.data;
        let entry = self.entries.get(&id)?;
        if query.distance(&entry.point) < tolerance {
            Some((id, entry))
        } else {
            None
        }
    }

    /// `nearest_point` with the configured pick tolerance.
    pub fn pick(&self, query: GeoPoint) -> Option<(LocationId, &IndexEntry)> {
        self.nearest_point(query, self.settings.pick_tolerance)
    }

    /// Render list in location order.
    pub fn markers(&self) -> Vec<Marker> {
        self.entries
            .iter()
            .map(|(id, entry)| Marker {
                location: *id,
                point: entry.point,
                radius: marker_radius(
                    entry.radius as f64,
                    self.settings.max_radius,
                    self.settings.growth_rate,
                ),
                color: entry.color,
                label: entry.label.clone(),
            })
            .collect()
    }

    pub fn get(&self, id: LocationId) -> Option<&IndexEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of indexed locations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of visible edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.tree = RTree::new();
        self.edges.clear();
        self.actor_edges.clear();
    }
}
