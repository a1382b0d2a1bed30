//! One actor's itinerary as a date-sliceable graph.
//!
//! An `EventGraph` owns an immutable base set of locations and visit edges
//! (edges sorted by departure date) and a *reduced view*: the edges lying
//! inside the most recently built date window plus exactly the locations
//! those edges touch. `build` recomputes the view and its derived
//! attributes (recency colors, degree) without touching the base data.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::data::table::columns;
use crate::data::{
    DateWindow, Edge, EventGraphError, GraphData, LocationId, Node, RecordTable, ResolvedWindow,
    TableKind,
};
use crate::graph::coloring::{viridis_hex, NO_COLOR};

/// Which derived attributes `build` computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Assign a viridis color to every edge in the view.
    pub color_edges: bool,
    /// Assign a recency scale and a degree to every node in the view.
    pub color_nodes: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            color_edges: true,
            color_nodes: true,
        }
    }
}

impl BuildOptions {
    /// No derived attributes.
    pub fn plain() -> Self {
        Self {
            color_edges: false,
            color_nodes: false,
        }
    }
}

/// Derived columns currently carried by the reduced view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivedColumns {
    pub node_color: bool,
    pub node_degree: bool,
    pub edge_color: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EventGraph {
    base_nodes: BTreeMap<LocationId, Node>,
    base_edges: Vec<Edge>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    window: Option<ResolvedWindow>,
    derived: DerivedColumns,
}

impl EventGraph {
    /// Builds a graph from node and edge records and slices it to the full
    /// date range without derived attributes.
    ///
    /// If either input is empty the result is the empty graph. Derived
    /// fields on the inputs are discarded. Fails when a location id repeats,
    /// an edge touches a location missing from `nodes`, or an edge arrives
    /// before it departs.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, EventGraphError> {
        if nodes.is_empty() || edges.is_empty() {
            return Ok(Self::empty());
        }
        let (base_nodes, base_edges) = validate(
            nodes.iter().map(Node::without_derived).collect(),
            edges.iter().map(Edge::without_derived).collect(),
        )?;

        let mut graph = Self {
            base_nodes,
            base_edges,
            ..Self::default()
        };
        graph.build(&DateWindow::full(), BuildOptions::plain());
        Ok(graph)
    }

    pub fn from_data(data: GraphData) -> Result<Self, EventGraphError> {
        Self::new(data.nodes, data.edges)
    }

    /// Builds a graph from untyped record tables. The edge table needs at
    /// least `fromNode`, `fromDate`, `toNode` and `toDate`; the node table
    /// needs the base node columns. Extra columns are ignored.
    pub fn from_records(nodes: &RecordTable, edges: &RecordTable) -> Result<Self, EventGraphError> {
        edges.check_columns(TableKind::Edges, &columns::EDGE_ESSENTIAL, &[], false)?;
        nodes.check_columns(TableKind::Nodes, &columns::NODE_BASE, &[], false)?;
        Self::new(nodes.to_nodes()?, edges.to_edges()?)
    }

    /// Rebuilds a graph whose reduced view is exactly the given records, as
    /// read back from an export. The base set is the same records with the
    /// derived fields stripped.
    pub(crate) fn from_view(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        derived: DerivedColumns,
    ) -> Result<Self, EventGraphError> {
        if nodes.is_empty() || edges.is_empty() {
            return Ok(Self::empty());
        }
        let (base_nodes, base_edges) = validate(
            nodes.iter().map(Node::without_derived).collect(),
            edges.iter().map(Edge::without_derived).collect(),
        )?;

        let endpoints = endpoint_ids(&edges);
        let (view_nodes, orphans): (Vec<Node>, Vec<Node>) =
            nodes.into_iter().partition(|n| endpoints.contains(&n.id));
        if !orphans.is_empty() {
            warn!(
                count = orphans.len(),
                "Dropping locations no edge touches from the imported view"
            );
        }

        let mut graph = Self {
            base_nodes,
            base_edges,
            nodes: view_nodes,
            edges,
            window: None,
            derived,
        };
        graph.window = match (graph.min_date(), graph.max_date()) {
            (Some(min), Some(max)) => Some(ResolvedWindow { start: min, end: max }),
            _ => None,
        };
        Ok(graph)
    }

    /// The canonical empty graph.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recomputes the reduced view for `window`.
    ///
    /// Open window bounds resolve to the earliest departure and the latest
    /// arrival in the base set. The view keeps edges with
    /// `fromDate >= start && toDate <= end` in departure order, and the nodes
    /// they touch in id order. If no edge qualifies the view is empty and no
    /// attribute is computed.
    pub fn build(&mut self, window: &DateWindow, options: BuildOptions) -> &mut Self {
        let (Some(min_date), Some(max_date)) = (self.min_date(), self.max_date()) else {
            self.clear_view(None);
            return self;
        };
        let resolved = window.resolve(min_date, max_date);

        let mut edges: Vec<Edge> = self
            .base_edges
            .iter()
            .filter(|e| resolved.contains(e.from_date, e.to_date))
            .cloned()
            .collect();
        edges.sort_by_key(|e| e.from_date);

        if edges.is_empty() {
            debug!(start = %resolved.start, end = %resolved.end, "No edges in window");
            self.clear_view(Some(resolved));
            return self;
        }

        let mut nodes: Vec<Node> = endpoint_ids(&edges)
            .iter()
            .filter_map(|id| self.base_nodes.get(id).cloned())
            .collect();

        if options.color_edges {
            for edge in &mut edges {
                edge.color = Some(viridis_hex(resolved.scale(edge.to_date)));
            }
        }

        if options.color_nodes {
            let mut latest_arrival: HashMap<LocationId, NaiveDate> = HashMap::new();
            let mut degree: HashMap<LocationId, u32> = HashMap::new();
            for edge in &edges {
                latest_arrival
                    .entry(edge.to_node)
                    .and_modify(|d| *d = (*d).max(edge.to_date))
                    .or_insert(edge.to_date);
                *degree.entry(edge.from_node).or_insert(0) += 1;
                *degree.entry(edge.to_node).or_insert(0) += 1;
            }
            for node in &mut nodes {
                node.color = Some(
                    latest_arrival
                        .get(&node.id)
                        .map(|d| resolved.scale(*d))
                        .unwrap_or(NO_COLOR),
                );
                node.degree = Some(degree.get(&node.id).copied().unwrap_or(0));
            }
        }

        debug!(
            start = %resolved.start,
            end = %resolved.end,
            edges = edges.len(),
            nodes = nodes.len(),
            "Built reduced view"
        );

        self.nodes = nodes;
        self.edges = edges;
        self.window = Some(resolved);
        self.derived = DerivedColumns {
            node_color: options.color_nodes,
            node_degree: options.color_nodes,
            edge_color: options.color_edges,
        };
        self
    }

    fn clear_view(&mut self, window: Option<ResolvedWindow>) {
        self.nodes.clear();
        self.edges.clear();
        self.window = window;
        self.derived = DerivedColumns::default();
    }

    /// Locations in the reduced view, ordered by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in the reduced view, ordered by departure date.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: LocationId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// All locations the graph was constructed with.
    pub fn base_nodes(&self) -> impl Iterator<Item = &Node> {
        self.base_nodes.values()
    }

    /// All edges the graph was constructed with, ordered by departure date.
    pub fn base_edges(&self) -> &[Edge] {
        &self.base_edges
    }

    /// Earliest departure over the base edges.
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.base_edges.iter().map(|e| e.from_date).min()
    }

    /// Latest arrival over the base edges.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.base_edges.iter().map(|e| e.to_date).max()
    }

    /// The window the current view was built for, if any.
    pub fn window(&self) -> Option<ResolvedWindow> {
        self.window
    }

    pub fn derived_columns(&self) -> DerivedColumns {
        self.derived
    }

    /// True when the reduced view has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// The location reached by the most recent edge in the view. When two
    /// edges arrive on the same date the later one in the view wins.
    pub fn last_visited(&self) -> Option<&Node> {
        let last = self.edges.iter().max_by_key(|e| e.to_date)?;
        self.node(last.to_node)
    }

    /// Compares the reduced views including the derived columns.
    pub fn eq_with_derived(&self, other: &EventGraph) -> bool {
        self.derived == other.derived
            && self.nodes == other.nodes
            && self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(&other.edges)
                .all(|(a, b)| a.core_eq(b) && a.color == b.color)
    }

    /// Reduced view as record tables, carrying whichever derived columns the
    /// view has.
    pub fn to_records(&self) -> (RecordTable, RecordTable) {
        (
            RecordTable::from_nodes(&self.nodes, self.derived.node_color, self.derived.node_degree),
            RecordTable::from_edges(&self.edges, self.derived.edge_color),
        )
    }

    /// Reduced view as plain node and edge records.
    pub fn to_data(&self) -> GraphData {
        GraphData::new(self.nodes.clone(), self.edges.clone())
    }
}

/// Equality over the reduced views: node and edge tables must match row by
/// row on their base columns. Derived columns and edge sequence numbers do
/// not take part; see `eq_with_derived`.
impl PartialEq for EventGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.edges.len() == other.edges.len()
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| a.core_eq(b))
            && self.edges.iter().zip(&other.edges).all(|(a, b)| a.core_eq(b))
    }
}

fn endpoint_ids(edges: &[Edge]) -> BTreeSet<LocationId> {
    edges
        .iter()
        .flat_map(|e| [e.from_node, e.to_node])
        .collect()
}

fn validate(
    nodes: Vec<Node>,
    mut edges: Vec<Edge>,
) -> Result<(BTreeMap<LocationId, Node>, Vec<Edge>), EventGraphError> {
    let mut by_id = BTreeMap::new();
    for node in nodes {
        let id = node.id;
        if by_id.insert(id, node).is_some() {
            return Err(EventGraphError::DuplicateLocation(id));
        }
    }

    for edge in &edges {
        for location in [edge.from_node, edge.to_node] {
            if !by_id.contains_key(&location) {
                return Err(EventGraphError::UnknownLocation {
                    edge: edge.id,
                    location,
                });
            }
        }
        if edge.from_date > edge.to_date {
            return Err(EventGraphError::InvertedEdge {
                edge: edge.id,
                from_date: edge.from_date.to_string(),
                to_date: edge.to_date.to_string(),
            });
        }
    }

    edges.sort_by_key(|e| e.from_date);
    Ok((by_id, edges))
}
