//! CSV import and export of an event graph's reduced view.
//!
//! Two files per graph. The nodes file carries `locationID`, `label`,
//! `externalID`, `lat`, `lon` and whichever of `color`/`degree` the view
//! has; the edges file carries `actorID`, `fromNode`, `fromDate`, `toNode`,
//! `toDate` and optionally `color`. Import insists on exactly that column
//! set, so an export read back and written again is byte-identical.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::data::table::columns;
use crate::data::{Edge, EventGraphError, Node, RecordTable, TableKind};
use crate::graph::{DerivedColumns, EventGraph};

/// Writes a record table as CSV with a header row.
pub fn write_table<W: Write>(table: &RecordTable, writer: W) -> Result<(), EventGraphError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.columns())?;
    for row in table.rows() {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Reads a headed CSV into a record table.
pub fn read_table<R: Read>(reader: R) -> Result<RecordTable, EventGraphError> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut table = RecordTable::new(csv.headers()?.iter());
    for record in csv.records() {
        table.push_row(record?.iter())?;
    }
    Ok(table)
}

/// Reads a nodes file. A blank first header is taken to be an unnamed
/// `locationID` index column.
pub fn read_nodes<R: Read>(reader: R) -> Result<(Vec<Node>, DerivedColumns), EventGraphError> {
    let mut table = read_table(reader)?;
    if table.columns().first().is_some_and(|c| c.trim().is_empty()) {
        warn!("Nodes file has an unnamed index column, treating it as {}", columns::LOCATION_ID);
        table.rename_column(0, columns::LOCATION_ID);
    }
    table.check_columns(TableKind::Nodes, &columns::NODE_BASE, &columns::NODE_DERIVED, true)?;

    let derived = DerivedColumns {
        node_color: table.column_index(columns::COLOR).is_some(),
        node_degree: table.column_index(columns::DEGREE).is_some(),
        edge_color: false,
    };
    Ok((table.to_nodes()?, derived))
}

/// Reads an edges file.
pub fn read_edges<R: Read>(reader: R) -> Result<(Vec<Edge>, DerivedColumns), EventGraphError> {
    let table = read_table(reader)?;
    table.check_columns(TableKind::Edges, &columns::EDGE_BASE, &columns::EDGE_DERIVED, true)?;

    let derived = DerivedColumns {
        edge_color: table.column_index(columns::COLOR).is_some(),
        ..DerivedColumns::default()
    };
    Ok((table.to_edges()?, derived))
}

impl EventGraph {
    /// Writes the reduced view to two CSV streams.
    pub fn write_csv<N: Write, E: Write>(&self, nodes: N, edges: E) -> Result<(), EventGraphError> {
        let (node_table, edge_table) = self.to_records();
        write_table(&node_table, nodes)?;
        write_table(&edge_table, edges)?;
        Ok(())
    }

    /// Reads a graph back from two CSV streams. The reduced view of the
    /// result is exactly what was read; no build is performed.
    pub fn read_csv<N: Read, E: Read>(nodes: N, edges: E) -> Result<Self, EventGraphError> {
        let (nodes, node_columns) = read_nodes(nodes)?;
        let (edges, edge_columns) = read_edges(edges)?;
        let derived = DerivedColumns {
            node_color: node_columns.node_color,
            node_degree: node_columns.node_degree,
            edge_color: edge_columns.edge_color,
        };
        EventGraph::from_view(nodes, edges, derived)
    }

    pub fn to_csv(&self, nodes_path: impl AsRef<Path>, edges_path: impl AsRef<Path>) -> Result<(), EventGraphError> {
        let (nodes_path, edges_path) = (nodes_path.as_ref(), edges_path.as_ref());
        self.write_csv(File::create(nodes_path)?, File::create(edges_path)?)?;
        debug!(nodes = %nodes_path.display(), edges = %edges_path.display(), "Exported graph");
        Ok(())
    }

    pub fn from_csv(nodes_path: impl AsRef<Path>, edges_path: impl AsRef<Path>) -> Result<Self, EventGraphError> {
        Self::read_csv(File::open(nodes_path)?, File::open(edges_path)?)
    }
}
