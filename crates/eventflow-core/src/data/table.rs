//! Column-oriented record tables: the untyped interchange form of node and
//! edge data, with conversions to and from the typed records.

use std::collections::HashSet;
use std::str::FromStr;

use crate::data::entities::{Edge, Node};
use crate::data::errors::{EventGraphError, TableKind};
use crate::data::identifiers::{ActorId, EdgeId, LocationId};
use crate::data::window::{format_iso_date, parse_iso_date};

/// Column names of the node and edge tables.
pub mod columns {
    pub const LOCATION_ID: &str = "locationID";
    pub const LABEL: &str = "label";
    pub const EXTERNAL_ID: &str = "externalID";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
    pub const COLOR: &str = "color";
    pub const DEGREE: &str = "degree";

    pub const ACTOR_ID: &str = "actorID";
    pub const FROM_NODE: &str = "fromNode";
    pub const FROM_DATE: &str = "fromDate";
    pub const TO_NODE: &str = "toNode";
    pub const TO_DATE: &str = "toDate";

    pub const NODE_BASE: [&str; 5] = [LOCATION_ID, LABEL, EXTERNAL_ID, LAT, LON];
    pub const NODE_DERIVED: [&str; 2] = [COLOR, DEGREE];
    pub const EDGE_BASE: [&str; 5] = [ACTOR_ID, FROM_NODE, FROM_DATE, TO_NODE, TO_DATE];
    pub const EDGE_ESSENTIAL: [&str; 4] = [FROM_NODE, FROM_DATE, TO_NODE, TO_DATE];
    pub const EDGE_DERIVED: [&str; 1] = [COLOR];
}

/// A rectangular table of string cells with named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Rows must have exactly one cell per column.
    pub fn push_row<I, S>(&mut self, row: I) -> Result<(), EventGraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(EventGraphError::InvalidInput(format!(
                "row {} has {} fields, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_row<I, S>(mut self, row: I) -> Result<Self, EventGraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rename_column(&mut self, index: usize, name: impl Into<String>) {
        if let Some(column) = self.columns.get_mut(index) {
            *column = name.into();
        }
    }

    /// Checks that every `required` column is present and no column appears
    /// twice. With `exact`, columns outside `required` and `optional` are
    /// rejected as well.
    pub fn check_columns(
        &self,
        table: TableKind,
        required: &[&str],
        optional: &[&str],
        exact: bool,
    ) -> Result<(), EventGraphError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(EventGraphError::DuplicateColumn {
                    table,
                    column: column.clone(),
                });
            }
        }
        if let Some(missing) = required.iter().find(|c| !seen.contains(**c)) {
            return Err(EventGraphError::MissingColumn {
                table,
                column: (*missing).to_string(),
            });
        }
        if exact {
            let unexpected = self
                .columns
                .iter()
                .find(|c| !required.contains(&c.as_str()) && !optional.contains(&c.as_str()));
            if let Some(column) = unexpected {
                return Err(EventGraphError::UnexpectedColumn {
                    table,
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    /// Converts to node records. Requires the base node columns; `color`
    /// and `degree` are read when present, empty cells meaning "unset".
    pub fn to_nodes(&self) -> Result<Vec<Node>, EventGraphError> {
        use columns::*;

        self.check_columns(TableKind::Nodes, &NODE_BASE, &NODE_DERIVED, false)?;
        let idx = |name: &str| self.column_index(name).unwrap_or(usize::MAX);
        let (id, label, external, lat, lon) =
            (idx(LOCATION_ID), idx(LABEL), idx(EXTERNAL_ID), idx(LAT), idx(LON));
        let color = self.column_index(COLOR);
        let degree = self.column_index(DEGREE);

        self.rows
            .iter()
            .map(|row| -> Result<Node, EventGraphError> {
                Ok(Node {
                    id: parse_cell::<LocationId>(row, id, LOCATION_ID)?,
                    label: cell(row, label).to_string(),
                    external_id: cell(row, external).to_string(),
                    lat: parse_cell::<f64>(row, lat, LAT)?,
                    lon: parse_cell::<f64>(row, lon, LON)?,
                    color: color
                        .map(|c| parse_optional_cell::<f64>(row, c, COLOR))
                        .transpose()?
                        .flatten(),
                    degree: degree
                        .map(|c| parse_optional_cell::<u32>(row, c, DEGREE))
                        .transpose()?
                        .flatten(),
                })
            })
            .collect()
    }

    /// Converts to edge records. Requires the four essential edge columns; a
    /// missing `actorID` column leaves edges attributed to the unresolved
    /// actor. Edge sequence numbers follow row order.
    pub fn to_edges(&self) -> Result<Vec<Edge>, EventGraphError> {
        use columns::*;

        self.check_columns(TableKind::Edges, &EDGE_ESSENTIAL, &[], false)?;
        let idx = |name: &str| self.column_index(name).unwrap_or(usize::MAX);
        let (from_node, from_date, to_node, to_date) =
            (idx(FROM_NODE), idx(FROM_DATE), idx(TO_NODE), idx(TO_DATE));
        let actor_column = self.column_index(ACTOR_ID);
        let color = self.column_index(COLOR);

        self.rows
            .iter()
            .enumerate()
            .map(|(seq, row)| -> Result<Edge, EventGraphError> {
                let actor = match actor_column {
                    Some(c) => parse_cell::<ActorId>(row, c, ACTOR_ID)?,
                    None => ActorId::UNRESOLVED,
                };
                let seq = u32::try_from(seq).map_err(|_| {
                    EventGraphError::InvalidInput(format!("too many edge rows ({seq})"))
                })?;
                Ok(Edge {
                    id: EdgeId::new(actor, seq),
                    from_node: parse_cell::<LocationId>(row, from_node, FROM_NODE)?,
                    from_date: parse_iso_date(cell(row, from_date))?,
                    to_node: parse_cell::<LocationId>(row, to_node, TO_NODE)?,
                    to_date: parse_iso_date(cell(row, to_date))?,
                    color: color
                        .map(|c| cell(row, c))
                        .filter(|v| !v.is_empty())
                        .map(str::to_string),
                })
            })
            .collect()
    }

    /// Node table with the base columns, plus `color`/`degree` when asked.
    pub fn from_nodes(nodes: &[Node], with_color: bool, with_degree: bool) -> Self {
        use columns::*;

        let mut header: Vec<&str> = NODE_BASE.to_vec();
        if with_color {
            header.push(COLOR);
        }
        if with_degree {
            header.push(DEGREE);
        }
        let mut table = RecordTable::new(header);
        for node in nodes {
            let mut row = vec![
                node.id.to_string(),
                node.label.clone(),
                node.external_id.clone(),
                node.lat.to_string(),
                node.lon.to_string(),
            ];
            if with_color {
                row.push(node.color.map(|c| c.to_string()).unwrap_or_default());
            }
            if with_degree {
                row.push(node.degree.map(|d| d.to_string()).unwrap_or_default());
            }
            table.rows.push(row);
        }
        table
    }

    /// Edge table with the base columns, plus `color` when asked.
    pub fn from_edges(edges: &[Edge], with_color: bool) -> Self {
        use columns::*;

        let mut header: Vec<&str> = EDGE_BASE.to_vec();
        if with_color {
            header.push(COLOR);
        }
        let mut table = RecordTable::new(header);
        for edge in edges {
            let mut row = vec![
                edge.actor_id().to_string(),
                edge.from_node.to_string(),
                format_iso_date(edge.from_date),
                edge.to_node.to_string(),
                format_iso_date(edge.to_date),
            ];
            if with_color {
                row.push(edge.color.clone().unwrap_or_default());
            }
            table.rows.push(row);
        }
        table
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn parse_cell<T: FromStr>(row: &[String], index: usize, column: &str) -> Result<T, EventGraphError> {
    let raw = cell(row, index);
    raw.trim().parse().map_err(|_| EventGraphError::InvalidValue {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn parse_optional_cell<T: FromStr>(
    row: &[String],
    index: usize,
    column: &str,
) -> Result<Option<T>, EventGraphError> {
    if cell(row, index).trim().is_empty() {
        return Ok(None);
    }
    parse_cell(row, index, column).map(Some)
}
