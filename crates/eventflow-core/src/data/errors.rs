//! Error types for the event graph engine

use std::fmt;
use thiserror::Error;

use crate::data::identifiers::{ActorId, EdgeId, LocationId};

/// Which tabular record set an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Nodes,
    Edges,
    Actor,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Nodes => write!(f, "nodes"),
            TableKind::Edges => write!(f, "edges"),
            TableKind::Actor => write!(f, "actor"),
        }
    }
}

/// Schema and data errors raised while constructing, importing or exporting
/// an `EventGraph`.
#[derive(Error, Debug)]
pub enum EventGraphError {
    #[error("Missing required column '{column}' in {table} table")]
    MissingColumn { table: TableKind, column: String },

    #[error("Unexpected column '{column}' in {table} table")]
    UnexpectedColumn { table: TableKind, column: String },

    #[error("Duplicate column '{column}' in {table} table")]
    DuplicateColumn { table: TableKind, column: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date '{0}': expected yyyy-mm-dd")]
    InvalidDate(String),

    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidValue { column: String, value: String },

    #[error("Duplicate location {0} in nodes table")]
    DuplicateLocation(LocationId),

    #[error("Edge {edge} references unknown location {location}")]
    UnknownLocation { edge: EdgeId, location: LocationId },

    #[error("Edge {edge} departs on {from_date} after arriving on {to_date}")]
    InvertedEdge {
        edge: EdgeId,
        from_date: String,
        to_date: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by `GraphCollection`.
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Failed to load graph for actor {actor}: {source}")]
    Load {
        actor: ActorId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid graph data for actor {actor}: {source}")]
    Graph {
        actor: ActorId,
        #[source]
        source: EventGraphError,
    },

    #[error("Cannot add unresolved actor '{0}'")]
    UnresolvedActor(String),
}

/// Errors reading or writing a saved-session file.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Malformed session file at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Unknown visibility state '{0}'")]
    UnknownVisibility(String),

    #[error("Invalid session date: {0}")]
    Date(#[from] EventGraphError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
