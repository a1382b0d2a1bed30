//! Data model: identifiers, records, date windows and errors.

pub mod entities;
pub mod errors;
pub mod identifiers;
pub mod table;
pub mod window;

pub use entities::{Actor, Edge, GraphData, Node, Triple};
pub use errors::{CollectionError, EventGraphError, SessionError, TableKind};
pub use identifiers::{ActorId, EdgeId, LocationId};
pub use table::RecordTable;
pub use window::{format_iso_date, parse_iso_date, DateWindow, IntoDate, ResolvedWindow};
