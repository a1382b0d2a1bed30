//! File formats: CSV graph import/export, actor bundles and saved sessions.

pub mod bundle;
pub mod csv_io;
pub mod session;

pub use bundle::{export_actor, read_actor_csv, BundlePaths};
pub use csv_io::{read_edges, read_nodes, read_table, write_table};
pub use session::{Session, SessionActor, Visibility};
