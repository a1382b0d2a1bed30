//! Per-actor export bundle: `<id>_nodes.csv`, `<id>_edges.csv` and
//! `<id>_actor.csv` side by side in one directory.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::table::columns;
use crate::data::{Actor, ActorId, EventGraphError, TableKind};
use crate::graph::EventGraph;

const NAME_KEY: &str = "name";

/// File locations of one actor's bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub actor: PathBuf,
}

impl BundlePaths {
    pub fn in_dir(dir: &Path, actor: ActorId) -> Self {
        Self {
            nodes: dir.join(format!("{actor}_nodes.csv")),
            edges: dir.join(format!("{actor}_edges.csv")),
            actor: dir.join(format!("{actor}_actor.csv")),
        }
    }
}

/// Writes `graph`'s reduced view and `actor`'s record into `dir`.
pub fn export_actor(dir: &Path, actor: &Actor, graph: &EventGraph) -> Result<BundlePaths, EventGraphError> {
    std::fs::create_dir_all(dir)?;
    let paths = BundlePaths::in_dir(dir, actor.id);
    graph.to_csv(&paths.nodes, &paths.edges)?;
    write_actor_csv(&paths.actor, actor)?;
    info!(actor = %actor.id, dir = %dir.display(), "Exported actor bundle");
    Ok(paths)
}

/// Writes the `key,value` actor file.
pub fn write_actor_csv(path: &Path, actor: &Actor) -> Result<(), EventGraphError> {
    let id = actor.id.to_string();
    let mut csv = csv::Writer::from_writer(File::create(path)?);
    csv.write_record([columns::ACTOR_ID, id.as_str()])?;
    csv.write_record([NAME_KEY, actor.name.as_str()])?;
    csv.write_record([columns::EXTERNAL_ID, actor.external_id.as_deref().unwrap_or("")])?;
    csv.flush()?;
    Ok(())
}

pub fn read_actor_csv(path: &Path) -> Result<Actor, EventGraphError> {
    read_actor(File::open(path)?)
}

/// Parses the `key,value` actor file. Unknown keys are ignored.
pub fn read_actor<R: Read>(reader: R) -> Result<Actor, EventGraphError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut actor = Actor::unresolved();
    let mut has_id = false;
    for record in csv.records() {
        let record = record?;
        let value = record.get(1).unwrap_or("");
        match record.get(0).unwrap_or("") {
            columns::ACTOR_ID => {
                actor.id = value.parse().map_err(|_| EventGraphError::InvalidValue {
                    column: columns::ACTOR_ID.to_string(),
                    value: value.to_string(),
                })?;
                has_id = true;
            }
            NAME_KEY => actor.name = value.to_string(),
            columns::EXTERNAL_ID if !value.is_empty() => actor.external_id = Some(value.to_string()),
            _ => {}
        }
    }

    if !has_id {
        return Err(EventGraphError::MissingColumn {
            table: TableKind::Actor,
            column: columns::ACTOR_ID.to_string(),
        });
    }
    Ok(actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Edge, EdgeId, LocationId, Node};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let actor = Actor::new(ActorId(517), Some("Q517".to_string()), "Napoleon Bonaparte");
        let day = |m| NaiveDate::from_ymd_opt(1815, m, 1).unwrap();
        let graph = EventGraph::new(
            vec![
                Node::new(LocationId(1), "Elba", "Q13", 42.78, 10.27),
                Node::new(LocationId(2), "Paris", "Q90", 48.8566, 2.3522),
            ],
            vec![Edge::new(EdgeId::new(actor.id, 0), LocationId(1), day(2), LocationId(2), day(3))],
        )
        .unwrap();

        let paths = export_actor(dir.path(), &actor, &graph).unwrap();
        assert_eq!(paths.nodes, dir.path().join("517_nodes.csv"));
        assert!(paths.edges.exists());

        let raw = std::fs::read_to_string(&paths.actor).unwrap();
        assert_eq!(raw, "actorID,517\nname,Napoleon Bonaparte\nexternalID,Q517\n");
        assert_eq!(read_actor_csv(&paths.actor).unwrap(), actor);
        assert_eq!(EventGraph::from_csv(&paths.nodes, &paths.edges).unwrap(), graph);
    }

    #[test]
    fn test_read_actor_quoted_name_and_missing_external_id() {
        let actor = read_actor("actorID,3\nname,\"Smith, John\"\nexternalID,\n".as_bytes()).unwrap();
        assert_eq!(actor.name, "Smith, John");
        assert_eq!(actor.external_id, None);
    }

    #[test]
    fn test_read_actor_requires_id() {
        let err = read_actor("name,Nobody\n".as_bytes()).unwrap_err();
        assert!(matches!(err, EventGraphError::MissingColumn { table: TableKind::Actor, .. }));
    }
}
