use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::data::{Actor, ActorId, EventGraphError, GraphData};
use crate::io::bundle::{read_actor_csv, BundlePaths};
use crate::io::csv_io::{read_edges, read_nodes};
use crate::traits::{ActorRef, ActorResolver, GraphLoader};

const ACTOR_FILE_SUFFIX: &str = "_actor.csv";

/// Reads actor bundles (`<id>_nodes.csv`, `<id>_edges.csv`, `<id>_actor.csv`)
/// from a directory.
#[derive(Debug, Clone)]
pub struct CsvDirectoryLoader {
    dir: PathBuf,
}

impl CsvDirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn actor_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.ends_with(ACTOR_FILE_SUFFIX))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn find_actor(&self, reference: &ActorRef) -> Result<Option<Actor>, EventGraphError> {
        if let ActorRef::Id(id) = reference {
            let path = BundlePaths::in_dir(&self.dir, *id).actor;
            if !path.exists() {
                return Ok(None);
            }
            return read_actor_csv(&path).map(Some);
        }

        for path in self.actor_files()? {
            let actor = read_actor_csv(&path)?;
            let hit = match reference {
                ActorRef::ExternalId(external) => actor.external_id.as_deref() == Some(external.as_str()),
                ActorRef::Label(name) => actor.name == *name,
                ActorRef::Id(_) => false,
            };
            if hit {
                return Ok(Some(actor));
            }
        }
        Ok(None)
    }
}

impl GraphLoader for CsvDirectoryLoader {
    fn load_graph(&self, actor: ActorId) -> anyhow::Result<GraphData> {
        let paths = BundlePaths::in_dir(&self.dir, actor);
        if !paths.nodes.exists() || !paths.edges.exists() {
            debug!(actor = %actor, dir = %self.dir.display(), "No CSV files for actor");
            return Ok(GraphData::empty());
        }

        let nodes_file = fs::File::open(&paths.nodes)
            .with_context(|| format!("opening {}", paths.nodes.display()))?;
        let edges_file = fs::File::open(&paths.edges)
            .with_context(|| format!("opening {}", paths.edges.display()))?;
        let (nodes, _) = read_nodes(nodes_file).with_context(|| format!("reading {}", paths.nodes.display()))?;
        let (edges, _) = read_edges(edges_file).with_context(|| format!("reading {}", paths.edges.display()))?;
        Ok(GraphData::new(nodes, edges))
    }
}

impl ActorResolver for CsvDirectoryLoader {
    /// Unreadable actor files resolve to nothing.
    fn resolve(&self, reference: &ActorRef) -> Actor {
        match self.find_actor(reference) {
            Ok(Some(actor)) => actor,
            Ok(None) => Actor::unresolved(),
            Err(err) => {
                debug!(reference = %reference, error = %err, "Actor lookup failed");
                Actor::unresolved()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Edge, EdgeId, LocationId, Node};
    use crate::graph::EventGraph;
    use crate::io::bundle::export_actor;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn graph() -> EventGraph {
        EventGraph::new(
            vec![
                Node::new(LocationId(10), "Paris", "Q90", 48.8566, 2.3522),
                Node::new(LocationId(20), "Vienna", "Q1741", 48.2082, 16.3738),
            ],
            vec![Edge::new(
                EdgeId::new(ActorId(517), 0),
                LocationId(10),
                date(1900, 1, 1),
                LocationId(20),
                date(1900, 3, 15),
            )],
        )
        .unwrap()
    }

    fn populated() -> (tempfile::TempDir, CsvDirectoryLoader) {
        let dir = tempfile::tempdir().unwrap();
        let actor = Actor::new(ActorId(517), Some("Q517".to_string()), "Ada Lovelace");
        export_actor(dir.path(), &actor, &graph()).unwrap();
        let loader = CsvDirectoryLoader::new(dir.path());
        (dir, loader)
    }

    #[test]
    fn test_loads_exported_bundle() {
        let (_dir, loader) = populated();
        let data = loader.load_graph(ActorId(517)).unwrap();
        assert_eq!(EventGraph::from_data(data).unwrap(), graph());
    }

    #[test]
    fn test_missing_files_mean_no_data() {
        let (_dir, loader) = populated();
        assert!(loader.load_graph(ActorId(12)).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_files_are_errors() {
        let (dir, loader) = populated();
        fs::write(dir.path().join("517_edges.csv"), "bogus,header\n1,2\n").unwrap();
        assert!(loader.load_graph(ActorId(517)).is_err());
    }

    #[test]
    fn test_resolves_from_actor_files() {
        let (_dir, loader) = populated();
        assert_eq!(loader.resolve(&ActorRef::parse("517")).name, "Ada Lovelace");
        assert_eq!(loader.resolve(&ActorRef::parse("Q517")).id, ActorId(517));
        assert_eq!(loader.resolve(&ActorRef::parse("Ada Lovelace")).id, ActorId(517));
        assert!(!loader.resolve(&ActorRef::parse("12")).is_resolved());
        assert!(!loader.resolve(&ActorRef::parse("Grace Hopper")).is_resolved());
    }
}
