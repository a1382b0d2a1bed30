//! Eventflow slice tool
//!
//! Loads actor graphs from a CSV data directory, restricts them to a date
//! window and prints one summary line (or JSON object) per actor.
//!
//! Usage:
//!   eventflow-slice --start 1900-01-01 --end 1900-12-31 517 Q1741 "Ada Lovelace"
//!   eventflow-slice --session saved.csv --export out/

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};

use eventflow_core::data::parse_iso_date;
use eventflow_core::io::{export_actor, Session};
use eventflow_core::storage::CsvDirectoryLoader;
use eventflow_core::traits::ActorRef;
use eventflow_core::{init_tracing, BuildOptions, EventflowConfig, GraphCollection, SpatialIndex};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding `<actorID>_nodes.csv` and `<actorID>_edges.csv`
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Saved session to take the window and actors from
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// First day of the window (yyyy-mm-dd)
    #[arg(long)]
    start: Option<String>,

    /// Last day of the window (yyyy-mm-dd)
    #[arg(long)]
    end: Option<String>,

    /// Write each actor's reduced view into this directory
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Print one JSON object per actor instead of tab-separated lines
    #[arg(long)]
    json: bool,

    /// Actor ids, `Q` external ids or names
    actors: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = EventflowConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    init_tracing(&config.logging)?;

    let session = cli
        .session
        .as_deref()
        .map(|path| Session::load(path).with_context(|| format!("Failed to read session {}", path.display())))
        .transpose()?;

    let mut window = config.window.date_window();
    if let Some(session) = &session {
        window = session.window();
    }
    if let Some(start) = &cli.start {
        window.start = Some(parse_iso_date(start)?);
    }
    if let Some(end) = &cli.end {
        window.end = Some(parse_iso_date(end)?);
    }

    let mut refs: Vec<ActorRef> = cli.actors.iter().map(|raw| ActorRef::parse(raw)).collect();
    if let Some(session) = &session {
        refs.extend(session.shown_actors().map(ActorRef::from));
    }
    if refs.is_empty() {
        warn!("No actors given");
        return Ok(());
    }

    let source = Rc::new(CsvDirectoryLoader::new(&config.data_dir));
    let mut collection = GraphCollection::with_actors(refs, Rc::clone(&source), source);
    let mut index = SpatialIndex::new(config.spatial);
    info!(actors = collection.num_actors(), window = ?window, "Slicing graphs");

    let mut graphs = collection.graphs();
    while let Some(pair) = graphs.next_pair() {
        let (actor, graph) = match pair {
            Ok(pair) => pair,
            Err(err) => {
                warn!(error = %err, "Skipping actor");
                continue;
            }
        };
        graph.build(&window, BuildOptions::default());

        let last = graph.last_visited().map(|node| node.label.clone());
        if cli.json {
            let summary = json!({
                "actorID": actor.id.0,
                "name": actor.name,
                "externalID": actor.external_id,
                "edges": graph.edges().len(),
                "nodes": graph.nodes().len(),
                "lastVisited": last,
            });
            println!("{summary}");
        } else {
            println!(
                "{}\t{}\tedges={}\tnodes={}\tlast={}",
                actor.id,
                actor.name,
                graph.edges().len(),
                graph.nodes().len(),
                last.as_deref().unwrap_or("-")
            );
        }

        index.add_graph(actor.id, graph);
        if let Some(dir) = &cli.export {
            export_actor(dir, actor, graph)?;
        }
    }

    if cli.json {
        println!("{}", json!({ "locations": index.len() }));
    } else {
        println!("locations={}", index.len());
    }
    Ok(())
}
