//! Behavioral properties of `EventGraph::build` over the reference scenario
//! and seeded random itineraries.

use std::collections::{BTreeSet, HashSet};

use chrono::{Days, NaiveDate};
use eventflow_core::data::{ActorId, DateWindow, EdgeId, GraphData, LocationId};
use eventflow_core::graph::{edges_from_triples, viridis_hex, BuildOptions, EventGraph, NO_COLOR};
use eventflow_test_utils::{date, random_graph_data, scenario_graph, scenario_locations, scenario_triples};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn node_ids(graph: &EventGraph) -> Vec<LocationId> {
    graph.nodes().iter().map(|n| n.id).collect()
}

fn edge_ids(graph: &EventGraph) -> HashSet<EdgeId> {
    graph.edges().iter().map(|e| e.id).collect()
}

fn random_graph(seed: u64) -> EventGraph {
    EventGraph::from_data(random_graph_data(seed, 6, 25)).unwrap()
}

/// A random date between `lo` and `hi`, both inclusive.
fn date_between(rng: &mut StdRng, lo: NaiveDate, hi: NaiveDate) -> NaiveDate {
    let span = (hi - lo).num_days().max(0) as u64;
    lo + Days::new(rng.gen_range(0..=span))
}

#[test]
fn scenario_full_window() {
    let mut graph = scenario_graph();
    graph.build(&DateWindow::full(), BuildOptions::default());

    let keys: Vec<_> = graph.edges().iter().map(|e| e.key()).collect();
    assert_eq!(
        keys,
        vec![
            (LocationId(10), date(1900, 1, 1), LocationId(20), date(1900, 3, 15)),
            (LocationId(20), date(1900, 3, 15), LocationId(10), date(1900, 6, 1)),
        ]
    );
    assert_eq!(node_ids(&graph), vec![LocationId(10), LocationId(20)]);
    assert_eq!(graph.last_visited().map(|n| n.label.as_str()), Some("Paris"));
}

#[test]
fn scenario_first_leg_only() {
    let mut graph = scenario_graph();
    graph.build(&DateWindow::between("1900-01-01", "1900-03-15").unwrap(), BuildOptions::default());

    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edges()[0].from_node, LocationId(10));
    assert_eq!(graph.edges()[0].to_node, LocationId(20));
    assert_eq!(node_ids(&graph), vec![LocationId(10), LocationId(20)]);
    assert_eq!(graph.last_visited().map(|n| n.id), Some(LocationId(20)));
}

#[test]
fn scenario_window_without_edges_is_empty() {
    let mut graph = scenario_graph();
    graph.build(&DateWindow::between("1900-04-01", "1900-05-01").unwrap(), BuildOptions::default());

    assert!(graph.is_empty());
    assert_eq!(graph.edges().len(), 0);
    assert_eq!(graph.nodes().len(), 0);
    assert_eq!(graph.last_visited(), None);
    // the selectable range still covers the whole record
    assert_eq!(graph.min_date(), Some(date(1900, 1, 1)));
    assert_eq!(graph.max_date(), Some(date(1900, 6, 1)));
}

#[test]
fn scenario_colors_and_degree() {
    let mut graph = scenario_graph();
    graph.build(&DateWindow::full(), BuildOptions::default());

    let paris = graph.node(LocationId(10)).unwrap();
    let vienna = graph.node(LocationId(20)).unwrap();
    assert_eq!(paris.color, Some(1.0));
    assert_eq!(paris.degree, Some(2));
    assert_eq!(vienna.degree, Some(2));
    let vienna_scale = vienna.color.unwrap();
    assert!(vienna_scale > 0.0 && vienna_scale < 1.0);

    assert_eq!(graph.edges()[1].color.as_deref(), Some(viridis_hex(1.0).as_str()));
}

#[test]
fn no_window_matches_explicit_full_range() {
    for seed in 0..20 {
        let mut open = random_graph(seed);
        let mut explicit = open.clone();
        let (min, max) = (open.min_date().unwrap(), open.max_date().unwrap());

        open.build(&DateWindow::full(), BuildOptions::default());
        explicit.build(&DateWindow::between(min, max).unwrap(), BuildOptions::default());

        assert!(open.eq_with_derived(&explicit), "seed {seed}");
        assert_eq!(open.edges().len(), open.base_edges().len(), "seed {seed}");
    }
}

#[test]
fn rebuilding_the_same_window_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    for seed in 0..20 {
        let mut graph = random_graph(seed);
        let (min, max) = (graph.min_date().unwrap(), graph.max_date().unwrap());
        let start = date_between(&mut rng, min, max);
        let window = DateWindow::between(start, date_between(&mut rng, start, max)).unwrap();

        graph.build(&window, BuildOptions::default());
        let first = graph.clone();
        graph.build(&window, BuildOptions::default());
        assert!(graph.eq_with_derived(&first), "seed {seed}");
    }
}

#[test]
fn nested_windows_give_nested_views() {
    let mut rng = StdRng::seed_from_u64(42);
    for seed in 0..30 {
        let graph = random_graph(seed);
        let (min, max) = (graph.min_date().unwrap(), graph.max_date().unwrap());

        let outer_start = date_between(&mut rng, min, max);
        let outer_end = date_between(&mut rng, outer_start, max);
        let inner_start = date_between(&mut rng, outer_start, outer_end);
        let inner_end = date_between(&mut rng, inner_start, outer_end);

        let mut outer = graph.clone();
        outer.build(&DateWindow::between(outer_start, outer_end).unwrap(), BuildOptions::default());
        let mut inner = graph.clone();
        inner.build(&DateWindow::between(inner_start, inner_end).unwrap(), BuildOptions::default());

        assert!(edge_ids(&inner).is_subset(&edge_ids(&outer)), "seed {seed}");
    }
}

#[test]
fn reduced_nodes_are_exactly_the_edge_endpoints() {
    let mut rng = StdRng::seed_from_u64(5);
    for seed in 0..30 {
        let mut graph = random_graph(seed);
        let (min, max) = (graph.min_date().unwrap(), graph.max_date().unwrap());
        let start = date_between(&mut rng, min, max);
        graph.build(&DateWindow::starting(start).unwrap(), BuildOptions::default());

        let endpoints: BTreeSet<LocationId> =
            graph.edges().iter().flat_map(|e| [e.from_node, e.to_node]).collect();
        assert_eq!(node_ids(&graph), endpoints.into_iter().collect::<Vec<_>>(), "seed {seed}");
    }
}

#[test]
fn colors_stay_within_bounds() {
    for seed in 0..20 {
        let mut graph = random_graph(seed);
        graph.build(&DateWindow::full(), BuildOptions::default());
        let window = graph.window().unwrap();

        for node in graph.nodes() {
            let scale = node.color.unwrap();
            assert!((0.0..=1.0).contains(&scale), "seed {seed}: {scale}");
        }
        for edge in graph.edges() {
            let scale = window.scale(edge.to_date);
            assert!((0.0..=1.0).contains(&scale));
            assert_eq!(edge.color, Some(viridis_hex(scale)));
        }
    }
}

#[test]
fn zero_width_window_uses_neutral_color() {
    let triples = [
        eventflow_core::data::Triple::new(ActorId(1), LocationId(10), date(1900, 1, 1)),
        eventflow_core::data::Triple::new(ActorId(1), LocationId(20), date(1900, 1, 1)),
    ];
    let mut graph = EventGraph::new(scenario_locations(), edges_from_triples(ActorId(1), &triples)).unwrap();
    graph.build(&DateWindow::full(), BuildOptions::default());

    assert_eq!(graph.edges().len(), 1);
    assert_eq!(graph.edges()[0].color, Some(viridis_hex(NO_COLOR)));
    assert_eq!(graph.node(LocationId(20)).unwrap().color, Some(NO_COLOR));
    assert_eq!(graph.node(LocationId(10)).unwrap().color, Some(NO_COLOR));
}

#[test]
fn empty_inputs_give_the_empty_graph() {
    let graph = EventGraph::from_data(GraphData::empty()).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph, EventGraph::empty());

    let nodes_only = EventGraph::new(scenario_locations(), Vec::new()).unwrap();
    assert!(nodes_only.is_empty());

    let edges_only = EventGraph::new(Vec::new(), edges_from_triples(ActorId(1), &scenario_triples())).unwrap();
    assert!(edges_only.is_empty());
}

#[test]
fn plain_build_leaves_derived_columns_unset() {
    let mut graph = scenario_graph();
    graph.build(&DateWindow::full(), BuildOptions::plain());
    assert!(graph.nodes().iter().all(|n| n.color.is_none() && n.degree.is_none()));
    assert!(graph.edges().iter().all(|e| e.color.is_none()));

    let mut colored = scenario_graph();
    colored.build(&DateWindow::full(), BuildOptions::default());
    assert_eq!(graph, colored);
    assert!(!graph.eq_with_derived(&colored));
}
