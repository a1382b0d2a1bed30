use chrono::Days;
use eventflow_core::data::{ActorId, Edge, EdgeId, GraphData, LocationId, Node};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::date;

/// Largest gap between a departure and the following arrival.
pub const MAX_STEP_DAYS: u64 = 200;

/// A random itinerary for actor 1 over `n_nodes` locations.
///
/// The walk starts on 1800-01-01 at a random location; each edge departs
/// where and when the previous one arrived and takes 0 to `MAX_STEP_DAYS`
/// days. The same seed always yields the same data.
pub fn random_graph_data(seed: u64, n_nodes: usize, n_edges: usize) -> GraphData {
    if n_nodes == 0 || n_edges == 0 {
        return GraphData::empty();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let actor = ActorId(1);

    let nodes: Vec<Node> = (0..n_nodes)
        .map(|i| {
            Node::new(
                LocationId(i as i64),
                format!("Place {i}"),
                format!("Q{}", 1000 + i),
                rng.gen_range(-60.0..70.0),
                rng.gen_range(-180.0..180.0),
            )
        })
        .collect();

    let mut at = LocationId(rng.gen_range(0..n_nodes) as i64);
    let mut when = date(1800, 1, 1);
    let edges = (0..n_edges)
        .map(|seq| {
            let next = LocationId(rng.gen_range(0..n_nodes) as i64);
            let arrival = when + Days::new(rng.gen_range(0..=MAX_STEP_DAYS));
            let edge = Edge::new(EdgeId::new(actor, seq as u32), at, when, next, arrival);
            at = next;
            when = arrival;
            edge
        })
        .collect();

    GraphData::new(nodes, edges)
}
