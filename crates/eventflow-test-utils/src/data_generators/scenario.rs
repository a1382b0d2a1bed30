use chrono::NaiveDate;
use eventflow_core::data::{Actor, ActorId, LocationId, Node, Triple};
use eventflow_core::graph::{edges_from_triples, EventGraph};
use eventflow_core::storage::MemoryTripleStore;

/// Shorthand for a calendar date. Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day}"))
}

/// Paris (10), Vienna (20) and Rome (30).
pub fn scenario_locations() -> Vec<Node> {
    vec![
        Node::new(LocationId(10), "Paris", "Q90", 48.8566, 2.3522),
        Node::new(LocationId(20), "Vienna", "Q1741", 48.2082, 16.3738),
        Node::new(LocationId(30), "Rome", "Q220", 41.9028, 12.4964),
    ]
}

/// Actor 1 in Paris on 1900-01-01, Vienna on 1900-03-15 and Paris again on
/// 1900-06-01, listed out of chronological order.
pub fn scenario_triples() -> Vec<Triple> {
    vec![
        Triple::new(ActorId(1), LocationId(20), date(1900, 3, 15)),
        Triple::new(ActorId(1), LocationId(10), date(1900, 6, 1)),
        Triple::new(ActorId(1), LocationId(10), date(1900, 1, 1)),
    ]
}

/// The unbuilt graph of `scenario_triples`.
pub fn scenario_graph() -> EventGraph {
    let edges = edges_from_triples(ActorId(1), &scenario_triples());
    EventGraph::new(scenario_locations(), edges)
        .unwrap_or_else(|err| panic!("scenario graph is valid: {err}"))
}

/// Ada (1, Q100) follows `scenario_triples`. Ben (2, Q200) makes the same
/// Paris to Vienna trip on the same dates and then goes on to Rome. Cy (3)
/// has no observations.
pub fn scenario_store() -> MemoryTripleStore {
    let mut store = MemoryTripleStore::new();
    store
        .add_actor(Actor::new(ActorId(1), Some("Q100".to_string()), "Ada"))
        .add_actor(Actor::new(ActorId(2), Some("Q200".to_string()), "Ben"))
        .add_actor(Actor::new(ActorId(3), None, "Cy"))
        .extend_triples(scenario_triples())
        .extend_triples([
            Triple::new(ActorId(2), LocationId(10), date(1900, 1, 1)),
            Triple::new(ActorId(2), LocationId(20), date(1900, 3, 15)),
            Triple::new(ActorId(2), LocationId(30), date(1900, 4, 2)),
        ]);
    for node in scenario_locations() {
        store.add_location(node);
    }
    store
}
