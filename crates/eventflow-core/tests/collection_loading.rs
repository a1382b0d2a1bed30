//! `GraphCollection` against the loader and resolver seams: lazy loading,
//! at-most-once fetching, skips and error reporting.

use eventflow_core::data::{Actor, ActorId, CollectionError, DateWindow};
use eventflow_core::graph::{BuildOptions, EventGraph};
use eventflow_core::traits::ActorRef;
use eventflow_core::GraphCollection;
use eventflow_test_utils::mockall::predicate::eq;
use eventflow_test_utils::{
    random_graph_data, scenario_graph, scenario_store, FakeActorResolver, FakeGraphLoader, MockActorResolver,
    MockGraphLoader,
};
use pretty_assertions::assert_eq;

fn resolver() -> FakeActorResolver {
    FakeActorResolver::default()
        .with_actor(1, Some("Q100"), "Ada")
        .with_actor(2, Some("Q200"), "Ben")
        .with_actor(3, None, "Cy")
}

fn ids(collection: &GraphCollection) -> Vec<ActorId> {
    collection.actors().map(|a| a.id).collect()
}

fn yielded(collection: &mut GraphCollection) -> Vec<ActorId> {
    let mut seen = Vec::new();
    let mut graphs = collection.graphs();
    while let Some(pair) = graphs.next_pair() {
        let (actor, _) = pair.unwrap();
        seen.push(actor.id);
    }
    seen
}

#[test_log::test]
fn mixed_references_resolve_once_each() {
    let collection = GraphCollection::with_actors(
        ["Q200", "1", "Ben", "Nobody", "Cy"],
        resolver(),
        FakeGraphLoader::new(),
    );
    assert_eq!(ids(&collection), vec![ActorId(2), ActorId(1), ActorId(3)]);
    assert_eq!(collection.num_actors(), 3);
}

#[test]
fn each_actor_is_loaded_at_most_once() {
    let mut loader = MockGraphLoader::new();
    loader
        .expect_load_graph()
        .with(eq(ActorId(1)))
        .times(1)
        .returning(|_| Ok(random_graph_data(1, 4, 10)));
    loader
        .expect_load_graph()
        .with(eq(ActorId(2)))
        .times(1)
        .returning(|_| Ok(random_graph_data(2, 4, 10)));

    let mut collection = GraphCollection::with_actors([ActorId(1), ActorId(2)], resolver(), loader);
    assert_eq!(yielded(&mut collection), vec![ActorId(1), ActorId(2)]);
    assert_eq!(yielded(&mut collection), vec![ActorId(1), ActorId(2)]);
    assert!(collection.resolve_and_cache(ActorId(1)).unwrap().is_some());
}

#[test]
fn actors_without_data_are_skipped_and_not_refetched() {
    let mut loader = MockGraphLoader::new();
    loader
        .expect_load_graph()
        .with(eq(ActorId(1)))
        .times(1)
        .returning(|_| Ok(random_graph_data(1, 4, 10)));
    loader
        .expect_load_graph()
        .with(eq(ActorId(3)))
        .times(1)
        .returning(|_| Ok(Default::default()));

    let mut collection = GraphCollection::with_actors([ActorId(3), ActorId(1)], resolver(), loader);
    assert_eq!(yielded(&mut collection), vec![ActorId(1)]);
    assert_eq!(yielded(&mut collection), vec![ActorId(1)]);
    assert!(collection.get_cache_entry(ActorId(3)).is_none());
    assert!(collection.get_actor(ActorId(3)).is_some());
    assert_eq!(collection.next_unresolved(), None);
}

#[test]
fn resolver_is_consulted_once_per_reference() {
    let mut resolver = MockActorResolver::new();
    resolver
        .expect_resolve()
        .withf(|reference| *reference == ActorRef::Label("Ada".to_string()))
        .times(1)
        .returning(|_| Actor::new(ActorId(1), None, "Ada"));
    resolver
        .expect_resolve()
        .withf(|reference| *reference == ActorRef::Id(ActorId(9)))
        .times(1)
        .returning(|_| Actor::unresolved());

    let collection = GraphCollection::with_actors(["Ada", "9"], resolver, MockGraphLoader::new());
    assert_eq!(ids(&collection), vec![ActorId(1)]);
}

#[test]
fn loader_failures_are_reported_and_the_pass_continues() {
    let loader = FakeGraphLoader::new()
        .with_graph(ActorId(1), random_graph_data(1, 4, 10))
        .with_graph(ActorId(3), random_graph_data(3, 4, 10))
        .failing_for(ActorId(2));
    let calls = loader.calls();
    let mut collection = GraphCollection::with_actors([ActorId(1), ActorId(2), ActorId(3)], resolver(), loader);

    let mut outcomes = Vec::new();
    let mut graphs = collection.graphs();
    while let Some(pair) = graphs.next_pair() {
        outcomes.push(match pair {
            Ok((actor, _)) => Ok(actor.id),
            Err(CollectionError::Load { actor, .. }) => Err(actor),
            Err(other) => panic!("unexpected error: {other}"),
        });
    }
    assert_eq!(outcomes, vec![Ok(ActorId(1)), Err(ActorId(2)), Ok(ActorId(3))]);

    // failures are not cached
    assert!(collection.resolve_and_cache(ActorId(2)).is_err());
    assert_eq!(*calls.borrow(), vec![ActorId(1), ActorId(2), ActorId(3), ActorId(2)]);
}

#[test]
fn removing_an_actor_forgets_its_graph() {
    let loader = FakeGraphLoader::new().with_graph(ActorId(1), random_graph_data(1, 4, 10));
    let calls = loader.calls();
    let mut collection = GraphCollection::with_actors([ActorId(1)], resolver(), loader);

    assert_eq!(collection.load_all().unwrap(), vec![ActorId(1)]);
    assert!(collection.remove_actor(ActorId(1)).is_some());
    assert!(collection.remove_actor(ActorId(1)).is_none());
    assert!(collection.get_cache_entry(ActorId(1)).is_none());

    collection.update_actor_list([ActorId(1)]);
    assert_eq!(collection.load_all().unwrap(), vec![ActorId(1)]);
    assert_eq!(calls.borrow().len(), 2);

    collection.clear();
    assert!(collection.is_empty());
    assert_eq!(collection.iter_cached().count(), 0);
}

#[test]
fn update_never_replaces_a_cached_graph() {
    let mut collection = GraphCollection::new(resolver(), FakeGraphLoader::new());
    let mut graph = scenario_graph();
    graph.build(&DateWindow::between("1900-01-01", "1900-03-15").unwrap(), BuildOptions::default());
    collection.add(Actor::new(ActorId(1), None, "Ada"), graph.clone()).unwrap();

    assert!(collection.update_actor_list(["Ada", "1"]).is_empty());
    assert_eq!(collection.get_cache_entry(ActorId(1)), Some(&graph));
}

#[test]
fn add_rejects_the_unresolved_actor() {
    let mut collection = GraphCollection::new(resolver(), FakeGraphLoader::new());
    let err = collection.add(Actor::unresolved(), EventGraph::empty()).unwrap_err();
    assert!(matches!(err, CollectionError::UnresolvedActor(_)));
    assert!(collection.is_empty());
}

#[test]
fn memory_store_serves_as_both_seams() {
    let store = std::rc::Rc::new(scenario_store());
    let mut collection = GraphCollection::with_actors(["Ada", "Q200", "Cy"], store.clone(), store);

    let mut summaries = Vec::new();
    collection
        .for_each_graph(|actor, graph| {
            graph.build(&DateWindow::full(), BuildOptions::default());
            summaries.push((actor.name.clone(), graph.edges().len()));
        })
        .unwrap();
    assert_eq!(summaries, vec![("Ada".to_string(), 2), ("Ben".to_string(), 2)]);

    let ada = collection.get_cache_entry(ActorId(1)).unwrap();
    let ben = collection.get_cache_entry(ActorId(2)).unwrap();
    let shared = ada.intersect(ben).unwrap();
    assert_eq!(shared.edges().len(), 1);
    assert_eq!(shared.nodes().len(), 2);
    assert_eq!(ada.cooccurrence(ben).map(|found| found.len()), Some(2));
}
