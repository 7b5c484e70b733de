//! Laws that hold for every reachable graph.
//!
//! Random edit sessions over small id pools, so that collisions, shared
//! points, hidden ways and in-use removals come up often.

use fieldgraph_tests::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    AddPoint(u8),
    AddWay(u8, Vec<u8>),
    AddObservation(u8, Option<u8>, Option<u8>),
    MovePoint(u8, f64),
    ReshapeWay(u8, Vec<u8>),
    AddHiddenWay(u8, Vec<u8>),
    HideWay(u8, Vec<u8>),
    RemovePoint(u8),
    RemoveWay(u8),
    RemoveObservation(u8),
}

fn p(n: u8) -> String {
    format!("p{n}")
}

fn w(n: u8) -> String {
    format!("w{n}")
}

fn o(n: u8) -> String {
    format!("o{n}")
}

fn action() -> impl Strategy<Value = Action> {
    let nodes = prop::collection::vec(0..6u8, 1..5);
    prop_oneof![
        3 => (0..6u8).prop_map(Action::AddPoint),
        2 => (0..4u8, nodes.clone()).prop_map(|(id, nodes)| Action::AddWay(id, nodes)),
        1 => (0..4u8, prop::option::of(0..6u8), prop::option::of(0..4u8))
            .prop_map(|(id, point, way)| Action::AddObservation(id, point, way)),
        1 => (0..6u8, -90.0..90.0f64).prop_map(|(id, lat)| Action::MovePoint(id, lat)),
        1 => (0..4u8, nodes.clone()).prop_map(|(id, nodes)| Action::ReshapeWay(id, nodes)),
        1 => (0..4u8, nodes.clone()).prop_map(|(id, nodes)| Action::AddHiddenWay(id, nodes)),
        1 => (0..4u8, nodes).prop_map(|(id, nodes)| Action::HideWay(id, nodes)),
        1 => (0..6u8).prop_map(Action::RemovePoint),
        1 => (0..4u8).prop_map(Action::RemoveWay),
        1 => (0..4u8).prop_map(Action::RemoveObservation),
    ]
}

/// The version an editor would send to replace `key` in `graph`.
fn next_version(graph: &Graph, key: &EntityRef) -> u64 {
    graph.get(key).map(|e| e.version() + 1).unwrap_or(2)
}

fn to_operation(graph: &Graph, action: &Action) -> Operation {
    let names = |ids: &[u8]| ids.iter().map(|n| p(*n)).collect::<Vec<_>>();
    match action {
        Action::AddPoint(n) => add(point(&p(*n), 0.0, 0.0)),
        Action::AddWay(n, nodes) => {
            let nodes = names(nodes);
            let nodes: Vec<&str> = nodes.iter().map(String::as_str).collect();
            add(way(&w(*n), &nodes))
        }
        Action::AddObservation(n, point, way) => add(observation(
            &o(*n),
            point.map(p).as_deref(),
            way.map(w).as_deref(),
        )),
        Action::MovePoint(n, lat) => {
            let version = next_version(graph, &point_ref(&p(*n)));
            replace(point_v(&p(*n), version, *lat, 0.0))
        }
        Action::ReshapeWay(n, nodes) => {
            let version = next_version(graph, &way_ref(&w(*n)));
            let nodes = names(nodes);
            let nodes: Vec<&str> = nodes.iter().map(String::as_str).collect();
            replace(way_v(&w(*n), version, &nodes))
        }
        Action::AddHiddenWay(n, nodes) => {
            let nodes = names(nodes);
            let nodes: Vec<&str> = nodes.iter().map(String::as_str).collect();
            add(way(&w(*n), &nodes).tombstone())
        }
        Action::HideWay(n, nodes) => {
            // tombstone() adds the one version step
            let version = next_version(graph, &way_ref(&w(*n))) - 1;
            let nodes = names(nodes);
            let nodes: Vec<&str> = nodes.iter().map(String::as_str).collect();
            replace(way_v(&w(*n), version, &nodes).tombstone())
        }
        Action::RemovePoint(n) => remove(point_ref(&p(*n))),
        Action::RemoveWay(n) => remove(way_ref(&w(*n))),
        Action::RemoveObservation(n) => remove(observation_ref(&o(*n))),
    }
}

fn policy() -> impl Strategy<Value = RemovalPolicy> {
    prop_oneof![Just(RemovalPolicy::Tombstone), Just(RemovalPolicy::Purge)]
}

/// Everything a reader could observe of a snapshot.
fn observe(graph: &Graph) -> (Vec<Entity>, Vec<(EntityId, Vec<EntityId>)>) {
    let entities = graph
        .all_entities(EntityFilter::everything())
        .cloned()
        .collect();
    let parents = (0..6u8)
        .map(|n| {
            let point = id(&p(n));
            let ways = graph.parent_ways_of(&point).iter().cloned().collect();
            (point, ways)
        })
        .collect();
    (entities, parents)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_every_reachable_graph_keeps_invariants(
        actions in prop::collection::vec(action(), 1..40),
        policy in policy(),
    ) {
        let mutator = Mutator::new(policy);
        let mut graph = Graph::new();

        for action in &actions {
            let op = to_operation(&graph, action);
            let seen = observe(&graph);

            let result = mutator.apply(&graph, op.clone());

            // Determinism
            prop_assert_eq!(&result, &mutator.apply(&graph, op.clone()));
            // Immutability
            prop_assert_eq!(&seen, &observe(&graph));

            if let Ok(next) = result {
                prop_assert_eq!(check_invariants(&next), Ok(()));
                if let Operation::Replace(entity) = &op {
                    let key = entity.entity_ref();
                    prop_assert_eq!(
                        next.get(&key).unwrap().version(),
                        graph.get(&key).unwrap().version() + 1
                    );
                }
                graph = next;
            }
        }
    }

    #[test]
    fn test_points_in_use_cannot_be_removed(
        actions in prop::collection::vec(action(), 1..40),
        target in 0..6u8,
    ) {
        let mutator = Mutator::default();
        let graph = actions.iter().fold(Graph::new(), |graph, action| {
            let op = to_operation(&graph, action);
            mutator.apply(&graph, op).unwrap_or(graph)
        });
        let key = point_ref(&p(target));
        let in_use = !graph.parent_ways_of(&key.id).is_empty()
            || !graph.parent_observations_of(&key).is_empty();
        let seen = observe(&graph);

        let result = mutator.remove(&graph, &key);

        if in_use {
            prop_assert_eq!(result.map(|_| ()).unwrap_err().kind(), ErrorKind::EntityInUse);
        } else if graph.is_live(&key) {
            prop_assert!(result.is_ok());
        }
        prop_assert_eq!(seen, observe(&graph));
    }

    #[test]
    fn test_only_the_next_version_is_accepted(version in 0u64..10) {
        let mutator = Mutator::default();
        let graph = mutator.add(&Graph::new(), point("p1", 0.0, 0.0)).unwrap();
        let graph = mutator.replace(&graph, point_v("p1", 2, 1.0, 1.0)).unwrap();

        let result = mutator.replace(&graph, point_v("p1", version.max(1), 2.0, 2.0));

        if version == 3 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result.map(|_| ()).unwrap_err(),
                MutationError::version_conflict(point_ref("p1"), 3, version.max(1))
            );
        }
    }
}
