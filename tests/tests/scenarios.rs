//! Editing scenarios over points, ways and observations.

use fieldgraph_tests::prelude::*;

mod add_point {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("add_point").step("add_p1", add(point("p1", 10.0, 20.0)), |a| {
            a.created(1)
                .present(point_ref("p1"))
                .version(point_ref("p1"), 1)
                .parent_ways("p1", &[])
        })
    }

    #[test]
    fn test_add_point_to_empty_graph() {
        let graph = scenario().run().unwrap();

        let p1 = graph.point(&id("p1")).unwrap();
        assert_eq!((p1.lat(), p1.lon()), (10.0, 20.0));
    }
}

mod dangling_way {
    use super::*;

    #[test]
    fn test_way_before_its_point_is_rejected() {
        let graph = Scenario::new("dangling_way")
            .step("add_w1", add(way("w1", &["p1"])), |a| {
                a.error_exact(MutationError::DanglingReference(point_ref("p1")))
            })
            .run()
            .unwrap();

        assert!(!graph.has(&way_ref("w1")));
        assert!(graph.is_empty());
    }
}

mod link_way {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("link_way")
            .step("add_p1", add(point("p1", 10.0, 20.0)), |a| a.created(1))
            .step("add_w1", add(way("w1", &["p1"])), |a| {
                a.created(1).parent_ways("p1", &["w1"])
            })
    }

    #[test]
    fn test_way_links_its_point() {
        scenario().run().unwrap();
    }
}

mod remove_in_order {
    use super::*;

    fn steps(scenario: Scenario) -> Scenario {
        scenario
            .step("add_p1", add(point("p1", 10.0, 20.0)), |a| a.ok())
            .step("add_w1", add(way("w1", &["p1"])), |a| a.ok())
            .step("remove_p1_in_use", remove(point_ref("p1")), |a| {
                a.error_exact(MutationError::entity_in_use(
                    point_ref("p1"),
                    vec![way_ref("w1")],
                ))
            })
            .step("remove_w1", remove(way_ref("w1")), |a| {
                a.deleted(1).parent_ways("p1", &[])
            })
            .step("remove_p1", remove(point_ref("p1")), |a| {
                a.deleted(1).live(0).parent_ways("p1", &[])
            })
            .step("re_add_p1", add(point("p1", -5.0, -5.0)), |a| {
                a.error_exact(MutationError::DuplicateId(point_ref("p1")))
            })
    }

    #[test]
    fn test_tombstone_policy_keeps_history() {
        let graph = steps(Scenario::new("remove_tombstone")).run().unwrap();

        assert!(!graph.is_live(&point_ref("p1")));
        assert_eq!(graph.get(&point_ref("p1")).unwrap().version(), 2);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_purge_policy_reclaims() {
        let graph = steps(Scenario::new("remove_purge").policy(RemovalPolicy::Purge))
            .run()
            .unwrap();

        assert!(graph.is_empty());
        assert!(graph.is_retired(&point_ref("p1")));
        assert_eq!(graph.retired_version(&point_ref("p1")), Some(1));
    }

    #[test]
    fn test_removed_entity_cannot_be_removed_again() {
        Scenario::new("remove_twice")
            .step("add_p1", add(point("p1", 0.0, 0.0)), |a| a.ok())
            .step("remove_p1", remove(point_ref("p1")), |a| a.hidden(point_ref("p1")))
            .step("remove_p1_again", remove(point_ref("p1")), |a| {
                a.error_exact(MutationError::UnknownId(point_ref("p1")))
            })
            .step("re_add_p1", add(point("p1", 0.0, 0.0)), |a| {
                a.error(ErrorKind::DuplicateId)
            })
            .run()
            .unwrap();
    }
}

mod replace_version {
    use super::*;

    #[test]
    fn test_replace_requires_next_version() {
        let graph = Scenario::new("replace_version")
            .step("add_p1", add(point("p1", 10.0, 20.0)), |a| a.ok())
            .step("move_p1", replace(point_v("p1", 2, 11.0, 21.0)), |a| {
                a.modified(1).version(point_ref("p1"), 2)
            })
            .step("retry_move_p1", replace(point_v("p1", 2, 11.0, 21.0)), |a| {
                a.error_exact(MutationError::version_conflict(point_ref("p1"), 3, 2))
            })
            .step("skip_version", replace(point_v("p1", 4, 0.0, 0.0)), |a| {
                a.error(ErrorKind::VersionConflict)
            })
            .step("replace_missing", replace(point_v("p9", 2, 0.0, 0.0)), |a| {
                a.error_exact(MutationError::UnknownId(point_ref("p9")))
            })
            .run()
            .unwrap();

        let p1 = graph.point(&id("p1")).unwrap();
        assert_eq!((p1.lat(), p1.lon(), p1.version()), (11.0, 21.0, 2));
    }
}

mod reshape_way {
    use super::*;

    #[test]
    fn test_replacing_nodes_moves_parent_links() {
        Scenario::new("reshape_way")
            .step("add_a", add(point("a", 0.0, 0.0)), |a| a.ok())
            .step("add_b", add(point("b", 0.0, 1.0)), |a| a.ok())
            .step("add_c", add(point("c", 1.0, 1.0)), |a| a.ok())
            .step("add_w", add(way("w", &["a", "b"])), |a| {
                a.parent_ways("a", &["w"]).parent_ways("b", &["w"])
            })
            .step("reshape_w", replace(way_v("w", 2, &["b", "c", "b"])), |a| {
                a.modified(1)
                    .parent_ways("a", &[])
                    .parent_ways("b", &["w"])
                    .parent_ways("c", &["w"])
            })
            .step("reshape_to_missing", replace(way_v("w", 3, &["c", "x", "y"])), |a| {
                a.error_exact(MutationError::DanglingReference(point_ref("x")))
            })
            .step("remove_a", remove(point_ref("a")), |a| a.deleted(1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_shared_point_has_every_parent() {
        Scenario::new("shared_point")
            .step("add_a", add(point("a", 0.0, 0.0)), |a| a.ok())
            .step("add_b", add(point("b", 0.0, 1.0)), |a| a.ok())
            .step("add_w1", add(way("w1", &["a", "b"])), |a| a.ok())
            .step("add_w2", add(way("w2", &["b", "a"])), |a| {
                a.parent_ways("a", &["w1", "w2"])
            })
            .step("remove_b", remove(point_ref("b")), |a| {
                a.error_exact(MutationError::entity_in_use(
                    point_ref("b"),
                    vec![way_ref("w2"), way_ref("w1")],
                ))
            })
            .run()
            .unwrap();
    }
}

mod observations {
    use super::*;

    #[test]
    fn test_observation_anchors_are_protected() {
        Scenario::new("observation_anchors")
            .step("add_p", add(point("p", 0.0, 0.0)), |a| a.ok())
            .step("add_w", add(way("w", &["p"])), |a| a.ok())
            .step("add_o", add(observation("o", Some("p"), Some("w"))), |a| {
                a.created(1)
                    .parent_observations(point_ref("p"), &["o"])
                    .parent_observations(way_ref("w"), &["o"])
            })
            .step("remove_w", remove(way_ref("w")), |a| {
                a.error_exact(MutationError::entity_in_use(
                    way_ref("w"),
                    vec![observation_ref("o")],
                ))
            })
            .step("remove_o", remove(observation_ref("o")), |a| {
                a.deleted(1)
                    .parent_observations(point_ref("p"), &[])
                    .parent_observations(way_ref("w"), &[])
            })
            .step("remove_w_after", remove(way_ref("w")), |a| a.deleted(1))
            .run()
            .unwrap();
    }

    #[test]
    fn test_missing_anchor_is_named() {
        Scenario::new("observation_missing_anchor")
            .step("add_p", add(point("p", 0.0, 0.0)), |a| a.ok())
            .step("add_o", add(observation("o", Some("p"), Some("w"))), |a| {
                a.error_exact(MutationError::DanglingReference(way_ref("w")))
            })
            .step("add_free_o", add(observation("o", None, None)), |a| {
                a.created(1).present(observation_ref("o"))
            })
            .run()
            .unwrap();
    }
}

mod restore {
    use super::*;

    #[test]
    fn test_tombstone_is_restored_by_replace() {
        let seed = Scenario::new("restore_seed")
            .step("add_p", add(point("p", 0.0, 0.0)), |a| a.ok())
            .step("remove_p", remove(point_ref("p")), |a| a.hidden(point_ref("p")))
            .run()
            .unwrap();
        let restored = seed.get(&point_ref("p")).unwrap().restore();

        Scenario::new("restore")
            .seed(seed)
            .step("restore_p", replace(restored), |a| {
                a.created(1).present(point_ref("p")).version(point_ref("p"), 3)
            })
            .step("add_w", add(way("w", &["p"])), |a| a.parent_ways("p", &["w"]))
            .run()
            .unwrap();
    }
}

mod hidden_references {
    use super::*;

    #[test]
    fn test_hidden_way_over_missing_point_is_rejected() {
        let graph = Scenario::new("hidden_way_dangling")
            .step("add_a", add(point("a", 0.0, 0.0)), |a| a.ok())
            .step("add_hidden_w1", add(way("w1", &["a", "ghost"]).tombstone()), |a| {
                a.error_exact(MutationError::DanglingReference(point_ref("ghost")))
            })
            .step("add_hidden_w2", add(way("w2", &["a"]).tombstone()), |a| {
                a.created(0).hidden(way_ref("w2"))
            })
            .run()
            .unwrap();

        assert!(!graph.has(&way_ref("w1")));
    }

    #[test]
    fn test_hidden_observation_replace_needs_anchor() {
        let seed = Scenario::new("hidden_observation_seed")
            .step("add_p", add(point("p", 0.0, 0.0)), |a| a.ok())
            .step("add_o", add(observation("o", Some("p"), None)), |a| a.ok())
            .step("remove_o", remove(observation_ref("o")), |a| {
                a.hidden(observation_ref("o"))
            })
            .run()
            .unwrap();
        let stored = seed.observation(&id("o")).unwrap().clone();
        let moved = stored.reanchor(None, Some(id("w9")));

        Scenario::new("hidden_observation_replace")
            .seed(seed)
            .step("reanchor_hidden_o", replace(moved.into()), |a| {
                a.error_exact(MutationError::DanglingReference(way_ref("w9")))
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_purge_keeps_points_of_hidden_ways() {
        Scenario::new("purge_hidden_referrer")
            .policy(RemovalPolicy::Purge)
            .step("add_p1", add(point("p1", 0.0, 0.0)), |a| a.ok())
            .step("add_hidden_w1", add(way("w1", &["p1"]).tombstone()), |a| {
                a.parent_ways("p1", &[])
            })
            .step("purge_p1", remove(point_ref("p1")), |a| {
                a.error_exact(MutationError::entity_in_use(
                    point_ref("p1"),
                    vec![way_ref("w1")],
                ))
            })
            .run()
            .unwrap();
    }
}
