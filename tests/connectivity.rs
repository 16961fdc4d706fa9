use grove::collections::Bucketed;
use grove::graph::{
    DirectedEmbeddedGraph, DirectedGraph, EdgeIndex, EdgeInit, EdgeView, Graph, JoinPoint,
    Network, UndirectedEmbedded, UndirectedEmbeddedGraph, UndirectedGraph,
};
use grove::{GraphError, InitError, Independent};

/// Every complementary index must lead to an edge pointing straight back.
fn assert_partners_consistent<G: Network>(g: &G) {
    if !G::FLAVOUR.is_embedded() {
        return;
    }
    for node in 0..g.order() {
        for (local, edge) in g.partition(node).iter().enumerate() {
            let comp = edge.complementary_index().expect("embedded edge");
            let other = if edge.target_node() == node {
                edge.source_node().unwrap_or(node)
            } else {
                edge.target_node()
            };
            let partner = &g.partition(other)[comp];
            assert_eq!(
                partner.complementary_index(),
                Some(local),
                "edge ({node}, {local}) -> ({other}, {comp}) is not reciprocated"
            );
            if other == node {
                assert_ne!(comp, local, "loop at ({node}, {local}) refers to itself");
            }
        }
    }
}

#[test]
fn embedded_initializer_round_trips() {
    let init = vec![
        vec![EdgeInit::embedded(1, 0), EdgeInit::embedded(2, 0)],
        vec![EdgeInit::embedded(0, 0)],
        vec![EdgeInit::embedded(0, 1)],
    ];
    let g = UndirectedEmbeddedGraph::<()>::from_edges(init.clone()).unwrap();
    assert_eq!(g.order(), 3);
    assert_eq!(g.size(), 2);
    assert_eq!(g.to_init(), init);
    assert_partners_consistent(&g);
}

#[test]
fn directed_embedded_initializer_round_trips() {
    // 0 -> 1 and a loop on 1
    let init = vec![
        vec![EdgeInit::embedded(1, 0).with_source(0)],
        vec![
            EdgeInit::embedded(1, 0).with_source(0),
            EdgeInit::embedded(1, 2).with_source(1),
            EdgeInit::embedded(1, 1).with_source(1),
        ],
    ];
    let g = DirectedEmbeddedGraph::<()>::from_edges(init.clone()).unwrap();
    assert_eq!(g.size(), 2);
    assert_eq!(g.to_init(), init);
    assert!(!g.edges(1).unwrap()[1].inverted());
    assert!(g.edges(1).unwrap()[2].inverted());
    assert_partners_consistent(&g);
}

#[test]
fn embedded_join_then_erase_patches_partners() {
    let mut g = UndirectedEmbeddedGraph::<()>::new();
    for _ in 0..3 {
        g.add_node(());
    }
    assert_eq!(g.join(0, 1, ()).unwrap(), EdgeIndex::new(0, 0));
    assert_eq!(g.join(0, 2, ()).unwrap(), EdgeIndex::new(0, 1));
    assert_eq!(g.join(1, 2, ()).unwrap(), EdgeIndex::new(1, 1));
    assert_partners_consistent(&g);

    g.erase_edge(EdgeIndex::new(0, 0)).unwrap();
    assert_eq!(g.size(), 2);
    assert_eq!(g.edges(0).unwrap()[0].target_node(), 2);
    assert_eq!(g.edges(0).unwrap()[0].complementary_index(), 0);
    assert_eq!(g.edges(1).unwrap()[0].target_node(), 2);
    assert_eq!(g.edges(1).unwrap()[0].complementary_index(), 1);
    assert_partners_consistent(&g);
}

#[test]
fn self_loop_positions_resolve_before_insertion() {
    let mut g = UndirectedEmbeddedGraph::<()>::new();
    g.add_node(());
    g.add_node(());
    g.join(0, 1, ()).unwrap();
    g.join(0, 1, ()).unwrap();

    // second point before the first: the first shifts past the second
    let at = g
        .insert_join(EdgeIndex::new(0, 1), EdgeIndex::new(0, 0), ())
        .unwrap();
    assert_eq!(at, EdgeIndex::new(0, 2));
    let p0 = g.edges(0).unwrap();
    assert_eq!(p0.len(), 4);
    assert_eq!(p0[2].complementary_index(), 0);
    assert_eq!(p0[0].complementary_index(), 2);
    assert_eq!(g.edges(1).unwrap()[0].complementary_index(), 1);
    assert_eq!(g.edges(1).unwrap()[1].complementary_index(), 3);
    assert_partners_consistent(&g);

    // second point after the first: it keeps its pre-insertion distance
    let at = g
        .insert_join(JoinPoint::At(EdgeIndex::new(0, 0)), JoinPoint::At(EdgeIndex::new(0, 4)), ())
        .unwrap();
    assert_eq!(at, EdgeIndex::new(0, 0));
    assert_eq!(g.edges(0).unwrap()[0].complementary_index(), 4);
    assert_eq!(g.edges(0).unwrap()[4].complementary_index(), 0);
    assert_partners_consistent(&g);
}

#[test]
fn directed_embedded_loop_has_one_inverted_copy() {
    let mut g = DirectedEmbeddedGraph::<()>::new();
    g.add_node(());
    let at = g.join(0, 0, ()).unwrap();
    assert_eq!(at, EdgeIndex::new(0, 1));
    let p = g.edges(0).unwrap();
    assert!(!p[0].inverted());
    assert!(p[1].inverted());
    assert_eq!(p[1].source_node(), 0);
    assert_eq!(p[1].target_node(), 0);
    assert_eq!(g.size(), 1);
    assert_partners_consistent(&g);
}

#[test]
fn loop_copies_differing_only_in_inversion_are_unequal() {
    let mut g = DirectedEmbeddedGraph::<()>::new();
    g.add_node(());
    g.join(0, 0, ()).unwrap();

    let mut swapped = g.clone();
    swapped.swap_edges(0, 0, 1).unwrap();
    let p = swapped.edges(0).unwrap();
    assert!(p[0].inverted());
    assert_eq!(p[0].complementary_index(), 1);
    assert_eq!(p[1].complementary_index(), 0);
    assert_partners_consistent(&swapped);

    assert_ne!(g, swapped);
    swapped.swap_edges(0, 0, 1).unwrap();
    assert_eq!(g, swapped);
}

#[test]
fn insertion_point_past_the_end_is_rejected() {
    let mut g = UndirectedEmbeddedGraph::<()>::new();
    g.add_node(());
    g.add_node(());
    let err = g
        .insert_join(EdgeIndex::new(0, 1), 1usize, ())
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InsertionOutOfRange {
            method: "insert_join",
            node: 0,
            position: 1,
            len: 0,
        }
    );
    assert_eq!(g.size(), 0);
}

#[test]
fn plain_undirected_erase_finds_partner_by_weight() {
    let mut g = UndirectedGraph::<(), i32>::new();
    g.add_node(());
    g.add_node(());
    g.join(0, 1, 5).unwrap();
    g.join(0, 1, 7).unwrap();
    assert_eq!(g.partner(EdgeIndex::new(0, 1)).unwrap(), Some(EdgeIndex::new(1, 1)));

    g.erase_edge(EdgeIndex::new(0, 1)).unwrap();
    assert_eq!(g.size(), 1);
    assert_eq!(*g.edges(1).unwrap()[0].weight(), 5);
}

#[test]
fn plain_directed_edges_have_no_partner() {
    let mut g = DirectedGraph::<()>::new();
    g.add_node(());
    g.add_node(());
    let at = g.join(0, 1, ()).unwrap();
    assert_eq!(g.partner(at).unwrap(), None);
    assert!(g.edges(1).unwrap().is_empty());
    g.erase_edge(at).unwrap();
    assert_eq!(g.size(), 0);
}

#[test]
fn swap_edges_updates_partner_indices() {
    let mut g = UndirectedEmbeddedGraph::<()>::new();
    for _ in 0..3 {
        g.add_node(());
    }
    g.join(0, 1, ()).unwrap();
    g.join(0, 2, ()).unwrap();
    g.swap_edges(0, 0, 1).unwrap();
    assert_eq!(g.edges(0).unwrap()[0].target_node(), 2);
    assert_eq!(g.edges(1).unwrap()[0].complementary_index(), 1);
    assert_eq!(g.edges(2).unwrap()[0].complementary_index(), 0);
    assert_partners_consistent(&g);

    assert!(matches!(
        g.swap_edges(0, 0, 2),
        Err(GraphError::EdgeOutOfRange { node: 0, edge: 2, len: 2, .. })
    ));
}

#[test]
fn sort_edges_keeps_partners_pointing_back() {
    let mut g = UndirectedEmbeddedGraph::<(), u32>::new();
    for _ in 0..4 {
        g.add_node(());
    }
    g.join(0, 3, 30).unwrap();
    g.join(0, 1, 10).unwrap();
    g.join(0, 0, 0).unwrap();
    g.join(0, 2, 20).unwrap();

    let len = g.edges(0).unwrap().len();
    g.sort_edges(0, 0..len, |a, b| a.target_node().cmp(&b.target_node()))
        .unwrap();

    let targets: Vec<usize> = g.edges(0).unwrap().iter().map(|e| e.target_node()).collect();
    assert_eq!(targets, vec![0, 0, 1, 2, 3]);
    assert_eq!(g.edges(1).unwrap()[0].complementary_index(), 2);
    assert_eq!(g.edges(2).unwrap()[0].complementary_index(), 3);
    assert_eq!(g.edges(3).unwrap()[0].complementary_index(), 4);
    assert_eq!(*g.edges(0).unwrap()[4].weight(), 30);
    assert_partners_consistent(&g);
}

#[test]
fn swap_nodes_relabels_targets() {
    let mut g =
        DirectedGraph::<char>::from_edges_and_weights(vec![vec![1usize], vec![2], vec![]], ['a', 'b', 'c'])
            .unwrap();
    g.swap_nodes(0, 2).unwrap();
    assert_eq!(g.nodes().to_vec(), ['c', 'b', 'a']);
    assert!(g.edges(0).unwrap().is_empty());
    assert_eq!(g.edges(1).unwrap()[0].target_node(), 0);
    assert_eq!(g.edges(2).unwrap()[0].target_node(), 1);
}

#[test]
fn erase_node_removes_incident_edges_everywhere() {
    let mut g = DirectedEmbeddedGraph::<()>::new();
    for _ in 0..3 {
        g.add_node(());
    }
    g.join(0, 1, ()).unwrap();
    g.join(1, 2, ()).unwrap();
    g.join(2, 0, ()).unwrap();
    g.join(0, 0, ()).unwrap();

    g.erase_node(1).unwrap();
    assert_eq!(g.order(), 2);
    assert_eq!(g.size(), 2);
    // old node 2 is now node 1 and keeps its edge into 0
    let p1 = g.edges(1).unwrap();
    assert_eq!(p1.len(), 1);
    assert_eq!(p1[0].source_node(), 1);
    assert_eq!(p1[0].target_node(), 0);
    assert_partners_consistent(&g);
}

#[test]
fn insert_node_shifts_targets() {
    let mut g = UndirectedEmbeddedGraph::<u8>::from_edges_and_weights(
        vec![vec![EdgeInit::embedded(1, 0)], vec![EdgeInit::embedded(0, 0)]],
        [1u8, 2],
    )
    .unwrap();
    assert_eq!(g.insert_node(1, 9).unwrap(), 1);
    assert_eq!(g.edges(0).unwrap()[0].target_node(), 2);
    assert_eq!(g.edges(2).unwrap()[0].target_node(), 0);
    assert_eq!(g.nodes().to_vec(), [1, 9, 2]);
    assert!(g.insert_node(5, 0).is_err());
    assert_partners_consistent(&g);
}

#[test]
fn bucketed_backing_is_observably_identical() {
    type Bucket = Graph<UndirectedEmbedded, (), i64, Independent, Bucketed>;

    let mut flat = UndirectedEmbeddedGraph::<(), i64>::new();
    let mut bucket = Bucket::new();
    for _ in 0..4 {
        flat.add_node(());
        bucket.add_node(());
    }
    for (a, b, w) in [(0, 1, 1), (1, 2, 2), (2, 2, 3), (3, 0, 4), (1, 3, 5)] {
        flat.join(a, b, w).unwrap();
        bucket.join(a, b, w).unwrap();
    }
    flat.erase_edge(EdgeIndex::new(1, 0)).unwrap();
    bucket.erase_edge(EdgeIndex::new(1, 0)).unwrap();
    flat.swap_nodes(0, 3).unwrap();
    bucket.swap_nodes(0, 3).unwrap();

    assert_eq!(flat.to_init(), bucket.to_init());
    assert_partners_consistent(&bucket);
    bucket.reserve_edges(2, 16).unwrap();
    assert!(bucket.edges_capacity() >= 16);
}

#[test]
fn invalid_initializers_name_the_entry() {
    let err = UndirectedEmbeddedGraph::<()>::from_edges(vec![
        vec![EdgeInit::embedded(1, 0)],
        vec![EdgeInit::embedded(0, 1)],
    ])
    .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidInitializer {
            node: 0,
            edge: 0,
            reason: InitError::ComplementaryMismatch,
        }
    );

    let err = UndirectedGraph::<()>::from_edges(vec![vec![3usize]]).unwrap_err();
    assert!(matches!(
        err,
        GraphError::InvalidInitializer {
            reason: InitError::TargetOutOfRange { target: 3 },
            ..
        }
    ));
}

#[test]
fn clone_is_deep_and_equal() {
    let mut g = UndirectedEmbeddedGraph::<(), String, grove::Shared>::new();
    g.add_node(());
    g.add_node(());
    g.join(0, 1, "a".to_owned()).unwrap();

    let copy = g.clone();
    assert_eq!(copy, g);
    g.set_edge_weight(EdgeIndex::new(0, 0), "b".to_owned()).unwrap();
    assert_eq!(*g.edges(1).unwrap()[0].weight(), "b");
    assert_eq!(*copy.edges(1).unwrap()[0].weight(), "a");
    assert_ne!(copy, g);
}
