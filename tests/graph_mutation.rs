use anyhow::Result;
use grove::graph::{
    DirectedGraph, EdgeIndex, GraphEdge, NodeStorage, UndirectedEmbeddedGraph, UndirectedGraph,
};
use grove::{GraphError, Independent, Pooled, Shared};

#[test]
fn independent_weights_are_copied_to_partner() -> Result<()> {
    let mut g = UndirectedGraph::<(), i32, Independent>::new();
    g.add_node(());
    g.add_node(());
    g.join(0, 1, 3)?;

    g.set_edge_weight(EdgeIndex::new(0, 0), 11)?;
    assert_eq!(*g.edges(1)?[0].weight(), 11);

    let old = g.mutate_edge_weight(EdgeIndex::new(1, 0), |w| std::mem::replace(w, 12))?;
    assert_eq!(old, 11);
    assert_eq!(*g.edges(0)?[0].weight(), 12);
    Ok(())
}

#[test]
fn shared_weights_alias_both_ends() -> Result<()> {
    let mut g = UndirectedGraph::<(), Vec<u8>, Shared>::new();
    g.add_node(());
    g.add_node(());
    g.join(0, 1, vec![1])?;

    g.mutate_edge_weight(EdgeIndex::new(0, 0), |w| w.push(2))?;
    assert_eq!(*g.edges(1)?[0].weight(), vec![1, 2]);
    let (here, there) = (&g.edges(0)?[0], &g.edges(1)?[0]);
    assert!(here.weight_handle().is_shared_with(there.weight_handle()));
    assert_eq!(here.weight_handle().holders(), 2);
    Ok(())
}

#[test]
fn pooled_weights_are_deduplicated() -> Result<()> {
    let mut g = UndirectedEmbeddedGraph::<(), i32, Pooled<i32>>::new();
    for _ in 0..3 {
        g.add_node(());
    }
    g.join(0, 1, 5)?;
    g.join(1, 2, 5)?;
    assert_eq!(g.connectivity().weight_policy().pool().len(), 1);

    g.set_edge_weight(EdgeIndex::new(0, 0), 9)?;
    assert_eq!(*g.edges(1)?[0].weight(), 9);
    assert_eq!(g.connectivity().weight_policy().pool().len(), 2);

    g.mutate_edge_weight(EdgeIndex::new(1, 1), |w| *w += 4)?;
    assert_eq!(*g.edges(2)?[0].weight(), 9);
    assert_eq!(g.connectivity().weight_policy().pool().len(), 1);
    Ok(())
}

#[test]
fn node_weights_follow_structural_changes() -> Result<()> {
    let mut g = DirectedGraph::<&str>::new();
    let a = g.add_node("a");
    let c = g.add_node("c");
    g.join(a, c, ())?;
    let b = g.insert_node(1, "b")?;
    assert_eq!(b, 1);
    assert_eq!(g.edges(0)?[0].target_node(), 2);

    g.mutate_node_weight(1, |w| *w = "B")?;
    assert_eq!(*g.node_weight(1)?, "B");
    g.set_node_weight(0, "A")?;
    assert_eq!(g.nodes().to_vec(), ["A", "B", "c"]);

    g.erase_node(2)?;
    assert_eq!(g.size(), 0);
    assert_eq!(
        g.node_weight(2),
        Err(GraphError::NodeOutOfRange {
            method: "node_weight",
            node: 2,
            order: 2,
        })
    );
    Ok(())
}

#[test]
fn range_errors_carry_the_operation_name() {
    let mut g = UndirectedGraph::<()>::new();
    g.add_node(());
    let err = g.join(0, 4, ()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "insert_join: node index 4 out of range - graph order is 1"
    );
    assert!(matches!(
        g.erase_edge(EdgeIndex::new(0, 0)),
        Err(GraphError::EdgeOutOfRange { method: "erase_edge", .. })
    ));
    assert!(g.erase_node(1).is_err());
    assert!(g.swap_nodes(0, 1).is_err());
}

#[test]
fn capacity_and_clear() -> Result<()> {
    let mut g = UndirectedEmbeddedGraph::<u64>::new();
    g.reserve_nodes(8);
    assert!(g.node_capacity() >= 8);
    for i in 0..4 {
        g.add_node(i);
    }
    g.reserve_edges(0, 10)?;
    assert!(g.edges_capacity() >= 10);
    g.join(0, 1, ())?;
    g.join(2, 3, ())?;

    g.shrink_to_fit();
    assert_eq!(g.size(), 2);
    g.clear();
    assert_eq!(g.order(), 0);
    assert_eq!(g.size(), 0);
    Ok(())
}

#[test]
fn graphs_compare_by_value() -> Result<()> {
    let build = || -> Result<UndirectedGraph<u8, f32>> {
        Ok(UndirectedGraph::from_edges_and_weights(
            vec![vec![(1usize, 0.5f32)], vec![(0, 0.5)]],
            [1u8, 2],
        )?)
    };
    let mut left = build()?;
    let right = build()?;
    assert_eq!(left, right);

    left.set_node_weight(0, 7)?;
    assert_ne!(left, right);
    Ok(())
}

#[test]
fn node_storage_round_trip() {
    let mut nodes: NodeStorage<i32> = (0..5).collect();
    nodes.erase_nodes(1..3).unwrap();
    assert_eq!(nodes.to_vec(), [0, 3, 4]);
    nodes.insert_node(3, 9).unwrap();
    assert_eq!(nodes.iter().copied().collect::<Vec<_>>(), vec![0, 3, 4, 9]);
    assert!(nodes.erase_node(4).is_err());
}
