use anyhow::Result;
use grove::graph::{
    Conditions, DirectedGraph, EdgeIndex, FnVisitor, Network, Traversal, TraversalEvent,
    TraversalTrace, UndirectedEmbeddedGraph, UndirectedGraph,
};
use grove::GraphError;

fn square() -> UndirectedGraph<u32> {
    UndirectedGraph::from_edges(vec![vec![1usize, 3], vec![0, 2], vec![1, 3], vec![2, 0]]).unwrap()
}

fn all_strategies<G: Network>(g: &G, c: Conditions) -> Vec<TraversalTrace>
where
    G::NodeWeight: Ord,
{
    vec![
        Traversal::breadth_first(g, c).unwrap().trace(),
        Traversal::depth_first(g, c).unwrap().trace(),
        Traversal::pseudo_depth_first(g, c).unwrap().trace(),
        Traversal::priority_first(g, c).unwrap().trace(),
    ]
}

#[test]
fn empty_graph_yields_nothing() {
    let g = UndirectedGraph::<u32>::new();
    for c in [Conditions::default(), Conditions::ignore_disconnected(5)] {
        for trace in all_strategies(&g, c) {
            assert_eq!(trace, TraversalTrace::default());
        }
    }
}

#[test]
fn breadth_first_path_from_middle() {
    let g = UndirectedGraph::<()>::from_edges(vec![vec![1usize], vec![0, 2], vec![1]]).unwrap();
    let trace = Traversal::breadth_first(&g, Conditions::ignore_disconnected(1))
        .unwrap()
        .trace();
    assert_eq!(trace.discovered, vec![1, 0, 2]);
    assert_eq!(trace.finished, vec![1, 0, 2]);
}

#[test]
fn depth_first_square() {
    let g = square();
    let trace = Traversal::depth_first(&g, Conditions::default()).unwrap().trace();
    assert_eq!(trace.discovered, vec![0, 1, 2, 3]);
    assert_eq!(trace.finished, vec![3, 2, 1, 0]);
    assert_eq!(trace.first_edges.len(), 4);
    assert!(trace.second_edges.is_empty());

    let mut embedded = UndirectedEmbeddedGraph::<u32>::new();
    for _ in 0..4 {
        embedded.add_node(0);
    }
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        embedded.join(a, b, ()).unwrap();
    }
    let again = Traversal::depth_first(&embedded, Conditions::default()).unwrap().trace();
    assert_eq!(again.discovered, trace.discovered);
    assert_eq!(again.finished, trace.finished);
    assert_eq!(again.first_edges, trace.first_edges);
}

#[test]
fn pseudo_depth_first_pops_in_forward_order() {
    let g = UndirectedGraph::<u32>::from_edges(vec![
        vec![1usize, 2, 3],
        vec![0, 4],
        vec![0],
        vec![0],
        vec![1],
    ])
    .unwrap();
    let pdfs = Traversal::pseudo_depth_first(&g, Conditions::default()).unwrap().trace();
    assert_eq!(pdfs.discovered, vec![0, 1, 4, 2, 3]);
    let bfs = Traversal::breadth_first(&g, Conditions::default()).unwrap().trace();
    assert_eq!(bfs.discovered, vec![0, 1, 2, 3, 4]);
}

#[test]
fn priority_first_breaks_ties_by_queue_order() {
    let g = UndirectedGraph::<u32>::from_edges_and_weights(
        vec![vec![1usize, 2, 3], vec![0], vec![0], vec![0]],
        [0, 5, 5, 9],
    )
    .unwrap();
    let highest = Traversal::priority_first(&g, Conditions::default()).unwrap().trace();
    assert_eq!(highest.discovered, vec![0, 3, 1, 2]);

    let lowest = Traversal::priority_first_by(&g, Conditions::default(), |a: &u32, b: &u32| b.cmp(a))
        .unwrap()
        .trace();
    assert_eq!(lowest.discovered, vec![0, 1, 2, 3]);
}

#[test]
fn every_connection_is_met_from_both_ends() {
    // loops, a double edge and an isolated node
    let g = UndirectedGraph::<u32>::from_edges(vec![
        vec![1usize, 1, 0, 0],
        vec![0, 0, 2],
        vec![1, 2, 2],
        vec![],
    ])
    .unwrap();
    assert_eq!(g.size(), 5);

    for (i, trace) in all_strategies(&g, Conditions::default()).into_iter().enumerate() {
        assert_eq!(trace.discovered.len(), 4);
        assert_eq!(trace.first_edges.len(), g.size(), "strategy {i}");
        if i == 1 {
            assert!(trace.second_edges.is_empty());
        } else {
            assert_eq!(trace.second_edges.len(), g.size(), "strategy {i}");
        }
    }
}

#[test]
fn directed_depth_first_reports_every_edge_once() {
    let g = DirectedGraph::<u32>::from_edges(vec![vec![1usize, 2], vec![2], vec![0]]).unwrap();
    let trace = Traversal::depth_first(&g, Conditions::default()).unwrap().trace();
    assert_eq!(trace.discovered, vec![0, 1, 2]);
    assert_eq!(trace.finished, vec![2, 1, 0]);
    assert_eq!(
        trace.first_edges,
        vec![
            EdgeIndex::new(0, 0),
            EdgeIndex::new(1, 0),
            EdgeIndex::new(2, 0),
            EdgeIndex::new(0, 1),
        ]
    );
}

#[test]
fn disconnected_policy() {
    let g = UndirectedGraph::<u32>::from_edges(vec![vec![1usize], vec![0], vec![3], vec![2]]).unwrap();
    let find = Traversal::breadth_first(&g, Conditions::find_disconnected().starting_at(2))
        .unwrap()
        .trace();
    assert_eq!(find.discovered, vec![2, 3, 0, 1]);
    let ignore = Traversal::breadth_first(&g, Conditions::ignore_disconnected(2))
        .unwrap()
        .trace();
    assert_eq!(ignore.discovered, vec![2, 3]);
}

#[test]
fn seed_must_be_in_range() {
    let g = square();
    let err = Traversal::depth_first(&g, Conditions::ignore_disconnected(4)).err();
    assert_eq!(
        err,
        Some(GraphError::NodeOutOfRange {
            method: "traverse",
            node: 4,
            order: 4,
        })
    );
}

#[test]
fn repeated_traversals_agree() {
    let g = square();
    let first = all_strategies(&g, Conditions::default());
    let second = all_strategies(&g, Conditions::default());
    assert_eq!(first, second);
}

#[test]
fn events_bracket_each_node() {
    let g = UndirectedGraph::<()>::from_edges(vec![vec![1usize], vec![0]]).unwrap();
    let events: Vec<TraversalEvent> = Traversal::breadth_first(&g, Conditions::default())
        .unwrap()
        .collect();
    assert_eq!(
        events,
        vec![
            TraversalEvent::Discovered(0),
            TraversalEvent::EdgeFirst(EdgeIndex::new(0, 0)),
            TraversalEvent::Finished(0),
            TraversalEvent::Discovered(1),
            TraversalEvent::EdgeSecond(EdgeIndex::new(1, 0)),
            TraversalEvent::Finished(1),
        ]
    );
}

#[test]
fn closure_visitor_receives_each_slot() {
    let g = square();
    let (mut found, mut done, mut first, mut second) = (0, 0, 0, 0);
    let mut visitor = FnVisitor::new()
        .on_discover(|_| found += 1)
        .on_finish(|_| done += 1)
        .on_first_edge(|_| first += 1)
        .on_second_edge(|_| second += 1);
    Traversal::breadth_first(&g, Conditions::default())
        .unwrap()
        .visit(&mut visitor);
    drop(visitor);
    assert_eq!((found, done, first, second), (4, 4, 4, 4));
}

#[test]
fn traces_serialize() -> Result<()> {
    let g = square();
    let trace = Traversal::pseudo_depth_first(&g, Conditions::default())?.trace();
    let json = serde_json::to_string(&trace)?;
    let back: TraversalTrace = serde_json::from_str(&json)?;
    assert_eq!(back, trace);

    let conditions: Conditions =
        serde_json::from_str(r#"{"disconnected":"ignore","seed":2}"#)?;
    assert_eq!(conditions, Conditions::ignore_disconnected(2));
    Ok(())
}
