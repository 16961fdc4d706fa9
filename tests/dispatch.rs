use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use grove::concurrency::{Asynchronous, DispatchError, PoolConfig, Serial, TaskDispatcher, WorkerPool};
use grove::graph::{Conditions, EdgeIndex, Traversal, TraversalEvent, UndirectedGraph};

/// Binary tree of depth 2 with weights 0, 10, ..., 60.
fn tree() -> UndirectedGraph<u64> {
    UndirectedGraph::from_edges_and_weights(
        vec![
            vec![1usize, 2],
            vec![0, 3, 4],
            vec![0, 5, 6],
            vec![1],
            vec![1],
            vec![2],
            vec![2],
        ],
        (0..7).map(|i| i * 10),
    )
    .unwrap()
}

fn weighted_bfs<D: TaskDispatcher>(g: &UndirectedGraph<u64>, dispatcher: &D) -> Vec<u64> {
    Traversal::breadth_first(g, Conditions::default())
        .unwrap()
        .dispatch_nodes(dispatcher, |n| {
            // later nodes finish first
            thread::sleep(Duration::from_millis(7 - n as u64));
            g.node_weight(n).map_or(0, |w| w * 2 + 1)
        })
        .unwrap()
}

#[test]
fn backends_agree_on_order() -> Result<()> {
    let g = tree();
    let serial = weighted_bfs(&g, &Serial);
    let asynchronous = weighted_bfs(&g, &Asynchronous::new());
    let pool = weighted_bfs(&g, &WorkerPool::new(3)?);

    assert_eq!(serial, vec![1, 21, 41, 61, 81, 101, 121]);
    assert_eq!(asynchronous, serial);
    assert_eq!(pool, serial);
    Ok(())
}

#[test]
fn edge_tasks_follow_discovery_order() -> Result<()> {
    let g = tree();
    let task = |e: EdgeIndex| (e.node, g.edges(e.node).map_or(usize::MAX, |p| p[e.local].target_node()));
    let expected = Traversal::depth_first(&g, Conditions::default())?
        .dispatch_edges(&Serial, task)?;
    assert_eq!(
        expected,
        vec![(0, 1), (1, 3), (1, 4), (0, 2), (2, 5), (2, 6)]
    );

    let pooled = Traversal::depth_first(&g, Conditions::default())?
        .dispatch_edges(&WorkerPool::new(2)?, task)?;
    assert_eq!(pooled, expected);
    Ok(())
}

#[test]
fn every_event_can_be_dispatched() -> Result<()> {
    let g = tree();
    let kinds = Traversal::breadth_first(&g, Conditions::default())?.dispatch(&Asynchronous::new(), |event| {
        match event {
            TraversalEvent::Discovered(_) => 'd',
            TraversalEvent::EdgeFirst(_) => 'f',
            TraversalEvent::EdgeSecond(_) => 's',
            TraversalEvent::Finished(_) => 'x',
        }
    })?;
    assert_eq!(kinds.iter().filter(|&&k| k == 'd').count(), 7);
    assert_eq!(kinds.iter().filter(|&&k| k == 'f').count(), 6);
    assert_eq!(kinds.iter().filter(|&&k| k == 's').count(), 6);
    assert_eq!(kinds.first(), Some(&'d'));
    assert_eq!(kinds.last(), Some(&'x'));
    Ok(())
}

fn failing<D: TaskDispatcher>(dispatcher: &D) -> DispatchError {
    let g = tree();
    Traversal::breadth_first(&g, Conditions::default())
        .unwrap()
        .dispatch_nodes(dispatcher, |n| {
            if n == 4 || n == 6 {
                panic!("node {n} failed");
            }
            n
        })
        .unwrap_err()
}

#[test]
fn task_panics_surface_as_errors() {
    let expected = DispatchError::TaskPanicked {
        index: 4,
        message: String::from("node 4 failed"),
    };
    assert_eq!(failing(&Serial), expected);
    assert_eq!(failing(&Asynchronous::new()), expected);
    assert_eq!(failing(&WorkerPool::new(4).unwrap()), expected);
}

#[test]
fn failing_comparator_does_not_strand_pool_workers() {
    let (done, finished) = mpsc::channel();
    thread::spawn(move || {
        let g = tree();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            Traversal::priority_first_by(&g, Conditions::default(), |a: &u64, b: &u64| {
                assert!(*a != 20 && *b != 20, "comparator rejected weight 20");
                a.cmp(b)
            })
            .unwrap()
            .dispatch_nodes(&WorkerPool::new(2).unwrap(), |n| n)
        }));
        let _ = done.send(outcome.is_err());
    });

    let unwound = finished
        .recv_timeout(Duration::from_secs(5))
        .expect("worker pool did not return after the comparator panicked");
    assert!(unwound);
}

#[test]
fn pool_configuration() -> Result<()> {
    let config: PoolConfig = serde_json::from_str(r#"{"workers":3}"#)?;
    assert_eq!(WorkerPool::from_config(&config)?.workers(), 3);

    let defaulted: PoolConfig = serde_json::from_str("{}")?;
    assert!(defaulted.workers >= 1);

    let none: PoolConfig = serde_json::from_str(r#"{"workers":0}"#)?;
    assert_eq!(WorkerPool::from_config(&none), Err(DispatchError::NoWorkers));
    Ok(())
}

#[test]
fn empty_input_gives_empty_output() -> Result<()> {
    let g = UndirectedGraph::<u64>::new();
    for out in [
        Traversal::breadth_first(&g, Conditions::default())?.dispatch_nodes(&Serial, |n| n)?,
        Traversal::breadth_first(&g, Conditions::default())?.dispatch_nodes(&Asynchronous::new(), |n| n)?,
        Traversal::breadth_first(&g, Conditions::default())?.dispatch_nodes(&WorkerPool::new(2)?, |n| n)?,
    ] {
        assert!(out.is_empty());
    }
    Ok(())
}
