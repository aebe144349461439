// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_toposort` crate.
//!
//! These exercise the public `TopoSort` / `SortResult` API end to end: round
//! grouping, cycle classification, incremental growth and the bulk grammars.

use understory_toposort::{
    DenseIndex, NodeId, NodeIndex, ParseError, SortConfig, SortResult, TopoError, TopoSort,
};

/// Rounds as sorted value lists, so within-round order does not matter.
fn round_sets<N: Ord + Clone, X: NodeIndex<N>>(
    sorted: &SortResult<'_, N, X>,
) -> Vec<Vec<N>> {
    sorted
        .sorted_sets()
        .into_iter()
        .map(|round| {
            let mut round: Vec<N> = round.into_iter().cloned().collect();
            round.sort();
            round
        })
        .collect()
}

fn cycle_values<N: Ord + Clone, X: NodeIndex<N>>(
    sorted: &SortResult<'_, N, X>,
) -> Vec<N> {
    let mut values: Vec<N> = sorted
        .cycle_set()
        .iter()
        .map(|&id| sorted.node(id).clone())
        .collect();
    values.sort();
    values
}

#[test]
fn acyclic_graph_groups_into_rounds() {
    let mut topo = TopoSort::new();
    topo.add(Some("a"), "d").unwrap();
    topo.add(Some("b"), "d").unwrap();
    topo.add(Some("d"), "c").unwrap();
    topo.add(Some("d"), "e").unwrap();
    topo.add(Some("e"), "f").unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(
        round_sets(&sorted),
        vec![vec!["a", "b"], vec!["d"], vec!["c", "e"], vec!["f"]]
    );
    assert!(!sorted.has_cycle());
    assert!(sorted.cycle_set().is_empty());
    assert_eq!(sorted.sorted_list().len(), sorted.node_count());
}

#[test]
fn two_cycle_produces_no_rounds() {
    let mut topo = TopoSort::new();
    topo.add(Some("a"), "b").unwrap();
    topo.add(Some("b"), "a").unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(sorted.round_count(), 0);
    assert!(sorted.sorted_list().is_empty());
    assert!(sorted.root_set().is_empty());
    assert!(sorted.has_cycle());
    assert_eq!(cycle_values(&sorted), vec!["a", "b"]);
}

#[test]
fn isolated_node_is_a_singleton_round() {
    let mut topo = TopoSort::new();
    topo.add(None, "solo").unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(round_sets(&sorted), vec![vec!["solo"]]);
    assert_eq!(sorted.root_set(), &[sorted.id(&"solo").unwrap()]);
}

#[test]
fn only_drain_blocked_nodes_are_cyclic() {
    let mut topo = TopoSort::new();
    topo.add(Some("x"), "y").unwrap();
    topo.add(Some("y"), "z").unwrap();
    topo.add(Some("z"), "y").unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(round_sets(&sorted), vec![vec!["x"]]);
    assert_eq!(cycle_values(&sorted), vec!["y", "z"]);
    let x = sorted.id(&"x").unwrap();
    assert!(sorted.is_rooted(x));
    assert!(!sorted.is_rooted(sorted.id(&"y").unwrap()));
}

#[test]
fn self_loop_is_always_cyclic() {
    let mut topo = TopoSort::new();
    topo.add(Some("x"), "x").unwrap();
    topo.add(None, "other").unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(round_sets(&sorted), vec![vec!["other"]]);
    assert_eq!(cycle_values(&sorted), vec!["x"]);
}

#[test]
fn dependents_of_a_cycle_are_reported_with_it() {
    let mut topo = TopoSort::new();
    topo.add(Some(1), 2).unwrap();
    topo.add(Some(2), 1).unwrap();
    topo.add(Some(2), 3).unwrap();
    topo.add(Some(0), 3).unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(round_sets(&sorted), vec![vec![0]]);
    assert_eq!(cycle_values(&sorted), vec![1, 2, 3]);
}

#[test]
fn sorting_twice_is_idempotent() {
    let mut topo = TopoSort::<&str>::new();
    topo.add_graph("(d a b) (c d) (e d) (f e) (g h) (h g)").unwrap();

    let first = topo.sort().unwrap();
    let second = topo.sort().unwrap();
    assert_eq!(round_sets(&first), round_sets(&second));
    assert_eq!(first.cycle_set(), second.cycle_set());
    assert_eq!(first.root_set(), second.root_set());
}

#[test]
fn sorting_after_growth_sees_new_edges() {
    let mut topo = TopoSort::new();
    topo.add(Some("a"), "b").unwrap();
    let before = round_sets(&topo.sort().unwrap());
    assert_eq!(before, vec![vec!["a"], vec!["b"]]);

    topo.add(Some("b"), "c").unwrap();
    topo.add(Some("c"), "a").unwrap();
    let sorted = topo.sort().unwrap();
    assert_eq!(sorted.round_count(), 0);
    assert_eq!(cycle_values(&sorted), vec!["a", "b", "c"]);
}

#[test]
fn duplicate_edges_count_once() {
    let mut topo = TopoSort::new();
    for _ in 0..3 {
        topo.add(Some("a"), "b").unwrap();
    }
    assert_eq!(topo.edge_count(), 3);

    let sorted = topo.sort().unwrap();
    assert_eq!(round_sets(&sorted), vec![vec!["a"], vec!["b"]]);
    assert_eq!(sorted.adjacency().edge_count(), 1);
    let a = sorted.id(&"a").unwrap();
    let b = sorted.id(&"b").unwrap();
    assert_eq!(sorted.dependents(a), &[b]);
    assert_eq!(sorted.leaders(b), &[a]);
}

#[test]
fn ids_are_dense_and_first_seen() {
    let mut topo = TopoSort::new();
    topo.add_dep("b", Some("a")).unwrap();
    topo.add_deps("c", ["b", "a", "d"]).unwrap();

    let ids: Vec<u32> = ["a", "b", "c", "d"]
        .iter()
        .map(|n| topo.id(n).unwrap().as_u32())
        .collect();
    assert_eq!(ids, [0, 1, 2, 3]);
    assert_eq!(topo.nodes(), &["a", "b", "c", "d"]);
    assert_eq!(*topo.node(topo.id(&"c").unwrap()), "c");
    assert_eq!(topo.id(&"zzz"), None);
}

#[test]
fn first_round_is_ascending_by_id() {
    let mut topo = TopoSort::new();
    topo.add(None, "q").unwrap();
    topo.add(None, "p").unwrap();
    topo.add(Some("r"), "s").unwrap();

    let sorted = topo.sort().unwrap();
    let first: Vec<&str> = sorted.round(0).iter().map(|&id| *sorted.node(id)).collect();
    assert_eq!(first, ["q", "p", "r"]);
    assert_eq!(sorted.round(0), sorted.root_set());
}

#[test]
fn rounds_iterator_matches_order() {
    let mut topo = TopoSort::<u32>::new();
    topo.add_graph("(3 1 2) (4 3) (5 3) (6 4 5)").unwrap();

    let sorted = topo.sort().unwrap();
    let flattened: Vec<NodeId> = sorted.rounds().flatten().copied().collect();
    assert_eq!(flattened, sorted.order());
    assert_eq!(sorted.rounds().len(), sorted.round_count());
    assert_eq!(sorted.rooted_count(), 6);
    assert_eq!(round_sets(&sorted), vec![vec![1, 2], vec![3], vec![4, 5], vec![6]]);
}

#[test]
fn owned_string_nodes() {
    let mut topo = TopoSort::<String>::new();
    topo.add_rules("link : compile\ncompile : fetch generate\n").unwrap();

    let sorted = topo.sort().unwrap();
    assert_eq!(
        round_sets(&sorted),
        vec![
            vec![String::from("fetch"), String::from("generate")],
            vec![String::from("compile")],
            vec![String::from("link")],
        ]
    );
}

#[test]
fn malformed_graph_text_records_nothing() {
    let mut topo = TopoSort::<&str>::new();
    topo.add_graph("(b a)").unwrap();

    let err = topo.add_graph("(c b) (d c").unwrap_err();
    assert_eq!(
        err,
        TopoError::Parse(ParseError::UnterminatedGroup { offset: 6 })
    );
    assert_eq!(topo.node_count(), 2);
    assert_eq!(topo.edge_count(), 1);
    assert_eq!(topo.id(&"c"), None);
}

#[test]
fn non_numeric_token_is_rejected_for_integer_nodes() {
    let mut topo = TopoSort::<u64>::new();
    let err = topo.add_graph("(1 2) (3 x)").unwrap_err();
    assert!(matches!(
        err,
        TopoError::Parse(ParseError::InvalidToken { ref token, offset: 9 }) if token == "x"
    ));
    assert_eq!(topo.node_count(), 0);
}

#[test]
fn dense_index_matches_hashed_results() {
    let text = "(5 1 2) (7 5) (9 5) (11 7 9) (13) (2 13)";
    let mut dense = TopoSort::<u32, DenseIndex>::dense(16).unwrap();
    let mut hashed = TopoSort::<u32>::new();
    dense.add_graph(text).unwrap();
    hashed.add_graph(text).unwrap();

    let d = dense.sort().unwrap();
    let h = hashed.sort().unwrap();
    assert_eq!(d.order(), h.order());
    assert_eq!(d.nodes(), h.nodes());
    assert_eq!(round_sets(&d), vec![vec![1, 13], vec![2], vec![5], vec![7, 9], vec![11]]);
}

#[test]
fn dense_index_rejects_values_out_of_range_atomically() {
    let mut topo = TopoSort::<i32, DenseIndex>::dense(8).unwrap();
    topo.add(Some(1), 2).unwrap();

    assert_eq!(
        topo.add(Some(3), 8).unwrap_err(),
        TopoError::OutOfRange { max_range: 8 }
    );
    assert_eq!(
        topo.add(Some(-1), 4).unwrap_err(),
        TopoError::OutOfRange { max_range: 8 }
    );
    assert_eq!(
        topo.add_graph("(4 3) (5 40)").unwrap_err(),
        TopoError::OutOfRange { max_range: 8 }
    );
    assert_eq!(topo.node_count(), 2);
    assert_eq!(topo.edge_count(), 1);
    assert_eq!(topo.id(&3), None);
}

#[test]
fn dense_index_needs_max_range() {
    let err = TopoSort::<u32, DenseIndex>::with_config(SortConfig::new()).unwrap_err();
    assert_eq!(err, TopoError::MissingMaxRange);
}

#[test]
fn verbose_does_not_change_results() {
    let text = "(b a) (c b) (d b) (e c d) (x y) (y x)";
    let mut quiet = TopoSort::<&str>::new();
    let mut loud = TopoSort::<&str>::with_config(SortConfig::new().with_verbose(true)).unwrap();
    quiet.add_graph(text).unwrap();
    loud.add_graph(text).unwrap();
    assert!(loud.config().verbose);

    let q = quiet.sort().unwrap();
    let l = loud.sort().unwrap();
    assert_eq!(q.order(), l.order());
    assert_eq!(q.cycle_set(), l.cycle_set());
}

#[test]
fn results_can_be_read_from_other_threads() {
    let mut topo = TopoSort::<&str>::new();
    topo.add_graph("(b a) (c a) (d b c)").unwrap();
    let sorted = topo.sort().unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..sorted.round_count())
            .map(|i| {
                let sorted = &sorted;
                s.spawn(move || sorted.round(i).len())
            })
            .collect();
        let sizes: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(sizes, [1, 2, 1]);
    });
}

#[test]
fn debug_output_summarizes_the_result() {
    let mut topo = TopoSort::<&str>::new();
    topo.add_graph("(b a) (c b) (x y) (y x)").unwrap();
    let sorted = topo.sort().unwrap();

    let text = format!("{sorted:?}");
    assert!(text.starts_with("SortResult {"));
    assert!(text.contains("node_count: 5"));
    assert!(text.contains("rounds: 3"));
    assert!(text.contains("cycle: [#3, #4]"));

    let dense = TopoSort::<u8, DenseIndex>::dense(4).unwrap();
    let empty = dense.sort().unwrap();
    assert!(format!("{empty:?}").contains("node_count: 0"));
}

#[test]
fn repeated_values_in_bulk_input_are_admitted_once() {
    let mut topo = TopoSort::<u32, DenseIndex>::dense(4).unwrap();
    topo.add_rules("3 : 0 0 1
3 2 : 1 1
2 : 0
").unwrap();

    assert_eq!(topo.nodes(), &[0, 3, 1, 2]);
    assert_eq!(topo.edge_count(), 8);
    let sorted = topo.sort().unwrap();
    assert_eq!(sorted.adjacency().edge_count(), 4);
    assert_eq!(round_sets(&sorted), vec![vec![0, 1], vec![2, 3]]);
}
