use medusa::graph::{bfs_distances, topological_levels};
use medusa::graphlib::Graph;
use medusa::LayoutGraph;

#[test]
fn bfs_ignores_edge_direction() {
    let mut g: Graph = Graph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("d", "c");

    let dist = bfs_distances(&g, "a");
    assert_eq!(dist["a"], 0);
    assert_eq!(dist["b"], 1);
    assert_eq!(dist["c"], 2);
    // d is only reachable against its edge, which BFS follows anyway.
    assert_eq!(dist["d"], 3);
}

#[test]
fn bfs_omits_unreachable_nodes() {
    let mut g: Graph = Graph::default();
    g.set_edge("a", "b");
    g.set_node("island", ());

    let dist = bfs_distances(&g, "a");
    assert_eq!(dist.len(), 2);
    assert!(!dist.contains_key("island"));
}

#[test]
fn levels_are_longest_paths_from_the_sources() {
    let mut g: Graph = Graph::default();
    g.set_edge("a", "b");
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    g.set_edge("c", "d");
    g.set_edge("d", "e");
    // Shortcut from a source straight to e must not lower e's level.
    g.set_edge("a", "e");

    let levels = topological_levels(&g);
    assert_eq!(levels["a"], 0);
    assert_eq!(levels["b"], 1);
    assert_eq!(levels["c"], 1);
    assert_eq!(levels["d"], 2);
    assert_eq!(levels["e"], 3);
}

#[test]
fn isolated_nodes_sit_at_level_zero() {
    let mut g: Graph = Graph::default();
    g.set_node("lonely", ());
    g.set_edge("a", "b");
    let levels = topological_levels(&g);
    assert_eq!(levels["lonely"], 0);
    assert_eq!(levels["b"], 1);
}

#[test]
fn cycles_still_get_levels() {
    let mut g: Graph = Graph::default();
    g.set_edge("root", "x");
    g.set_edge("x", "y");
    g.set_edge("y", "x");

    let levels = topological_levels(&g);
    assert_eq!(levels.len(), 3);
    assert_eq!(levels["root"], 0);
    assert!(levels["x"] >= 1);
    assert!(levels["y"] >= 1);
}

#[test]
fn trait_snapshots_match_the_container() {
    let mut g: Graph = Graph::default();
    g.set_edge("a", "b");
    g.set_edge("a", "c");

    let graph: &dyn LayoutGraph = &g;
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.successors("a"), vec!["b", "c"]);
    assert_eq!(graph.predecessors("b"), vec!["a"]);
    assert_eq!(graph.degree("a"), 2);
}
