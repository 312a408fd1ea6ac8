//! The engine's input contract: an opaque, read-only graph.
//!
//! Accessors return owned snapshots. Every algorithm collects the node and edge
//! sets once per step and computes on that snapshot, so structural changes made
//! by the owner of the graph take effect at the next step boundary instead of
//! corrupting an in-flight traversal.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;

pub trait LayoutGraph {
    fn nodes(&self) -> Vec<String>;

    /// Edge list as (tail, head) pairs. For undirected graphs the orientation
    /// is whatever the container stored.
    fn edges(&self) -> Vec<(String, String)>;

    fn successors(&self, v: &str) -> Vec<String>;

    fn predecessors(&self, v: &str) -> Vec<String>;

    fn neighbors(&self, v: &str) -> Vec<String>;

    fn degree(&self, v: &str) -> usize;

    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }
}

impl<N, E> LayoutGraph for medusa_graphlib::Graph<N, E> {
    fn nodes(&self) -> Vec<String> {
        self.node_ids()
    }

    fn edges(&self) -> Vec<(String, String)> {
        medusa_graphlib::Graph::edges(self)
            .map(|e| (e.v.clone(), e.w.clone()))
            .collect()
    }

    fn successors(&self, v: &str) -> Vec<String> {
        medusa_graphlib::Graph::successors(self, v)
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn predecessors(&self, v: &str) -> Vec<String> {
        medusa_graphlib::Graph::predecessors(self, v)
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn neighbors(&self, v: &str) -> Vec<String> {
        medusa_graphlib::Graph::neighbors(self, v)
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn degree(&self, v: &str) -> usize {
        medusa_graphlib::Graph::degree(self, v)
    }

    fn node_count(&self) -> usize {
        medusa_graphlib::Graph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        medusa_graphlib::Graph::edge_count(self)
    }
}

/// Unweighted shortest-path distances from `source`, following edges in both
/// directions. Unreachable nodes are absent from the result.
pub fn bfs_distances(g: &dyn LayoutGraph, source: &str) -> FxHashMap<String, usize> {
    let mut dist: FxHashMap<String, usize> = FxHashMap::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    dist.insert(source.to_string(), 0);
    queue.push_back(source.to_string());

    while let Some(v) = queue.pop_front() {
        let d = dist[&v];
        for u in g.neighbors(&v) {
            if !dist.contains_key(&u) {
                dist.insert(u.clone(), d + 1);
                queue.push_back(u);
            }
        }
    }
    dist
}

/// Minimum topological level per node: 0 for nodes without predecessors,
/// otherwise strictly greater than every predecessor's level. Nodes caught in a
/// cycle are settled after the acyclic part, from whatever predecessor levels
/// are known by then.
pub fn topological_levels(g: &dyn LayoutGraph) -> FxHashMap<String, usize> {
    let nodes = g.nodes();
    let mut indegree: FxHashMap<String, usize> = FxHashMap::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    for v in &nodes {
        let d = g.predecessors(v).len();
        indegree.insert(v.clone(), d);
        if d == 0 {
            queue.push_back(v.clone());
        }
    }

    let mut level: FxHashMap<String, usize> = FxHashMap::default();
    while let Some(v) = queue.pop_front() {
        let lv = g
            .predecessors(&v)
            .iter()
            .filter_map(|p| level.get(p))
            .map(|&l| l + 1)
            .max()
            .unwrap_or(0);
        level.insert(v.clone(), lv);
        for u in g.successors(&v) {
            if let Some(d) = indegree.get_mut(&u) {
                if *d > 0 {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(u);
                    }
                }
            }
        }
    }

    for v in &nodes {
        if !level.contains_key(v) {
            let lv = g
                .predecessors(v)
                .iter()
                .filter_map(|p| level.get(p))
                .map(|&l| l + 1)
                .max()
                .unwrap_or(0);
            level.insert(v.clone(), lv);
        }
    }
    level
}
