use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub directed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self { directed: true }
    }
}

/// An edge named by its endpoint node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub v: String,
    pub w: String,
}

impl Edge {
    pub fn new(v: impl Into<String>, w: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
    // Edge indices. For directed graphs `out`/`inc` hold outgoing/incoming edges;
    // for undirected graphs every incident edge lives in `out` and `inc` stays empty.
    out: Vec<usize>,
    inc: Vec<usize>,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    v: usize,
    w: usize,
    key: Edge,
    label: E,
}

/// A graph container with String node ids and insertion-ordered node/edge sets.
///
/// Node and edge labels are caller-defined; the layout engine never touches them.
/// Removal tombstones slots so indices held in adjacency lists stay stable.
#[derive(Debug, Clone)]
pub struct Graph<N = (), E = ()> {
    options: GraphOptions,
    nodes: Vec<Option<NodeEntry<N>>>,
    edges: Vec<Option<EdgeEntry<E>>>,
    node_index: HashMap<String, usize>,
    node_count: usize,
    edge_count: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E> Graph<N, E> {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::default(),
            node_count: 0,
            edge_count: 0,
        }
    }

    pub fn new_undirected() -> Self {
        Self::new(GraphOptions { directed: false })
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        match self.node_index.get(&id) {
            Some(&idx) => {
                if let Some(entry) = self.nodes[idx].as_mut() {
                    entry.label = label;
                }
            }
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Some(NodeEntry {
                    id: id.clone(),
                    label,
                    out: Vec::new(),
                    inc: Vec::new(),
                }));
                self.node_index.insert(id, idx);
                self.node_count += 1;
            }
        }
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        let idx = *self.node_index.get(id)?;
        self.nodes[idx].as_ref().map(|entry| &entry.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let idx = *self.node_index.get(id)?;
        self.nodes[idx].as_mut().map(|entry| &mut entry.label)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter_map(|entry| entry.as_ref())
            .map(|entry| entry.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes().map(|id| id.to_string()).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter_map(|entry| entry.as_ref())
            .map(|entry| &entry.key)
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        self.find_edge(v, w).is_some()
    }

    pub fn edge(&self, v: &str, w: &str) -> Option<&E> {
        let idx = self.find_edge(v, w)?;
        self.edges[idx].as_ref().map(|entry| &entry.label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str) -> Option<&mut E> {
        let idx = self.find_edge(v, w)?;
        self.edges[idx].as_mut().map(|entry| &mut entry.label)
    }

    pub fn remove_edge(&mut self, v: &str, w: &str) -> bool {
        match self.find_edge(v, w) {
            Some(idx) => {
                self.remove_edge_at(idx);
                true
            }
            None => false,
        }
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(&idx) = self.node_index.get(id) else {
            return false;
        };
        let incident: Vec<usize> = match self.nodes[idx].as_ref() {
            Some(entry) => entry
                .out
                .iter()
                .chain(entry.inc.iter())
                .copied()
                .collect(),
            None => return false,
        };
        for edge_idx in incident {
            if self.edges[edge_idx].is_some() {
                self.remove_edge_at(edge_idx);
            }
        }
        self.nodes[idx] = None;
        self.node_index.remove(id);
        self.node_count -= 1;
        true
    }

    /// Successor node ids, in edge-insertion order. For undirected graphs this is
    /// the same as `neighbors`.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        entry
            .out
            .iter()
            .filter_map(|&idx| self.edges[idx].as_ref())
            .filter_map(|edge| self.node_id(edge.w))
            .collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(entry) = self.entry(v) else {
            return Vec::new();
        };
        entry
            .inc
            .iter()
            .filter_map(|&idx| self.edges[idx].as_ref())
            .filter_map(|edge| self.node_id(edge.v))
            .collect()
    }

    /// Adjacent node ids with duplicates removed, in first-seen order.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(&node_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let Some(entry) = self.nodes[node_idx].as_ref() else {
            return Vec::new();
        };
        let mut seen: Vec<usize> = Vec::new();
        let mut out: Vec<&str> = Vec::new();
        for &edge_idx in entry.out.iter().chain(entry.inc.iter()) {
            let Some(edge) = self.edges[edge_idx].as_ref() else {
                continue;
            };
            let other = if edge.v == node_idx { edge.w } else { edge.v };
            if seen.contains(&other) {
                continue;
            }
            seen.push(other);
            if let Some(id) = self.node_id(other) {
                out.push(id);
            }
        }
        out
    }

    /// Number of incident edges (in + out for directed graphs).
    pub fn degree(&self, v: &str) -> usize {
        match self.entry(v) {
            Some(entry) => entry.out.len() + entry.inc.len(),
            None => 0,
        }
    }

    pub fn out_degree(&self, v: &str) -> usize {
        match self.entry(v) {
            Some(entry) => entry.out.len(),
            None => 0,
        }
    }

    pub fn in_degree(&self, v: &str) -> usize {
        match self.entry(v) {
            Some(entry) => entry.inc.len(),
            None => 0,
        }
    }

    /// Nodes with no incoming edges (no incident edges at all when undirected).
    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|entry| entry.as_ref())
            .filter(|entry| {
                if self.options.directed {
                    entry.inc.is_empty()
                } else {
                    entry.out.is_empty()
                }
            })
            .map(|entry| entry.id.as_str())
            .collect()
    }

    /// Nodes with no outgoing edges.
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|entry| entry.as_ref())
            .filter(|entry| entry.out.is_empty())
            .map(|entry| entry.id.as_str())
            .collect()
    }

    fn entry(&self, v: &str) -> Option<&NodeEntry<N>> {
        let idx = *self.node_index.get(v)?;
        self.nodes[idx].as_ref()
    }

    fn node_id(&self, idx: usize) -> Option<&str> {
        self.nodes[idx].as_ref().map(|entry| entry.id.as_str())
    }

    fn find_edge(&self, v: &str, w: &str) -> Option<usize> {
        let &v_idx = self.node_index.get(v)?;
        let &w_idx = self.node_index.get(w)?;
        let entry = self.nodes[v_idx].as_ref()?;
        entry
            .out
            .iter()
            .copied()
            .find(|&idx| match self.edges[idx].as_ref() {
                Some(edge) => {
                    (edge.v == v_idx && edge.w == w_idx)
                        || (!self.options.directed && edge.v == w_idx && edge.w == v_idx)
                }
                None => false,
            })
    }

    fn remove_edge_at(&mut self, idx: usize) {
        let Some(edge) = self.edges[idx].take() else {
            return;
        };
        if let Some(entry) = self.nodes[edge.v].as_mut() {
            entry.out.retain(|&i| i != idx);
            entry.inc.retain(|&i| i != idx);
        }
        if edge.w != edge.v {
            if let Some(entry) = self.nodes[edge.w].as_mut() {
                entry.out.retain(|&i| i != idx);
                entry.inc.retain(|&i| i != idx);
            }
        }
        self.edge_count -= 1;
    }
}

impl<N: Default, E> Graph<N, E> {
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.has_node(&id) {
            self.set_node(id, N::default());
        }
        self
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        let v = v.into();
        let w = w.into();
        self.ensure_node(v.clone());
        self.ensure_node(w.clone());

        if let Some(existing) = self.edge_mut(&v, &w) {
            *existing = label;
            return self;
        }

        let v_idx = self.node_index[&v];
        let w_idx = self.node_index[&w];
        let edge_idx = self.edges.len();
        self.edges.push(Some(EdgeEntry {
            v: v_idx,
            w: w_idx,
            key: Edge::new(v, w),
            label,
        }));
        self.edge_count += 1;

        if self.options.directed {
            if let Some(entry) = self.nodes[v_idx].as_mut() {
                entry.out.push(edge_idx);
            }
            if let Some(entry) = self.nodes[w_idx].as_mut() {
                entry.inc.push(edge_idx);
            }
        } else {
            if let Some(entry) = self.nodes[v_idx].as_mut() {
                entry.out.push(edge_idx);
            }
            if w_idx != v_idx {
                if let Some(entry) = self.nodes[w_idx].as_mut() {
                    entry.out.push(edge_idx);
                }
            }
        }
        self
    }
}

impl<N: Default, E: Default> Graph<N, E> {
    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_with_label(v, w, E::default())
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }
}
