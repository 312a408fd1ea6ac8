//! Layered tree placement.
//!
//! Roots are the nodes with no incoming edge. Each subtree's horizontal
//! footprint is computed bottom-up, then coordinates are assigned top-down with
//! a cursor walking left to right. Non-tree edges (a DAG node reachable from
//! two parents, or a back edge) are tolerated: the first parent to reach a node
//! places it, later visits are skipped.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::LayoutAlgorithm;
use crate::error::{Error, Result};
use crate::geom::{Point, point};
use crate::graph::LayoutGraph;
use crate::model::LayoutModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Horizontal space reserved for a leaf.
    pub distx: f64,
    /// Vertical distance between layers.
    pub disty: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            distx: 50.0,
            disty: 50.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct TreeLayout {
    config: TreeConfig,
}

impl TreeLayout {
    pub fn new(config: TreeConfig) -> Self {
        Self { config }
    }
}

impl LayoutAlgorithm for TreeLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let graph = model.graph();
        let placement = build_tree_placement(graph.as_ref(), self.config.distx, self.config.disty)?;

        let offset = ((model.width() as f64 - placement.total_width) / 2.0).max(0.0);
        for (v, p) in &placement.positions {
            model.set(v, point(p.x + offset, p.y));
        }
        Ok(())
    }
}

pub(crate) struct TreePlacement {
    pub positions: FxHashMap<String, Point>,
    pub depths: FxHashMap<String, usize>,
    pub total_width: f64,
}

pub(crate) fn build_tree_placement(
    graph: &dyn LayoutGraph,
    distx: f64,
    disty: f64,
) -> Result<TreePlacement> {
    // The negated form also rejects NaN spacing.
    if !(distx > 0.0 && disty > 0.0) {
        return Err(Error::InvalidSpacing { distx, disty });
    }
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return Err(Error::EmptyGraph);
    }
    let roots: Vec<String> = nodes
        .iter()
        .filter(|v| graph.predecessors(v).is_empty())
        .cloned()
        .collect();
    if roots.is_empty() {
        return Err(Error::NoRoots);
    }

    let mut widths: FxHashMap<String, f64> = FxHashMap::default();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    for root in &roots {
        footprint(graph, root, distx, &mut visited, &mut widths);
    }

    let mut placement = TreePlacement {
        positions: FxHashMap::default(),
        depths: FxHashMap::default(),
        total_width: roots.iter().filter_map(|r| widths.get(r)).sum(),
    };
    let mut placed: FxHashSet<String> = FxHashSet::default();
    let mut cursor = 0.0;
    for root in &roots {
        place(
            graph,
            root,
            cursor,
            0,
            disty,
            &widths,
            &mut placed,
            &mut placement,
        );
        cursor += widths.get(root).copied().unwrap_or(distx);
    }
    Ok(placement)
}

/// Bottom-up subtree width: a leaf reserves `distx`, an inner node the sum of
/// its children.
fn footprint(
    graph: &dyn LayoutGraph,
    v: &str,
    distx: f64,
    visited: &mut FxHashSet<String>,
    widths: &mut FxHashMap<String, f64>,
) -> f64 {
    if !visited.insert(v.to_string()) {
        return 0.0;
    }
    let mut total = 0.0;
    for child in graph.successors(v) {
        total += footprint(graph, &child, distx, visited, widths);
    }
    if total == 0.0 {
        total = distx;
    }
    widths.insert(v.to_string(), total);
    total
}

#[allow(clippy::too_many_arguments)]
fn place(
    graph: &dyn LayoutGraph,
    v: &str,
    left: f64,
    depth: usize,
    disty: f64,
    widths: &FxHashMap<String, f64>,
    placed: &mut FxHashSet<String>,
    placement: &mut TreePlacement,
) {
    if !placed.insert(v.to_string()) {
        return;
    }
    let width = widths.get(v).copied().unwrap_or(0.0);
    placement.positions.insert(
        v.to_string(),
        point(left + width / 2.0, disty * depth as f64 + disty / 2.0),
    );
    placement.depths.insert(v.to_string(), depth);

    let mut cursor = left;
    for child in graph.successors(v) {
        if placed.contains(&child) {
            continue;
        }
        let child_width = widths.get(&child).copied().unwrap_or(0.0);
        place(
            graph,
            &child,
            cursor,
            depth + 1,
            disty,
            widths,
            placed,
            placement,
        );
        cursor += child_width;
    }
}
