//! Balloon placement: every subtree nests inside a circle around its parent,
//! with the circle radius shrinking as fan-out grows.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::LayoutAlgorithm;
use crate::error::{Error, Result};
use crate::geom::{Point, point, vector};
use crate::model::LayoutModel;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalloonConfig {
    /// Radius of the root circle. Defaults to half the smaller plane dimension.
    pub radius: Option<f64>,
}

#[derive(Debug, Default)]
pub struct BalloonLayout {
    config: BalloonConfig,
}

impl BalloonLayout {
    pub fn new(config: BalloonConfig) -> Self {
        Self { config }
    }
}

impl LayoutAlgorithm for BalloonLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let graph = model.graph();
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

        let width = model.width() as f64;
        let height = model.height() as f64;
        let center = point(width / 2.0, height / 2.0);
        let radius = self.config.radius.unwrap_or_else(|| width.min(height) / 2.0);

        let mut placed: FxHashSet<String> = FxHashSet::default();
        if roots.len() == 1 {
            place(
                graph.as_ref(),
                &roots[0],
                center,
                radius,
                &mut placed,
                model,
            );
        } else {
            // Several roots share the plane: spread their balloons on a ring
            // around the center, each with a proportionally smaller radius.
            let root_radius = radius / (1.0 + roots.len() as f64).sqrt();
            let orbit = radius - root_radius;
            for (i, root) in roots.iter().enumerate() {
                let angle = 2.0 * PI * i as f64 / roots.len() as f64;
                let root_center = center + vector(orbit * angle.cos(), orbit * angle.sin());
                place(
                    graph.as_ref(),
                    root,
                    root_center,
                    root_radius,
                    &mut placed,
                    model,
                );
            }
        }
        Ok(())
    }
}

fn place(
    graph: &dyn crate::graph::LayoutGraph,
    v: &str,
    center: Point,
    radius: f64,
    placed: &mut FxHashSet<String>,
    model: &mut LayoutModel,
) {
    if !placed.insert(v.to_string()) {
        return;
    }
    model.set(v, center);

    let children: Vec<String> = graph
        .successors(v)
        .into_iter()
        .filter(|c| !placed.contains(c))
        .collect();
    if children.is_empty() {
        return;
    }

    let count = children.len() as f64;
    let child_radius = radius / (1.0 + count);
    let orbit = radius - child_radius;
    // A single child placed straight below its parent is indistinguishable from
    // a chain; offset its angle so the nesting stays visible.
    let offset = if children.len() == 1 { PI / 4.0 } else { 0.0 };

    for (i, child) in children.iter().enumerate() {
        let angle = 2.0 * PI * i as f64 / count + offset;
        let child_center = center + vector(orbit * angle.cos(), orbit * angle.sin());
        place(graph, child, child_center, child_radius, placed, model);
    }
}
