//! Evenly spaced placement on a circle.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::LayoutAlgorithm;
use crate::error::{Error, Result};
use crate::geom::point;
use crate::model::LayoutModel;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircleConfig {
    /// Circle radius. Defaults to 45% of the smaller plane dimension.
    pub radius: Option<f64>,
    /// Placement order around the circle. Nodes not listed here are appended in
    /// sorted order; when absent every node is placed in sorted order.
    pub order: Option<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct CircleLayout {
    config: CircleConfig,
}

impl CircleLayout {
    pub fn new(config: CircleConfig) -> Self {
        Self { config }
    }
}

impl LayoutAlgorithm for CircleLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let mut nodes = model.nodes();
        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }
        nodes.sort();

        let ordered: Vec<String> = match &self.config.order {
            Some(order) => {
                let mut ordered: Vec<String> = order
                    .iter()
                    .filter(|v| nodes.binary_search(v).is_ok())
                    .cloned()
                    .collect();
                for v in nodes {
                    if !ordered.contains(&v) {
                        ordered.push(v);
                    }
                }
                ordered
            }
            None => nodes,
        };

        let width = model.width() as f64;
        let height = model.height() as f64;
        let radius = self
            .config
            .radius
            .unwrap_or_else(|| 0.45 * width.min(height));
        let count = ordered.len() as f64;

        for (i, v) in ordered.iter().enumerate() {
            let angle = 2.0 * PI * i as f64 / count;
            model.set(
                v,
                point(
                    width / 2.0 + radius * angle.cos(),
                    height / 2.0 + radius * angle.sin(),
                ),
            );
        }
        Ok(())
    }
}
