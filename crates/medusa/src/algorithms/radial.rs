//! Radial tree placement: depth becomes ring radius, horizontal extent becomes
//! angle. The per-node polar view survives `visit` so consumers can draw rings
//! and spokes without reverse-engineering angles.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::LayoutAlgorithm;
use super::tree::build_tree_placement;
use crate::error::Result;
use crate::geom::{PolarPoint, point};
use crate::model::LayoutModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialConfig {
    /// Horizontal space reserved for a leaf in the underlying tree pass.
    pub distx: f64,
    /// Radial distance between rings.
    pub disty: f64,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            distx: 50.0,
            disty: 50.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct RadialTreeLayout {
    config: RadialConfig,
    polar: FxHashMap<String, PolarPoint>,
}

impl RadialTreeLayout {
    pub fn new(config: RadialConfig) -> Self {
        Self {
            config,
            polar: FxHashMap::default(),
        }
    }

    /// Polar coordinates (about the plane center) from the last `visit`.
    pub fn polar_locations(&self) -> &FxHashMap<String, PolarPoint> {
        &self.polar
    }
}

impl LayoutAlgorithm for RadialTreeLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let graph = model.graph();
        let placement = build_tree_placement(graph.as_ref(), self.config.distx, self.config.disty)?;
        let center = point(model.width() as f64 / 2.0, model.height() as f64 / 2.0);

        self.polar.clear();
        for (v, p) in &placement.positions {
            let depth = placement.depths.get(v).copied().unwrap_or(0);
            let theta = 2.0 * PI * p.x / placement.total_width;
            let polar = PolarPoint::new(theta, self.config.disty * depth as f64);
            model.set(v, polar.to_cartesian(center));
            self.polar.insert(v.clone(), polar);
        }
        Ok(())
    }
}
