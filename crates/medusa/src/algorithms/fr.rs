//! Fruchterman-Reingold force-directed placement.
//!
//! Repulsion `k²/d` between node pairs, attraction `d²/k` along edges, and a
//! per-step displacement cap (the temperature) that cools toward zero. With
//! `barnes_hut` enabled the all-pairs repulsion pass is pruned through the
//! quadtree, turning it from O(n²) into O(n log n).

use rand::Rng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{
    EPSILON_DISTANCE, IterativeLayout, LayoutAlgorithm, ensure_finite, randomize_positions,
    seeded_rng,
};
use crate::error::{Error, Result};
use crate::geom::{Vector, rect, vector};
use crate::model::LayoutModel;
use crate::quadtree::{Body, QuadTree};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FRConfig {
    pub attraction_multiplier: f64,
    pub repulsion_multiplier: f64,
    pub max_iterations: usize,
    /// Route the repulsion pass through the Barnes-Hut quadtree.
    pub barnes_hut: bool,
    /// Barnes-Hut opening criterion: a cell is treated as one aggregate body
    /// when cell width / distance falls below this.
    pub theta: f64,
    pub seed: Option<u64>,
}

impl Default for FRConfig {
    fn default() -> Self {
        Self {
            attraction_multiplier: 0.75,
            repulsion_multiplier: 0.75,
            max_iterations: 700,
            barnes_hut: false,
            theta: 0.5,
            seed: None,
        }
    }
}

pub struct FRLayout {
    config: FRConfig,
    rng: StdRng,
    iteration: usize,
    temperature: f64,
    attraction: f64,
    repulsion: f64,
    done_threshold: f64,
}

impl FRLayout {
    pub fn new(config: FRConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            config,
            rng,
            iteration: 0,
            temperature: 0.0,
            attraction: 0.0,
            repulsion: 0.0,
            done_threshold: 0.0,
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn cool(&mut self) {
        self.temperature *= 1.0 - self.iteration as f64 / self.config.max_iterations as f64;
    }

    fn jitter(&mut self) -> Vector {
        let angle = self.rng.gen_range(0.0..2.0 * PI);
        vector(angle.cos(), angle.sin()) * EPSILON_DISTANCE
    }
}

impl LayoutAlgorithm for FRLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let count = model.graph().node_count();
        if count == 0 {
            return Err(Error::EmptyGraph);
        }
        let width = model.width() as f64;
        let height = model.height() as f64;

        randomize_positions(model, &mut self.rng);

        let force_constant = (width * height / count as f64).sqrt();
        self.attraction = self.config.attraction_multiplier * force_constant;
        self.repulsion = self.config.repulsion_multiplier * force_constant;
        self.temperature = width / 10.0;
        self.done_threshold = 1.0 / width.max(height);
        self.iteration = 0;
        Ok(())
    }
}

impl IterativeLayout for FRLayout {
    fn step(&mut self, model: &mut LayoutModel) -> Result<()> {
        self.iteration += 1;

        let width = model.width() as f64;
        let height = model.height() as f64;
        let nodes = model.nodes();
        let positions: Vec<_> = nodes.iter().map(|v| model.get(v)).collect();
        let index: FxHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();
        let mut disp: Vec<Vector> = vec![vector(0.0, 0.0); nodes.len()];

        let repulsion = self.repulsion;
        if self.config.barnes_hut {
            let theta = self.config.theta;
            let tree = QuadTree::build(
                nodes
                    .iter()
                    .zip(&positions)
                    .map(|(v, p)| Body::new(v.clone(), *p, 1.0)),
                rect(0.0, 0.0, width, height),
            );
            for (i, v) in nodes.iter().enumerate() {
                let p = positions[i];
                let mut jitter = None;
                tree.visit(v, p, theta, |other, mass| {
                    let mut delta = p - other;
                    if delta.square_length() == 0.0 {
                        delta = *jitter.get_or_insert(vector(EPSILON_DISTANCE, EPSILON_DISTANCE));
                    }
                    let dl = delta.length().max(EPSILON_DISTANCE);
                    let force = mass * repulsion * repulsion / dl;
                    disp[i] += delta * (force / dl);
                });
            }
        } else {
            for i in 0..nodes.len() {
                for j in (i + 1)..nodes.len() {
                    let mut delta = positions[i] - positions[j];
                    if delta.square_length() == 0.0 {
                        delta = self.jitter();
                    }
                    let dl = delta.length().max(EPSILON_DISTANCE);
                    let force = repulsion * repulsion / dl;
                    let push = delta * (force / dl);
                    disp[i] += push;
                    disp[j] -= push;
                }
            }
        }

        for (v, w) in model.edges() {
            let (Some(&i), Some(&j)) = (index.get(v.as_str()), index.get(w.as_str())) else {
                continue;
            };
            if i == j {
                continue;
            }
            let mut delta = positions[i] - positions[j];
            if delta.square_length() == 0.0 {
                delta = self.jitter();
            }
            let dl = delta.length().max(EPSILON_DISTANCE);
            let force = dl * dl / self.attraction;
            let pull = delta * (force / dl);
            disp[i] -= pull;
            disp[j] += pull;
        }

        let border = width.min(height) / 50.0;
        for (i, v) in nodes.iter().enumerate() {
            if model.is_locked(v) {
                continue;
            }
            let d = disp[i];
            let dl = d.length().max(EPSILON_DISTANCE);
            let mut p = positions[i] + d * (dl.min(self.temperature) / dl);
            p.x = p.x.clamp(border, width - border);
            p.y = p.y.clamp(border, height - border);
            let p = ensure_finite(v, p)?;
            model.set(v, p);
        }

        self.cool();
        if self.done() {
            tracing::debug!(
                iteration = self.iteration,
                temperature = self.temperature,
                "fruchterman-reingold converged"
            );
        }
        Ok(())
    }

    fn done(&self) -> bool {
        self.iteration > self.config.max_iterations || self.temperature < self.done_threshold
    }
}
