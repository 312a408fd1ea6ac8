//! Spring embedder.
//!
//! Edges behave like springs with a configurable natural length, stiffened or
//! slackened by the combined degree of their endpoints; repulsion only acts
//! within a bounded range. The embedder never converges on its own - it keeps
//! jiggling until the driver stops it, which makes it the right choice for
//! graphs that mutate while on screen.

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
pub struct SpringConfig {
    /// Natural length of every edge spring.
    pub natural_length: f64,
    /// Degree-based damping: edge force is scaled by
    /// `stretch^(deg(u) + deg(v) - 2)`, so busy nodes move less.
    pub stretch: f64,
    /// Only nodes closer than this repel each other.
    pub repulsion_range: f64,
    pub force_multiplier: f64,
    /// Per-axis cap on how far a node moves in one step.
    pub max_movement: f64,
    /// Route the repulsion pass through the Barnes-Hut quadtree.
    pub barnes_hut: bool,
    pub theta: f64,
    pub seed: Option<u64>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            natural_length: 50.0,
            stretch: 0.70,
            repulsion_range: 100.0,
            force_multiplier: 1.0 / 3.0,
            max_movement: 5.0,
            barnes_hut: false,
            theta: 0.5,
            seed: None,
        }
    }
}

pub struct SpringLayout {
    config: SpringConfig,
    rng: StdRng,
    step_count: usize,
}

impl SpringLayout {
    pub fn new(config: SpringConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            config,
            rng,
            step_count: 0,
        }
    }

    pub fn steps_taken(&self) -> usize {
        self.step_count
    }
}

impl LayoutAlgorithm for SpringLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        if model.graph().node_count() == 0 {
            return Err(Error::EmptyGraph);
        }
        randomize_positions(model, &mut self.rng);
        self.step_count = 0;
        Ok(())
    }
}

impl IterativeLayout for SpringLayout {
    fn step(&mut self, model: &mut LayoutModel) -> Result<()> {
        self.step_count += 1;
        let forces = accumulate_spring_forces(model, &self.config, &mut self.rng);

        let width = model.width() as f64;
        let height = model.height() as f64;
        let cap = self.config.max_movement;
        for (v, force) in forces {
            if model.is_locked(&v) {
                continue;
            }
            let mut p = model.get(&v);
            p.x = (p.x + force.x.clamp(-cap, cap)).clamp(0.0, width);
            p.y = (p.y + force.y.clamp(-cap, cap)).clamp(0.0, height);
            let p = ensure_finite(&v, p)?;
            model.set(&v, p);
        }
        Ok(())
    }

    fn done(&self) -> bool {
        false
    }
}

/// One pass of edge attraction plus bounded-range repulsion, shared with the
/// DAG-aware variant. Locked nodes accumulate forces like everyone else (they
/// still push their neighbors); the caller decides who actually moves.
pub(crate) fn accumulate_spring_forces(
    model: &LayoutModel,
    config: &SpringConfig,
    rng: &mut StdRng,
) -> FxHashMap<String, Vector> {
    let graph = model.graph();
    let nodes = model.nodes();
    let positions: Vec<_> = nodes.iter().map(|v| model.get(v)).collect();
    let mut forces: FxHashMap<String, Vector> = FxHashMap::default();
    for v in &nodes {
        forces.insert(v.clone(), vector(0.0, 0.0));
    }

    for (v, w) in model.edges() {
        if v == w {
            continue;
        }
        let pv = model.get(&v);
        let pw = model.get(&w);
        let delta = pv - pw;
        let len = delta.length().max(EPSILON_DISTANCE);
        let mut f = config.force_multiplier * (config.natural_length - len) / len;
        let combined_degree = graph.degree(&v) + graph.degree(&w);
        f *= config.stretch.powi(combined_degree.saturating_sub(2) as i32);
        let pull = delta * f;
        if let Some(acc) = forces.get_mut(&v) {
            *acc += pull;
        }
        if let Some(acc) = forces.get_mut(&w) {
            *acc -= pull;
        }
    }

    let range_sq = config.repulsion_range * config.repulsion_range;
    let width = model.width() as f64;
    let height = model.height() as f64;

    if config.barnes_hut {
        let tree = QuadTree::build(
            nodes
                .iter()
                .zip(&positions)
                .map(|(v, p)| Body::new(v.clone(), *p, 1.0)),
            rect(0.0, 0.0, width, height),
        );
        for (i, v) in nodes.iter().enumerate() {
            let p = positions[i];
            let mut net = vector(0.0, 0.0);
            let mut coincident = 0usize;
            tree.visit(v, p, config.theta, |other, mass| {
                let delta = p - other;
                let dist_sq = delta.square_length();
                if dist_sq == 0.0 {
                    coincident += 1;
                } else if dist_sq < range_sq {
                    net += delta * (mass / dist_sq);
                }
            });
            for _ in 0..coincident {
                net += random_push(rng);
            }
            apply_repulsion(&mut forces, v, net);
        }
    } else {
        for (i, v) in nodes.iter().enumerate() {
            let p = positions[i];
            let mut net = vector(0.0, 0.0);
            for (j, other) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let delta = p - *other;
                let dist_sq = delta.square_length();
                if dist_sq == 0.0 {
                    net += random_push(rng);
                } else if dist_sq < range_sq {
                    net += delta * (1.0 / dist_sq);
                }
            }
            apply_repulsion(&mut forces, v, net);
        }
    }

    forces
}

/// Net repulsion is applied with a fixed magnitude: only its direction carries
/// information, which keeps dense clusters from exploding.
fn apply_repulsion(forces: &mut FxHashMap<String, Vector>, v: &str, net: Vector) {
    let len = net.length();
    if len > 0.0 {
        if let Some(acc) = forces.get_mut(v) {
            *acc += net * (2.0 / len);
        }
    }
}

fn random_push(rng: &mut StdRng) -> Vector {
    let angle = rng.gen_range(0.0..2.0 * PI);
    vector(angle.cos(), angle.sin())
}
