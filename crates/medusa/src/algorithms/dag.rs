//! DAG-aware spring embedder.
//!
//! On top of the plain spring forces, every node is pulled toward a horizontal
//! band determined by its minimum topological level: 0 for nodes without
//! predecessors, otherwise strictly greater than every predecessor's level.
//! Unlike the plain embedder this variant does terminate: it tracks a smoothed
//! mean-square velocity and, once the drawing has been quiet for a full
//! cool-down window, reports `done()`.

use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::spring::{SpringConfig, accumulate_spring_forces};
use super::{IterativeLayout, LayoutAlgorithm, ensure_finite, randomize_positions, seeded_rng};
use crate::error::{Error, Result};
use crate::geom::vector;
use crate::graph::topological_levels;
use crate::model::LayoutModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagSpringConfig {
    pub spring: SpringConfig,
    /// Strength of the pull toward a node's level band.
    pub level_attraction: f64,
    /// Mean-square velocity below which the layout counts as quiet.
    pub msv_threshold: f64,
    /// Number of consecutive quiet steps before `done()`.
    pub cooldown_steps: usize,
}

impl Default for DagSpringConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::default(),
            level_attraction: 0.5,
            msv_threshold: 10.0,
            cooldown_steps: 200,
        }
    }
}

pub struct DagSpringLayout {
    config: DagSpringConfig,
    rng: StdRng,
    levels: FxHashMap<String, usize>,
    max_level: usize,
    mean_square_vel: f64,
    quiet_steps: usize,
    done: bool,
}

impl DagSpringLayout {
    pub fn new(config: DagSpringConfig) -> Self {
        let rng = seeded_rng(config.spring.seed);
        Self {
            config,
            rng,
            levels: FxHashMap::default(),
            max_level: 0,
            mean_square_vel: f64::MAX,
            quiet_steps: 0,
            done: false,
        }
    }

    /// Minimum topological level per node, available after `visit`.
    pub fn levels(&self) -> &FxHashMap<String, usize> {
        &self.levels
    }

    pub fn mean_square_velocity(&self) -> f64 {
        self.mean_square_vel
    }
}

impl LayoutAlgorithm for DagSpringLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let graph = model.graph();
        if graph.node_count() == 0 {
            return Err(Error::EmptyGraph);
        }
        self.levels = topological_levels(graph.as_ref());
        self.max_level = self.levels.values().copied().max().unwrap_or(0);
        randomize_positions(model, &mut self.rng);
        self.mean_square_vel = f64::MAX;
        self.quiet_steps = 0;
        self.done = false;
        Ok(())
    }
}

impl IterativeLayout for DagSpringLayout {
    fn step(&mut self, model: &mut LayoutModel) -> Result<()> {
        let mut forces = accumulate_spring_forces(model, &self.config.spring, &mut self.rng);

        let width = model.width() as f64;
        let height = model.height() as f64;
        let band = height / (self.max_level + 1) as f64;
        let cap = self.config.spring.max_movement;

        let nodes = model.nodes();
        let mut vel_sum = 0.0;
        let mut moved = 0usize;
        for v in &nodes {
            if model.is_locked(v) {
                continue;
            }
            let mut force = forces.remove(v.as_str()).unwrap_or_else(|| vector(0.0, 0.0));
            let level = self.levels.get(v).copied().unwrap_or(0);
            let target_y = band * (level as f64 + 0.5);
            let p = model.get(v);
            force.y += self.config.level_attraction * (target_y - p.y);

            let dx = force.x.clamp(-cap, cap);
            let dy = force.y.clamp(-cap, cap);
            let mut next = p;
            next.x = (next.x + dx).clamp(0.0, width);
            next.y = (next.y + dy).clamp(0.0, height);
            let next = ensure_finite(v, next)?;
            vel_sum += (next - p).square_length();
            moved += 1;
            model.set(v, next);
        }

        if moved > 0 {
            let current = vel_sum / moved as f64;
            self.mean_square_vel = if self.mean_square_vel == f64::MAX {
                current
            } else {
                // Smoothed so one calm step doesn't start the cool-down.
                (3.0 * self.mean_square_vel + current) / 4.0
            };
        }

        if self.mean_square_vel < self.config.msv_threshold {
            self.quiet_steps += 1;
            if self.quiet_steps >= self.config.cooldown_steps && !self.done {
                self.done = true;
                tracing::debug!(
                    msv = self.mean_square_vel,
                    quiet_steps = self.quiet_steps,
                    "dag spring layout quiesced"
                );
            }
        } else {
            self.quiet_steps = 0;
        }
        Ok(())
    }

    fn done(&self) -> bool {
        self.done
    }
}
