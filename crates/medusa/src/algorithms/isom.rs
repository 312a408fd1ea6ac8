//! Self-organizing-map placement (ISOM).
//!
//! Each epoch drops a random target point onto the plane, finds the node
//! nearest to it, and pulls that node plus its BFS neighborhood toward the
//! target. The pull halves with every hop from the winner and decays
//! exponentially over epochs; the neighborhood radius shrinks on a fixed
//! schedule. The net effect is a gradual untangling without any explicit
//! force model.

use rand::Rng;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::{IterativeLayout, LayoutAlgorithm, ensure_finite, randomize_positions, seeded_rng};
use crate::error::{Error, Result};
use crate::geom::point;
use crate::model::LayoutModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ISOMConfig {
    pub max_epochs: usize,
    pub initial_adaption: f64,
    pub min_adaption: f64,
    pub cooling_factor: f64,
    pub initial_radius: usize,
    pub min_radius: usize,
    /// Number of epochs between radius decrements.
    pub radius_constant_time: usize,
    pub seed: Option<u64>,
}

impl Default for ISOMConfig {
    fn default() -> Self {
        Self {
            max_epochs: 2000,
            initial_adaption: 0.9,
            min_adaption: 0.0,
            cooling_factor: 2.0,
            initial_radius: 5,
            min_radius: 1,
            radius_constant_time: 100,
            seed: None,
        }
    }
}

pub struct ISOMLayout {
    config: ISOMConfig,
    rng: StdRng,
    epoch: usize,
    radius: usize,
    adaption: f64,
}

impl ISOMLayout {
    pub fn new(config: ISOMConfig) -> Self {
        let rng = seeded_rng(config.seed);
        let radius = config.initial_radius;
        let adaption = config.initial_adaption;
        Self {
            config,
            rng,
            epoch: 0,
            radius,
            adaption,
        }
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }
}

impl LayoutAlgorithm for ISOMLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        if model.graph().node_count() == 0 {
            return Err(Error::EmptyGraph);
        }
        randomize_positions(model, &mut self.rng);
        self.epoch = 0;
        self.radius = self.config.initial_radius;
        self.adaption = self.config.initial_adaption;
        Ok(())
    }
}

impl IterativeLayout for ISOMLayout {
    fn step(&mut self, model: &mut LayoutModel) -> Result<()> {
        self.epoch += 1;

        let width = model.width() as f64;
        let height = model.height() as f64;
        // Keep targets off the very edge so the drawing doesn't pile up there.
        let target = point(
            self.rng.gen_range(0.05 * width..0.95 * width),
            self.rng.gen_range(0.05 * height..0.95 * height),
        );

        let graph = model.graph();
        let nodes = model.nodes();
        let winner = nodes
            .iter()
            .min_by(|a, b| {
                let da = (model.get(a) - target).square_length();
                let db = (model.get(b) - target).square_length();
                da.total_cmp(&db)
            })
            .cloned();
        let Some(winner) = winner else {
            return Ok(());
        };

        // Attraction wave outward from the winner, halving per hop.
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        visited.insert(winner.clone());
        queue.push_back((winner, 0));

        while let Some((v, hops)) = queue.pop_front() {
            if !model.is_locked(&v) {
                let current = model.get(&v);
                let factor = self.adaption / 2f64.powi(hops as i32);
                let p = current + (target - current) * factor;
                let p = ensure_finite(&v, p)?;
                model.set(&v, p);
            }
            if hops < self.radius {
                for u in graph.neighbors(&v) {
                    if visited.insert(u.clone()) {
                        queue.push_back((u, hops + 1));
                    }
                }
            }
        }

        let progress = self.epoch as f64 / self.config.max_epochs as f64;
        self.adaption = (self.config.initial_adaption * (-self.config.cooling_factor * progress).exp())
            .max(self.config.min_adaption);
        if self.radius > self.config.min_radius && self.epoch % self.config.radius_constant_time == 0
        {
            self.radius -= 1;
        }
        Ok(())
    }

    fn done(&self) -> bool {
        self.epoch >= self.config.max_epochs
    }
}
