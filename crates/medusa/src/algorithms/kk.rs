//! Kamada-Kawai energy minimization.
//!
//! The ideal distance between two nodes is proportional to their
//! graph-theoretic shortest-path distance; the layout minimizes the total
//! spring energy of the deviations. Each step greedily moves the node with the
//! steepest energy gradient using a 2×2 Newton step, and falls back to pairwise
//! position exchanges when every gradient is flat (a local minimum the
//! gradient alone cannot escape).

use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{
    EPSILON_DISTANCE, IterativeLayout, LayoutAlgorithm, ensure_finite, randomize_positions,
    seeded_rng,
};
use crate::error::{Error, Result};
use crate::geom::{Point, point};
use crate::graph::bfs_distances;
use crate::model::LayoutModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KKConfig {
    pub max_iterations: usize,
    /// Graph distance assumed for disconnected pairs, as a multiple of the
    /// connected diameter.
    pub disconnected_multiplier: f64,
    /// Scales the ideal edge length derived from the plane size.
    pub length_factor: f64,
    /// Gradient norm below which the algorithm considers itself stalled and
    /// tries exchanging node positions instead of sliding them.
    pub exchange_epsilon: f64,
    /// Re-center the drawing after every step.
    pub adjust_for_gravity: bool,
    pub seed: Option<u64>,
}

impl Default for KKConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            disconnected_multiplier: 0.5,
            length_factor: 0.9,
            exchange_epsilon: 1e-2,
            adjust_for_gravity: true,
            seed: None,
        }
    }
}

pub struct KKLayout {
    config: KKConfig,
    rng: StdRng,
    iteration: usize,
    nodes: Vec<String>,
    positions: Vec<Point>,
    /// Flattened n×n ideal lengths and spring strengths.
    lij: Vec<f64>,
    kij: Vec<f64>,
}

impl KKLayout {
    pub fn new(config: KKConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            config,
            rng,
            iteration: 0,
            nodes: Vec::new(),
            positions: Vec::new(),
            lij: Vec::new(),
            kij: Vec::new(),
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn n(&self) -> usize {
        self.nodes.len()
    }

    fn at(&self, i: usize, j: usize) -> usize {
        i * self.n() + j
    }

    /// Energy gradient (∂E/∂x, ∂E/∂y) at node `m`.
    fn gradient(&self, m: usize) -> (f64, f64) {
        let mut gx = 0.0;
        let mut gy = 0.0;
        for i in 0..self.n() {
            if i == m {
                continue;
            }
            let dx = self.positions[m].x - self.positions[i].x;
            let dy = self.positions[m].y - self.positions[i].y;
            let d = (dx * dx + dy * dy).sqrt().max(EPSILON_DISTANCE);
            let k = self.kij[self.at(m, i)];
            let l = self.lij[self.at(m, i)];
            gx += k * dx * (1.0 - l / d);
            gy += k * dy * (1.0 - l / d);
        }
        (gx, gy)
    }

    /// One Newton step on node `m` from the local 2×2 Hessian.
    fn newton_move(&mut self, m: usize) {
        let (gx, gy) = self.gradient(m);
        let mut axx = 0.0;
        let mut axy = 0.0;
        let mut ayy = 0.0;
        for i in 0..self.n() {
            if i == m {
                continue;
            }
            let dx = self.positions[m].x - self.positions[i].x;
            let dy = self.positions[m].y - self.positions[i].y;
            let d = (dx * dx + dy * dy).sqrt().max(EPSILON_DISTANCE);
            let d3 = d * d * d;
            let k = self.kij[self.at(m, i)];
            let l = self.lij[self.at(m, i)];
            axx += k * (1.0 - l * dy * dy / d3);
            axy += k * (l * dx * dy / d3);
            ayy += k * (1.0 - l * dx * dx / d3);
        }
        let det = axx * ayy - axy * axy;
        if det.abs() < EPSILON_DISTANCE {
            return;
        }
        let sx = (-gx * ayy + gy * axy) / det;
        let sy = (-gy * axx + gx * axy) / det;
        self.positions[m].x += sx;
        self.positions[m].y += sy;
    }

    fn energy(&self, positions: &[Point]) -> f64 {
        let n = self.n();
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = positions[i].distance_to(positions[j]);
                let l = self.lij[self.at(i, j)];
                let k = self.kij[self.at(i, j)];
                let stretch = d - l;
                total += k * stretch * stretch / 2.0;
            }
        }
        total
    }

    /// Escape a flat gradient by swapping `m` with whichever node lowers the
    /// total energy the most.
    fn exchange(&mut self, m: usize, movable: &[bool]) {
        let current = self.energy(&self.positions);
        let mut best: Option<(usize, f64)> = None;
        let mut scratch = self.positions.clone();
        for i in 0..self.n() {
            if i == m || !movable[i] {
                continue;
            }
            scratch.swap(m, i);
            let candidate = self.energy(&scratch);
            scratch.swap(m, i);
            if candidate < current {
                match best {
                    Some((_, e)) if candidate >= e => {}
                    _ => best = Some((i, candidate)),
                }
            }
        }
        if let Some((i, _)) = best {
            self.positions.swap(m, i);
        }
    }
}

impl LayoutAlgorithm for KKLayout {
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()> {
        let graph = model.graph();
        self.nodes = graph.nodes();
        let n = self.nodes.len();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }

        randomize_positions(model, &mut self.rng);
        self.positions = self.nodes.iter().map(|v| model.get(v)).collect();

        // All-pairs graph distances, disconnected pairs capped relative to the
        // connected diameter.
        let mut dist = vec![f64::INFINITY; n * n];
        let mut diameter: f64 = 1.0;
        for (i, v) in self.nodes.iter().enumerate() {
            let from_v: FxHashMap<String, usize> = bfs_distances(graph.as_ref(), v);
            for (j, u) in self.nodes.iter().enumerate() {
                if let Some(&d) = from_v.get(u) {
                    dist[i * n + j] = d as f64;
                    diameter = diameter.max(d as f64);
                }
            }
        }
        let disconnected = diameter * self.config.disconnected_multiplier;
        for d in dist.iter_mut() {
            if !d.is_finite() {
                *d = disconnected;
            }
        }

        let width = model.width() as f64;
        let height = model.height() as f64;
        let length = self.config.length_factor * width.min(height) / diameter;

        self.lij = vec![0.0; n * n];
        self.kij = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = dist[i * n + j].max(EPSILON_DISTANCE);
                self.lij[i * n + j] = length * d;
                self.kij[i * n + j] = 1.0 / (d * d);
            }
        }
        self.iteration = 0;
        Ok(())
    }
}

impl IterativeLayout for KKLayout {
    fn step(&mut self, model: &mut LayoutModel) -> Result<()> {
        self.iteration += 1;
        let n = self.n();
        if n < 2 {
            return Ok(());
        }

        let movable: Vec<bool> = self.nodes.iter().map(|v| !model.is_locked(v)).collect();

        let mut target: Option<(usize, f64)> = None;
        for m in 0..n {
            if !movable[m] {
                continue;
            }
            let (gx, gy) = self.gradient(m);
            let norm = (gx * gx + gy * gy).sqrt();
            match target {
                Some((_, best)) if norm <= best => {}
                _ => target = Some((m, norm)),
            }
        }
        let Some((m, norm)) = target else {
            return Ok(());
        };

        if norm > self.config.exchange_epsilon {
            // Slide the steepest node downhill until its own gradient flattens.
            for _ in 0..100 {
                self.newton_move(m);
                let (gx, gy) = self.gradient(m);
                if (gx * gx + gy * gy).sqrt() < self.config.exchange_epsilon {
                    break;
                }
            }
        } else {
            self.exchange(m, &movable);
        }

        if self.config.adjust_for_gravity {
            let count = self.positions.len() as f64;
            let cx = self.positions.iter().map(|p| p.x).sum::<f64>() / count;
            let cy = self.positions.iter().map(|p| p.y).sum::<f64>() / count;
            let dx = model.width() as f64 / 2.0 - cx;
            let dy = model.height() as f64 / 2.0 - cy;
            for (i, p) in self.positions.iter_mut().enumerate() {
                if movable[i] {
                    p.x += dx;
                    p.y += dy;
                }
            }
        }

        for (i, v) in self.nodes.iter().enumerate() {
            if !movable[i] {
                // Re-sync our copy so a node locked mid-relaxation stops moving
                // in the internal state as well.
                self.positions[i] = model.get(v);
                continue;
            }
            let p = ensure_finite(v, point(self.positions[i].x, self.positions[i].y))?;
            model.set(v, p);
        }
        if self.done() {
            tracing::debug!(iteration = self.iteration, "kamada-kawai budget exhausted");
        }
        Ok(())
    }

    fn done(&self) -> bool {
        self.iteration > self.config.max_iterations
    }
}
