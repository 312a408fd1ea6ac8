//! Layout algorithms.
//!
//! Two families share the [`LayoutModel`]: single-pass structural layouts
//! (circle, tree, radial, balloon, static) that place every node from graph
//! shape alone, and iterative physical layouts (Fruchterman-Reingold,
//! Kamada-Kawai, ISOM, spring embedder and its DAG-aware variant) that refine
//! positions one `step()` at a time under a driver.
//!
//! There is deliberately no base-type chain here: anything implementing
//! [`IterativeLayout`] can be driven by the relaxer, and shared mechanics live
//! in free helpers instead of a common ancestor.

pub mod balloon;
pub mod circle;
pub mod dag;
pub mod fixed;
pub mod fr;
pub mod isom;
pub mod kk;
pub mod radial;
pub mod spring;
pub mod tree;

pub use balloon::{BalloonConfig, BalloonLayout};
pub use circle::{CircleConfig, CircleLayout};
pub use dag::{DagSpringConfig, DagSpringLayout};
pub use fixed::StaticLayout;
pub use fr::{FRConfig, FRLayout};
pub use isom::{ISOMConfig, ISOMLayout};
pub use kk::{KKConfig, KKLayout};
pub use radial::{RadialConfig, RadialTreeLayout};
pub use spring::{SpringConfig, SpringLayout};
pub use tree::{TreeConfig, TreeLayout};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{Error, Result};
use crate::geom::{Point, point};
use crate::model::LayoutModel;

/// One-shot position assignment.
pub trait LayoutAlgorithm {
    /// Take over the model: validate configuration, build per-node caches, and
    /// seed initial positions. Iterative algorithms become steppable after this.
    fn visit(&mut self, model: &mut LayoutModel) -> Result<()>;
}

/// An algorithm refined by repeated discrete steps.
pub trait IterativeLayout: LayoutAlgorithm {
    /// Apply one update to the model. Runs to completion without yielding;
    /// the driver treats it as the unit of atomicity.
    fn step(&mut self, model: &mut LayoutModel) -> Result<()>;

    /// Convergence predicate. Some algorithms (the plain spring embedder)
    /// never converge and report `false` until externally stopped.
    fn done(&self) -> bool;
}

/// Substituted for zero distances so coincident nodes repel finitely instead of
/// dividing by zero.
pub(crate) const EPSILON_DISTANCE: f64 = 1e-6;

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Scatter every unlocked node uniformly over the model's plane.
pub(crate) fn randomize_positions(model: &mut LayoutModel, rng: &mut StdRng) {
    let width = model.width() as f64;
    let height = model.height() as f64;
    for v in model.nodes() {
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);
        model.set(&v, point(x, y));
    }
}

/// NaN or infinity in a computed position is a fatal internal error; it must
/// never be stored where a renderer could pick it up.
pub(crate) fn ensure_finite(node: &str, p: Point) -> Result<Point> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(p)
    } else {
        Err(Error::NonFiniteCoordinate {
            node: node.to_string(),
            x: p.x,
            y: p.y,
        })
    }
}
