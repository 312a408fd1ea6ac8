//! 2D graph layout engine.
//!
//! Computes positions for the nodes of an arbitrary graph so it can be drawn
//! legibly: iterative, physically inspired algorithms (Fruchterman-Reingold,
//! Kamada-Kawai, ISOM, spring embedder, DAG-aware spring) sharing a mutable
//! [`LayoutModel`] and a Barnes-Hut [`quadtree`], plus deterministic
//! structural layouts (circle, tree, radial, balloon, static). The engine
//! neither draws nor reacts to input: it consumes a graph through the
//! [`LayoutGraph`] trait and exposes positions through the model.

#![forbid(unsafe_code)]

pub use medusa_graphlib as graphlib;

pub mod algorithms;
pub mod error;
pub mod geom;
pub mod graph;
pub mod model;
pub mod quadtree;
pub mod relaxer;

pub use algorithms::{IterativeLayout, LayoutAlgorithm};
pub use error::{Error, Result};
pub use graph::LayoutGraph;
pub use model::{LayoutModel, SharedLayoutModel};
pub use relaxer::{LayoutEvent, Relaxer, prerelax};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
