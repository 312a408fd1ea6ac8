//! Graph container APIs used by `medusa`.
//!
//! This crate holds the `Graph` container the layout engine's tests and callers
//! build their inputs with. The engine itself only sees graphs through the
//! `medusa::LayoutGraph` trait, so any structure with node/edge enumeration and
//! adjacency queries can stand in for this one.

#![forbid(unsafe_code)]

mod graph;

pub use graph::{Edge, Graph, GraphOptions};
