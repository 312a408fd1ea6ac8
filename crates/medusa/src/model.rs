//! The mutable node→position model every algorithm writes into.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithms::LayoutAlgorithm;
use crate::error::{Error, Result};
use crate::geom::{Point, point};
use crate::graph::LayoutGraph;

/// Node positions plus the bounded plane they live in.
///
/// The model is the single mutable resource of the engine: the active algorithm
/// writes positions through `set`, renderers read them back through `get` at any
/// time. Locking (per node or global) turns `set` into a no-op, which is how
/// pinned nodes keep their place while still acting as obstacles in the force
/// passes.
pub struct LayoutModel {
    graph: Arc<dyn LayoutGraph + Send + Sync>,
    width: u32,
    height: u32,
    locations: FxHashMap<String, Point>,
    locked_nodes: FxHashSet<String>,
    locked: bool,
}

impl LayoutModel {
    pub fn new(graph: Arc<dyn LayoutGraph + Send + Sync>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidSize { width, height });
        }
        Ok(Self {
            graph,
            width,
            height,
            locations: FxHashMap::default(),
            locked_nodes: FxHashSet::default(),
            locked: false,
        })
    }

    pub fn graph(&self) -> Arc<dyn LayoutGraph + Send + Sync> {
        Arc::clone(&self.graph)
    }

    /// Snapshot of the graph's node set.
    pub fn nodes(&self) -> Vec<String> {
        self.graph.nodes()
    }

    /// Snapshot of the graph's edge set.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.graph.edges()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current location of `node`, defaulting to the origin for nodes that have
    /// never been placed.
    pub fn get(&self, node: &str) -> Point {
        self.locations
            .get(node)
            .copied()
            .unwrap_or_else(|| point(0.0, 0.0))
    }

    pub fn set(&mut self, node: &str, p: Point) {
        if self.locked || self.locked_nodes.contains(node) {
            return;
        }
        self.locations.insert(node.to_string(), p);
    }

    pub fn set_xy(&mut self, node: &str, x: f64, y: f64) {
        self.set(node, point(x, y));
    }

    /// Resize the plane, shifting every stored location by half the size delta
    /// so the drawing stays centered. A no-op when the size is unchanged.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidSize { width, height });
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        let dx = (width as f64 - self.width as f64) / 2.0;
        let dy = (height as f64 - self.height as f64) / 2.0;
        for p in self.locations.values_mut() {
            p.x += dx;
            p.y += dy;
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Freeze or unfreeze every node at once.
    pub fn lock(&mut self, on: bool) {
        self.locked = on;
    }

    pub fn lock_node(&mut self, node: &str, on: bool) {
        if on {
            self.locked_nodes.insert(node.to_string());
        } else {
            self.locked_nodes.remove(node);
        }
    }

    pub fn is_locked(&self, node: &str) -> bool {
        self.locked || self.locked_nodes.contains(node)
    }

    /// All stored locations, for bulk reads by a renderer.
    pub fn locations(&self) -> &FxHashMap<String, Point> {
        &self.locations
    }

    /// Hand position assignment over to an algorithm.
    pub fn accept(&mut self, algorithm: &mut dyn LayoutAlgorithm) -> Result<()> {
        algorithm.visit(self)
    }
}

impl std::fmt::Debug for LayoutModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutModel")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("nodes", &self.locations.len())
            .field("locked", &self.locked)
            .finish()
    }
}

/// A `LayoutModel` shared between a relaxer thread and any number of readers.
///
/// The mutex makes each `step()` the unit of atomicity: a reader that takes the
/// lock between steps always sees fully written coordinate pairs. The wrapper
/// also remembers the stop token of the relaxer currently driving the model so
/// that starting a new relaxer silently stops the previous one.
#[derive(Clone)]
pub struct SharedLayoutModel {
    inner: Arc<Mutex<LayoutModel>>,
    active: Arc<Mutex<Option<Arc<AtomicBool>>>>,
}

impl SharedLayoutModel {
    pub fn new(model: LayoutModel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, LayoutModel> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Convenience read for renderers that only need a single position.
    pub fn get(&self, node: &str) -> Point {
        self.lock().get(node)
    }

    pub(crate) fn replace_active(&self, stop: Arc<AtomicBool>) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.replace(stop) {
            previous.store(true, Ordering::Relaxed);
        }
    }
}
