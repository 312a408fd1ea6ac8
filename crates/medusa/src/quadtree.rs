//! Barnes-Hut quadtree: approximate pairwise repulsion in O(n log n).
//!
//! The tree is rebuilt from the latest positions every simulation step. That is
//! cheaper than it sounds (construction is O(n log n) itself) and sidesteps
//! stale-partition bugs when nodes move between steps.

use crate::geom::{Point, Rect, Vector, point, rect, vector};

/// Cells narrower than this never split further; coincident bodies stack up in
/// one leaf instead of recursing forever.
const MIN_CELL_EXTENT: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct Body {
    pub id: String,
    pub position: Point,
    pub mass: f64,
}

impl Body {
    pub fn new(id: impl Into<String>, position: Point, mass: f64) -> Self {
        Self {
            id: id.into(),
            position,
            mass,
        }
    }
}

#[derive(Debug)]
struct Cell {
    bounds: Rect,
    mass: f64,
    /// Mass-weighted position sum; centroid = weighted / mass.
    weighted: Vector,
    occupants: Vec<Body>,
    children: Option<Box<[Cell; 4]>>,
}

impl Cell {
    fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            mass: 0.0,
            weighted: vector(0.0, 0.0),
            occupants: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, body: Body) {
        self.mass += body.mass;
        self.weighted += body.position.to_vector() * body.mass;

        if self.children.is_some() {
            self.insert_into_child(body);
            return;
        }

        if self.occupants.is_empty() {
            self.occupants.push(body);
            return;
        }

        let coincident =
            (self.occupants[0].position - body.position).square_length() < MIN_CELL_EXTENT;
        if coincident || self.bounds.width() <= MIN_CELL_EXTENT {
            self.occupants.push(body);
            return;
        }

        self.split();
        for resident in std::mem::take(&mut self.occupants) {
            self.insert_into_child(resident);
        }
        self.insert_into_child(body);
    }

    fn split(&mut self) {
        let x = self.bounds.min_x();
        let y = self.bounds.min_y();
        let hw = self.bounds.width() / 2.0;
        let hh = self.bounds.height() / 2.0;
        self.children = Some(Box::new([
            Cell::new(rect(x, y, hw, hh)),
            Cell::new(rect(x + hw, y, hw, hh)),
            Cell::new(rect(x, y + hh, hw, hh)),
            Cell::new(rect(x + hw, y + hh, hw, hh)),
        ]));
    }

    fn insert_into_child(&mut self, body: Body) {
        let cx = self.bounds.min_x() + self.bounds.width() / 2.0;
        let cy = self.bounds.min_y() + self.bounds.height() / 2.0;
        let idx = (body.position.x >= cx) as usize + 2 * ((body.position.y >= cy) as usize);
        if let Some(children) = self.children.as_mut() {
            children[idx].insert(body);
        }
    }

    fn centroid(&self) -> Point {
        point(self.weighted.x / self.mass, self.weighted.y / self.mass)
    }

    fn visit<F: FnMut(Point, f64)>(&self, probe_id: &str, probe: Point, theta: f64, f: &mut F) {
        if self.mass == 0.0 {
            return;
        }
        match &self.children {
            None => {
                for body in &self.occupants {
                    if body.id != probe_id {
                        f(body.position, body.mass);
                    }
                }
            }
            Some(children) => {
                let centroid = self.centroid();
                let distance = (centroid - probe).length();
                if distance > 0.0 && self.bounds.width() / distance < theta {
                    f(centroid, self.mass);
                } else {
                    for child in children.iter() {
                        child.visit(probe_id, probe, theta, f);
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct QuadTree {
    root: Cell,
}

impl QuadTree {
    /// Partition `bodies` over `bounds`. Bodies that drifted outside the bounds
    /// are clamped onto them for partitioning only; their stored positions are
    /// untouched.
    pub fn build(bodies: impl IntoIterator<Item = Body>, bounds: Rect) -> Self {
        let mut root = Cell::new(bounds);
        for mut body in bodies {
            body.position = point(
                body.position.x.clamp(bounds.min_x(), bounds.max_x()),
                body.position.y.clamp(bounds.min_y(), bounds.max_y()),
            );
            root.insert(body);
        }
        Self { root }
    }

    pub fn total_mass(&self) -> f64 {
        self.root.mass
    }

    /// Report every force contributor for `probe`: each nearby body
    /// individually, and each sufficiently distant cell as one aggregate at its
    /// center of mass. A cell counts as distant when its width over the
    /// distance to the probe is below `theta`. The probe's own body is skipped.
    pub fn visit<F: FnMut(Point, f64)>(&self, probe_id: &str, probe: Point, theta: f64, mut f: F) {
        self.root.visit(probe_id, probe, theta, &mut f);
    }
}
