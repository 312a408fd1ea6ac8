//! 2D geometry primitives shared by every layout algorithm.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(point(x, y), euclid::size2(width, height))
}

/// A point in polar coordinates about some caller-chosen origin.
///
/// The radial tree layout keeps one of these per node so consumers can draw
/// along rings and spokes instead of reconstructing angles from Cartesian
/// positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarPoint {
    /// Angle in radians, measured counterclockwise from the positive x axis.
    pub theta: f64,
    pub radius: f64,
}

impl PolarPoint {
    pub fn new(theta: f64, radius: f64) -> Self {
        Self { theta, radius }
    }

    pub fn to_cartesian(self, origin: Point) -> Point {
        origin + vector(self.radius * self.theta.cos(), self.radius * self.theta.sin())
    }

    pub fn from_cartesian(p: Point, origin: Point) -> Self {
        let d = p - origin;
        Self {
            theta: d.y.atan2(d.x),
            radius: d.length(),
        }
    }
}
