//! Core value types for the driving simulation
//!
//! Plain 2D geometry shared by the road, the cars and their sensors.

use serde::{Deserialize, Serialize};

/// Identifier of a car within one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub usize);

/// A 2D position in the simulation
///
/// Screen convention: y grows downwards, so driving "forward" decreases y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Project this point `length` units along `angle`
    ///
    /// Angle 0 points towards -y; positive angles turn left.
    pub fn project(&self, angle: f64, length: f64) -> Point {
        Point {
            x: self.x - angle.sin() * length,
            y: self.y - angle.cos() * length,
        }
    }
}

/// An ordered pair of points: a road border or a sensor ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Crossing point of two segments
///
/// `offset` is the parametric position along the first segment of the test,
/// in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub x: f64,
    pub y: f64,
    pub offset: f64,
}

impl Intersection {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A closed loop of points; edges are consecutive pairs, wrapping last to first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges in order, including the closing edge from the last point back to the first
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }
}

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Closed-interval membership test, `a <= value <= b`
pub fn in_range(a: f64, b: f64, value: f64) -> bool {
    a <= value && value <= b
}

/// Half-height of the road, standing in for an unbounded vertical extent
pub const ROAD_INFINITY: f64 = 2_097_152.0;

/// Default number of lanes on a road
pub const DEFAULT_LANE_COUNT: usize = 3;
