use num_traits::Float;
use serde::{Deserialize, Serialize};


/// Euclidean distance
pub fn euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Linear interpolation between a and b, t = 0 gives a and t = 1 gives b
pub fn lerp<T>(a: T, b: T, t: T) -> T
where
    T: Float,
    {
    a + (b - a) * t
}


/// 2D Point
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        euclidean(self.x, self.y, other.x, other.y)
    }

    /// Point halfway between self and other
    pub fn midpoint(&self, other: &Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Point at fraction t along the line from self to other
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
        }
    }
}


/// Directed line segment with its cached length
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub length: f64,
}

impl Segment {

    pub fn new(start: Point, end: Point) -> Self {
        let length = start.distance(&end);
        Self { start, end, length }
    }

    /// Point at a distance along the segment, clamped to its endpoints
    pub fn point_at(&self, distance: f64) -> Point {
        if self.length <= 0.0 {
            return self.start;
        }
        let t = (distance / self.length).clamp(0.0, 1.0);
        self.start.lerp(&self.end, t)
    }
}
