use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::geometry::Point;


/// Maps normalized [0,1]² positions onto a fixed canvas with margins, and back
///
/// canvas = margin + normalized * (size - 2 * margin), per axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    width: f64,
    height: f64,
    margin: f64,
}

impl Projector {

    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self { width, height, margin }
    }

    pub fn from_config(canvas: &CanvasConfig) -> Self {
        Self::new(canvas.width, canvas.height, canvas.margin)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// Normalized model position to canvas coordinates
    pub fn forward(&self, normalized: &Point) -> Point {
        Point {
            x: self.margin + normalized.x * self.usable_width(),
            y: self.margin + normalized.y * self.usable_height(),
        }
    }

    /// Canvas coordinates to normalized model position
    /// A degenerate usable size maps everything to 0 on that axis
    pub fn inverse(&self, canvas: &Point) -> Point {
        let axis = |value: f64, usable: f64| {
            if usable > 0.0 { (value - self.margin) / usable } else { 0.0 }
        };
        Point {
            x: axis(canvas.x, self.usable_width()),
            y: axis(canvas.y, self.usable_height()),
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_corners() {
        let projector = Projector::new(1000.0, 700.0, 150.0);
        assert_eq!(projector.forward(&Point::new(0.0, 0.0)), Point::new(150.0, 150.0));
        assert_eq!(projector.forward(&Point::new(1.0, 1.0)), Point::new(850.0, 550.0));
        assert_eq!(projector.forward(&Point::new(0.5, 0.5)), Point::new(500.0, 350.0));
    }

    #[test]
    fn test_round_trip() {
        let projector = Projector::new(1000.0, 700.0, 150.0);
        let steps = 20;
        for i in 0..=steps {
            for j in 0..=steps {
                let p = Point::new(i as f64 / steps as f64, j as f64 / steps as f64);
                let back = projector.inverse(&projector.forward(&p));
                assert!((back.x - p.x).abs() < 1e-6, "{p:?} -> {back:?}");
                assert!((back.y - p.y).abs() < 1e-6, "{p:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_repeated_round_trips_do_not_drift() {
        let projector = Projector::new(640.0, 480.0, 37.5);
        let start = Point::new(0.123456, 0.987654);
        let mut p = start;
        for _ in 0..1000 {
            p = projector.inverse(&projector.forward(&p));
        }
        assert!((p.x - start.x).abs() < 1e-6);
        assert!((p.y - start.y).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_outside_usable_area() {
        let projector = Projector::new(1000.0, 700.0, 150.0);
        let p = projector.inverse(&Point::new(0.0, 700.0));
        assert!(p.x < 0.0);
        assert!(p.y > 1.0);
    }

    #[test]
    fn test_degenerate_usable_area() {
        let projector = Projector::new(100.0, 100.0, 50.0);
        assert_eq!(projector.inverse(&Point::new(80.0, 20.0)), Point::new(0.0, 0.0));
    }
}
