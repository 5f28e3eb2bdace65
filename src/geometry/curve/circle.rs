use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::bounding_box::Aabb;
use crate::math::{Point2, Vector2};

use super::{Arc, Curve};

/// A full circle.
///
/// Traversal starts at angle 0 (`center + (radius, 0)`) and runs
/// counter-clockwise back to the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    /// Creates a new circle.
    #[must_use]
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The circle as an arc spanning a full counter-clockwise turn.
    #[must_use]
    pub fn as_arc(&self) -> Arc {
        Arc::new(self.center, self.radius, 0.0, TAU)
    }
}

impl Curve for Circle {
    fn start_point(&self) -> Point2 {
        Point2::new(self.center.x + self.radius, self.center.y)
    }

    fn end_point(&self) -> Point2 {
        self.start_point()
    }

    fn start_tangent(&self) -> Option<Vector2> {
        (self.radius > 0.0).then(|| Vector2::new(0.0, 1.0))
    }

    fn end_tangent(&self) -> Option<Vector2> {
        self.start_tangent()
    }

    fn bounding_box(&self) -> Aabb {
        let r = Vector2::new(self.radius.abs(), self.radius.abs());
        Aabb::new(self.center - r, self.center + r)
    }

    fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        self.as_arc().tessellate(tolerance)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        if !crate::math::is_finite_point(&self.center) || !self.radius.is_finite() {
            return Err(GeometryError::NonFinite("circle").into());
        }
        if self.radius <= tolerance {
            return Err(GeometryError::Degenerate(format!(
                "circle radius {} is not positive",
                self.radius
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_and_ends_at_angle_zero() {
        let c = Circle::new(Point2::new(2.0, 3.0), 1.5);
        assert_eq!(c.start_point(), Point2::new(3.5, 3.0));
        assert_eq!(c.end_point(), c.start_point());
        assert!(c.is_closed());
    }

    #[test]
    fn bounding_box_is_square() {
        let bb = Circle::new(Point2::new(0.0, 0.0), 2.0).bounding_box();
        assert_eq!(bb.min, Point2::new(-2.0, -2.0));
        assert_eq!(bb.max, Point2::new(2.0, 2.0));
    }

    #[test]
    fn tessellation_closes() {
        let c = Circle::new(Point2::new(0.0, 0.0), 10.0);
        let pts = c.tessellate(0.01);
        assert!(pts.len() > 16);
        assert!((pts[0] - pts[pts.len() - 1]).norm() < 1e-9);
    }

    #[test]
    fn non_positive_radius_is_degenerate() {
        assert!(Circle::new(Point2::new(0.0, 0.0), 0.0).check_degenerate(1e-6).is_err());
        assert!(Circle::new(Point2::new(0.0, 0.0), 1.0).check_degenerate(1e-6).is_ok());
    }
}
