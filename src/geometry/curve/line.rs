use crate::error::{GeometryError, Result};
use crate::geometry::bounding_box::Aabb;
use crate::math::{Point2, Vector2};

use super::Curve;

/// A straight line segment from `start` to `end`.
///
/// The parametric form is `P(t) = start + t * (end - start)` for `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    /// Creates a new line segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Vector from start to end.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.delta().norm()
    }

    /// Evaluates the segment at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + self.delta() * t
    }

    /// Returns the segment with start and end swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    fn direction(&self) -> Option<Vector2> {
        self.delta().try_normalize(crate::math::EPSILON)
    }
}

impl Curve for Line {
    fn start_point(&self) -> Point2 {
        self.start
    }

    fn end_point(&self) -> Point2 {
        self.end
    }

    fn start_tangent(&self) -> Option<Vector2> {
        self.direction()
    }

    fn end_tangent(&self) -> Option<Vector2> {
        self.direction()
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::new(self.start, self.end)
    }

    fn tessellate(&self, _tolerance: f64) -> Vec<Point2> {
        vec![self.start, self.end]
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        if !crate::math::is_finite_point(&self.start) || !crate::math::is_finite_point(&self.end) {
            return Err(GeometryError::NonFinite("line").into());
        }
        if self.delta().norm_squared() <= tolerance * tolerance {
            return Err(GeometryError::Degenerate("zero-length line".into()).into());
        }
        Ok(())
    }
}
