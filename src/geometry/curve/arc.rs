use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::bounding_box::Aabb;
use crate::math::arc_2d::{angle_in_span, arc_tangent_at, point_on_circle, ArcSpan};
use crate::math::{Point2, Vector2};
use crate::tessellation::arc_segment_count;

use super::Curve;

/// A circular arc in the plane.
///
/// Defined by a center, radius, start angle, and signed sweep. A positive
/// sweep runs counter-clockwise from `start_angle` to
/// `start_angle + sweep`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    /// Creates a new arc from a start angle and signed sweep.
    #[must_use]
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Creates an arc from start/end angles, the way drawing formats store
    /// them. `ccw` selects the travel direction between the two angles.
    #[must_use]
    pub fn from_angles(center: Point2, radius: f64, start_angle: f64, end_angle: f64, ccw: bool) -> Self {
        let mut sweep = (end_angle - start_angle) % TAU;
        if ccw {
            if sweep <= 0.0 {
                sweep += TAU;
            }
        } else if sweep >= 0.0 {
            sweep -= TAU;
        }
        Self::new(center, radius, start_angle, sweep)
    }

    /// Center-radius-angle description used by the intersection kernels.
    #[must_use]
    pub fn span(&self) -> ArcSpan {
        ArcSpan {
            center: self.center,
            radius: self.radius,
            start_angle: self.start_angle,
            sweep: self.sweep,
        }
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    /// Evaluates the point at an absolute angle.
    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        point_on_circle(&self.center, self.radius, angle)
    }

    /// Returns the arc travelled in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.end_angle(),
            sweep: -self.sweep,
        }
    }

    /// `true` for counter-clockwise travel.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.sweep >= 0.0
    }
}

impl Curve for Arc {
    fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle())
    }

    fn start_tangent(&self) -> Option<Vector2> {
        (self.radius > 0.0).then(|| arc_tangent_at(self.start_angle, self.sweep))
    }

    fn end_tangent(&self) -> Option<Vector2> {
        (self.radius > 0.0).then(|| arc_tangent_at(self.end_angle(), self.sweep))
    }

    fn bounding_box(&self) -> Aabb {
        let mut bb = Aabb::new(self.start_point(), self.end_point());
        // Axis extremes reached inside the span.
        for k in 0..4 {
            let angle = f64::from(k) * FRAC_PI_2;
            if angle_in_span(angle, self.start_angle, self.sweep, 0.0).is_some() {
                bb.include(&self.point_at_angle(angle));
            }
        }
        bb
    }

    fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        let n = arc_segment_count(self.radius, self.sweep.abs(), tolerance);
        let mut points = Vec::with_capacity(n as usize + 1);
        for j in 0..=n {
            let t = f64::from(j) / f64::from(n);
            points.push(self.point_at_angle(self.start_angle + self.sweep * t));
        }
        points
    }

    fn is_closed(&self) -> bool {
        self.sweep.abs() >= TAU - 1e-12
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        if !crate::math::is_finite_point(&self.center)
            || !self.radius.is_finite()
            || !self.start_angle.is_finite()
            || !self.sweep.is_finite()
        {
            return Err(GeometryError::NonFinite("arc").into());
        }
        if self.radius <= tolerance {
            return Err(GeometryError::Degenerate(format!(
                "arc radius {} is not positive",
                self.radius
            ))
            .into());
        }
        if self.radius * self.sweep.abs() <= tolerance {
            return Err(GeometryError::Degenerate("zero-length arc".into()).into());
        }
        Ok(())
    }
}
