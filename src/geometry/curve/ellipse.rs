use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::bounding_box::Aabb;
use crate::math::arc_2d::angle_in_span;
use crate::math::{left_normal, Point2, Vector2, EPSILON};
use crate::tessellation::flatten_parametric;

use super::Curve;

/// Minimum number of chords an ellipse is split into before adaptive
/// refinement.
const MIN_ELLIPSE_SEGMENTS: u32 = 8;

/// An ellipse or elliptical arc in the plane.
///
/// `P(t) = center + cos(t) * major_axis + sin(t) * ratio * perp(major_axis)`
/// where `perp` rotates by +90°. The parameter runs counter-clockwise from
/// `start_param` to `end_param`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    center: Point2,
    major_axis: Vector2,
    ratio: f64,
    start_param: f64,
    end_param: f64,
}

impl Ellipse {
    /// Creates an elliptical arc.
    ///
    /// `major_axis` points from the center to the end of the major axis and
    /// `ratio` is the minor/major length ratio. An `end_param` at or before
    /// `start_param` wraps by a full turn, so equal parameters describe a
    /// full ellipse.
    #[must_use]
    pub fn new(center: Point2, major_axis: Vector2, ratio: f64, start_param: f64, end_param: f64) -> Self {
        let mut end = end_param;
        if end <= start_param {
            end += TAU * ((start_param - end) / TAU).floor().max(0.0) + TAU;
        }
        if end - start_param > TAU {
            end = start_param + TAU;
        }
        Self {
            center,
            major_axis,
            ratio,
            start_param,
            end_param: end,
        }
    }

    /// Creates a full ellipse.
    #[must_use]
    pub fn full(center: Point2, major_axis: Vector2, ratio: f64) -> Self {
        Self::new(center, major_axis, ratio, 0.0, TAU)
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[must_use]
    pub fn major_axis(&self) -> Vector2 {
        self.major_axis
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    #[must_use]
    pub fn start_param(&self) -> f64 {
        self.start_param
    }

    #[must_use]
    pub fn end_param(&self) -> f64 {
        self.end_param
    }

    /// Returns `true` when the parameter span covers a full turn.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.end_param - self.start_param >= TAU - 1e-9
    }

    fn minor_axis(&self) -> Vector2 {
        left_normal(&self.major_axis) * self.ratio
    }

    /// Evaluates the ellipse at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.center + self.major_axis * t.cos() + self.minor_axis() * t.sin()
    }

    /// Derivative with respect to the parameter.
    #[must_use]
    pub fn derivative_at(&self, t: f64) -> Vector2 {
        -self.major_axis * t.sin() + self.minor_axis() * t.cos()
    }
}

impl Curve for Ellipse {
    fn start_point(&self) -> Point2 {
        self.point_at(self.start_param)
    }

    fn end_point(&self) -> Point2 {
        self.point_at(self.end_param)
    }

    fn start_tangent(&self) -> Option<Vector2> {
        self.derivative_at(self.start_param).try_normalize(EPSILON)
    }

    fn end_tangent(&self) -> Option<Vector2> {
        self.derivative_at(self.end_param).try_normalize(EPSILON)
    }

    fn bounding_box(&self) -> Aabb {
        let mut bb = Aabb::new(self.start_point(), self.end_point());
        let m = self.major_axis;
        let n = self.minor_axis();
        // dx/dt = 0 and dy/dt = 0 in closed form; each has two roots π apart.
        let tx = n.x.atan2(m.x);
        let ty = n.y.atan2(m.y);
        let sweep = self.end_param - self.start_param;
        for t in [tx, tx + PI, ty, ty + PI] {
            if angle_in_span(t, self.start_param, sweep, 0.0).is_some() {
                bb.include(&self.point_at(t));
            }
        }
        bb
    }

    fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = flatten_parametric(
            |t| self.point_at(t),
            self.start_param,
            self.end_param,
            tolerance,
            MIN_ELLIPSE_SEGMENTS,
        );
        if self.is_full() {
            // Close exactly on the start point.
            if let Some(last) = points.last_mut() {
                *last = self.start_point();
            }
        }
        points
    }

    fn is_closed(&self) -> bool {
        self.is_full()
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        if !crate::math::is_finite_point(&self.center)
            || !self.major_axis.x.is_finite()
            || !self.major_axis.y.is_finite()
            || !self.ratio.is_finite()
            || !self.start_param.is_finite()
            || !self.end_param.is_finite()
        {
            return Err(GeometryError::NonFinite("ellipse").into());
        }
        let major = self.major_axis.norm();
        if major <= tolerance {
            return Err(GeometryError::Degenerate("ellipse major axis has zero length".into()).into());
        }
        if self.ratio <= 0.0 || major * self.ratio <= tolerance {
            return Err(GeometryError::Degenerate(format!(
                "ellipse axis ratio {} is not positive",
                self.ratio
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn unit_ellipse() -> Ellipse {
        Ellipse::full(Point2::new(0.0, 0.0), Vector2::new(2.0, 0.0), 0.5)
    }

    #[test]
    fn evaluates_axes() {
        let e = unit_ellipse();
        let p0 = e.point_at(0.0);
        let p1 = e.point_at(FRAC_PI_2);
        assert_abs_diff_eq!(p0.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p1.y, 1.0, epsilon = 1e-12);
        assert!(e.is_closed());
    }

    #[test]
    fn wraps_end_parameter() {
        let e = Ellipse::new(Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0), 1.0, 1.0, 0.5);
        assert_abs_diff_eq!(e.end_param(), 0.5 + TAU, epsilon = 1e-12);
        assert!(!e.is_full());
    }

    #[test]
    fn rotated_bounding_box_is_tight() {
        // Major axis along 45°: the box is symmetric.
        let s = std::f64::consts::FRAC_1_SQRT_2 * 2.0;
        let e = Ellipse::full(Point2::new(1.0, 1.0), Vector2::new(s, s), 0.5);
        let bb = e.bounding_box();
        // Half-width = sqrt(a² cos² + b² sin²) with a = 2, b = 1.
        let half = (4.0 * 0.5 + 1.0 * 0.5_f64).sqrt();
        assert_abs_diff_eq!(bb.max.x - 1.0, half, epsilon = 1e-9);
        assert_abs_diff_eq!(bb.min.y - 1.0, -half, epsilon = 1e-9);
    }

    #[test]
    fn tessellation_stays_within_tolerance() {
        let e = unit_ellipse();
        let tol = 1e-3;
        let pts = e.tessellate(tol);
        assert!(pts.len() > MIN_ELLIPSE_SEGMENTS as usize);
        assert_abs_diff_eq!(pts[0].x, pts[pts.len() - 1].x, epsilon = 1e-12);
        for w in pts.windows(2) {
            // Each chord midpoint is close to the curve: (x/2)² + y² ≈ 1.
            let m = crate::math::midpoint(&w[0], &w[1]);
            let r = (m.x / 2.0).powi(2) + m.y.powi(2);
            assert!((1.0 - r).abs() < 10.0 * tol, "r={r}");
        }
    }

    #[test]
    fn zero_ratio_is_degenerate() {
        let e = Ellipse::full(Point2::new(0.0, 0.0), Vector2::new(2.0, 0.0), 0.0);
        assert!(e.check_degenerate(1e-6).is_err());
        assert!(unit_ellipse().check_degenerate(1e-6).is_ok());
    }
}
