use crate::error::{GeometryError, Result};
use crate::geometry::bounding_box::Aabb;
use crate::math::{Point2, Vector2, EPSILON};
use crate::tessellation::flatten_parametric;

use super::Curve;

/// A (possibly rational) B-spline curve.
///
/// The valid parameter range is `[knots[degree], knots[n]]` where `n` is
/// the number of control points. Structural validity (knot count, knot
/// order, weights) is checked by [`Curve::check_degenerate`] so that a
/// malformed spline is reported rather than rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    degree: usize,
    control_points: Vec<Point2>,
    knots: Vec<f64>,
    weights: Option<Vec<f64>>,
    closed: bool,
}

impl Spline {
    /// Creates a spline from its raw defining data.
    #[must_use]
    pub fn new(
        degree: usize,
        control_points: Vec<Point2>,
        knots: Vec<f64>,
        weights: Option<Vec<f64>>,
        closed: bool,
    ) -> Self {
        Self {
            degree,
            control_points,
            knots,
            weights,
            closed,
        }
    }

    /// Creates a non-rational spline with a clamped uniform knot vector, so
    /// the curve starts at the first and ends at the last control point.
    #[must_use]
    pub fn clamped_uniform(degree: usize, control_points: Vec<Point2>, closed: bool) -> Self {
        let n = control_points.len();
        let mut knots = Vec::with_capacity(n + degree + 1);
        if n > degree {
            let interior = n - degree;
            #[allow(clippy::cast_precision_loss)]
            let last = interior as f64;
            knots.extend(std::iter::repeat(0.0).take(degree + 1));
            for i in 1..interior {
                #[allow(clippy::cast_precision_loss)]
                knots.push(i as f64);
            }
            knots.extend(std::iter::repeat(last).take(degree + 1));
        }
        Self::new(degree, control_points, knots, None, closed)
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[must_use]
    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    #[must_use]
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Whether the drawing flagged this spline as closed.
    #[must_use]
    pub fn closed(&self) -> bool {
        self.closed
    }

    fn is_structurally_valid(&self) -> bool {
        let n = self.control_points.len();
        self.degree >= 1
            && n > self.degree
            && self.knots.len() == n + self.degree + 1
            && self.knots.windows(2).all(|w| w[0] <= w[1])
            && self.knots.iter().all(|k| k.is_finite())
            && self.knots[n] > self.knots[self.degree]
            && self
                .weights
                .as_ref()
                .map_or(true, |w| w.len() == n && w.iter().all(|x| x.is_finite() && *x > 0.0))
    }

    /// Parameter range `(t0, t1)`, or `None` for a malformed spline.
    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.is_structurally_valid()
            .then(|| (self.knots[self.degree], self.knots[self.control_points.len()]))
    }

    /// Evaluates the curve with de Boor's algorithm in homogeneous
    /// coordinates. Returns `None` for a malformed spline or a parameter
    /// outside the domain.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Option<Point2> {
        let (t0, t1) = self.domain()?;
        if !(t0..=t1).contains(&t) {
            return None;
        }
        let p = self.degree;
        let n = self.control_points.len();

        // Knot span k with knots[k] <= t < knots[k+1], kept inside [p, n-1].
        let mut k = p;
        while k + 1 < n && self.knots[k + 1] <= t {
            k += 1;
        }

        let weight = |i: usize| self.weights.as_ref().map_or(1.0, |w| w[i]);
        let mut d: Vec<[f64; 3]> = (0..=p)
            .map(|j| {
                let i = j + k - p;
                let w = weight(i);
                let cp = self.control_points[i];
                [cp.x * w, cp.y * w, w]
            })
            .collect();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let lo = self.knots[j + k - p];
                let hi = self.knots[j + 1 + k - r];
                let denom = hi - lo;
                let alpha = if denom.abs() < EPSILON { 0.0 } else { (t - lo) / denom };
                for c in 0..3 {
                    d[j][c] = (1.0 - alpha) * d[j - 1][c] + alpha * d[j][c];
                }
            }
        }

        let [x, y, w] = d[p];
        if w.abs() < EPSILON {
            return None;
        }
        let point = Point2::new(x / w, y / w);
        crate::math::is_finite_point(&point).then_some(point)
    }

    fn fallback_point(&self, first: bool) -> Point2 {
        let cp = if first {
            self.control_points.first()
        } else {
            self.control_points.last()
        };
        cp.copied().unwrap_or_else(Point2::origin)
    }

    /// Finite-difference tangent at one end of the domain.
    fn end_direction(&self, at_start: bool) -> Option<Vector2> {
        let (t0, t1) = self.domain()?;
        let h = (t1 - t0) * 1e-6;
        let (a, b) = if at_start { (t0, t0 + h) } else { (t1 - h, t1) };
        let pa = self.evaluate(a)?;
        let pb = self.evaluate(b)?;
        (pb - pa).try_normalize(EPSILON)
    }
}

impl Curve for Spline {
    fn start_point(&self) -> Point2 {
        self.domain()
            .and_then(|(t0, _)| self.evaluate(t0))
            .unwrap_or_else(|| self.fallback_point(true))
    }

    fn end_point(&self) -> Point2 {
        self.domain()
            .and_then(|(_, t1)| self.evaluate(t1))
            .unwrap_or_else(|| self.fallback_point(false))
    }

    fn start_tangent(&self) -> Option<Vector2> {
        self.end_direction(true)
    }

    fn end_tangent(&self) -> Option<Vector2> {
        self.end_direction(false)
    }

    /// Control-hull box. Encloses the curve for positive weights.
    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.control_points).unwrap_or_else(Aabb::empty)
    }

    fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        let Some((t0, t1)) = self.domain() else {
            return Vec::new();
        };
        #[allow(clippy::cast_possible_truncation)]
        let min_segments = (self.control_points.len() * 2).min(1024) as u32;
        flatten_parametric(
            |t| self.evaluate(t.clamp(t0, t1)).unwrap_or_else(|| self.fallback_point(true)),
            t0,
            t1,
            tolerance,
            min_segments,
        )
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        if self.control_points.iter().any(|p| !crate::math::is_finite_point(p)) {
            return Err(GeometryError::NonFinite("spline").into());
        }
        if !self.is_structurally_valid() {
            return Err(GeometryError::Degenerate(format!(
                "spline of degree {} with {} control points, {} knots is malformed",
                self.degree,
                self.control_points.len(),
                self.knots.len()
            ))
            .into());
        }
        let bb = self.bounding_box();
        if bb.width().max(bb.height()) <= tolerance {
            return Err(GeometryError::Degenerate("spline collapses to a point".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn quadratic() -> Spline {
        Spline::clamped_uniform(
            2,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 2.0), Point2::new(2.0, 0.0)],
            false,
        )
    }

    #[test]
    fn clamped_spline_interpolates_ends() {
        let s = quadratic();
        assert_eq!(s.knots(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_abs_diff_eq!(s.start_point().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.end_point().x, 2.0, epsilon = 1e-12);
        // Bezier midpoint: 0.25*P0 + 0.5*P1 + 0.25*P2.
        let mid = s.evaluate(0.5).unwrap();
        assert_abs_diff_eq!(mid.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rational_quarter_circle() {
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let s = Spline::new(
            2,
            vec![Point2::new(1.0, 0.0), Point2::new(1.0, 1.0), Point2::new(0.0, 1.0)],
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            Some(vec![1.0, w, 1.0]),
            false,
        );
        for i in 0..=10 {
            let p = s.evaluate(f64::from(i) / 10.0).unwrap();
            assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn end_tangents_follow_control_polygon() {
        let s = quadratic();
        let t0 = s.start_tangent().unwrap();
        let expected = Vector2::new(1.0, 2.0).normalize();
        assert_abs_diff_eq!(t0.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(t0.y, expected.y, epsilon = 1e-4);
    }

    #[test]
    fn malformed_knots_are_degenerate() {
        let s = Spline::new(
            3,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
            vec![0.0, 1.0],
            None,
            false,
        );
        assert!(s.check_degenerate(1e-3).is_err());
        assert!(s.domain().is_none());
        assert!(s.tessellate(1e-3).is_empty());
        assert!(quadratic().check_degenerate(1e-3).is_ok());
    }

    #[test]
    fn tessellation_is_ordered_and_bounded() {
        let s = quadratic();
        let pts = s.tessellate(1e-3);
        assert!(pts.len() > 4);
        let bb = s.bounding_box();
        for p in &pts {
            assert!(bb.contains_box(&Aabb::new(*p, *p), 1e-12));
        }
        assert_abs_diff_eq!(pts[pts.len() - 1].x, 2.0, epsilon = 1e-12);
    }
}
