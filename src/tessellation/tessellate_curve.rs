use crate::math::{distance_sq, Point2};

/// Depth cap for adaptive subdivision of a single starting interval.
const MAX_FLATTEN_DEPTH: u32 = 16;

/// Flattens a parametric curve over `[t0, t1]` into a point list.
///
/// The range is first split into `min_segments` equal intervals; each
/// interval is then bisected while the curve point at its middle deviates
/// from the chord by more than `tolerance`. The first and last points are
/// `eval(t0)` and `eval(t1)`.
pub fn flatten_parametric<F>(eval: F, t0: f64, t1: f64, tolerance: f64, min_segments: u32) -> Vec<Point2>
where
    F: Fn(f64) -> Point2,
{
    let segments = min_segments.max(1);
    let mut points = vec![eval(t0)];
    if t0.is_nan() || t1.is_nan() || t1 <= t0 || tolerance <= 0.0 {
        points.push(eval(t1));
        return points;
    }

    let tol_sq = tolerance * tolerance;
    let step = (t1 - t0) / f64::from(segments);
    for i in 0..segments {
        let a = t0 + step * f64::from(i);
        let b = if i + 1 == segments { t1 } else { a + step };

        // Depth-first with an explicit stack; right halves are pushed first
        // so points come out in parameter order.
        let mut stack = vec![(a, eval(a), b, eval(b), 0_u32)];
        while let Some((ta, pa, tb, pb, depth)) = stack.pop() {
            let tm = 0.5 * (ta + tb);
            let pm = eval(tm);
            let deviation = crate::math::distance_2d::point_to_segment_dist(&pm, &pa, &pb);
            if depth < MAX_FLATTEN_DEPTH && deviation * deviation > tol_sq {
                stack.push((tm, pm, tb, pb, depth + 1));
                stack.push((ta, pa, tm, pm, depth + 1));
            } else {
                points.push(pb);
            }
        }
    }
    points
}

/// Appends a run of points to a polyline, skipping the run's first point
/// when it duplicates the polyline's last point.
pub fn append_polyline(polyline: &mut Vec<Point2>, run: &[Point2], tolerance: f64) {
    let mut iter = run.iter();
    if let (Some(last), Some(first)) = (polyline.last(), run.first()) {
        if distance_sq(last, first) <= tolerance * tolerance {
            iter.next();
        }
    }
    polyline.extend(iter.copied());
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn straight_curve_needs_no_refinement() {
        let pts = flatten_parametric(|t| Point2::new(t, 2.0 * t), 0.0, 1.0, 1e-3, 4);
        assert_eq!(pts.len(), 5);
        assert_abs_diff_eq!(pts[4].y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn parabola_is_refined_in_order() {
        let pts = flatten_parametric(|t| Point2::new(t, t * t), -1.0, 1.0, 1e-4, 2);
        assert!(pts.len() > 20);
        for w in pts.windows(2) {
            assert!(w[1].x > w[0].x);
        }
        assert_abs_diff_eq!(pts[0].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[pts.len() - 1].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_range_yields_endpoints() {
        let pts = flatten_parametric(|t| Point2::new(t, 0.0), 1.0, 1.0, 1e-3, 4);
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn append_skips_shared_point() {
        let mut poly = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        append_polyline(&mut poly, &[Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)], 1e-9);
        assert_eq!(poly.len(), 3);
        append_polyline(&mut poly, &[Point2::new(2.0, 2.0)], 1e-9);
        assert_eq!(poly.len(), 4);
    }
}
