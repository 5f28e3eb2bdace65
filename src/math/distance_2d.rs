use super::arc_2d::{angle_in_span, ArcSpan};
use super::Point2;

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;
    (p - closest).norm()
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle (relative to center) falls within the arc range,
/// the distance is `||point - center| - radius|`.
/// Otherwise, the distance is the minimum of the distances to the two arc endpoints.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, arc: &ArcSpan) -> f64 {
    let rel = p - arc.center;
    let dist_to_center = rel.norm();

    let angle = rel.y.atan2(rel.x);
    if angle_in_span(angle, arc.start_angle, arc.sweep, 1e-10).is_some() {
        return (dist_to_center - arc.radius).abs();
    }

    let d0 = (p - arc.start_point()).norm();
    let d1 = (p - arc.end_point()).norm();
    d0.min(d1)
}

/// Returns the minimum distance from `p` to the boundary of a closed polygon.
#[must_use]
pub fn point_to_polygon_dist(p: &Point2, polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    match n {
        0 => f64::INFINITY,
        1 => (p - polygon[0]).norm(),
        _ => (0..n)
            .map(|i| point_to_segment_dist(p, &polygon[i], &polygon[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const TOL: f64 = 1e-10;

    fn upper_half() -> ArcSpan {
        ArcSpan {
            center: Point2::new(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI,
        }
    }

    #[test]
    fn segment_dist_perpendicular_projection() {
        let d = point_to_segment_dist(&Point2::new(1.0, 1.0), &Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        let d = point_to_segment_dist(&Point2::new(-1.0, 0.0), &Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        let o = Point2::new(0.0, 0.0);
        let d = point_to_segment_dist(&Point2::new(3.0, 4.0), &o, &o);
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_in_range() {
        let d = point_to_arc_dist(&Point2::new(0.0, 2.0), &upper_half());
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn arc_dist_outside_range() {
        // Angle -π/2 is not on the upper half; nearest are the endpoints.
        let d = point_to_arc_dist(&Point2::new(0.0, -2.0), &upper_half());
        assert!((d - 5.0_f64.sqrt()).abs() < 1e-9, "d={d}");
    }

    #[test]
    fn arc_dist_at_center() {
        let d = point_to_arc_dist(&Point2::new(0.0, 0.0), &upper_half());
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn polygon_dist_inside_square() {
        let sq = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let d = point_to_polygon_dist(&Point2::new(2.0, 5.0), &sq);
        assert!((d - 2.0).abs() < TOL, "d={d}");
    }
}
