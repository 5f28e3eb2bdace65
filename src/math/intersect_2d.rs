//! Raw 2D intersection kernels for segments, circles, and arcs.
//!
//! Parameters on segments run from `0` at the start to `1` at the end.
//! Parameters on arcs are unwrapped angles between `start_angle` and
//! `start_angle + sweep`.
use std::f64::consts::TAU;

use super::arc_2d::{angle_in_span, wrap_tau, ArcSpan};
use super::{cross, distance_sq, Point2, Vector2, EPSILON};

/// A single raw intersection between two primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHit {
    pub point: Point2,
    /// Parameter on the first primitive.
    pub param_a: f64,
    /// Parameter on the second primitive.
    pub param_b: f64,
    /// The primitives touch without crossing.
    pub tangent: bool,
}

/// Outcome of a raw intersection query.
#[derive(Debug, Clone, PartialEq)]
pub enum Crossing {
    /// Zero or more isolated intersection points.
    Points(Vec<RawHit>),
    /// The primitives overlap along a stretch longer than the tolerance.
    Coincident,
}

impl Crossing {
    fn none() -> Self {
        Self::Points(Vec::new())
    }
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let denom = cross(d1, d2);
    if denom * denom <= EPSILON * EPSILON * d1.norm_squared() * d2.norm_squared() {
        return None;
    }
    let w = p2 - p1;
    let t = cross(&w, d2) / denom;
    let u = cross(&w, d1) / denom;
    Some((t, u))
}

/// Bounded segment-segment intersection.
///
/// Parallel segments that overlap by more than `tol` are reported as
/// [`Crossing::Coincident`]; collinear segments touching at a single point
/// yield that point.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    tol: f64,
) -> Crossing {
    let da = a1 - a0;
    let db = b1 - b0;
    let la_sq = da.norm_squared();
    let lb_sq = db.norm_squared();
    let tol_sq = tol * tol;
    if la_sq <= tol_sq || lb_sq <= tol_sq {
        return Crossing::none();
    }

    let denom = cross(&da, &db);
    let w = b0 - a0;

    // Parallel when the angular deviation over the longer segment stays under `tol`.
    if denom * denom * la_sq.max(lb_sq) <= tol_sq * la_sq * lb_sq {
        return collinear_overlap(a0, &da, la_sq, b0, &db, lb_sq, tol);
    }

    let t = cross(&w, &db) / denom;
    let u = cross(&w, &da) / denom;
    let slack_a = tol / la_sq.sqrt();
    let slack_b = tol / lb_sq.sqrt();

    if t < -slack_a || t > 1.0 + slack_a || u < -slack_b || u > 1.0 + slack_b {
        return Crossing::none();
    }

    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);
    Crossing::Points(vec![RawHit {
        point: a0 + da * t,
        param_a: t,
        param_b: u,
        tangent: false,
    }])
}

/// Handles the parallel case of [`segment_segment_intersect_2d`].
fn collinear_overlap(
    a0: &Point2,
    da: &Vector2,
    la_sq: f64,
    b0: &Point2,
    db: &Vector2,
    lb_sq: f64,
    tol: f64,
) -> Crossing {
    let w = b0 - a0;
    let off_line = cross(&w, da);
    if off_line * off_line > tol * tol * la_sq {
        return Crossing::none();
    }

    let tb0 = w.dot(da) / la_sq;
    let tb1 = (w + db).dot(da) / la_sq;
    let lo = tb0.min(tb1).max(0.0);
    let hi = tb0.max(tb1).min(1.0);
    let la = la_sq.sqrt();

    if (hi - lo) * la > tol {
        return Crossing::Coincident;
    }
    if (lo - hi) * la > tol {
        return Crossing::none();
    }

    let t = ((lo + hi) * 0.5).clamp(0.0, 1.0);
    let point = a0 + da * t;
    let u = ((point - b0).dot(db) / lb_sq).clamp(0.0, 1.0);
    Crossing::Points(vec![RawHit {
        point,
        param_a: t,
        param_b: u,
        tangent: false,
    }])
}

/// Intersection of the infinite line `p0 + t * dir` with a full circle.
///
/// Returns `(t, tangent)` pairs. A line passing within `tol` of the circle
/// tangentially yields a single tangent root.
#[must_use]
pub fn line_circle_intersect_2d(
    p0: &Point2,
    dir: &Vector2,
    center: &Point2,
    radius: f64,
    tol: f64,
) -> Vec<(f64, bool)> {
    let a = dir.norm_squared();
    if a < EPSILON * EPSILON || radius < 0.0 {
        return Vec::new();
    }

    // Substitute parametric line into circle equation:
    // |f + t*d|² = r²  with  f = p0 - center
    let f = p0 - center;
    let b = 2.0 * f.dot(dir);
    let c = f.norm_squared() - radius * radius;

    let off = cross(&f, dir);
    let dist_sq = off * off / a;
    let reach = radius + tol;
    if dist_sq > reach * reach {
        return Vec::new();
    }

    let t_foot = -b / (2.0 * a);
    let dist = dist_sq.sqrt();
    if (dist - radius).abs() <= tol {
        return vec![(t_foot, true)];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return vec![(t_foot, true)];
    }
    let disc_sqrt = discriminant.sqrt();
    vec![
        ((-b - disc_sqrt) / (2.0 * a), false),
        ((-b + disc_sqrt) / (2.0 * a), false),
    ]
}

/// Intersection of a line segment with a circular arc.
///
/// `param_a` is the segment parameter, `param_b` the unwrapped arc angle.
#[must_use]
pub fn segment_arc_intersect_2d(a0: &Point2, a1: &Point2, arc: &ArcSpan, tol: f64) -> Crossing {
    let d = a1 - a0;
    let len_sq = d.norm_squared();
    if len_sq <= tol * tol || arc.radius <= tol || arc.sweep.abs() < EPSILON {
        return Crossing::none();
    }

    let slack_seg = tol / len_sq.sqrt();
    let slack_arc = tol / arc.radius;
    let mut hits = Vec::new();

    for (t, tangent) in line_circle_intersect_2d(a0, &d, &arc.center, arc.radius, tol) {
        if t < -slack_seg || t > 1.0 + slack_seg {
            continue;
        }
        let t = t.clamp(0.0, 1.0);
        let point = a0 + d * t;
        let angle = (point.y - arc.center.y).atan2(point.x - arc.center.x);
        if let Some(param) = angle_in_span(angle, arc.start_angle, arc.sweep, slack_arc) {
            push_unique(&mut hits, RawHit {
                point,
                param_a: t,
                param_b: param,
                tangent,
            }, tol);
        }
    }

    Crossing::Points(hits)
}

/// Intersection points of two full circles.
///
/// Returns `None` for concentric circles of equal radius (coincident),
/// otherwise the intersection points with a tangency flag.
#[must_use]
pub fn circle_circle_intersect_2d(
    c1: &Point2,
    r1: f64,
    c2: &Point2,
    r2: f64,
    tol: f64,
) -> Option<Vec<(Point2, bool)>> {
    let delta = c2 - c1;
    let dist_sq = delta.norm_squared();
    let tol_sq = tol * tol;

    if dist_sq <= tol_sq {
        // Concentric circles: coincident if same radius, otherwise disjoint.
        return if (r1 - r2).abs() <= tol {
            None
        } else {
            Some(Vec::new())
        };
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist_sq > (sum + tol) * (sum + tol) {
        return Some(Vec::new());
    }
    if diff > tol && dist_sq < (diff - tol) * (diff - tol) {
        return Some(Vec::new());
    }

    let dist = dist_sq.sqrt();
    // Distance from c1 along the line c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = (r1 * r1 - a * a).max(0.0);
    let unit = delta / dist;
    let mid = c1 + unit * a;

    if h_sq <= tol_sq || (dist - sum).abs() <= tol || (dist - diff).abs() <= tol {
        return Some(vec![(mid, true)]);
    }

    let h = h_sq.sqrt();
    let perp = Vector2::new(-unit.y, unit.x);
    Some(vec![(mid + perp * h, false), (mid - perp * h, false)])
}

/// Intersection of two circular arcs.
///
/// Co-circular arcs whose spans overlap by more than `tol` are
/// [`Crossing::Coincident`]; co-circular arcs touching only at endpoints
/// yield those endpoints.
#[must_use]
pub fn arc_arc_intersect_2d(a: &ArcSpan, b: &ArcSpan, tol: f64) -> Crossing {
    if a.radius <= tol || b.radius <= tol {
        return Crossing::none();
    }

    let slack_a = tol / a.radius;
    let slack_b = tol / b.radius;

    let Some(points) = circle_circle_intersect_2d(&a.center, a.radius, &b.center, b.radius, tol)
    else {
        return cocircular_overlap(a, b, tol);
    };

    let mut hits = Vec::new();
    for (point, tangent) in points {
        let angle_a = (point.y - a.center.y).atan2(point.x - a.center.x);
        let angle_b = (point.y - b.center.y).atan2(point.x - b.center.x);
        let pa = angle_in_span(angle_a, a.start_angle, a.sweep, slack_a);
        let pb = angle_in_span(angle_b, b.start_angle, b.sweep, slack_b);
        if let (Some(param_a), Some(param_b)) = (pa, pb) {
            push_unique(&mut hits, RawHit {
                point,
                param_a,
                param_b,
                tangent,
            }, tol);
        }
    }

    Crossing::Points(hits)
}

/// Handles the co-circular case of [`arc_arc_intersect_2d`].
fn cocircular_overlap(a: &ArcSpan, b: &ArcSpan, tol: f64) -> Crossing {
    let overlap = angular_overlap(a, b);
    if overlap * a.radius > tol {
        return Crossing::Coincident;
    }

    let slack = tol / a.radius;
    let mut hits = Vec::new();
    for point in [a.start_point(), a.end_point()] {
        let angle = (point.y - a.center.y).atan2(point.x - a.center.x);
        let pa = angle_in_span(angle, a.start_angle, a.sweep, slack);
        let pb = angle_in_span(angle, b.start_angle, b.sweep, slack);
        if let (Some(param_a), Some(param_b)) = (pa, pb) {
            push_unique(&mut hits, RawHit {
                point,
                param_a,
                param_b,
                tangent: false,
            }, tol);
        }
    }
    Crossing::Points(hits)
}

/// Length (in radians) of the overlap between the angular spans of two
/// arcs on the same circle.
fn angular_overlap(a: &ArcSpan, b: &ArcSpan) -> f64 {
    // Normalize both spans to counter-clockwise [start, start + len].
    let (sa, la) = ccw_interval(a);
    let (sb, lb) = ccw_interval(b);
    let o = wrap_tau(sb - sa);

    let direct = (la.min(o + lb) - o).max(0.0);
    let wrapped = la.min(o + lb - TAU).max(0.0);
    direct + wrapped
}

fn ccw_interval(arc: &ArcSpan) -> (f64, f64) {
    let len = arc.sweep.abs().min(TAU);
    if arc.sweep >= 0.0 {
        (arc.start_angle, len)
    } else {
        (arc.start_angle + arc.sweep, len)
    }
}

/// Pushes a hit unless an existing hit lies within `tol` of it.
fn push_unique(hits: &mut Vec<RawHit>, hit: RawHit, tol: f64) {
    if hits
        .iter()
        .any(|h| distance_sq(&h.point, &hit.point) <= tol * tol)
    {
        return;
    }
    hits.push(hit);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const TOL: f64 = 1e-9;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn circle_as_arc(center: Point2, radius: f64) -> ArcSpan {
        ArcSpan {
            center,
            radius,
            start_angle: 0.0,
            sweep: TAU,
        }
    }

    fn points(c: Crossing) -> Vec<RawHit> {
        match c {
            Crossing::Points(hits) => hits,
            Crossing::Coincident => panic!("unexpected coincident result"),
        }
    }

    #[test]
    fn line_line_perpendicular() {
        let (t, u) = line_line_intersect_2d(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &p(0.5, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOL);
        assert!((u - 1.0).abs() < TOL);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        assert!(line_line_intersect_2d(
            &p(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &p(0.0, 1.0),
            &Vector2::new(2.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn segment_segment_crossing() {
        let hits = points(segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(2.0, 2.0),
            &p(0.0, 2.0),
            &p(2.0, 0.0),
            TOL,
        ));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.x - 1.0).abs() < TOL);
        assert!((hits[0].point.y - 1.0).abs() < TOL);
        assert!((hits[0].param_a - 0.5).abs() < TOL);
        assert!((hits[0].param_b - 0.5).abs() < TOL);
    }

    #[test]
    fn segment_segment_parallel_disjoint() {
        let hits = points(segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(0.0, 1.0),
            &p(1.0, 1.0),
            TOL,
        ));
        assert!(hits.is_empty());
    }

    #[test]
    fn segment_segment_collinear_overlap_is_coincident() {
        let c = segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(1.0, 0.0),
            &p(3.0, 0.0),
            TOL,
        );
        assert_eq!(c, Crossing::Coincident);
    }

    #[test]
    fn segment_segment_collinear_touch_is_single_point() {
        let hits = points(segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0, 0.0),
            &p(3.0, 0.0),
            1e-6,
        ));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].param_a - 1.0).abs() < 1e-6);
        assert!(hits[0].param_b.abs() < 1e-6);
    }

    #[test]
    fn segment_segment_within_tolerance_of_end() {
        // B starts 1e-7 past A's end; accepted under a 1e-6 tolerance.
        let hits = points(segment_segment_intersect_2d(
            &p(0.0, 0.0),
            &p(1.0, 0.0),
            &p(1.0 + 1e-7, -1.0),
            &p(1.0 + 1e-7, 1.0),
            1e-6,
        ));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].param_a - 1.0).abs() < 1e-12);
    }

    #[test]
    fn segment_arc_two_crossings() {
        let arc = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI,
        };
        let hits = points(segment_arc_intersect_2d(&p(-2.0, 0.0), &p(2.0, 0.0), &arc, TOL));
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn segment_arc_tangent() {
        let arc = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI,
        };
        let hits = points(segment_arc_intersect_2d(&p(-1.0, 1.0), &p(1.0, 1.0), &arc, TOL));
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!(hits[0].tangent);
        assert!(hits[0].point.x.abs() < 1e-6);
        assert!((hits[0].param_b - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn segment_arc_outside_span() {
        let arc = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: PI / 4.0,
            sweep: PI / 4.0,
        };
        let hits = points(segment_arc_intersect_2d(&p(-2.0, 0.0), &p(2.0, 0.0), &arc, TOL));
        assert!(hits.is_empty(), "hits={hits:?}");
    }

    #[test]
    fn arc_arc_two_crossings() {
        let a = circle_as_arc(p(0.0, 0.0), 1.0);
        let b = circle_as_arc(p(1.0, 0.0), 1.0);
        let mut hits = points(arc_arc_intersect_2d(&a, &b, TOL));
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        hits.sort_by(|x, y| x.point.y.total_cmp(&y.point.y));
        let sqrt3_2 = 3.0_f64.sqrt() / 2.0;
        assert!((hits[0].point.y + sqrt3_2).abs() < 1e-9);
        assert!((hits[1].point.y - sqrt3_2).abs() < 1e-9);
    }

    #[test]
    fn arc_arc_external_tangent() {
        let a = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: -PI / 4.0,
            sweep: PI / 2.0,
        };
        let b = ArcSpan {
            center: p(2.0, 0.0),
            radius: 1.0,
            start_angle: PI / 2.0,
            sweep: PI,
        };
        let hits = points(arc_arc_intersect_2d(&a, &b, TOL));
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!(hits[0].tangent);
        assert!((hits[0].point.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn arc_arc_far_apart() {
        let a = circle_as_arc(p(0.0, 0.0), 1.0);
        let b = circle_as_arc(p(5.0, 0.0), 1.0);
        assert!(points(arc_arc_intersect_2d(&a, &b, TOL)).is_empty());
    }

    #[test]
    fn concentric_different_radius_is_empty() {
        let a = circle_as_arc(p(0.0, 0.0), 1.0);
        let b = circle_as_arc(p(0.0, 0.0), 2.0);
        assert!(points(arc_arc_intersect_2d(&a, &b, TOL)).is_empty());
    }

    #[test]
    fn cocircular_overlap_is_coincident() {
        let a = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI,
        };
        let b = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: PI / 2.0,
            sweep: PI,
        };
        assert_eq!(arc_arc_intersect_2d(&a, &b, TOL), Crossing::Coincident);
    }

    #[test]
    fn cocircular_touching_arcs_share_endpoint() {
        let a = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI / 2.0,
        };
        let b = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: PI / 2.0,
            sweep: PI / 2.0,
        };
        let hits = points(arc_arc_intersect_2d(&a, &b, 1e-9));
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!(hits[0].point.x.abs() < 1e-9);
        assert!((hits[0].point.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wrapped_overlap_is_measured() {
        // a covers [3π/2, 2π + π/4], b covers [0, π/2]: overlap π/4.
        let a = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 3.0 * PI / 2.0,
            sweep: 3.0 * PI / 4.0,
        };
        let b = ArcSpan {
            center: p(0.0, 0.0),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI / 2.0,
        };
        assert!((angular_overlap(&a, &b) - PI / 4.0).abs() < 1e-9);
    }
}
