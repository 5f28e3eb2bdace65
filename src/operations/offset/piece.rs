//! Editing helpers for offset pieces: moving ends along the carrier,
//! splitting, carrier intersections and distances between pieces.
use std::f64::consts::PI;

use crate::geometry::curve::{Arc, Curve, Line, Primitive};
use crate::math::arc_2d::{angle_in_span, point_on_circle, wrap_pi};
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::intersect_2d::{circle_circle_intersect_2d, line_circle_intersect_2d, line_line_intersect_2d};
use crate::math::{Point2, EPSILON};
use crate::operations::intersect::intersect_primitives;

fn angle_of(center: &Point2, p: &Point2) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Moves the start of a piece to `p`. An arc stays on its circle and takes
/// the angle of `p` nearest its current start.
pub(super) fn with_start(prim: &Primitive, p: Point2) -> Primitive {
    match prim {
        Primitive::Line(l) => Primitive::Line(Line::new(p, l.end)),
        Primitive::Arc(a) => {
            let start = a.start_angle + wrap_pi(angle_of(&a.center, &p) - a.start_angle);
            Primitive::Arc(Arc::new(a.center, a.radius, start, a.end_angle() - start))
        }
    }
}

/// Moves the end of a piece to `p`; see [`with_start`].
pub(super) fn with_end(prim: &Primitive, p: Point2) -> Primitive {
    match prim {
        Primitive::Line(l) => Primitive::Line(Line::new(l.start, p)),
        Primitive::Arc(a) => {
            let end = a.end_angle() + wrap_pi(angle_of(&a.center, &p) - a.end_angle());
            Primitive::Arc(Arc::new(a.center, a.radius, a.start_angle, end - a.start_angle))
        }
    }
}

/// Signed travel from `from` to `p` along the carrier of a piece, positive
/// in its direction of travel. Arcs measure the shorter way round.
pub(super) fn travel(prim: &Primitive, from: &Point2, p: &Point2) -> f64 {
    match prim {
        Primitive::Line(l) => l.end_tangent().map_or(0.0, |dir| (p - from).dot(&dir)),
        Primitive::Arc(a) => {
            wrap_pi(angle_of(&a.center, p) - angle_of(&a.center, from)) * a.sweep.signum() * a.radius
        }
    }
}

/// Signed travel from the end of the piece to `p` along its carrier.
/// Positive values extend the piece, negative values trim it.
pub(super) fn end_shift(prim: &Primitive, p: &Point2) -> f64 {
    travel(prim, &prim.end_point(), p)
}

/// Signed travel from the start of the piece to `p` along its carrier.
/// Negative values extend the piece backwards, positive values trim it.
pub(super) fn start_shift(prim: &Primitive, p: &Point2) -> f64 {
    travel(prim, &prim.start_point(), p)
}

/// Splits a piece at an intersection. `param` is the arc angle for arcs;
/// lines split at `point`.
pub(super) fn split_at(prim: &Primitive, param: f64, point: Point2) -> (Primitive, Primitive) {
    match prim {
        Primitive::Line(l) => (
            Primitive::Line(Line::new(l.start, point)),
            Primitive::Line(Line::new(point, l.end)),
        ),
        Primitive::Arc(a) => (
            Primitive::Arc(Arc::new(a.center, a.radius, a.start_angle, param - a.start_angle)),
            Primitive::Arc(Arc::new(a.center, a.radius, param, a.end_angle() - param)),
        ),
    }
}

/// Position of an intersection parameter along the piece, from `0` at the
/// start to `1` at the end.
pub(super) fn along(prim: &Primitive, param: f64) -> f64 {
    match prim {
        Primitive::Line(_) => param,
        Primitive::Arc(a) if a.sweep.abs() > EPSILON => (param - a.start_angle) / a.sweep,
        Primitive::Arc(_) => 0.0,
    }
}

/// Intersections of the unbounded carriers (infinite line or full circle)
/// of two pieces.
pub(super) fn carrier_hits(a: &Primitive, b: &Primitive, tolerance: f64) -> Vec<Point2> {
    match (a, b) {
        (Primitive::Line(la), Primitive::Line(lb)) => {
            line_line_intersect_2d(&la.start, &la.delta(), &lb.start, &lb.delta())
                .map(|(t, _)| vec![la.point_at(t)])
                .unwrap_or_default()
        }
        (Primitive::Line(l), Primitive::Arc(arc)) | (Primitive::Arc(arc), Primitive::Line(l)) => {
            line_circle_intersect_2d(&l.start, &l.delta(), &arc.center, arc.radius, tolerance)
                .into_iter()
                .map(|(t, _)| l.point_at(t))
                .collect()
        }
        (Primitive::Arc(aa), Primitive::Arc(ab)) => {
            circle_circle_intersect_2d(&aa.center, aa.radius, &ab.center, ab.radius, tolerance)
                .unwrap_or_default()
                .into_iter()
                .map(|(p, _)| p)
                .collect()
        }
    }
}

/// Where a path is cut: the position along a piece, the split parameter
/// and the point itself.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cut {
    pub along: f64,
    pub param: f64,
    pub point: Point2,
}

/// Locates a point lying on a piece. Points just outside an arc's span
/// snap to the nearer end.
pub(super) fn locate(prim: &Primitive, p: &Point2) -> Cut {
    match prim {
        Primitive::Line(l) => {
            let d = l.delta();
            let len_sq = d.norm_squared();
            let t = if len_sq > 0.0 {
                ((p - l.start).dot(&d) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            Cut {
                along: t,
                param: t,
                point: *p,
            }
        }
        Primitive::Arc(a) => {
            let param = angle_in_span(angle_of(&a.center, p), a.start_angle, a.sweep, 1e-9).unwrap_or_else(|| {
                if (p - a.start_point()).norm() <= (p - a.end_point()).norm() {
                    a.start_angle
                } else {
                    a.end_angle()
                }
            });
            Cut {
                along: along(prim, param),
                param,
                point: *p,
            }
        }
    }
}

/// Distance from `p` to the closest point of a piece.
pub(super) fn distance_to(prim: &Primitive, p: &Point2) -> f64 {
    match prim {
        Primitive::Line(l) => point_to_segment_dist(p, &l.start, &l.end),
        Primitive::Arc(a) => point_to_arc_dist(p, &a.span()),
    }
}

/// Smallest distance between any two points of two pieces.
pub(super) fn piece_distance(a: &Primitive, b: &Primitive, tolerance: f64) -> f64 {
    let hits = intersect_primitives(a, b, tolerance);
    if hits.is_coincident() || !hits.is_empty() {
        return 0.0;
    }
    [(a, b), (b, a)]
        .into_iter()
        .flat_map(|(x, y)| {
            let mut points = vec![x.start_point(), x.end_point()];
            points.extend(nearest_candidates(x, y));
            points.into_iter().map(move |q| distance_to(y, &q))
        })
        .fold(f64::INFINITY, f64::min)
}

/// Smallest distance from a piece to any piece of `path`.
pub(super) fn clearance(prim: &Primitive, path: &[Primitive], tolerance: f64) -> f64 {
    path.iter()
        .map(|other| piece_distance(prim, other, tolerance))
        .fold(f64::INFINITY, f64::min)
}

/// Interior points of `x` where the distance to `y` can be smallest: the
/// foot of each feature of `y` on a line, or the circle points facing it
/// on an arc.
fn nearest_candidates(x: &Primitive, y: &Primitive) -> Vec<Point2> {
    let mut targets = vec![y.start_point(), y.end_point()];
    match (x, y) {
        (_, Primitive::Arc(b)) => targets.push(b.center),
        (Primitive::Arc(a), Primitive::Line(l)) => targets.push(foot(l, &a.center, false)),
        (Primitive::Line(_), Primitive::Line(_)) => {}
    }
    match x {
        Primitive::Line(l) => targets.iter().map(|t| foot(l, t, true)).collect(),
        Primitive::Arc(a) => targets
            .iter()
            .flat_map(|t| {
                let theta = angle_of(&a.center, t);
                [theta, theta + PI]
            })
            .filter_map(|theta| angle_in_span(theta, a.start_angle, a.sweep, 0.0))
            .map(|angle| point_on_circle(&a.center, a.radius, angle))
            .collect(),
    }
}

/// Foot of `p` on the carrier of a line, optionally clamped to the segment.
fn foot(l: &Line, p: &Point2, clamp: bool) -> Point2 {
    let d = l.delta();
    let len_sq = d.norm_squared();
    if len_sq <= 0.0 {
        return l.start;
    }
    let t = (p - l.start).dot(&d) / len_sq;
    l.point_at(if clamp { t.clamp(0.0, 1.0) } else { t })
}
