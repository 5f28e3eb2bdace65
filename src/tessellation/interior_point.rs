use spade::{ConstrainedDelaunayTriangulation, Point2 as SpadePoint2, Triangulation};

use crate::math::polygon_2d::contains_point_2d;
use crate::math::Point2;

/// Finds a point strictly inside a simple or mildly self-touching polygon.
///
/// The polygon is inserted as a constrained Delaunay triangulation; among
/// the triangles whose centroid lies inside the polygon the largest one
/// wins. Returns `None` when the polygon has no interior.
#[must_use]
pub fn interior_point(polygon: &[Point2]) -> Option<Point2> {
    if polygon.len() < 3 {
        return None;
    }

    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    let mut handles = Vec::with_capacity(polygon.len());
    for p in polygon {
        if !crate::math::is_finite_point(p) {
            return None;
        }
        handles.push(cdt.insert(SpadePoint2::new(p.x, p.y)).ok()?);
    }
    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        // Crossing constraints are skipped; the inside test below decides.
        if from != to && cdt.can_add_constraint(from, to) {
            cdt.add_constraint(from, to);
        }
    }

    let mut best: Option<(f64, Point2)> = None;
    for face in cdt.inner_faces() {
        let [a, b, c] = face.vertices().map(|v| {
            let p = v.position();
            Point2::new(p.x, p.y)
        });
        let area = crate::math::cross(&(b - a), &(c - a)).abs() * 0.5;
        let centroid = Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
        if area <= 0.0 || !contains_point_2d(polygon, &centroid) {
            continue;
        }
        if best.map_or(true, |(best_area, _)| area > best_area) {
            best = Some((area, centroid));
        }
    }
    best.map(|(_, p)| p)
}
