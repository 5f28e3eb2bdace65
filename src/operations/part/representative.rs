use crate::math::distance_2d::point_to_polygon_dist;
use crate::math::polygon_2d::{centroid_2d, contains_point_2d, signed_area_2d};
use crate::math::{left_normal, midpoint, Point2};
use crate::tessellation::interior_point;

/// Picks a point clearly inside a closed polygon.
///
/// Tries, in order: the midpoint of the longest edge nudged inward, the
/// area centroid, and the centroid of the largest interior triangle of a
/// constrained Delaunay triangulation. A candidate counts only when it is
/// inside and farther than `tolerance` from the boundary.
pub(super) fn representative_point(polygon: &[Point2], tolerance: f64) -> Option<Point2> {
    let clear = |p: &Point2| contains_point_2d(polygon, p) && point_to_polygon_dist(p, polygon) > tolerance;

    if let Some(p) = nudged_edge_midpoint(polygon, tolerance) {
        if clear(&p) {
            return Some(p);
        }
    }
    if let Some(c) = centroid_2d(polygon) {
        if clear(&c) {
            return Some(c);
        }
    }
    interior_point(polygon).filter(|p| contains_point_2d(polygon, p))
}

fn nudged_edge_midpoint(polygon: &[Point2], tolerance: f64) -> Option<Point2> {
    let n = polygon.len();
    if n < 3 {
        return None;
    }
    let (a, b) = (0..n)
        .map(|i| (polygon[i], polygon[(i + 1) % n]))
        .max_by(|x, y| (x.1 - x.0).norm_squared().total_cmp(&(y.1 - y.0).norm_squared()))?;
    let edge = b - a;
    let len = edge.norm();
    if len <= tolerance {
        return None;
    }
    // The interior lies left of the travel direction on a CCW polygon.
    let side = signed_area_2d(polygon).signum();
    let step = (10.0 * tolerance).min(0.1 * len);
    Some(midpoint(&a, &b) + left_normal(&(edge / len)) * (side * step))
}
