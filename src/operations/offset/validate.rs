use crate::geometry::curve::{Curve, Primitive};
use crate::math::polygon_2d::{perimeter_2d, signed_area_2d};
use crate::math::Point2;
use crate::tessellation::append_polyline;

use super::piece::clearance;

/// Checks one closed offset loop against its source.
///
/// Returns the reason the loop must be dropped, or `None` to keep it.
/// `winding` is the sign of the source chain's signed area.
pub(super) fn loop_rejection(
    lp: &[Primitive],
    source: &[Primitive],
    winding: f64,
    distance: f64,
    tolerance: f64,
    tessellation_tolerance: f64,
) -> Option<String> {
    if let Some(reason) = path_rejection(lp, source, distance, tolerance) {
        return Some(reason);
    }

    let points = flatten(lp, tessellation_tolerance);
    let area = signed_area_2d(&points);
    // A sliver has less area than a strip one tolerance wide along its boundary.
    let sliver = tolerance * perimeter_2d(&points).max(tolerance);
    if !area.is_finite() || area.abs() < sliver {
        return Some(format!("loop area {area} is below tolerance"));
    }
    if area.signum() != winding.signum() {
        return Some("loop winding is reversed".into());
    }
    None
}

/// Checks an offset path (open or closed): every coordinate must be finite
/// and no point of any piece may come closer to the source than the offset
/// distance.
pub(super) fn path_rejection(path: &[Primitive], source: &[Primitive], distance: f64, tolerance: f64) -> Option<String> {
    if path.is_empty() {
        return Some("no pieces left".into());
    }
    if !path.iter().all(Primitive::is_finite) {
        return Some("non-finite coordinate".into());
    }
    let min_clearance = distance.abs() - tolerance;
    for prim in path {
        let gap = clearance(prim, source, tolerance);
        if gap < min_clearance {
            return Some(format!(
                "piece lies {gap} from the source, inside the offset band of {}",
                distance.abs()
            ));
        }
    }
    None
}

/// Whether a slice of an offset path keeps its distance from the source.
pub(super) fn keeps_clearance(slice: &[Primitive], source: &[Primitive], distance: f64, tolerance: f64) -> bool {
    path_rejection(slice, source, distance, tolerance).is_none()
}

/// Flattens a path into one point list.
pub(super) fn flatten(path: &[Primitive], tolerance: f64) -> Vec<Point2> {
    let mut points = Vec::new();
    for prim in path {
        append_polyline(&mut points, &prim.tessellate(tolerance), crate::math::EPSILON);
    }
    points
}
