use super::{cross, Point2, EPSILON};

/// Computes the signed area of a polygon (shoelace formula).
///
/// The polygon is implicitly closed. Positive for counter-clockwise,
/// negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Total boundary length of a closed polygon.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .sum()
}

/// Area centroid of a closed polygon.
///
/// Falls back to the vertex average when the polygon has (near) zero area.
#[must_use]
pub fn centroid_2d(points: &[Point2]) -> Option<Point2> {
    let n = points.len();
    if n == 0 {
        return None;
    }

    let area = signed_area_2d(points);
    if area.abs() < EPSILON {
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;
        return Some(Point2::new(sx / count, sy / count));
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let f = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * f;
        cy += (a.y + b.y) * f;
    }
    let k = 1.0 / (6.0 * area);
    Some(Point2::new(cx * k, cy * k))
}

/// Winding number of a closed polygon around `point`.
///
/// Non-zero means the point is enclosed. Points exactly on the boundary
/// may report either side; callers keep sample points off the boundary.
#[must_use]
pub fn winding_number_2d(point: &Point2, polygon: &[Point2]) -> i32 {
    let n = polygon.len();
    if n < 3 {
        return 0;
    }

    let mut winding = 0;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        let side = cross(&(b - a), &(point - a));
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Returns `true` when `point` lies inside the closed polygon.
#[must_use]
pub fn contains_point_2d(polygon: &[Point2], point: &Point2) -> bool {
    winding_number_2d(point, polygon) != 0
}
