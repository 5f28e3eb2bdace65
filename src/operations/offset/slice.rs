use crate::geometry::curve::{Curve, Primitive};
use crate::math::distance_sq;

use super::piece::{split_at, Cut};

/// Cuts a path at the given positions, producing the runs between
/// consecutive cuts in path order.
///
/// `cuts` holds the positions for each piece, ordered along it. For a
/// closed path the run through the path start is returned whole, as the
/// last slice.
pub(super) fn build(path: &[Primitive], cuts: &[Vec<Cut>], closed: bool, tolerance: f64) -> Vec<Vec<Primitive>> {
    let mut slices = Vec::new();
    let mut current: Vec<Primitive> = Vec::new();
    for (prim, piece_cuts) in path.iter().zip(cuts) {
        let mut rest = prim.clone();
        for cut in piece_cuts {
            let (head, tail) = split_at(&rest, cut.param, cut.point);
            if head.length() > tolerance {
                current.push(head);
            }
            if !current.is_empty() {
                slices.push(std::mem::take(&mut current));
            }
            rest = tail;
        }
        if rest.length() > tolerance {
            current.push(rest);
        }
    }
    if !current.is_empty() {
        slices.push(current);
    }

    if closed && slices.len() > 1 {
        let start = path[0].start_point();
        let tol_sq = tolerance * tolerance;
        let start_is_cut = cuts.iter().flatten().any(|c| distance_sq(&c.point, &start) <= tol_sq);
        if !start_is_cut {
            let first = slices.remove(0);
            if let Some(last) = slices.last_mut() {
                last.extend(first);
            }
        }
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curve::Line;
    use crate::math::Point2;
    use crate::operations::offset::self_intersect::contacts;

    fn poly(pts: &[(f64, f64)], closed: bool) -> Vec<Primitive> {
        let n = pts.len();
        let segs = if closed { n } else { n - 1 };
        (0..segs)
            .map(|k| {
                let (x0, y0) = pts[k];
                let (x1, y1) = pts[(k + 1) % n];
                Primitive::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
            })
            .collect()
    }

    #[test]
    fn loop_back_path_is_cut_into_three_runs() {
        let path = poly(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, 5.0), (5.0, -5.0)], false);
        let found = contacts(&path, false, 1e-9);
        let slices = build(&path, &found.cuts, false, 1e-9);
        assert_eq!(slices.len(), 3);
        // Head run, the loop, and the tail run.
        assert_eq!(slices[0].len(), 1);
        assert_eq!(slices[1].len(), 4);
        assert_eq!(slices[2].len(), 1);
        let x = Point2::new(5.0, 0.0);
        assert!((slices[0][0].end_point() - x).norm() < 1e-9);
        assert!((slices[2][0].start_point() - x).norm() < 1e-9);
    }

    #[test]
    fn closed_path_keeps_its_start_inside_one_run() {
        // Bow tie crossing at (5, 5); the start corner is no cut.
        let path = poly(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)], true);
        let found = contacts(&path, true, 1e-9);
        let slices = build(&path, &found.cuts, true, 1e-9);
        assert_eq!(slices.len(), 2);
        for s in &slices {
            let start = s[0].start_point();
            let end = s[s.len() - 1].end_point();
            assert!((start - Point2::new(5.0, 5.0)).norm() < 1e-9);
            assert!((end - start).norm() < 1e-9);
        }
        assert_eq!(slices[1].len(), 3);
        assert!((slices[1][1].start_point() - Point2::new(0.0, 10.0)).norm() < 1e-9);
    }
}
