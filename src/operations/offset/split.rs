use crate::diagnostics::{push_warning, Warning};
use crate::geometry::curve::{Curve, Primitive};
use crate::math::{distance_sq, Point2};
use crate::operations::intersect::IntersectionPoint;
use crate::topology::ChainId;

use super::piece::split_at;
use super::self_intersect::{find_all, SelfCrossing};

/// Where a loop meets itself.
enum Contact {
    Crossing(SelfCrossing),
    /// The ends of pieces `p` and `q` coincide.
    Pinch(usize, usize),
}

/// Splits a closed path wherever it meets itself until every loop is simple.
///
/// A crossing or a vertex visited twice cuts a loop into two sub-loops that
/// are processed in turn. A loop still meeting itself after `max_depth`
/// nested splits is kept whole with a
/// [`Warning::SelfIntersectionUnresolved`]. The crossings used for splitting
/// are appended to `crossings`.
pub(super) fn split_loops(
    path: Vec<Primitive>,
    max_depth: usize,
    tolerance: f64,
    chain: &ChainId,
    crossings: &mut Vec<IntersectionPoint>,
    warnings: &mut Vec<Warning>,
) -> Vec<Vec<Primitive>> {
    let mut done = Vec::new();
    let mut stack = vec![(path, 0_usize)];

    while let Some((lp, depth)) = stack.pop() {
        let contact = match find_all(&lp, true, tolerance).into_iter().next() {
            Some(c) => Some(Contact::Crossing(c)),
            None => first_pinch(&lp, tolerance).map(|(p, q)| Contact::Pinch(p, q)),
        };
        let Some(contact) = contact else {
            done.push(lp);
            continue;
        };
        if depth >= max_depth {
            push_warning(
                warnings,
                Warning::SelfIntersectionUnresolved {
                    chain: chain.clone(),
                    depth,
                },
            );
            done.push(lp);
            continue;
        }

        let (a, b) = match contact {
            Contact::Crossing(c) => {
                crossings.push(c.hit);
                split_once(&lp, &c, tolerance)
            }
            Contact::Pinch(p, q) => split_at_vertex(&lp, p, q),
        };
        // Pushed in reverse so the loop holding the path start is finished first.
        for sub in [b, a] {
            if !sub.is_empty() {
                stack.push((sub, depth + 1));
            }
        }
    }

    done
}

/// First pair of pieces whose ends coincide.
fn first_pinch(lp: &[Primitive], tolerance: f64) -> Option<(usize, usize)> {
    let tol_sq = tolerance * tolerance;
    let ends: Vec<Point2> = lp.iter().map(Curve::end_point).collect();
    (0..ends.len()).find_map(|p| {
        ((p + 1)..ends.len())
            .find(|&q| distance_sq(&ends[p], &ends[q]) <= tol_sq)
            .map(|q| (p, q))
    })
}

/// Cuts a loop at a vertex shared by the ends of pieces `p` and `q`.
fn split_at_vertex(lp: &[Primitive], p: usize, q: usize) -> (Vec<Primitive>, Vec<Primitive>) {
    let inner = lp[p + 1..=q].to_vec();
    let mut outer = lp[q + 1..].to_vec();
    outer.extend_from_slice(&lp[..=p]);
    (inner, outer)
}

/// Cuts a loop at one crossing into the part between the two pieces and
/// the part wrapping around the loop start.
fn split_once(lp: &[Primitive], c: &SelfCrossing, tolerance: f64) -> (Vec<Primitive>, Vec<Primitive>) {
    let x = c.hit.point;
    let (i_head, i_tail) = split_at(&lp[c.i], c.hit.param_a, x);
    let (j_head, j_tail) = split_at(&lp[c.j], c.hit.param_b, x);

    let mut inner = vec![i_tail];
    inner.extend_from_slice(&lp[c.i + 1..c.j]);
    inner.push(j_head);

    let mut outer = vec![j_tail];
    outer.extend_from_slice(&lp[c.j + 1..]);
    outer.extend_from_slice(&lp[..c.i]);
    outer.push(i_head);

    inner.retain(|p| p.length() > tolerance);
    outer.retain(|p| p.length() > tolerance);
    (inner, outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use crate::geometry::curve::Line;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::math::Point2;

    fn polygon(points: &[Point2]) -> Vec<Primitive> {
        let n = points.len();
        (0..n)
            .map(|k| Primitive::Line(Line::new(points[k], points[(k + 1) % n])))
            .collect()
    }

    fn area(lp: &[Primitive]) -> f64 {
        let pts: Vec<Point2> = lp.iter().map(Curve::start_point).collect();
        signed_area_2d(&pts)
    }

    /// Three lobes in a row, alternating winding; crosses itself three
    /// times along y = 5.
    fn three_lobes() -> Vec<Primitive> {
        let pts: Vec<Point2> = [
            (0.0, 0.0),
            (10.0, 10.0),
            (20.0, 0.0),
            (30.0, 10.0),
            (30.0, 0.0),
            (20.0, 10.0),
            (10.0, 0.0),
            (0.0, 10.0),
        ]
        .iter()
        .map(|&(x, y)| Point2::new(x, y))
        .collect();
        polygon(&pts)
    }

    #[test]
    fn bow_tie_splits_into_opposite_loops() {
        let lp = polygon(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ]);
        let mut crossings = Vec::new();
        let mut warnings = Vec::new();
        let loops = split_loops(lp, 32, 1e-9, &ChainId::new("c"), &mut crossings, &mut warnings);
        assert_eq!(loops.len(), 2);
        assert_eq!(crossings.len(), 1);
        assert!(warnings.is_empty());
        let areas: Vec<f64> = loops.iter().map(|l| area(l)).collect();
        assert!(areas[0] * areas[1] < 0.0, "lobes wind in opposite directions: {areas:?}");
        for l in &loops {
            assert!((area(l).abs() - 25.0).abs() < 1e-9);
        }
    }

    #[test]
    fn lobes_resolve_into_simple_loops() {
        let mut crossings = Vec::new();
        let mut warnings = Vec::new();
        let loops = split_loops(three_lobes(), 32, 1e-9, &ChainId::new("c"), &mut crossings, &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(crossings.len(), 3);
        assert_eq!(loops.len(), 4);
        for l in &loops {
            assert!(find_all(l, true, 1e-9).is_empty());
        }
        let total: f64 = loops.iter().map(|l| area(l).abs()).sum();
        assert!((total - 150.0).abs() < 1e-9, "total area {total}");
    }

    #[test]
    fn depth_cap_keeps_loop_whole() {
        let mut crossings = Vec::new();
        let mut warnings = Vec::new();
        let loops = split_loops(three_lobes(), 1, 1e-9, &ChainId::new("c"), &mut crossings, &mut warnings);
        assert_eq!(crossings.len(), 1);
        assert_eq!(loops.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind(), WarningKind::SelfIntersectionUnresolved);
        assert!(loops.iter().any(|l| !find_all(l, true, 1e-9).is_empty()));
    }

    #[test]
    fn loop_touching_itself_splits_at_the_shared_vertex() {
        // Two unit squares meeting only at (1, 1).
        let lp = polygon(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);
        let mut crossings = Vec::new();
        let mut warnings = Vec::new();
        let loops = split_loops(lp, 32, 1e-9, &ChainId::new("c"), &mut crossings, &mut warnings);
        assert_eq!(loops.len(), 2);
        assert!(crossings.is_empty());
        assert!(warnings.is_empty());
        for l in &loops {
            assert_eq!(l.len(), 4);
            assert!((area(l) - 1.0).abs() < 1e-12);
        }
    }
}
