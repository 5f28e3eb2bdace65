use crate::geometry::curve::{Curve, Primitive};
use crate::operations::intersect::{intersect_primitives, IntersectionKind, IntersectionPoint};

use super::piece::{along, distance_to, locate, Cut};

/// A crossing between two non-adjacent pieces of one offset path.
#[derive(Debug, Clone, Copy)]
pub(super) struct SelfCrossing {
    /// Index of the first piece.
    pub i: usize,
    /// Index of the second piece (always > `i`).
    pub j: usize,
    /// `param_a` refers to piece `i`, `param_b` to piece `j`.
    pub hit: IntersectionPoint,
}

/// Finds every interior crossing between non-adjacent pieces.
///
/// Endpoint touches, tangencies and overlaps are not crossings. Results
/// are ordered by the first piece and the position along it.
pub(super) fn find_all(path: &[Primitive], closed: bool, tolerance: f64) -> Vec<SelfCrossing> {
    let n = path.len();
    let mut crossings = Vec::new();
    if n < 3 {
        return crossings;
    }

    for i in 0..n {
        for j in (i + 2)..n {
            if closed && i == 0 && j == n - 1 {
                continue;
            }
            for hit in intersect_primitives(&path[i], &path[j], tolerance).points() {
                if hit.kind == IntersectionKind::Interior {
                    crossings.push(SelfCrossing { i, j, hit: *hit });
                }
            }
        }
    }

    crossings.sort_by(|a, b| {
        a.i.cmp(&b.i)
            .then(along(&path[a.i], a.hit.param_a).total_cmp(&along(&path[b.i], b.hit.param_a)))
            .then(a.j.cmp(&b.j))
    });
    crossings
}

/// Every place where non-adjacent pieces of a path meet.
#[derive(Debug, Default)]
pub(super) struct Contacts {
    /// Cut positions per piece, ordered along the piece.
    pub cuts: Vec<Vec<Cut>>,
    /// Points where two pieces cross or touch.
    pub hits: Vec<IntersectionPoint>,
}

impl Contacts {
    pub(super) fn is_empty(&self) -> bool {
        self.cuts.iter().all(Vec::is_empty)
    }
}

/// Finds where non-adjacent pieces cross, touch or overlap.
///
/// Both pieces are cut at every crossing and touch. Overlapping pieces are
/// cut where the overlap begins and ends, so the shared stretch becomes a
/// slice of its own on each of them.
pub(super) fn contacts(path: &[Primitive], closed: bool, tolerance: f64) -> Contacts {
    let n = path.len();
    let mut found = Contacts {
        cuts: vec![Vec::new(); n],
        hits: Vec::new(),
    };
    if n < 3 {
        return found;
    }

    for i in 0..n {
        for j in (i + 2)..n {
            if closed && i == 0 && j == n - 1 {
                continue;
            }
            let meeting = intersect_primitives(&path[i], &path[j], tolerance);
            if meeting.is_coincident() {
                for end in [
                    path[i].start_point(),
                    path[i].end_point(),
                    path[j].start_point(),
                    path[j].end_point(),
                ] {
                    for k in [i, j] {
                        if distance_to(&path[k], &end) <= tolerance {
                            found.cuts[k].push(locate(&path[k], &end));
                        }
                    }
                }
                continue;
            }
            for hit in meeting.points() {
                found.cuts[i].push(locate(&path[i], &hit.point));
                found.cuts[j].push(locate(&path[j], &hit.point));
                found.hits.push(*hit);
            }
        }
    }

    for (prim, cuts) in path.iter().zip(found.cuts.iter_mut()) {
        cuts.sort_by(|a, b| a.along.total_cmp(&b.along));
        let length = prim.length();
        cuts.dedup_by(|b, a| (b.along - a.along).abs() * length <= tolerance);
    }
    found
}
