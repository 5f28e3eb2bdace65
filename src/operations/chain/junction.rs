use crate::math::{cross, distance_sq, Point2, Vector2};

use super::spatial_hash::SpatialHash;

/// Which end of a shape an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum End {
    Start,
    End,
}

/// One end of a usable open shape.
#[derive(Debug, Clone)]
pub(super) struct Endpoint {
    pub point: Point2,
    /// Position of the shape in the usable-shape list.
    pub shape: usize,
    pub end: End,
    /// Unit direction pointing from the endpoint into its shape.
    pub away: Option<Vector2>,
}

/// Endpoint index of a shape's end: `2 * shape` for the start, `+ 1` for the end.
pub(super) fn endpoint_index(shape: usize, end: End) -> usize {
    match end {
        End::Start => 2 * shape,
        End::End => 2 * shape + 1,
    }
}

/// Groups endpoints lying within `tolerance` of each other, transitively.
///
/// Groups are ordered by their smallest endpoint index and list members in
/// ascending order.
pub(super) fn cluster(endpoints: &[Endpoint], tolerance: f64) -> Vec<Vec<usize>> {
    let mut hash = SpatialHash::new(tolerance);
    for (i, e) in endpoints.iter().enumerate() {
        hash.insert(&e.point, i);
    }

    let mut parent: Vec<usize> = (0..endpoints.len()).collect();
    let tol_sq = tolerance * tolerance;
    for (i, e) in endpoints.iter().enumerate() {
        for j in hash.candidates(&e.point) {
            if j > i && distance_sq(&e.point, &endpoints[j].point) <= tol_sq {
                union(&mut parent, i, j);
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root = vec![usize::MAX; endpoints.len()];
    for i in 0..endpoints.len() {
        let root = find(&mut parent, i);
        if group_of_root[root] == usize::MAX {
            group_of_root[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[group_of_root[root]].push(i);
    }
    groups
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    // Smaller index wins so roots are deterministic.
    if ra < rb {
        parent[rb] = ra;
    } else if rb < ra {
        parent[ra] = rb;
    }
}

/// Turning angle for travel arriving through endpoint `a` and leaving
/// through endpoint `b`: zero for a straight continuation, π for a full
/// reversal or an unknown direction.
fn turning_angle(a: &Endpoint, b: &Endpoint) -> f64 {
    match (a.away, b.away) {
        (Some(da), Some(db)) => {
            let incoming = -da;
            cross(&incoming, &db).atan2(incoming.dot(&db)).abs()
        }
        _ => std::f64::consts::PI,
    }
}

/// Pairs the endpoints meeting at one junction.
///
/// Two endpoints are simply paired. With more, pairs are taken greedily
/// by smallest turning angle, ties broken by endpoint index, so the
/// straightest continuations link up and leftover endpoints stay open.
pub(super) fn pair(group: &[usize], endpoints: &[Endpoint]) -> Vec<(usize, usize)> {
    match group {
        [] | [_] => Vec::new(),
        [a, b] => vec![(*a, *b)],
        _ => {
            let mut candidates = Vec::new();
            for (k, &a) in group.iter().enumerate() {
                for &b in &group[k + 1..] {
                    candidates.push((turning_angle(&endpoints[a], &endpoints[b]), a, b));
                }
            }
            candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

            let mut used = vec![false; endpoints.len()];
            let mut pairs = Vec::new();
            for (_, a, b) in candidates {
                if !used[a] && !used[b] {
                    used[a] = true;
                    used[b] = true;
                    pairs.push((a, b));
                }
            }
            pairs
        }
    }
}

/// Mean position of a junction's endpoints.
pub(super) fn junction_point(group: &[usize], endpoints: &[Endpoint]) -> Point2 {
    let mut sum = Vector2::zeros();
    for &i in group {
        sum += endpoints[i].point.coords;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = group.len().max(1) as f64;
    Point2::from(sum / n)
}
