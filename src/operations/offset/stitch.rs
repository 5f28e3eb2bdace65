use tracing::trace;

use crate::geometry::curve::{Curve, Primitive};
use crate::math::{distance_sq, Point2};

/// Stitches kept slices back into paths by matching endpoints.
///
/// Greedy: each path keeps taking the unused slice whose start lies
/// closest to its end, within `tolerance`.
pub(super) fn connect(slices: Vec<Vec<Primitive>>, tolerance: f64) -> Vec<Vec<Primitive>> {
    let tol_sq = tolerance * tolerance;
    let mut pending: Vec<Option<Vec<Primitive>>> = slices.into_iter().map(Some).collect();
    let mut paths = Vec::new();

    for start in 0..pending.len() {
        let Some(mut path) = pending[start].take() else {
            continue;
        };

        while let Some(end) = path.last().map(Curve::end_point) {
            let next = pending
                .iter()
                .enumerate()
                .filter_map(|(k, s)| {
                    let first = s.as_ref()?.first()?;
                    let d = distance_sq(&first.start_point(), &end);
                    (d <= tol_sq).then_some((k, d))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            let Some((k, _)) = next else {
                break;
            };
            if let Some(slice) = pending[k].take() {
                path.extend(slice);
            }
        }

        if !path.is_empty() {
            paths.push(path);
        }
    }

    paths
}

/// Upper bound on search steps while closing one loop.
const CLOSE_STEP_LIMIT: usize = 100_000;

/// Stitches slices of a closed path back into closed loops.
///
/// Longer slices seed loops first. From a seed the search follows slices
/// whose start meets the current end, longest first, backing out of dead
/// ends until the loop returns to its seed. Slices left out of every loop
/// are dropped.
pub(super) fn close_loops(slices: Vec<Vec<Primitive>>, tolerance: f64) -> Vec<Vec<Primitive>> {
    let lengths: Vec<f64> = slices.iter().map(|s| s.iter().map(Primitive::length).sum()).collect();
    let mut order: Vec<usize> = (0..slices.len()).collect();
    order.sort_by(|&a, &b| lengths[b].total_cmp(&lengths[a]).then(a.cmp(&b)));

    let mut used = vec![false; slices.len()];
    let mut loops = Vec::new();
    for &seed in &order {
        if used[seed] {
            continue;
        }
        if let Some(route) = close_from(&slices, &order, &mut used, seed, tolerance) {
            loops.push(route.into_iter().flat_map(|k| slices[k].iter().cloned()).collect());
        }
    }
    let dropped = used.iter().filter(|u| !**u).count();
    if dropped > 0 {
        trace!(dropped, "slices left out of every closed loop");
    }
    loops
}

/// Depth-first search for a chain of unused slices leading from `seed`
/// back to its start. Slices on the returned route are marked used.
fn close_from(
    slices: &[Vec<Primitive>],
    order: &[usize],
    used: &mut [bool],
    seed: usize,
    tolerance: f64,
) -> Option<Vec<usize>> {
    let tol_sq = tolerance * tolerance;
    let start = slices[seed].first()?.start_point();
    let starts_at = |k: usize, p: &Point2| slices[k].first().is_some_and(|f| distance_sq(&f.start_point(), p) <= tol_sq);

    let mut route = vec![seed];
    // Position in `order` of the next candidate to try after each route step.
    let mut resume = vec![0_usize];
    used[seed] = true;

    for _ in 0..CLOSE_STEP_LIMIT {
        let Some(&last) = route.last() else {
            return None;
        };
        let Some(end) = slices[last].last().map(Curve::end_point) else {
            break;
        };
        if distance_sq(&end, &start) <= tol_sq {
            return Some(route);
        }

        let depth = route.len() - 1;
        let from = resume[depth];
        match order[from..].iter().position(|&k| !used[k] && starts_at(k, &end)) {
            Some(offset) => {
                let k = order[from + offset];
                resume[depth] = from + offset + 1;
                used[k] = true;
                route.push(k);
                resume.push(0);
            }
            None => {
                used[last] = false;
                route.pop();
                resume.pop();
            }
        }
    }

    for k in route {
        used[k] = false;
    }
    None
}
