use super::junction::{endpoint_index, End};

/// One chain found by walking the endpoint pairing: usable-shape indices
/// with their traversal flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Walk {
    pub steps: Vec<(usize, bool)>,
    /// The walk returned to its first shape through a paired endpoint.
    pub cycle: bool,
}

/// Walks every shape exactly once.
///
/// `partner[e]` is the endpoint paired with endpoint `e` (see
/// [`endpoint_index`]). Paths starting at an unpaired endpoint are walked
/// first, in shape order; whatever remains forms cycles.
pub(super) fn walk_all(shape_count: usize, partner: &[Option<usize>]) -> Vec<Walk> {
    let mut visited = vec![false; shape_count];
    let mut walks = Vec::new();

    for s in 0..shape_count {
        if visited[s] {
            continue;
        }
        let start_open = partner[endpoint_index(s, End::Start)].is_none();
        let end_open = partner[endpoint_index(s, End::End)].is_none();
        if start_open || end_open {
            // Enter through the open end so the walk runs to the far end.
            let reversed = !start_open;
            walks.push(walk_from(s, reversed, partner, &mut visited));
        }
    }

    for s in 0..shape_count {
        if !visited[s] {
            walks.push(walk_from(s, false, partner, &mut visited));
        }
    }

    walks
}

fn walk_from(first: usize, first_reversed: bool, partner: &[Option<usize>], visited: &mut [bool]) -> Walk {
    let mut steps = Vec::new();
    let (mut shape, mut reversed) = (first, first_reversed);
    let entry = endpoint_index(first, if first_reversed { End::End } else { End::Start });

    loop {
        visited[shape] = true;
        steps.push((shape, reversed));

        let exit = endpoint_index(shape, if reversed { End::Start } else { End::End });
        let Some(next) = partner[exit] else {
            return Walk { steps, cycle: false };
        };
        if next == entry {
            return Walk { steps, cycle: true };
        }
        let next_shape = next / 2;
        if visited[next_shape] {
            // Only reachable through inconsistent pairing; end the path here.
            return Walk { steps, cycle: false };
        }
        shape = next_shape;
        // Entering through the end means travelling the shape backwards.
        reversed = next % 2 == 1;
    }
}
