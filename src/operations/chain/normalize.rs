use crate::math::distance_sq;
use crate::topology::{Chain, Winding};

/// Re-orients a chain's entries so each one starts where the previous one
/// ends, then recomputes closure and winding.
///
/// The shapes themselves are untouched; only traversal flags change.
/// Winding comes from the shoelace area of the chain flattened within
/// `tessellation_tolerance`. An open chain whose ends lie within
/// `tessellation_tolerance` of each other is closed; use
/// [`normalize_chain_within`] to decide closure with a different gap.
/// Applying the function twice gives the same chain as applying it once.
#[must_use]
pub fn normalize_chain(chain: &Chain, tessellation_tolerance: f64) -> Chain {
    normalize_chain_within(chain, tessellation_tolerance, tessellation_tolerance)
}

/// [`normalize_chain`] with its own gap for closing open chains.
///
/// Chain detection passes its connectivity tolerance here so normalizing
/// never closes a chain that detection left open.
#[must_use]
pub fn normalize_chain_within(chain: &Chain, closure_tolerance: f64, tessellation_tolerance: f64) -> Chain {
    let mut entries = chain.entries.clone();

    if entries.len() >= 2 {
        let (first, second) = (&entries[0], &entries[1]);
        let keep = distance_sq(&first.end_point(), &second.start_point())
            .min(distance_sq(&first.end_point(), &second.end_point()));
        let flip = distance_sq(&first.start_point(), &second.start_point())
            .min(distance_sq(&first.start_point(), &second.end_point()));
        if flip < keep {
            entries[0].reversed = !entries[0].reversed;
        }
    }
    for i in 1..entries.len() {
        let prev_end = entries[i - 1].end_point();
        let e = &entries[i];
        if distance_sq(&prev_end, &e.end_point()) < distance_sq(&prev_end, &e.start_point()) {
            entries[i].reversed = !entries[i].reversed;
        }
    }

    let mut out = Chain::new(chain.id.clone(), entries, chain.closed);
    if !out.closed {
        if let (Some(s), Some(e)) = (out.start_point(), out.end_point()) {
            out.closed = out.len() > 1 && distance_sq(&s, &e) <= closure_tolerance * closure_tolerance;
        }
    }
    out.winding = if out.closed {
        Winding::from_signed_area(out.signed_area(tessellation_tolerance))
    } else {
        None
    };
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::geometry::Shape;
    use crate::math::Point2;
    use crate::topology::{ChainEntry, ChainId};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Square with two sides drawn backwards.
    fn scrambled_square() -> Chain {
        let entries = vec![
            ChainEntry::new(Shape::line("a", p(10.0, 0.0), p(0.0, 0.0)), false),
            ChainEntry::new(Shape::line("b", p(10.0, 0.0), p(10.0, 10.0)), false),
            ChainEntry::new(Shape::line("c", p(0.0, 10.0), p(10.0, 10.0)), false),
            ChainEntry::new(Shape::line("d", p(0.0, 10.0), p(0.0, 0.0)), false),
        ];
        Chain::new(ChainId::numbered(0), entries, true)
    }

    #[test]
    fn orients_entries_and_computes_winding() {
        let n = normalize_chain(&scrambled_square(), 1e-3);
        for w in n.entries.windows(2) {
            assert!((w[0].end_point() - w[1].start_point()).norm() < 1e-12);
        }
        let flags: Vec<bool> = n.entries.iter().map(|e| e.reversed).collect();
        assert_eq!(flags, [true, false, true, false]);
        assert_eq!(n.winding, Some(Winding::CounterClockwise));
        assert!(n.closed);
    }

    #[test]
    fn idempotent() {
        let once = normalize_chain(&scrambled_square(), 1e-3);
        let twice = normalize_chain(&once, 1e-3);
        assert_eq!(once, twice);
    }

    #[test]
    fn winding_of_clockwise_arc_loop() {
        // Two CW half circles.
        let entries = vec![
            ChainEntry::new(Shape::arc("u", p(0.0, 0.0), 1.0, PI, -PI), false),
            ChainEntry::new(Shape::arc("l", p(0.0, 0.0), 1.0, 0.0, -PI), false),
        ];
        let n = normalize_chain(&Chain::new(ChainId::numbered(1), entries, true), 1e-4);
        assert_eq!(n.winding, Some(Winding::Clockwise));
        assert!((n.signed_area(1e-4) + PI).abs() < 1e-2);
    }

    #[test]
    fn open_chain_has_no_winding() {
        let entries = vec![ChainEntry::new(Shape::line("a", p(0.0, 0.0), p(1.0, 0.0)), false)];
        let n = normalize_chain(&Chain::new(ChainId::numbered(2), entries, false), 1e-3);
        assert!(!n.closed);
        assert_eq!(n.winding, None);
    }

    #[test]
    fn closure_gap_is_separate_from_flattening() {
        // Ends 5e-4 apart: within a 1e-3 flattening tolerance, but not
        // within a 1e-4 connectivity tolerance.
        let entries = vec![
            ChainEntry::new(Shape::line("a", p(0.0, 0.0), p(10.0, 0.0)), false),
            ChainEntry::new(Shape::line("b", p(10.0, 0.0), p(10.0, 10.0)), false),
            ChainEntry::new(Shape::line("c", p(10.0, 10.0), p(5e-4, 0.0)), false),
        ];
        let chain = Chain::new(ChainId::numbered(3), entries, false);
        assert!(normalize_chain(&chain, 1e-3).closed);
        let strict = normalize_chain_within(&chain, 1e-4, 1e-3);
        assert!(!strict.closed);
        assert_eq!(strict.winding, None);
    }
}
