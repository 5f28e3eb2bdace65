use crate::config::{ConvexJoin, OffsetConfig};
use crate::diagnostics::{push_warning, Warning};
use crate::geometry::curve::{Arc, Curve, Line, Primitive};
use crate::math::{cross, distance_sq, midpoint, Point2, EPSILON};
use crate::topology::ChainId;

use super::piece::{carrier_hits, travel, with_end, with_start};
use super::raw_offset::OffsetPiece;

/// Settings shared by every joint of one chain.
pub(super) struct Joiner<'a> {
    pub config: &'a OffsetConfig,
    /// Signed offset distance, positive to the left of travel.
    pub left: f64,
    pub chain: &'a ChainId,
}

/// The result of resolving one joint.
struct Joint {
    before: Primitive,
    after: Primitive,
    /// Pieces inserted between the two.
    bridge: Vec<Primitive>,
}

impl Joiner<'_> {
    /// Connects consecutive offset pieces into one continuous path.
    ///
    /// A closed path also joins its last piece back to the first.
    pub(super) fn connect(&self, pieces: &[OffsetPiece], closed: bool, warnings: &mut Vec<Warning>) -> Vec<Primitive> {
        let n = pieces.len();
        let mut prims: Vec<Primitive> = pieces.iter().map(|p| p.prim.clone()).collect();
        let mut bridges: Vec<Vec<Primitive>> = vec![Vec::new(); n];
        let joints = match (closed, n) {
            (_, 0) => 0,
            (true, 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };

        for k in 0..joints {
            let next = (k + 1) % n;
            let joint = self.resolve(&prims[k], &prims[next], &pieces[k], &pieces[next], warnings);
            prims[k] = joint.before;
            prims[next] = joint.after;
            bridges[k] = joint.bridge;
        }

        let tolerance = self.config.tolerance;
        prims
            .into_iter()
            .zip(bridges)
            .flat_map(|(prim, bridge)| std::iter::once(prim).chain(bridge))
            .filter(|prim| prim.length() > tolerance)
            .collect()
    }

    fn resolve(
        &self,
        a: &Primitive,
        b: &Primitive,
        piece_a: &OffsetPiece,
        piece_b: &OffsetPiece,
        warnings: &mut Vec<Warning>,
    ) -> Joint {
        let pa = a.end_point();
        let pb = b.start_point();
        let gap = (pb - pa).norm();

        if gap <= self.config.snap_threshold {
            let m = midpoint(&pa, &pb);
            return Joint {
                before: with_end(a, m),
                after: with_start(b, m),
                bridge: Vec::new(),
            };
        }

        let din = piece_a.end_dir;
        let dout = piece_b.start_dir;
        let turn = cross(&din, &dout);
        let reverses = turn.abs() <= EPSILON && din.dot(&dout) < 0.0;
        let convex = turn * self.left < 0.0 || reverses;

        if convex {
            if self.config.convex_join == ConvexJoin::Extend {
                if let Some(corner) = self.corner(a, b, piece_a, piece_b, 0.0) {
                    return Joint {
                        before: with_end(a, corner),
                        after: with_start(b, corner),
                        bridge: Vec::new(),
                    };
                }
            }
            return self.round(a, b, piece_a.source_end, turn.atan2(din.dot(&dout)).abs());
        }

        if let Some(corner) = self.corner(a, b, piece_a, piece_b, f64::INFINITY) {
            return Joint {
                before: with_end(a, corner),
                after: with_start(b, corner),
                bridge: Vec::new(),
            };
        }

        push_warning(
            warnings,
            Warning::JoinSnapped {
                chain: self.chain.clone(),
                gap,
            },
        );
        Joint {
            before: a.clone(),
            after: b.clone(),
            bridge: vec![Primitive::Line(Line::new(pa, pb))],
        }
    }

    /// Carrier intersection closest to the gap, reachable by extending each
    /// piece at most `max_extension` and trimming it at most `max_trim`.
    ///
    /// Carriers and travel directions come from the untouched pieces, so a
    /// piece already trimmed to nothing or past its far end still has one.
    fn corner(
        &self,
        a: &Primitive,
        b: &Primitive,
        piece_a: &OffsetPiece,
        piece_b: &OffsetPiece,
        max_trim: f64,
    ) -> Option<Point2> {
        let tol = self.config.tolerance;
        let max_ext = self.config.max_extension + tol;
        let max_trim = max_trim + tol;
        let pa = a.end_point();
        let pb = b.start_point();
        let m = midpoint(&pa, &pb);

        carrier_hits(&piece_a.prim, &piece_b.prim, tol)
            .into_iter()
            .filter(|p| {
                let ext_a = travel(&piece_a.prim, &pa, p);
                let ext_b = -travel(&piece_b.prim, &pb, p);
                ext_a <= max_ext && ext_b <= max_ext && -ext_a <= max_trim && -ext_b <= max_trim
            })
            .min_by(|p, q| distance_sq(p, &m).total_cmp(&distance_sq(q, &m)))
    }

    /// Closes a convex joint with an arc about the source corner.
    fn round(&self, a: &Primitive, b: &Primitive, corner: Point2, turn: f64) -> Joint {
        let pa = a.end_point();
        let pb = b.start_point();
        let radius = (pa - corner).norm();
        if radius <= self.config.tolerance {
            return Joint {
                before: a.clone(),
                after: b.clone(),
                bridge: vec![Primitive::Line(Line::new(pa, pb))],
            };
        }

        let start_angle = (pa.y - corner.y).atan2(pa.x - corner.x);
        let fillet = Arc::new(corner, radius, start_angle, -self.left.signum() * turn);
        let end = fillet.end_point();
        let mut bridge = vec![Primitive::Arc(fillet)];
        let mut after = b.clone();
        if (end - pb).norm() <= self.config.tolerance {
            after = with_start(b, end);
        } else {
            bridge.push(Primitive::Line(Line::new(end, pb)));
        }
        Joint {
            before: a.clone(),
            after,
            bridge,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::Vector2;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Primitive {
        Primitive::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    fn piece(prim: Primitive, source_end: Point2) -> OffsetPiece {
        let dir = prim.start_tangent().unwrap();
        OffsetPiece {
            prim,
            source_end,
            start_dir: dir,
            end_dir: dir,
        }
    }

    /// Offsets of the corner (0,0)→(10,0)→(10,10) moved `left` to the left.
    fn corner_pieces(left: f64) -> Vec<OffsetPiece> {
        vec![
            piece(line(0.0, left, 10.0, left), Point2::new(10.0, 0.0)),
            piece(line(10.0 - left, 0.0, 10.0 - left, 10.0), Point2::new(10.0, 10.0)),
        ]
    }

    fn joiner<'a>(config: &'a OffsetConfig, left: f64, chain: &'a ChainId) -> Joiner<'a> {
        Joiner { config, left, chain }
    }

    #[test]
    fn concave_corner_is_trimmed() {
        let config = OffsetConfig::default();
        let id = ChainId::new("c");
        let mut warnings = Vec::new();
        let path = joiner(&config, 1.0, &id).connect(&corner_pieces(1.0), false, &mut warnings);
        assert_eq!(path.len(), 2);
        let c = path[0].end_point();
        assert_abs_diff_eq!(c.x, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 1.0, epsilon = 1e-12);
        assert!(warnings.is_empty());
    }

    #[test]
    fn convex_corner_is_extended() {
        let config = OffsetConfig::default();
        let id = ChainId::new("c");
        let mut warnings = Vec::new();
        let path = joiner(&config, -1.0, &id).connect(&corner_pieces(-1.0), false, &mut warnings);
        assert_eq!(path.len(), 2);
        let c = path[1].start_point();
        assert_abs_diff_eq!(c.x, 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn convex_corner_is_rounded_on_request() {
        let config = OffsetConfig::default().with_convex_join(ConvexJoin::Round);
        let id = ChainId::new("c");
        let mut warnings = Vec::new();
        let path = joiner(&config, -1.0, &id).connect(&corner_pieces(-1.0), false, &mut warnings);
        assert_eq!(path.len(), 3);
        let Primitive::Arc(fillet) = &path[1] else { panic!("expected a fillet arc") };
        assert_abs_diff_eq!(fillet.radius, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fillet.sweep, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        for w in path.windows(2) {
            assert!((w[0].end_point() - w[1].start_point()).norm() < 1e-9);
        }
    }

    #[test]
    fn extension_beyond_limit_falls_back_to_round() {
        // A shallow convex turn needs a long miter.
        let config = OffsetConfig::default().with_max_extension(0.01);
        let id = ChainId::new("c");
        let dir = Vector2::new(1.0, 0.2).normalize();
        let end = Point2::new(10.0, 0.0) + dir * 10.0;
        let n = Vector2::new(dir.y, -dir.x);
        let pieces = vec![
            piece(line(0.0, -1.0, 10.0, -1.0), Point2::new(10.0, 0.0)),
            OffsetPiece {
                prim: Primitive::Line(Line::new(Point2::new(10.0, 0.0) + n, end + n)),
                source_end: end,
                start_dir: dir,
                end_dir: dir,
            },
        ];
        let mut warnings = Vec::new();
        let path = joiner(&config, -1.0, &id).connect(&pieces, false, &mut warnings);
        assert!(path.iter().any(|p| matches!(p, Primitive::Arc(_))));
    }

    #[test]
    fn parallel_concave_gap_is_bridged() {
        let config = OffsetConfig::default();
        let id = ChainId::new("c");
        // Two parallel pieces that never meet; the turn direction marks the
        // joint concave.
        let a = OffsetPiece {
            prim: line(0.0, 1.0, 10.0, 1.0),
            source_end: Point2::new(10.0, 0.0),
            start_dir: Vector2::new(1.0, 0.0),
            end_dir: Vector2::new(1.0, 0.0),
        };
        let b = OffsetPiece {
            prim: line(12.0, 2.0, 20.0, 2.0),
            source_end: Point2::new(20.0, 0.0),
            start_dir: Vector2::new(0.0, 1.0),
            end_dir: Vector2::new(1.0, 0.0),
        };
        let mut warnings = Vec::new();
        let path = joiner(&config, 1.0, &id).connect(&[a, b], false, &mut warnings);
        assert_eq!(path.len(), 3);
        assert!(matches!(warnings[0], Warning::JoinSnapped { .. }));
    }

    #[test]
    fn piece_trimmed_to_nothing_still_joins() {
        // Right-hand offset of a notch floor: the first joint trims the
        // floor away entirely, the second must still find its carrier.
        let config = OffsetConfig::default();
        let id = ChainId::new("c");
        let pieces = vec![
            piece(line(4.5, 10.0, 4.5, 5.0), Point2::new(5.5, 5.0)),
            piece(line(5.5, 6.0, 4.5, 6.0), Point2::new(4.5, 5.0)),
            piece(line(5.5, 5.0, 5.5, 10.0), Point2::new(4.5, 10.0)),
        ];
        let mut warnings = Vec::new();
        let path = joiner(&config, -1.0, &id).connect(&pieces, false, &mut warnings);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(path.len(), 3);
        assert!((path[1].start_point() - Point2::new(4.5, 6.0)).norm() < 1e-12);
        assert!((path[1].end_point() - Point2::new(5.5, 6.0)).norm() < 1e-12);
        assert!((path[2].start_point() - Point2::new(5.5, 6.0)).norm() < 1e-12);
    }
}
