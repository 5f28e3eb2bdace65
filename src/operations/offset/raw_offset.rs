use tracing::trace;

use crate::diagnostics::{push_warning, Warning};
use crate::geometry::curve::{Arc, Curve, Line, Primitive};
use crate::math::{left_normal, Point2, Vector2};
use crate::topology::ChainId;

/// An offset piece with the source geometry it came from.
#[derive(Debug, Clone)]
pub(super) struct OffsetPiece {
    pub prim: Primitive,
    /// Source point the piece's end was offset from; convex joints are
    /// rounded about it.
    pub source_end: Point2,
    /// Source travel direction at the start and end.
    pub start_dir: Vector2,
    pub end_dir: Vector2,
}

/// Offsets every source piece independently by `left` (positive = left of
/// travel).
///
/// Lines are translated along their left normal. Arcs keep their center and
/// angles while the radius shrinks on the side of the center and grows on
/// the other. An arc shrinking to a point, such as a fillet offset back by
/// its own radius, is dropped quietly; one whose radius would turn negative
/// is dropped with an [`Warning::OffsetCollapse`].
pub(super) fn build(
    source: &[Primitive],
    left: f64,
    tolerance: f64,
    chain: &ChainId,
    warnings: &mut Vec<Warning>,
) -> Vec<OffsetPiece> {
    let mut pieces = Vec::with_capacity(source.len());

    for prim in source {
        let (Some(start_dir), Some(end_dir)) = (prim.start_tangent(), prim.end_tangent()) else {
            continue;
        };

        let offset = match prim {
            Primitive::Line(l) => {
                let shift = left_normal(&start_dir) * left;
                Primitive::Line(Line::new(l.start + shift, l.end + shift))
            }
            Primitive::Arc(a) => {
                // The left normal of a counter-clockwise arc points at the center.
                let radius = a.radius - left * a.sweep.signum();
                if radius.abs() <= tolerance {
                    trace!(radius = a.radius, "arc shrinks to its center");
                    continue;
                }
                if radius.is_nan() || radius < 0.0 {
                    push_warning(
                        warnings,
                        Warning::OffsetCollapse {
                            chain: chain.clone(),
                            reason: format!("arc of radius {} vanishes at offset {}", a.radius, left.abs()),
                        },
                    );
                    continue;
                }
                Primitive::Arc(Arc::new(a.center, radius, a.start_angle, a.sweep))
            }
        };

        if !offset.is_finite() {
            push_warning(
                warnings,
                Warning::OffsetCollapse {
                    chain: chain.clone(),
                    reason: "offset piece has a non-finite coordinate".into(),
                },
            );
            continue;
        }

        pieces.push(OffsetPiece {
            prim: offset,
            source_end: prim.end_point(),
            start_dir,
            end_dir,
        });
    }

    pieces
}
