//! Pairwise intersection of drawing primitives.
//!
//! Lines, arcs and circles are intersected directly. Circles are handled as
//! arcs spanning a full turn. Polylines, ellipses and splines must be broken
//! into lines and arcs first; [`intersect_decomposed`] does that for the
//! caller.
use crate::error::{OperationError, Result};
use crate::geometry::curve::{Curve, Primitive};
use crate::geometry::{Geometry, Shape};
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, segment_arc_intersect_2d, segment_segment_intersect_2d, Crossing, RawHit,
};
use crate::math::{distance_sq, Point2};

/// How two primitives meet at an intersection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    /// The point is an endpoint of at least one primitive.
    Endpoint,
    /// The primitives cross away from their endpoints.
    Interior,
    /// The primitives touch without crossing.
    Tangent,
}

/// A single intersection between two primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint {
    /// The intersection point.
    pub point: Point2,
    /// Parameter on the first primitive: `0..=1` along a line, the absolute
    /// angle on an arc or circle.
    pub param_a: f64,
    /// Parameter on the second primitive.
    pub param_b: f64,
    pub kind: IntersectionKind,
}

/// Result of intersecting two primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersections {
    Points(Vec<IntersectionPoint>),
    /// The primitives overlap along a stretch instead of meeting at points.
    Coincident,
}

impl Intersections {
    /// Isolated points; empty for coincident primitives.
    #[must_use]
    pub fn points(&self) -> &[IntersectionPoint] {
        match self {
            Self::Points(p) => p,
            Self::Coincident => &[],
        }
    }

    #[must_use]
    pub fn is_coincident(&self) -> bool {
        matches!(self, Self::Coincident)
    }

    /// `true` when there are neither points nor an overlap.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Points(p) if p.is_empty())
    }
}

/// Intersects two line/arc/circle shapes.
///
/// # Errors
///
/// Returns [`OperationError::NotDecomposed`] when either shape is a
/// polyline, ellipse or spline.
pub fn intersect(a: &Shape, b: &Shape, tolerance: f64) -> Result<Intersections> {
    let pa = as_primitive(&a.geometry)?;
    let pb = as_primitive(&b.geometry)?;
    Ok(intersect_primitives(&pa, &pb, tolerance))
}

fn as_primitive(geometry: &Geometry) -> Result<Primitive> {
    match geometry {
        Geometry::Line(l) => Ok(Primitive::Line(*l)),
        Geometry::Arc(a) => Ok(Primitive::Arc(*a)),
        Geometry::Circle(c) => Ok(Primitive::Arc(c.as_arc())),
        Geometry::Polyline(_) | Geometry::Ellipse(_) | Geometry::Spline(_) => {
            Err(OperationError::NotDecomposed {
                kind: geometry.kind(),
            }
            .into())
        }
    }
}

/// Intersects two primitives.
#[must_use]
pub fn intersect_primitives(a: &Primitive, b: &Primitive, tolerance: f64) -> Intersections {
    if !a.bounding_box().intersects(&b.bounding_box(), tolerance) {
        return Intersections::Points(Vec::new());
    }

    let crossing = match (a, b) {
        (Primitive::Line(la), Primitive::Line(lb)) => {
            segment_segment_intersect_2d(&la.start, &la.end, &lb.start, &lb.end, tolerance)
        }
        (Primitive::Line(l), Primitive::Arc(arc)) => {
            segment_arc_intersect_2d(&l.start, &l.end, &arc.span(), tolerance)
        }
        (Primitive::Arc(arc), Primitive::Line(l)) => {
            swap_params(segment_arc_intersect_2d(&l.start, &l.end, &arc.span(), tolerance))
        }
        (Primitive::Arc(aa), Primitive::Arc(ab)) => {
            arc_arc_intersect_2d(&aa.span(), &ab.span(), tolerance)
        }
    };

    match crossing {
        Crossing::Coincident => Intersections::Coincident,
        Crossing::Points(hits) => Intersections::Points(
            hits.into_iter()
                .filter(|h| crate::math::is_finite_point(&h.point))
                .map(|h| classify(a, b, &h, tolerance))
                .collect(),
        ),
    }
}

fn swap_params(crossing: Crossing) -> Crossing {
    match crossing {
        Crossing::Coincident => Crossing::Coincident,
        Crossing::Points(hits) => Crossing::Points(
            hits.into_iter()
                .map(|h| RawHit {
                    param_a: h.param_b,
                    param_b: h.param_a,
                    ..h
                })
                .collect(),
        ),
    }
}

fn classify(a: &Primitive, b: &Primitive, hit: &RawHit, tolerance: f64) -> IntersectionPoint {
    let kind = if is_at_endpoint(a, &hit.point, tolerance) || is_at_endpoint(b, &hit.point, tolerance) {
        IntersectionKind::Endpoint
    } else if hit.tangent {
        IntersectionKind::Tangent
    } else {
        IntersectionKind::Interior
    };
    IntersectionPoint {
        point: hit.point,
        param_a: hit.param_a,
        param_b: hit.param_b,
        kind,
    }
}

/// Full circles have no endpoints.
fn is_at_endpoint(prim: &Primitive, point: &Point2, tolerance: f64) -> bool {
    if prim.is_closed() {
        return false;
    }
    let tol_sq = tolerance * tolerance;
    distance_sq(&prim.start_point(), point) <= tol_sq || distance_sq(&prim.end_point(), point) <= tol_sq
}

/// An intersection between pieces of two decomposed shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceIntersection {
    /// Index of the piece within the first shape's decomposition.
    pub piece_a: usize,
    /// Index of the piece within the second shape's decomposition.
    pub piece_b: usize,
    /// Local parameters refer to the two pieces.
    pub intersection: IntersectionPoint,
}

/// Intersections between two shapes of any kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecomposedIntersections {
    pub points: Vec<PieceIntersection>,
    /// Piece index pairs that overlap along a stretch.
    pub overlaps: Vec<(usize, usize)>,
}

/// Decomposes both shapes into lines and arcs and intersects every piece
/// pair. Ellipses and splines are flattened within `tolerance`.
///
/// A point shared by consecutive pieces is reported once.
#[must_use]
pub fn intersect_decomposed(a: &Shape, b: &Shape, tolerance: f64) -> DecomposedIntersections {
    let pieces_a = a.decompose(tolerance);
    let pieces_b = b.decompose(tolerance);
    let mut result = DecomposedIntersections::default();

    for (i, pa) in pieces_a.iter().enumerate() {
        for (j, pb) in pieces_b.iter().enumerate() {
            match intersect_primitives(pa, pb, tolerance) {
                Intersections::Coincident => result.overlaps.push((i, j)),
                Intersections::Points(points) => {
                    for ip in points {
                        let duplicate = result
                            .points
                            .iter()
                            .any(|p| distance_sq(&p.intersection.point, &ip.point) <= tolerance * tolerance);
                        if !duplicate {
                            result.points.push(PieceIntersection {
                                piece_a: i,
                                piece_b: j,
                                intersection: ip,
                            });
                        }
                    }
                }
            }
        }
    }
    result
}
