mod arc;
mod circle;
mod ellipse;
mod line;
mod spline;

pub use arc::Arc;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use spline::Spline;

use crate::error::Result;
use crate::geometry::bounding_box::Aabb;
use crate::math::{Point2, Vector2};

/// Common queries answered by every planar curve.
///
/// Curves are traversed in their natural direction: from `start_point`
/// to `end_point`.
pub trait Curve {
    /// Point where traversal begins.
    fn start_point(&self) -> Point2;

    /// Point where traversal ends.
    fn end_point(&self) -> Point2;

    /// Unit tangent at the start, or `None` if degenerate.
    fn start_tangent(&self) -> Option<Vector2>;

    /// Unit tangent at the end, or `None` if degenerate.
    fn end_tangent(&self) -> Option<Vector2>;

    /// Axis-aligned bounding box of the curve.
    fn bounding_box(&self) -> Aabb;

    /// Flattens the curve into points, first and last points included,
    /// deviating from the true curve by at most `tolerance`.
    fn tessellate(&self, tolerance: f64) -> Vec<Point2>;

    /// Returns whether the curve ends where it starts by construction.
    fn is_closed(&self) -> bool;

    /// Checks the defining data for degeneracy at the given tolerance.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` describing the defect.
    fn check_degenerate(&self, tolerance: f64) -> Result<()>;
}

/// An elementary line or arc piece.
///
/// Every shape decomposes into primitives; intersection and offsetting
/// operate on primitives only.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Arc(Arc),
}

impl Primitive {
    /// Returns the primitive travelled in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.reversed()),
            Self::Arc(a) => Self::Arc(a.reversed()),
        }
    }

    /// Length of the primitive.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.span().length(),
        }
    }

    /// Point halfway along the primitive.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        match self {
            Self::Line(l) => crate::math::midpoint(&l.start, &l.end),
            Self::Arc(a) => a.point_at_angle(a.start_angle + a.sweep * 0.5),
        }
    }

    /// Returns `true` when every defining coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Line(l) => {
                crate::math::is_finite_point(&l.start) && crate::math::is_finite_point(&l.end)
            }
            Self::Arc(a) => {
                crate::math::is_finite_point(&a.center)
                    && a.radius.is_finite()
                    && a.start_angle.is_finite()
                    && a.sweep.is_finite()
            }
        }
    }
}

impl Curve for Primitive {
    fn start_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.start_point(),
            Self::Arc(a) => a.start_point(),
        }
    }

    fn end_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.end_point(),
            Self::Arc(a) => a.end_point(),
        }
    }

    fn start_tangent(&self) -> Option<Vector2> {
        match self {
            Self::Line(l) => l.start_tangent(),
            Self::Arc(a) => a.start_tangent(),
        }
    }

    fn end_tangent(&self) -> Option<Vector2> {
        match self {
            Self::Line(l) => l.end_tangent(),
            Self::Arc(a) => a.end_tangent(),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Self::Line(l) => l.bounding_box(),
            Self::Arc(a) => a.bounding_box(),
        }
    }

    fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        match self {
            Self::Line(l) => l.tessellate(tolerance),
            Self::Arc(a) => a.tessellate(tolerance),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Line(l) => l.is_closed(),
            Self::Arc(a) => a.is_closed(),
        }
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        match self {
            Self::Line(l) => l.check_degenerate(tolerance),
            Self::Arc(a) => a.check_degenerate(tolerance),
        }
    }
}
