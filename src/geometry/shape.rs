use std::fmt;

use crate::error::{GeometryError, Result};
use crate::geometry::bounding_box::Aabb;
use crate::geometry::curve::{Arc, Circle, Curve, Ellipse, Line, Primitive, Spline};
use crate::geometry::pline::Pline;
use crate::math::{Point2, Vector2};

/// Stable identifier of a drawing shape, assigned by the importer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub String);

impl ShapeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Geometry carried by a drawing shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Polyline(Pline),
    Ellipse(Ellipse),
    Spline(Spline),
}

impl Geometry {
    /// Lowercase name of the variant, used in messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Arc(_) => "arc",
            Self::Circle(_) => "circle",
            Self::Polyline(_) => "polyline",
            Self::Ellipse(_) => "ellipse",
            Self::Spline(_) => "spline",
        }
    }

    /// Returns `true` for geometry that closes on itself and therefore forms
    /// a chain on its own: circles, closed polylines, full ellipses and
    /// closed splines.
    #[must_use]
    pub fn is_self_closed(&self) -> bool {
        match self {
            Self::Line(_) | Self::Arc(_) => false,
            Self::Circle(_) => true,
            Self::Polyline(p) => p.closed,
            Self::Ellipse(e) => e.is_full(),
            Self::Spline(s) => s.closed(),
        }
    }

    /// Breaks the geometry into line and arc primitives in traversal order.
    ///
    /// Ellipses and splines have no exact line/arc form and are flattened
    /// to line segments within `tolerance`.
    #[must_use]
    pub fn decompose(&self, tolerance: f64) -> Vec<Primitive> {
        match self {
            Self::Line(l) => vec![Primitive::Line(*l)],
            Self::Arc(a) => vec![Primitive::Arc(*a)],
            Self::Circle(c) => vec![Primitive::Arc(c.as_arc())],
            Self::Polyline(p) => p.primitives(),
            Self::Ellipse(_) | Self::Spline(_) => points_to_lines(&self.tessellate(tolerance)),
        }
    }
}

fn points_to_lines(points: &[Point2]) -> Vec<Primitive> {
    points
        .windows(2)
        .filter(|w| crate::math::distance_sq(&w[0], &w[1]) > crate::math::EPSILON * crate::math::EPSILON)
        .map(|w| Primitive::Line(Line::new(w[0], w[1])))
        .collect()
}

impl Curve for Geometry {
    fn start_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.start_point(),
            Self::Arc(a) => a.start_point(),
            Self::Circle(c) => c.start_point(),
            Self::Polyline(p) => p.start_point().unwrap_or_else(Point2::origin),
            Self::Ellipse(e) => e.start_point(),
            Self::Spline(s) => s.start_point(),
        }
    }

    fn end_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.end_point(),
            Self::Arc(a) => a.end_point(),
            Self::Circle(c) => c.end_point(),
            Self::Polyline(p) => p.end_point().unwrap_or_else(Point2::origin),
            Self::Ellipse(e) => e.end_point(),
            Self::Spline(s) => s.end_point(),
        }
    }

    fn start_tangent(&self) -> Option<Vector2> {
        match self {
            Self::Line(l) => l.start_tangent(),
            Self::Arc(a) => a.start_tangent(),
            Self::Circle(c) => c.start_tangent(),
            Self::Polyline(p) => p.primitives().first().and_then(Curve::start_tangent),
            Self::Ellipse(e) => e.start_tangent(),
            Self::Spline(s) => s.start_tangent(),
        }
    }

    fn end_tangent(&self) -> Option<Vector2> {
        match self {
            Self::Line(l) => l.end_tangent(),
            Self::Arc(a) => a.end_tangent(),
            Self::Circle(c) => c.end_tangent(),
            Self::Polyline(p) => p.primitives().last().and_then(Curve::end_tangent),
            Self::Ellipse(e) => e.end_tangent(),
            Self::Spline(s) => s.end_tangent(),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Self::Line(l) => l.bounding_box(),
            Self::Arc(a) => a.bounding_box(),
            Self::Circle(c) => c.bounding_box(),
            Self::Polyline(p) => p.bounding_box(),
            Self::Ellipse(e) => e.bounding_box(),
            Self::Spline(s) => s.bounding_box(),
        }
    }

    fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        match self {
            Self::Line(l) => l.tessellate(tolerance),
            Self::Arc(a) => a.tessellate(tolerance),
            Self::Circle(c) => c.tessellate(tolerance),
            Self::Polyline(p) => p.to_points(tolerance),
            Self::Ellipse(e) => e.tessellate(tolerance),
            Self::Spline(s) => s.tessellate(tolerance),
        }
    }

    fn is_closed(&self) -> bool {
        self.is_self_closed()
    }

    fn check_degenerate(&self, tolerance: f64) -> Result<()> {
        match self {
            Self::Line(l) => l.check_degenerate(tolerance),
            Self::Arc(a) => a.check_degenerate(tolerance),
            Self::Circle(c) => c.check_degenerate(tolerance),
            Self::Polyline(p) => check_pline(p, tolerance),
            Self::Ellipse(e) => e.check_degenerate(tolerance),
            Self::Spline(s) => s.check_degenerate(tolerance),
        }
    }
}

fn check_pline(pline: &Pline, tolerance: f64) -> Result<()> {
    if pline
        .vertices
        .iter()
        .any(|v| !v.x.is_finite() || !v.y.is_finite() || !v.bulge.is_finite())
    {
        return Err(GeometryError::NonFinite("polyline").into());
    }
    if pline.vertices.len() < 2 {
        return Err(GeometryError::Degenerate(format!(
            "polyline has {} vertices",
            pline.vertices.len()
        ))
        .into());
    }
    let length: f64 = pline.primitives().iter().map(Primitive::length).sum();
    if length <= tolerance {
        return Err(GeometryError::Degenerate("polyline has zero length".into()).into());
    }
    Ok(())
}

/// A parsed drawing shape: geometry plus identity.
///
/// Shapes are immutable input; chain building records traversal direction
/// next to the shape instead of altering it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub layer: Option<String>,
    pub geometry: Geometry,
}

impl Shape {
    #[must_use]
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: ShapeId(id.into()),
            layer: None,
            geometry,
        }
    }

    /// Tags the shape with a drawing layer.
    #[must_use]
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    #[must_use]
    pub fn line(id: impl Into<String>, start: Point2, end: Point2) -> Self {
        Self::new(id, Geometry::Line(Line::new(start, end)))
    }

    #[must_use]
    pub fn arc(id: impl Into<String>, center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self::new(id, Geometry::Arc(Arc::new(center, radius, start_angle, sweep)))
    }

    #[must_use]
    pub fn circle(id: impl Into<String>, center: Point2, radius: f64) -> Self {
        Self::new(id, Geometry::Circle(Circle::new(center, radius)))
    }

    #[must_use]
    pub fn polyline(id: impl Into<String>, pline: Pline) -> Self {
        Self::new(id, Geometry::Polyline(pline))
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.geometry.start_point()
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.geometry.end_point()
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.geometry.bounding_box()
    }

    #[must_use]
    pub fn is_self_closed(&self) -> bool {
        self.geometry.is_self_closed()
    }

    #[must_use]
    pub fn decompose(&self, tolerance: f64) -> Vec<Primitive> {
        self.geometry.decompose(tolerance)
    }

    #[must_use]
    pub fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        self.geometry.tessellate(tolerance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use super::*;
    use crate::geometry::pline::PlineVertex;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn self_closed_variants() {
        assert!(Shape::circle("c", p(0.0, 0.0), 1.0).is_self_closed());
        assert!(!Shape::line("l", p(0.0, 0.0), p(1.0, 0.0)).is_self_closed());
        assert!(!Shape::arc("a", p(0.0, 0.0), 1.0, 0.0, FRAC_PI_2).is_self_closed());
        let square = Pline::from_points(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)], true);
        assert!(Shape::polyline("p", square).is_self_closed());
        let half = Ellipse::new(p(0.0, 0.0), Vector2::new(2.0, 0.0), 0.5, 0.0, std::f64::consts::PI);
        assert!(!Shape::new("e", Geometry::Ellipse(half)).is_self_closed());
    }

    #[test]
    fn decompose_polyline_mixes_lines_and_arcs() {
        let pline = Pline {
            vertices: vec![
                PlineVertex::line(0.0, 0.0),
                PlineVertex::new(4.0, 0.0, 1.0),
                PlineVertex::line(4.0, 4.0),
            ],
            closed: false,
        };
        let prims = Shape::polyline("p", pline).decompose(1e-3);
        assert_eq!(prims.len(), 2);
        assert!(matches!(prims[0], Primitive::Line(_)));
        assert!(matches!(prims[1], Primitive::Arc(_)));
    }

    #[test]
    fn decompose_circle_is_full_arc() {
        let prims = Shape::circle("c", p(1.0, 1.0), 2.0).decompose(1e-3);
        match &prims[..] {
            [Primitive::Arc(a)] => assert!((a.sweep - TAU).abs() < 1e-12),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decompose_ellipse_flattens_to_connected_lines() {
        let e = Ellipse::full(p(0.0, 0.0), Vector2::new(3.0, 0.0), 0.5);
        let prims = Shape::new("e", Geometry::Ellipse(e)).decompose(1e-3);
        assert!(prims.len() > 8);
        for w in prims.windows(2) {
            assert!((w[0].end_point() - w[1].start_point()).norm() < 1e-12);
        }
        assert!((prims[prims.len() - 1].end_point() - prims[0].start_point()).norm() < 1e-9);
    }

    #[test]
    fn degenerate_polyline_is_reported() {
        let single = Pline::from_points(&[p(0.0, 0.0)], false);
        assert!(Geometry::Polyline(single).check_degenerate(1e-3).is_err());
        let collapsed = Pline::from_points(&[p(0.0, 0.0), p(0.0, 0.0)], false);
        assert!(Geometry::Polyline(collapsed).check_degenerate(1e-3).is_err());
    }

    #[test]
    fn layer_and_id() {
        let s = Shape::line("L1", p(0.0, 0.0), p(1.0, 0.0)).with_layer("cut");
        assert_eq!(s.id.as_str(), "L1");
        assert_eq!(s.id.to_string(), "L1");
        assert_eq!(s.layer.as_deref(), Some("cut"));
        assert_eq!(s.geometry.kind(), "line");
    }
}
