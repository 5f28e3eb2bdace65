use crate::geometry::bounding_box::Aabb;
use crate::geometry::curve::{Arc, Curve, Line, Primitive};
use crate::math::arc_2d::arc_from_bulge;
use crate::math::{distance_sq, Point2};
use crate::tessellation::append_polyline;

/// Bulge-encoded polyline vertex for mixed line/arc segments.
///
/// `bulge = tan(sweep_angle / 4)`:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
/// - `|bulge| = 1` = semicircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PlineVertex {
    /// Creates a new vertex with the given coordinates and bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// A polyline with mixed straight-line and circular-arc segments.
///
/// Each segment between consecutive vertices is either a line (bulge=0)
/// or a circular arc (bulge≠0). For closed polylines, the last vertex
/// connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pline {
    pub vertices: Vec<PlineVertex>,
    pub closed: bool,
}

impl Pline {
    /// Creates a `Pline` from points with all-zero bulges (line segments only).
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let vertices = points.iter().map(|p| PlineVertex::line(p.x, p.y)).collect();
        Self { vertices, closed }
    }

    /// Returns the number of segments in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Returns segment `i` as a primitive, or `None` when it has zero
    /// length or the index is out of range.
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<Primitive> {
        if i >= self.segment_count() {
            return None;
        }
        let v0 = &self.vertices[i];
        let v1 = &self.vertices[(i + 1) % self.vertices.len()];
        let (p0, p1) = (v0.point(), v1.point());
        if distance_sq(&p0, &p1) < crate::math::EPSILON * crate::math::EPSILON {
            return None;
        }
        match arc_from_bulge(&p0, &p1, v0.bulge) {
            Some(span) => Some(Primitive::Arc(Arc::new(
                span.center,
                span.radius,
                span.start_angle,
                span.sweep,
            ))),
            None => Some(Primitive::Line(Line::new(p0, p1))),
        }
    }

    /// Decomposes the polyline into its line and arc segments, in order.
    /// Zero-length segments are skipped.
    #[must_use]
    pub fn primitives(&self) -> Vec<Primitive> {
        (0..self.segment_count()).filter_map(|i| self.segment(i)).collect()
    }

    /// Converts this polyline to a list of points by tessellating arcs into line segments.
    ///
    /// `tolerance` controls the maximum deviation between the arc and its chord approximation.
    /// A closed polyline repeats its first point at the end.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = Vec::with_capacity(self.vertices.len() * 2);
        for prim in self.primitives() {
            append_polyline(&mut points, &prim.tessellate(tolerance), crate::math::EPSILON);
        }
        if points.is_empty() {
            if let Some(v) = self.vertices.first() {
                points.push(v.point());
            }
        }
        points
    }

    /// Returns a new polyline with vertices in reverse order and negated bulges.
    ///
    /// For a segment `v[i] → v[i+1]` with bulge `b`, the reversed segment
    /// `v[i+1] → v[i]` has bulge `-b` (arc direction flips).
    #[must_use]
    pub fn reversed(&self) -> Self {
        let m = self.vertices.len();
        if m == 0 {
            return self.clone();
        }
        let mut new_verts = Vec::with_capacity(m);
        for j in 0..m {
            let orig = &self.vertices[m - 1 - j];
            // Vertex j starts the reverse of original segment m-2-j; for a
            // closed polyline the last one starts the reversed closing segment.
            let bulge = if j < m - 1 {
                -self.vertices[m - 2 - j].bulge
            } else if self.closed {
                -self.vertices[m - 1].bulge
            } else {
                0.0
            };
            new_verts.push(PlineVertex::new(orig.x, orig.y, bulge));
        }
        Self {
            vertices: new_verts,
            closed: self.closed,
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        self.vertices.first().map(PlineVertex::point)
    }

    /// Last point reached; the first vertex again for a closed polyline.
    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        if self.closed {
            self.start_point()
        } else {
            self.vertices.last().map(PlineVertex::point)
        }
    }

    /// Bounding box over all segments, arcs included.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let mut bb = self.primitives().iter().fold(Aabb::empty(), |bb, p| bb.union(&p.bounding_box()));
        if let Some(p) = self.start_point() {
            bb.include(&p);
        }
        bb
    }
}
