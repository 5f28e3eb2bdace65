use std::fmt;

use crate::geometry::curve::{Curve, Primitive};
use crate::geometry::{Aabb, Shape};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Vector2};
use crate::tessellation::append_polyline;

/// Identifier of a chain.
///
/// Detected chains are numbered `chain-0`, `chain-1`, … in discovery order;
/// offset results derive `<source>/offset-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub String);

impl ChainId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Sequential id assigned by chain detection.
    #[must_use]
    pub fn numbered(n: usize) -> Self {
        Self(format!("chain-{n}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rotational sense of a closed chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    /// Winding implied by a shoelace signed area; `None` for zero area.
    #[must_use]
    pub fn from_signed_area(area: f64) -> Option<Self> {
        if area > 0.0 {
            Some(Self::CounterClockwise)
        } else if area < 0.0 {
            Some(Self::Clockwise)
        } else {
            None
        }
    }

    /// `+1` for counter-clockwise, `-1` for clockwise.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => -1.0,
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }
}

/// A shape with its traversal direction inside a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEntry {
    /// The shape, exactly as imported.
    pub shape: Shape,
    /// If `true`, the shape is traversed from its end to its start.
    pub reversed: bool,
}

impl ChainEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(shape: Shape, reversed: bool) -> Self {
        Self { shape, reversed }
    }

    /// Point where this entry's traversal starts.
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        if self.reversed {
            self.shape.end_point()
        } else {
            self.shape.start_point()
        }
    }

    /// Point where this entry's traversal ends.
    #[must_use]
    pub fn end_point(&self) -> Point2 {
        if self.reversed {
            self.shape.start_point()
        } else {
            self.shape.end_point()
        }
    }

    /// Unit direction of travel leaving the start point.
    #[must_use]
    pub fn start_direction(&self) -> Option<Vector2> {
        if self.reversed {
            self.shape.geometry.end_tangent().map(|t| -t)
        } else {
            self.shape.geometry.start_tangent()
        }
    }

    /// Unit direction of travel arriving at the end point.
    #[must_use]
    pub fn end_direction(&self) -> Option<Vector2> {
        if self.reversed {
            self.shape.geometry.start_tangent().map(|t| -t)
        } else {
            self.shape.geometry.end_tangent()
        }
    }

    /// Line and arc pieces in traversal order.
    #[must_use]
    pub fn primitives(&self, tolerance: f64) -> Vec<Primitive> {
        let prims = self.shape.decompose(tolerance);
        if self.reversed {
            prims.iter().rev().map(Primitive::reversed).collect()
        } else {
            prims
        }
    }

    /// Flattened points in traversal order.
    #[must_use]
    pub fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = self.shape.tessellate(tolerance);
        if self.reversed {
            points.reverse();
        }
        points
    }

    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            reversed: !self.reversed,
        }
    }
}

/// An ordered run of shapes forming one continuous cut path.
///
/// For consecutive entries, `entries[i].end_point()` meets
/// `entries[i + 1].start_point()` within the connectivity tolerance; a
/// closed chain also returns from the last entry to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: ChainId,
    pub entries: Vec<ChainEntry>,
    pub closed: bool,
    /// Winding of a closed chain; `None` for open chains or before
    /// normalization.
    pub winding: Option<Winding>,
}

impl Chain {
    /// Creates a chain. Winding stays unset until the chain is normalized.
    #[must_use]
    pub fn new(id: ChainId, entries: Vec<ChainEntry>, closed: bool) -> Self {
        Self {
            id,
            entries,
            closed,
            winding: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        self.entries.first().map(ChainEntry::start_point)
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        self.entries.last().map(ChainEntry::end_point)
    }

    /// Union of the shapes' bounding boxes.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.entries
            .iter()
            .fold(Aabb::empty(), |bb, e| bb.union(&e.shape.bounding_box()))
    }

    /// The same path travelled backwards. Winding flips.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            id: self.id.clone(),
            entries: self.entries.iter().rev().map(ChainEntry::flipped).collect(),
            closed: self.closed,
            winding: self.winding.map(Winding::flipped),
        }
    }

    /// Flattens the chain into one point list in traversal order.
    ///
    /// Shared junction points appear once. A closed chain does not repeat
    /// its first point unless the shapes themselves do.
    #[must_use]
    pub fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = Vec::new();
        for entry in &self.entries {
            append_polyline(&mut points, &entry.tessellate(tolerance), crate::math::EPSILON);
        }
        points
    }

    /// Line and arc pieces of every entry, in traversal order.
    #[must_use]
    pub fn primitives(&self, tolerance: f64) -> Vec<Primitive> {
        self.entries.iter().flat_map(|e| e.primitives(tolerance)).collect()
    }

    /// Shoelace signed area of the flattened chain (positive when CCW).
    #[must_use]
    pub fn signed_area(&self, tolerance: f64) -> f64 {
        signed_area_2d(&self.tessellate(tolerance))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_chain() -> Chain {
        let corners = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let entries = (0..4)
            .map(|i| ChainEntry::new(Shape::line(format!("s{i}"), corners[i], corners[(i + 1) % 4]), false))
            .collect();
        let mut chain = Chain::new(ChainId::numbered(0), entries, true);
        chain.winding = Some(Winding::CounterClockwise);
        chain
    }

    #[test]
    fn reversed_entry_swaps_ends_and_direction() {
        let e = ChainEntry::new(Shape::line("l", p(0.0, 0.0), p(2.0, 0.0)), true);
        assert_eq!(e.start_point(), p(2.0, 0.0));
        assert_eq!(e.end_point(), p(0.0, 0.0));
        assert!((e.start_direction().unwrap().x + 1.0).abs() < 1e-12);
        let prims = e.primitives(1e-3);
        assert_eq!(prims[0].start_point(), p(2.0, 0.0));
    }

    #[test]
    fn square_area_and_box() {
        let chain = square_chain();
        assert!((chain.signed_area(1e-3) - 100.0).abs() < 1e-9);
        assert_eq!(chain.tessellate(1e-3).len(), 5);
        let bb = chain.bounding_box();
        assert_eq!(bb.min, p(0.0, 0.0));
        assert_eq!(bb.max, p(10.0, 10.0));
    }

    #[test]
    fn reversal_flips_winding_and_area() {
        let rev = square_chain().reversed();
        assert_eq!(rev.winding, Some(Winding::Clockwise));
        assert!((rev.signed_area(1e-3) + 100.0).abs() < 1e-9);
        assert_eq!(rev.start_point(), Some(p(0.0, 0.0)));
        assert_eq!(rev.entries[0].shape.id.as_str(), "s3");
        assert!(rev.entries.iter().all(|e| e.reversed));
    }

    #[test]
    fn winding_from_area() {
        assert_eq!(Winding::from_signed_area(2.0), Some(Winding::CounterClockwise));
        assert_eq!(Winding::from_signed_area(-2.0), Some(Winding::Clockwise));
        assert_eq!(Winding::from_signed_area(0.0), None);
        assert!((Winding::Clockwise.sign() + 1.0).abs() < 1e-12);
    }
}
