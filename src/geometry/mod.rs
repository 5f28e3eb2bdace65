pub mod bounding_box;
pub mod curve;
pub mod pline;
pub mod shape;

pub use bounding_box::Aabb;
pub use curve::{Arc, Circle, Curve, Ellipse, Line, Primitive, Spline};
pub use pline::{Pline, PlineVertex};
pub use shape::{Geometry, Shape, ShapeId};
