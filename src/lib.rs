//! Geometry core for turning 2D drawings into machine cut paths.
//!
//! Loose drawing shapes are grouped into [`Chain`]s, closed chains are
//! nested into [`Part`]s by containment, and any chain can be offset by a
//! signed distance to compensate for tool radius or kerf.
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use config::{ConvexJoin, DetectionConfig, OffsetConfig};
pub use diagnostics::{Element, Warning, WarningKind};
pub use error::{CutpathError, Result};
pub use geometry::{Geometry, Shape, ShapeId};
pub use operations::{detect_chains, detect_parts, intersect, offset_chain};
pub use topology::{Chain, ChainId, Hole, Part, Winding};
