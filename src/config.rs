//! Per-call configuration values.
//!
//! The core keeps no persisted settings: every detection or offset call
//! receives one of these values and validates it before doing any work.
use crate::error::ConfigError;

/// How a convex offset joint (one where the offset pieces separate) is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvexJoin {
    /// Extend both pieces to their natural intersection, keeping the sharp
    /// corner, when each extension stays within `max_extension`. Longer
    /// extensions fall back to a round joint.
    #[default]
    Extend,
    /// Always insert an arc of radius `|distance|` about the original corner.
    Round,
}

/// Tolerances for chain and part detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Maximum endpoint gap for two shapes to count as connected.
    pub connectivity_tolerance: f64,

    /// Tolerance for containment comparisons and near-tie detection.
    pub containment_tolerance: f64,

    /// Maximum chord deviation when curves are flattened for winding and
    /// area computations.
    pub tessellation_tolerance: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            connectivity_tolerance: 1e-3,
            containment_tolerance: 1e-3,
            tessellation_tolerance: 1e-3,
        }
    }
}

impl DetectionConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint connectivity tolerance.
    #[must_use]
    pub fn with_connectivity_tolerance(mut self, tolerance: f64) -> Self {
        self.connectivity_tolerance = tolerance;
        self
    }

    /// Sets the containment tolerance.
    #[must_use]
    pub fn with_containment_tolerance(mut self, tolerance: f64) -> Self {
        self.containment_tolerance = tolerance;
        self
    }

    /// Sets the tessellation tolerance.
    #[must_use]
    pub fn with_tessellation_tolerance(mut self, tolerance: f64) -> Self {
        self.tessellation_tolerance = tolerance;
        self
    }

    /// Checks every value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] for a tolerance that is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("connectivity_tolerance", self.connectivity_tolerance)?;
        positive("containment_tolerance", self.containment_tolerance)?;
        positive("tessellation_tolerance", self.tessellation_tolerance)
    }
}

/// Parameters for offsetting a chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetConfig {
    /// Geometric tolerance for joins, intersections and validation.
    pub tolerance: f64,

    /// Joint gaps below this are closed by snapping both ends to their
    /// midpoint.
    pub snap_threshold: f64,

    /// Longest distance a piece may be extended to reach a joint.
    pub max_extension: f64,

    /// Cap on nested loop splits when resolving self-intersections.
    pub max_split_depth: usize,

    /// Chord deviation used when ellipses and splines are flattened and when
    /// areas are measured.
    pub tessellation_tolerance: f64,

    /// Treatment of convex joints.
    pub convex_join: ConvexJoin,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            snap_threshold: 1e-4,
            max_extension: 5.0,
            max_split_depth: 32,
            tessellation_tolerance: 1e-3,
            convex_join: ConvexJoin::Extend,
        }
    }
}

impl OffsetConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the geometric tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the snap threshold.
    #[must_use]
    pub fn with_snap_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = threshold;
        self
    }

    /// Sets the maximum extension.
    #[must_use]
    pub fn with_max_extension(mut self, extension: f64) -> Self {
        self.max_extension = extension;
        self
    }

    /// Sets the loop-split depth cap.
    #[must_use]
    pub fn with_max_split_depth(mut self, depth: usize) -> Self {
        self.max_split_depth = depth;
        self
    }

    /// Sets the tessellation tolerance.
    #[must_use]
    pub fn with_tessellation_tolerance(mut self, tolerance: f64) -> Self {
        self.tessellation_tolerance = tolerance;
        self
    }

    /// Sets the convex joint treatment.
    #[must_use]
    pub fn with_convex_join(mut self, join: ConvexJoin) -> Self {
        self.convex_join = join;
        self
    }

    /// Checks every value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tolerance", self.tolerance)?;
        positive("tessellation_tolerance", self.tessellation_tolerance)?;
        non_negative("snap_threshold", self.snap_threshold)?;
        non_negative("max_extension", self.max_extension)?;
        if self.max_split_depth == 0 {
            return Err(ConfigError::ZeroSplitDepth);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
