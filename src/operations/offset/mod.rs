//! Chain offsetting.
//!
//! Every piece of the source chain is offset on its own and joints are
//! closed again. The joined path is then cut wherever it meets itself, the
//! slices that come closer to the source than the offset distance are
//! dropped, and the rest are stitched back together and checked against the
//! source before they are returned.
mod join;
mod piece;
mod raw_offset;
mod self_intersect;
mod slice;
mod split;
mod stitch;
mod validate;

use tracing::{debug, trace};

use crate::config::OffsetConfig;
use crate::diagnostics::{push_warning, Element, Warning};
use crate::error::{ConfigError, OperationError, Result};
use crate::geometry::curve::Primitive;
use crate::geometry::Shape;
use crate::operations::chain::normalize_chain;
use crate::operations::intersect::IntersectionPoint;
use crate::topology::{Chain, ChainEntry, ChainId, Winding};

use join::Joiner;

/// Offset of one chain at one distance.
///
/// Keyed by `(operation_id, chain_id, distance)` so a caller can cache
/// results and invalidate them when the source chain or parameters change.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetResult {
    pub operation_id: Option<String>,
    pub chain_id: ChainId,
    pub distance: f64,
    /// Offset chains; splitting may produce several, collapse none.
    pub chains: Vec<Chain>,
    /// Self-crossings of the raw offset that were cut away.
    pub intersections: Vec<IntersectionPoint>,
    pub warnings: Vec<Warning>,
}

/// Offsets a chain by a signed distance.
///
/// For closed chains a positive distance grows the region bounded by the
/// chain and a negative distance shrinks it, whatever the chain's winding.
/// For open chains a positive distance offsets to the left of the travel
/// direction. Lines stay lines and arcs stay arcs; ellipses and splines are
/// flattened to lines first.
///
/// Processing runs in fixed stages: segment offset, join resolution,
/// self-intersection scan, loop split and validation. Degenerate
/// intermediate geometry is dropped with a warning and never returned.
#[derive(Debug, Clone)]
pub struct OffsetChain {
    chain: Chain,
    distance: f64,
    config: OffsetConfig,
    operation_id: Option<String>,
}

impl OffsetChain {
    /// Creates a new offset operation.
    #[must_use]
    pub fn new(chain: Chain, distance: f64, config: OffsetConfig) -> Self {
        Self {
            chain,
            distance,
            config,
            operation_id: None,
        }
    }

    /// Tags the result with the id of the operation requesting it.
    #[must_use]
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid configuration or a
    /// non-finite distance, and `OperationError::InvalidInput` for a chain
    /// without shapes.
    pub fn execute(&self) -> Result<OffsetResult> {
        self.config.validate()?;
        if !self.distance.is_finite() {
            return Err(ConfigError::InvalidDistance(self.distance).into());
        }
        if self.chain.is_empty() {
            return Err(OperationError::InvalidInput(format!("chain {} has no shapes", self.chain.id)).into());
        }

        let mut result = OffsetResult {
            operation_id: self.operation_id.clone(),
            chain_id: self.chain.id.clone(),
            distance: self.distance,
            chains: Vec::new(),
            intersections: Vec::new(),
            warnings: Vec::new(),
        };
        debug!(
            chain = %self.chain.id,
            distance = self.distance,
            shapes = self.chain.len(),
            closed = self.chain.closed,
            "offsetting chain"
        );

        if self.distance.abs() < self.config.tolerance {
            result.chains.push(self.chain.clone());
            return Ok(result);
        }

        let loops = self.offset_paths(&mut result);
        let tess = self.config.tessellation_tolerance;
        result.chains = loops
            .into_iter()
            .enumerate()
            .map(|(n, (path, closed))| {
                let id = ChainId::new(format!("{}/offset-{n}", self.chain.id));
                build_chain(id, path, closed, tess)
            })
            .collect();

        debug!(
            chain = %self.chain.id,
            chains = result.chains.len(),
            intersections = result.intersections.len(),
            warnings = result.warnings.len(),
            "offset finished"
        );
        Ok(result)
    }

    /// Runs the offset stages, returning each result path with its closed flag.
    fn offset_paths(&self, result: &mut OffsetResult) -> Vec<(Vec<Primitive>, bool)> {
        let tol = self.config.tolerance;
        let id = &self.chain.id;
        let warnings = &mut result.warnings;

        let source: Vec<Primitive> = self
            .chain
            .primitives(self.config.tessellation_tolerance)
            .into_iter()
            .filter(|p| p.is_finite() && p.length() > tol)
            .collect();
        if source.is_empty() {
            push_warning(
                warnings,
                Warning::DegenerateShape {
                    element: Element::Chain(id.clone()),
                    reason: "chain has no usable pieces to offset".into(),
                },
            );
            return Vec::new();
        }

        let closed = self.chain.closed;
        let winding = self.source_winding();
        // Positive `left` moves pieces to the left of travel.
        let left = match winding {
            Some(w) if closed => -w.sign() * self.distance,
            _ => self.distance,
        };

        trace!(stage = "segment_offset", pieces = source.len(), left);
        let pieces = raw_offset::build(&source, left, tol, id, warnings);
        if pieces.is_empty() {
            push_warning(
                warnings,
                Warning::OffsetCollapse {
                    chain: id.clone(),
                    reason: "every piece collapsed".into(),
                },
            );
            return Vec::new();
        }

        trace!(stage = "join_resolution", pieces = pieces.len());
        let joiner = Joiner {
            config: &self.config,
            left,
            chain: id,
        };
        let path = joiner.connect(&pieces, closed, warnings);

        trace!(stage = "self_intersection_scan", pieces = path.len());
        let contacts = self_intersect::contacts(&path, closed, tol);
        result.intersections.extend(contacts.hits.iter().copied());

        trace!(stage = "loop_split", contacts = contacts.hits.len());
        let runs = if contacts.is_empty() {
            vec![path]
        } else {
            let slices = slice::build(&path, &contacts.cuts, closed, tol);
            let kept = self.clear_slices(slices, &source, &mut result.warnings);
            if closed {
                stitch::close_loops(kept, tol)
            } else {
                stitch::connect(kept, tol)
            }
        };

        if closed {
            let loops: Vec<Vec<Primitive>> = runs
                .into_iter()
                .flat_map(|lp| {
                    split::split_loops(
                        lp,
                        self.config.max_split_depth,
                        tol,
                        id,
                        &mut result.intersections,
                        &mut result.warnings,
                    )
                })
                .collect();

            trace!(stage = "validate", loops = loops.len());
            let sign = winding.map_or(1.0, Winding::sign);
            loops
                .into_iter()
                .filter(|lp| {
                    let rejection = validate::loop_rejection(
                        lp,
                        &source,
                        sign,
                        self.distance,
                        tol,
                        self.config.tessellation_tolerance,
                    );
                    self.keep(rejection, &mut result.warnings)
                })
                .map(|lp| (lp, true))
                .collect()
        } else {
            trace!(stage = "validate", runs = runs.len());
            runs.into_iter()
                .filter(|run| {
                    let rejection = validate::path_rejection(run, &source, self.distance, tol);
                    self.keep(rejection, &mut result.warnings)
                })
                .map(|run| (run, false))
                .collect()
        }
    }

    /// Drops the slices that come closer to the source than the offset
    /// distance.
    fn clear_slices(
        &self,
        slices: Vec<Vec<Primitive>>,
        source: &[Primitive],
        warnings: &mut Vec<Warning>,
    ) -> Vec<Vec<Primitive>> {
        let total = slices.len();
        let kept: Vec<Vec<Primitive>> = slices
            .into_iter()
            .filter(|s| validate::keeps_clearance(s, source, self.distance, self.config.tolerance))
            .collect();
        if kept.len() < total {
            push_warning(
                warnings,
                Warning::OffsetCollapse {
                    chain: self.chain.id.clone(),
                    reason: format!("{} of {total} slices lie inside the offset band", total - kept.len()),
                },
            );
        }
        kept
    }

    /// Winding of a closed source chain, measured when not already known.
    fn source_winding(&self) -> Option<Winding> {
        if !self.chain.closed {
            return None;
        }
        self.chain
            .winding
            .or_else(|| Winding::from_signed_area(self.chain.signed_area(self.config.tessellation_tolerance)))
    }

    fn keep(&self, rejection: Option<String>, warnings: &mut Vec<Warning>) -> bool {
        match rejection {
            None => true,
            Some(reason) => {
                push_warning(
                    warnings,
                    Warning::OffsetCollapse {
                        chain: self.chain.id.clone(),
                        reason,
                    },
                );
                false
            }
        }
    }
}

/// Offsets a chain by a signed distance; see [`OffsetChain`].
///
/// # Errors
///
/// Returns a [`ConfigError`] for an invalid configuration or a non-finite
/// distance, and `OperationError::InvalidInput` for a chain without shapes.
pub fn offset_chain(chain: &Chain, distance: f64, config: &OffsetConfig) -> Result<OffsetResult> {
    OffsetChain::new(chain.clone(), distance, *config).execute()
}

/// Wraps result pieces as shapes of a new normalized chain.
fn build_chain(id: ChainId, path: Vec<Primitive>, closed: bool, tessellation_tolerance: f64) -> Chain {
    let entries = path
        .into_iter()
        .enumerate()
        .map(|(k, prim)| {
            let shape_id = format!("{id}#{k}");
            let shape = match prim {
                Primitive::Line(l) => Shape::line(shape_id, l.start, l.end),
                Primitive::Arc(a) => Shape::arc(shape_id, a.center, a.radius, a.start_angle, a.sweep),
            };
            ChainEntry::new(shape, false)
        })
        .collect();
    normalize_chain(&Chain::new(id, entries, closed), tessellation_tolerance)
}
