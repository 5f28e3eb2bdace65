//! Chain reconstruction: groups loose drawing shapes into continuous cut
//! paths by endpoint adjacency.
mod junction;
mod normalize;
mod spatial_hash;
mod traverse;

pub use normalize::{normalize_chain, normalize_chain_within};

use tracing::debug;

use crate::config::DetectionConfig;
use crate::diagnostics::{push_warning, Element, Warning};
use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::geometry::Shape;
use crate::math::distance_sq;
use crate::topology::{Chain, ChainEntry, ChainId};

use junction::{End, Endpoint};

/// An open chain whose ends are closer than this many connectivity
/// tolerances is reported as a closure mismatch.
pub const CLOSURE_MISMATCH_FACTOR: f64 = 10.0;

/// Chains found in a shape set, with the warnings raised on the way.
#[derive(Debug, Clone, Default)]
pub struct ChainDetection {
    pub chains: Vec<Chain>,
    pub warnings: Vec<Warning>,
}

/// Groups shapes into chains by endpoint adjacency.
///
/// Shape ends within `connectivity_tolerance` of each other are joined.
/// Where more than two ends meet, the straightest continuations are paired
/// and a [`Warning::Connectivity`] is raised; the remaining branches become
/// separate chains. Closed shapes (circles, closed polylines, full
/// ellipses, closed splines) form chains of their own. Every chain is
/// returned normalized.
#[derive(Debug, Clone)]
pub struct DetectChains {
    config: DetectionConfig,
}

impl DetectChains {
    /// Creates a new chain detection operation.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Executes the detection.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigError`] if the configuration is invalid.
    pub fn execute(&self, shapes: &[Shape]) -> Result<ChainDetection> {
        self.config.validate()?;
        let tol = self.config.connectivity_tolerance;
        debug!(shapes = shapes.len(), tolerance = tol, "detecting chains");

        let mut warnings = Vec::new();
        // (first input index, entries, closed)
        let mut found: Vec<(usize, Vec<ChainEntry>, bool)> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        for (i, shape) in shapes.iter().enumerate() {
            if let Err(e) = shape.geometry.check_degenerate(tol) {
                push_warning(
                    &mut warnings,
                    Warning::DegenerateShape {
                        element: Element::Shape(shape.id.clone()),
                        reason: e.to_string(),
                    },
                );
            } else if shape.is_self_closed() {
                found.push((i, vec![ChainEntry::new(shape.clone(), false)], true));
            } else {
                open.push(i);
            }
        }

        let endpoints: Vec<Endpoint> = open
            .iter()
            .enumerate()
            .flat_map(|(k, &i)| {
                let g = &shapes[i].geometry;
                [
                    Endpoint {
                        point: g.start_point(),
                        shape: k,
                        end: End::Start,
                        away: g.start_tangent(),
                    },
                    Endpoint {
                        point: g.end_point(),
                        shape: k,
                        end: End::End,
                        away: g.end_tangent().map(|t| -t),
                    },
                ]
            })
            .collect();

        let mut partner: Vec<Option<usize>> = vec![None; endpoints.len()];
        for group in junction::cluster(&endpoints, tol) {
            if group.len() > 2 {
                let mut ids: Vec<_> = group.iter().map(|&e| shapes[open[endpoints[e].shape]].id.clone()).collect();
                ids.dedup();
                push_warning(
                    &mut warnings,
                    Warning::Connectivity {
                        point: junction::junction_point(&group, &endpoints),
                        shapes: ids,
                    },
                );
            }
            for (a, b) in junction::pair(&group, &endpoints) {
                partner[a] = Some(b);
                partner[b] = Some(a);
            }
        }

        for walk in traverse::walk_all(open.len(), &partner) {
            let first = walk.steps.iter().map(|&(k, _)| open[k]).min().unwrap_or(usize::MAX);
            let entries = walk
                .steps
                .iter()
                .map(|&(k, reversed)| ChainEntry::new(shapes[open[k]].clone(), reversed))
                .collect();
            found.push((first, entries, walk.cycle));
        }

        found.sort_by_key(|(first, _, _)| *first);

        let mut chains = Vec::with_capacity(found.len());
        for (n, (_, entries, cycle)) in found.into_iter().enumerate() {
            let id = ChainId::numbered(n);
            let chain = Chain::new(id.clone(), entries, cycle);
            let (Some(start), Some(end)) = (chain.start_point(), chain.end_point()) else {
                continue;
            };
            let gap_sq = distance_sq(&start, &end);
            let closed = cycle || gap_sq <= tol * tol;
            if !closed {
                let limit = CLOSURE_MISMATCH_FACTOR * tol;
                if gap_sq <= limit * limit {
                    push_warning(
                        &mut warnings,
                        Warning::ClosureMismatch {
                            chain: id,
                            gap: gap_sq.sqrt(),
                        },
                    );
                }
            }
            let chain = Chain { closed, ..chain };
            chains.push(normalize_chain_within(&chain, tol, self.config.tessellation_tolerance));
        }

        debug!(chains = chains.len(), warnings = warnings.len(), "chain detection finished");
        Ok(ChainDetection { chains, warnings })
    }
}

/// Groups shapes into chains; see [`DetectChains`].
///
/// # Errors
///
/// Returns a [`crate::error::ConfigError`] if the configuration is invalid.
pub fn detect_chains(shapes: &[Shape], config: &DetectionConfig) -> Result<ChainDetection> {
    DetectChains::new(*config).execute(shapes)
}
