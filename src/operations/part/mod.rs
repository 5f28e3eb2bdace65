//! Part detection: arranges closed chains into shells, holes and islands
//! by geometric containment.
mod forest;
mod representative;

pub use forest::NestId;

use tracing::{debug, trace};

use crate::config::DetectionConfig;
use crate::diagnostics::{push_warning, Element, Warning};
use crate::error::Result;
use crate::geometry::Aabb;
use crate::math::distance_2d::point_to_polygon_dist;
use crate::math::polygon_2d::{contains_point_2d, perimeter_2d, signed_area_2d};
use crate::math::Point2;
use crate::topology::{Chain, Part};

use forest::ContainmentForest;
use representative::representative_point;

/// Parts found among a chain set, with the warnings raised on the way.
#[derive(Debug, Clone, Default)]
pub struct PartDetection {
    pub parts: Vec<Part>,
    pub warnings: Vec<Warning>,
}

/// A closed chain prepared for containment tests.
struct Region<'a> {
    chain: &'a Chain,
    polygon: Vec<Point2>,
    bbox: Aabb,
    area: f64,
    perimeter: f64,
}

/// Builds the containment hierarchy of closed chains.
///
/// Each chain's immediate container is the smallest-area chain that
/// encloses a representative interior point of it. Uncontained chains start
/// new parts; nested chains alternate between holes (odd depth) and
/// islands (even depth). Open chains are skipped with a warning.
#[derive(Debug, Clone)]
pub struct DetectParts {
    config: DetectionConfig,
}

impl DetectParts {
    /// Creates a new part detection operation.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Executes the detection.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigError`] if the configuration is invalid.
    pub fn execute(&self, chains: &[Chain]) -> Result<PartDetection> {
        self.config.validate()?;
        let tol = self.config.containment_tolerance;
        debug!(chains = chains.len(), tolerance = tol, "detecting parts");

        let mut warnings = Vec::new();
        let mut regions = Vec::new();
        for chain in chains {
            if !chain.closed {
                push_warning(&mut warnings, Warning::OpenChainIgnored { chain: chain.id.clone() });
                continue;
            }
            let polygon = chain.tessellate(self.config.tessellation_tolerance);
            let area = signed_area_2d(&polygon).abs();
            let bbox = Aabb::from_points(&polygon);
            match bbox {
                Some(bbox) if area.is_finite() && area >= tol * tol => regions.push(Region {
                    chain,
                    perimeter: perimeter_2d(&polygon),
                    polygon,
                    bbox,
                    area,
                }),
                _ => push_warning(
                    &mut warnings,
                    Warning::DegenerateShape {
                        element: Element::Chain(chain.id.clone()),
                        reason: format!("enclosed area {area} is below tolerance"),
                    },
                ),
            }
        }

        // Largest first; stable, so equal areas keep input order.
        regions.sort_by(|a, b| b.area.total_cmp(&a.area));

        let mut forest = ContainmentForest::new();
        let mut ids = Vec::with_capacity(regions.len());
        for (k, region) in regions.iter().enumerate() {
            let parent = representative_point(&region.polygon, tol)
                .and_then(|point| self.immediate_parent(&regions[..k], region, &point, &mut warnings));
            trace!(chain = %region.chain.id, parent = ?parent.map(|p| &regions[p].chain.id), "placed chain");
            let parent_id = parent.map(|p| ids[p]);
            ids.push(forest.insert(region.chain.clone(), parent_id));
        }

        let parts = forest.into_parts();
        debug!(parts = parts.len(), warnings = warnings.len(), "part detection finished");
        Ok(PartDetection { parts, warnings })
    }

    /// Index (into `larger`) of the smallest region enclosing `point`.
    fn immediate_parent(
        &self,
        larger: &[Region<'_>],
        region: &Region<'_>,
        point: &Point2,
        warnings: &mut Vec<Warning>,
    ) -> Option<usize> {
        let tol = self.config.containment_tolerance;
        let mut containers: Vec<usize> = larger
            .iter()
            .enumerate()
            .filter(|(_, b)| b.bbox.contains_box(&region.bbox, tol) && contains_point_2d(&b.polygon, point))
            .map(|(i, _)| i)
            .collect();
        // Smallest area first; index order breaks exact ties.
        containers.sort_by(|&a, &b| larger[a].area.total_cmp(&larger[b].area).then(a.cmp(&b)));
        let &smallest = containers.first()?;

        let max_perimeter = containers
            .iter()
            .map(|&i| larger[i].perimeter)
            .fold(region.perimeter, f64::max);
        let threshold = tol * max_perimeter;
        let tied: Vec<usize> = containers
            .iter()
            .copied()
            .filter(|&i| larger[i].area - larger[smallest].area <= threshold)
            .collect();
        if tied.len() < 2 {
            return Some(smallest);
        }

        // Prefer the candidate whose boundary stays farthest from the chain.
        let clearance = |i: usize| {
            region
                .polygon
                .iter()
                .map(|p| point_to_polygon_dist(p, &larger[i].polygon))
                .fold(f64::INFINITY, f64::min)
        };
        let mut scored: Vec<(f64, usize)> = tied.iter().map(|&i| (clearance(i), i)).collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        if scored[0].0 - scored[1].0 > tol {
            return Some(scored[0].1);
        }

        push_warning(
            warnings,
            Warning::ContainmentAmbiguity {
                chain: region.chain.id.clone(),
                candidates: tied.iter().map(|&i| larger[i].chain.id.clone()).collect(),
            },
        );
        Some(smallest)
    }
}

/// Builds the containment hierarchy; see [`DetectParts`].
///
/// # Errors
///
/// Returns a [`crate::error::ConfigError`] if the configuration is invalid.
pub fn detect_parts(chains: &[Chain], config: &DetectionConfig) -> Result<PartDetection> {
    DetectParts::new(*config).execute(chains)
}
