#![allow(clippy::unwrap_used)]

use std::sync::Once;

use approx::assert_abs_diff_eq;
use cutpath::geometry::Pline;
use cutpath::math::Point2;
use cutpath::topology::HoleRole;
use cutpath::{
    detect_chains, detect_parts, offset_chain, Chain, DetectionConfig, OffsetConfig, Shape, WarningKind, Winding,
};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

/// A 100 x 60 plate drawn as loose lines, two holes, an island in the square
/// hole and a stray construction line.
fn drawing() -> Vec<Shape> {
    vec![
        Shape::line("bottom", p(0.0, 0.0), p(100.0, 0.0)),
        Shape::line("right", p(100.0, 60.0), p(100.0, 0.0)),
        Shape::line("top", p(100.0, 60.0), p(0.0, 60.0)),
        Shape::line("left", p(0.0, 0.0), p(0.0, 60.0)),
        Shape::circle("bore", p(25.0, 30.0), 10.0),
        Shape::polyline(
            "window",
            Pline::from_points(&[p(50.0, 10.0), p(90.0, 10.0), p(90.0, 50.0), p(50.0, 50.0)], true),
        ),
        Shape::circle("boss", p(70.0, 30.0), 5.0),
        Shape::line("construction", p(200.0, 0.0), p(210.0, 0.0)),
    ]
}

fn width(chain: &Chain) -> f64 {
    let bb = chain.bounding_box();
    bb.max.x - bb.min.x
}

#[test]
fn drawing_to_kerf_compensated_parts() {
    init_tracing();
    let detection = DetectionConfig::default();

    let chains = detect_chains(&drawing(), &detection).unwrap();
    assert_eq!(chains.chains.len(), 5);
    assert_eq!(chains.chains.iter().filter(|c| c.closed).count(), 4);
    for c in chains.chains.iter().filter(|c| c.closed) {
        assert!(c.winding.is_some());
    }

    let parts = detect_parts(&chains.chains, &detection).unwrap();
    assert_eq!(parts.parts.len(), 1);
    assert!(parts.warnings.iter().any(|w| w.kind() == WarningKind::OpenChainIgnored));

    let part = &parts.parts[0];
    assert_abs_diff_eq!(width(&part.shell), 100.0, epsilon = 1e-9);
    assert_eq!(part.holes.len(), 2);
    assert_eq!(part.nested_count(), 3);
    let window = part.holes.iter().find(|h| !h.holes.is_empty()).unwrap();
    assert_eq!(window.role(), HoleRole::Hole);
    assert_eq!(window.holes[0].role(), HoleRole::Island);

    // Tool of radius 1.5: outside the shell and islands, inside the holes.
    let kerf = 1.5;
    let offset = OffsetConfig::default();
    for (chain, depth) in part.chains() {
        let distance = if depth % 2 == 0 { kerf } else { -kerf };
        let result = offset_chain(chain, distance, &offset).unwrap();
        assert!(result.warnings.is_empty(), "{}: {:?}", chain.id, result.warnings);
        assert_eq!(result.chains.len(), 1);
        let cut = &result.chains[0];
        assert!(cut.closed);
        assert_eq!(cut.winding, chain.winding);
        assert_abs_diff_eq!(width(cut), width(chain) + 2.0 * distance, epsilon = 1e-6);
    }
}

#[test]
fn offset_never_returns_degenerate_chains() {
    init_tracing();
    let slot = Shape::polyline(
        "slot",
        Pline::from_points(&[p(0.0, 0.0), p(30.0, 0.0), p(30.0, 4.0), p(0.0, 4.0)], true),
    );
    let chains = detect_chains(&[slot], &DetectionConfig::default()).unwrap();
    let source = &chains.chains[0];
    assert_eq!(source.winding, Some(Winding::CounterClockwise));

    let offset = OffsetConfig::default();
    for step in 1..=6 {
        let distance = -f64::from(step) * 0.5;
        let result = offset_chain(source, distance, &offset).unwrap();
        for c in &result.chains {
            assert!(c.closed);
            assert!(!c.is_empty());
            assert!(c.signed_area(offset.tessellation_tolerance).abs() > offset.tolerance);
        }
        if distance <= -2.0 {
            assert!(result.chains.is_empty(), "slot should close at {distance}");
            assert!(result.warnings.iter().any(|w| w.kind() == WarningKind::OffsetCollapse));
        } else {
            assert_eq!(result.chains.len(), 1);
        }
    }
}
