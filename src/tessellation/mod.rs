//! Flattening of curves into point lists and polygon interior queries.
mod interior_point;
mod tessellate_curve;

pub use interior_point::interior_point;
pub use tessellate_curve::{append_polyline, flatten_parametric};

/// Computes the number of chords needed to approximate an arc within the
/// given tolerance.
#[must_use]
pub fn arc_segment_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 || !radius.is_finite() {
        return 1;
    }
    // Sagitta: s = r * (1 - cos(θ/2)), solved for the largest θ with s <= tolerance.
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil().min(f64::from(MAX_ARC_SEGMENTS)) as u32;
    n.max(1)
}

/// Upper bound on chords per arc so a tiny tolerance cannot explode
/// allocation.
const MAX_ARC_SEGMENTS: u32 = 1 << 16;
