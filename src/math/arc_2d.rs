//! 2D arc and bulge math utilities.
//!
//! Arcs are described by `(center, radius, start_angle, sweep)` where a
//! positive sweep runs counter-clockwise.
//!
//! Bulge convention: `bulge = tan(sweep_angle / 4)`.
//! - `bulge = 0`: straight line
//! - `bulge > 0`: counter-clockwise arc
//! - `bulge < 0`: clockwise arc
//! - `|bulge| = 1`: semicircle
use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2, EPSILON};

/// Center-radius-angle description of a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcSpan {
    /// Angle at which the arc ends.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        point_on_circle(&self.center, self.radius, self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        point_on_circle(&self.center, self.radius, self.end_angle())
    }

    /// Unit tangent at the start, in the direction of travel.
    #[must_use]
    pub fn start_tangent(&self) -> Vector2 {
        arc_tangent_at(self.start_angle, self.sweep)
    }

    /// Unit tangent at the end, in the direction of travel.
    #[must_use]
    pub fn end_tangent(&self) -> Vector2 {
        arc_tangent_at(self.end_angle(), self.sweep)
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Returns the same arc travelled in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.end_angle(),
            sweep: -self.sweep,
        }
    }
}

/// Converts a bulge-defined arc segment to center-radius-angle form.
///
/// Returns `None` for zero-length chords or a zero bulge.
#[must_use]
pub fn arc_from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> Option<ArcSpan> {
    let chord = p1 - p0;
    let chord_len = chord.norm();

    if chord_len < EPSILON || bulge.abs() < EPSILON {
        return None;
    }

    // Distance from chord midpoint to center, in half-chord units.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mid = super::midpoint(p0, p1);

    // Normal to chord pointing toward center (for positive bulge, center is left of chord).
    let normal = Vector2::new(-chord.y, chord.x) / chord_len;
    let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
    let sweep = 4.0 * bulge.atan();

    Some(ArcSpan {
        center,
        radius,
        start_angle,
        sweep,
    })
}

/// Converts a signed sweep angle back to a bulge value.
#[must_use]
pub fn bulge_from_sweep(sweep: f64) -> f64 {
    (sweep / 4.0).tan()
}

/// Evaluates the point at absolute `angle` on a circle.
#[must_use]
pub fn point_on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Computes the unit tangent direction at absolute `angle` on an arc
/// travelled with the given sweep sign.
#[must_use]
pub fn arc_tangent_at(angle: f64, sweep: f64) -> Vector2 {
    let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };
    // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
    Vector2::new(-sign * angle.sin(), sign * angle.cos())
}

/// Wraps an angle into `(-π, π]`.
#[must_use]
pub fn wrap_pi(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn wrap_tau(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Locates an absolute angle within an arc's span.
///
/// Returns the unwrapped angle `start_angle + s` with `s` between `0` and
/// `sweep` (in the sweep direction), or `None` when the angle lies outside
/// the span by more than `slack` radians. Results within the slack are
/// clamped onto the span.
#[must_use]
pub fn angle_in_span(angle: f64, start_angle: f64, sweep: f64, slack: f64) -> Option<f64> {
    if sweep.abs() >= TAU - slack {
        // Full turn: every angle is on the arc; keep the offset in [0, 2π).
        let delta = wrap_tau((angle - start_angle) * sweep.signum());
        return Some(start_angle + delta * sweep.signum());
    }

    // Offset in the sweep direction, measured in [0, 2π).
    let delta = wrap_tau((angle - start_angle) * sweep.signum());
    let span = sweep.abs();

    if delta <= span + slack {
        return Some(start_angle + delta.min(span) * sweep.signum());
    }
    // Slightly before the start (delta close to 2π).
    if TAU - delta <= slack {
        return Some(start_angle);
    }
    None
}
