// extensions/easing.rs
//
// Pure response curves and range mapping.
// Pure math, no Entity/Scene dependencies.

use serde::{Deserialize, Serialize};

/// Shape of a response curve over a normalized input in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Output equals input.
    #[default]
    Linear,
    /// Slow start: small inputs give disproportionately small outputs.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Stronger slow start.
    CubicIn,
    /// Stronger slow end.
    CubicOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1] first.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `value` within `[lo, hi]` as a fraction, clamped to [0, 1].
/// A zero-width range maps everything to 0.
#[inline]
pub fn inverse_lerp(lo: f32, hi: f32, value: f32) -> f32 {
    let span = hi - lo;
    if span.abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - lo) / span).clamp(0.0, 1.0)
}

/// Map `value` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`, clamping to
/// the target range.
#[inline]
pub fn remap_clamped(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    lerp(to_lo, to_hi, inverse_lerp(from_lo, from_hi, value))
}
