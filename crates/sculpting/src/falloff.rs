//! Falloff curves for brush influence.
//!
//! A falloff maps the normalized squared distance `t` of a vertex from the
//! brush center (0.0 = center, 1.0 = radius) to an influence weight. Curves
//! need not be monotonic, but every evaluation is clamped to [0, 1].

use sculpt_config::{BrushSettings, CurveKey, FalloffPreset};
use serde::{Deserialize, Serialize};

/// Falloff curve for brush influence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FalloffCurve {
    /// Weight equals `t`: grows toward the rim
    #[default]
    Identity,
    /// Linear falloff: 1 - t
    Linear,
    /// Ease-in-out from 1 at the center to 0 at the rim (hermite smoothstep)
    Smooth,
    /// Quadratic decay: (1 - t)²
    Sharp,
    /// Full strength within radius
    Constant,
    /// Spherical: sqrt(1 - t²)
    Sphere,
    /// User-edited curve
    Keyframed(KeyframedCurve),
}

impl FalloffCurve {
    /// Evaluate the curve at normalized distance `t`. Inputs outside [0, 1]
    /// are clamped first, and so is the result.
    pub fn evaluate(&self, t: f32) -> f32 {
        let d = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let value = match self {
            FalloffCurve::Identity => d,
            FalloffCurve::Linear => 1.0 - d,
            FalloffCurve::Smooth => {
                let u = 1.0 - d;
                u * u * (3.0 - 2.0 * u)
            }
            FalloffCurve::Sharp => {
                let u = 1.0 - d;
                u * u
            }
            FalloffCurve::Constant => 1.0,
            FalloffCurve::Sphere => (1.0 - d * d).max(0.0).sqrt(),
            FalloffCurve::Keyframed(curve) => curve.sample(d),
        };
        if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
    }

    /// Resolve the curve requested by settings, falling back to `default`.
    ///
    /// Non-empty `falloff_keys` win over the named preset.
    pub fn from_settings(settings: &BrushSettings, default: FalloffCurve) -> Self {
        if !settings.falloff_keys.is_empty() {
            return FalloffCurve::Keyframed(KeyframedCurve::new(settings.falloff_keys.clone()));
        }
        settings.falloff.map(Self::from).unwrap_or(default)
    }
}

impl From<FalloffPreset> for FalloffCurve {
    fn from(preset: FalloffPreset) -> Self {
        match preset {
            FalloffPreset::Identity => FalloffCurve::Identity,
            FalloffPreset::Linear => FalloffCurve::Linear,
            FalloffPreset::Smooth => FalloffCurve::Smooth,
            FalloffPreset::Sharp => FalloffCurve::Sharp,
            FalloffPreset::Constant => FalloffCurve::Constant,
            FalloffPreset::Sphere => FalloffCurve::Sphere,
        }
    }
}

/// Piecewise-linear curve through sorted keys.
///
/// Values before the first key and after the last are held flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframedCurve {
    keys: Vec<CurveKey>,
}

impl KeyframedCurve {
    /// Build a curve. Keys are sorted by `t`; keys with NaN `t` are dropped.
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|key| !key.t.is_nan());
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { keys }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Raw curve value at `t` (unclamped).
    pub fn sample(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }

        // First key strictly after t; t > first.t guarantees upper >= 1
        let upper = self.keys.partition_point(|key| key.t <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.t - a.t;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * ((t - a.t) / span)
    }
}
