//! Shared configuration for the sculpting kernel
//!
//! This crate is the single source of truth for brush parameters and history
//! limits. Hosts fill these structs from their own UI (sliders, enum popups,
//! curve editors) or load them from JSON; the kernel only reads them.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default brush radius in mesh-local units
pub const DEFAULT_RADIUS: f32 = 3.0;

/// Smallest radius the brush UI allows
pub const RADIUS_MIN: f32 = 0.1;

/// Largest radius the brush UI allows
pub const RADIUS_MAX: f32 = 10.0;

/// Default displacement intensity per stroke-step
pub const DEFAULT_INTENSITY: f32 = 0.05;

/// Smallest intensity the brush UI allows
pub const INTENSITY_MIN: f32 = 0.01;

/// Largest intensity the brush UI allows
pub const INTENSITY_MAX: f32 = 1.0;

/// Radius change per scroll-wheel unit while the override control is held
pub const SCROLL_RADIUS_STEP: f32 = 0.1;

/// Default combined undo + redo capacity
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Default noise frequency for the stamp brush
pub const DEFAULT_NOISE_SCALE: f32 = 3.0;

/// Smallest noise frequency the brush UI allows
pub const NOISE_SCALE_MIN: f32 = 0.1;

/// Largest noise frequency the brush UI allows
pub const NOISE_SCALE_MAX: f32 = 10.0;

/// Default dead-zone for the flatten brush
pub const DEFAULT_FLATTEN_THRESHOLD: f32 = 0.01;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} = {value} is outside the allowed range")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Polarity of the final displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sense {
    /// Displace along the brush direction
    #[default]
    Pull,
    /// Displace against the brush direction
    Push,
}

impl Sense {
    /// The opposite polarity.
    pub fn inverted(self) -> Self {
        match self {
            Sense::Pull => Sense::Push,
            Sense::Push => Sense::Pull,
        }
    }

    /// Scalar applied to every offset: -1 for push, +1 for pull.
    pub fn sign(self) -> f32 {
        match self {
            Sense::Pull => 1.0,
            Sense::Push => -1.0,
        }
    }
}

/// World coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Component index (0 = x, 1 = y, 2 = z).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which brush strategy the session should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushKind {
    /// Plain falloff-weighted displacement along +Y
    #[default]
    Radial,
    /// Displacement along a selectable world axis
    Axial,
    /// Pull selected vertices toward their mean height
    Flatten,
    /// Procedural noise stamp
    Stamp,
}

/// Named falloff shapes. `None` in [`BrushSettings::falloff`] keeps the
/// brush's own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FalloffPreset {
    Identity,
    Linear,
    Smooth,
    Sharp,
    Constant,
    Sphere,
}

/// One key of a user-edited falloff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Normalized distance in [0, 1]
    pub t: f32,
    /// Curve value at `t`
    pub value: f32,
}

impl CurveKey {
    pub fn new(t: f32, value: f32) -> Self {
        Self { t, value }
    }
}

/// Brush parameters supplied by the host each time the user edits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Strategy to build
    pub kind: BrushKind,
    /// Selection radius in mesh-local units
    pub radius: f32,
    /// Offset scale per stroke-step
    pub intensity: f32,
    /// Push or pull
    pub sense: Sense,
    /// Displacement axis for the axial brush
    pub axis: Axis,
    /// Falloff override; `None` keeps the brush default
    pub falloff: Option<FalloffPreset>,
    /// User-edited falloff curve; takes precedence over `falloff` when non-empty
    pub falloff_keys: Vec<CurveKey>,
    /// Noise frequency for the stamp brush
    pub noise_scale: f32,
    /// Noise seed for the stamp brush
    pub noise_seed: u32,
    /// Dead-zone below which flatten deltas are ignored
    pub flatten_threshold: f32,
    /// Height axis for the flatten brush
    pub flatten_axis: Axis,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            kind: BrushKind::default(),
            radius: DEFAULT_RADIUS,
            intensity: DEFAULT_INTENSITY,
            sense: Sense::default(),
            axis: Axis::Y,
            falloff: None,
            falloff_keys: Vec::new(),
            noise_scale: DEFAULT_NOISE_SCALE,
            noise_seed: 0,
            flatten_threshold: DEFAULT_FLATTEN_THRESHOLD,
            flatten_axis: Axis::Y,
        }
    }
}

impl BrushSettings {
    /// Settings for the given brush with every other field at its default.
    pub fn for_kind(kind: BrushKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Check that slider-backed values are within their ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(RADIUS_MIN..=RADIUS_MAX).contains(&self.radius) {
            return Err(ConfigError::OutOfRange {
                field: "radius",
                value: self.radius,
            });
        }
        if !(INTENSITY_MIN..=INTENSITY_MAX).contains(&self.intensity) {
            return Err(ConfigError::OutOfRange {
                field: "intensity",
                value: self.intensity,
            });
        }
        if !(NOISE_SCALE_MIN..=NOISE_SCALE_MAX).contains(&self.noise_scale) {
            return Err(ConfigError::OutOfRange {
                field: "noise_scale",
                value: self.noise_scale,
            });
        }
        if !(self.flatten_threshold >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "flatten_threshold",
                value: self.flatten_threshold,
            });
        }
        Ok(())
    }

    /// Copy with every checked value pulled back into range. NaN falls back
    /// to the default.
    pub fn clamped(&self) -> Self {
        let or_default = |value: f32, default: f32| if value.is_nan() { default } else { value };
        Self {
            radius: or_default(self.radius, DEFAULT_RADIUS).clamp(RADIUS_MIN, RADIUS_MAX),
            intensity: or_default(self.intensity, DEFAULT_INTENSITY)
                .clamp(INTENSITY_MIN, INTENSITY_MAX),
            noise_scale: or_default(self.noise_scale, DEFAULT_NOISE_SCALE)
                .clamp(NOISE_SCALE_MIN, NOISE_SCALE_MAX),
            flatten_threshold: self.flatten_threshold.max(0.0),
            ..self.clone()
        }
    }
}

/// Undo/redo limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Combined capacity of the undo and redo stacks
    pub max_history: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Top-level configuration handed to a sculpt session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct SculptConfig {
    pub brush: BrushSettings,
    pub history: HistorySettings,
}

impl SculptConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.brush.validate()
    }
}
