//! Sculpt brushes.
//!
//! A [`Brush`] is assembled from three independent parts:
//! - a [`FalloffCurve`] turning normalized distance into a weight,
//! - a [`Direction`] giving the unit displacement vector per selected vertex,
//! - a [`Magnitude`] giving the signed displacement scale per selected vertex.
//!
//! All brushes share the same selection step and the same displacement
//! applier; only these three parts vary.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use sculpt_config::{Axis, BrushKind, BrushSettings};

use crate::falloff::FalloffCurve;
use crate::selection::{SelectionZone, select};

/// Unit vector for a world axis.
pub fn axis_vector(axis: Axis) -> Vec3 {
    match axis {
        Axis::X => Vec3::X,
        Axis::Y => Vec3::Y,
        Axis::Z => Vec3::Z,
    }
}

/// Displacement direction for selected vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    /// The same vector for every vertex (normalized on use, +Y if degenerate)
    Fixed(Vec3),
    /// A world axis
    Axis(Axis),
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Fixed(Vec3::Y)
    }
}

impl Direction {
    /// Unit direction for the `slot`-th entry of `zone`.
    ///
    /// Built-in directions are uniform, so the slot does not change the result.
    pub fn at(&self, _zone: &SelectionZone, _slot: usize) -> Vec3 {
        match *self {
            Direction::Fixed(v) => v.try_normalize().unwrap_or(Vec3::Y),
            Direction::Axis(axis) => axis_vector(axis),
        }
    }
}

/// Flatten: pull vertices toward the mean height of the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenMagnitude {
    /// Which coordinate is treated as height
    pub axis: Axis,
    /// Deltas smaller than this are ignored
    pub threshold: f32,
}

impl FlattenMagnitude {
    /// Mean height of the selected vertices (0 for an empty zone).
    pub fn mean_height(&self, zone: &SelectionZone, vertices: &[Vec3]) -> f32 {
        if zone.is_empty() {
            return 0.0;
        }
        let axis = self.axis.index();
        let sum: f32 = zone.indices().map(|i| vertices[i][axis]).sum();
        sum / zone.len() as f32
    }

    /// Height deltas toward the mean, divided by the largest absolute delta.
    ///
    /// The mean and maximum are reductions over the whole zone and complete
    /// before any per-vertex value is produced.
    pub fn normalized_deltas(&self, zone: &SelectionZone, vertices: &[Vec3]) -> Vec<f32> {
        let axis = self.axis.index();
        let mean = self.mean_height(zone, vertices);

        let mut max_abs = 0.0f32;
        let mut deltas: Vec<f32> = zone
            .indices()
            .map(|i| {
                let delta = mean - vertices[i][axis];
                let delta = if delta.abs() < self.threshold { 0.0 } else { delta };
                max_abs = max_abs.max(delta.abs());
                delta
            })
            .collect();

        for delta in &mut deltas {
            *delta = if max_abs > 0.0 && delta.abs() > self.threshold {
                *delta / max_abs
            } else {
                0.0
            };
        }
        deltas
    }
}

/// Largest scaled coordinate passed to the noise lattice.
const MAX_NOISE_COORD: f64 = 1.0e15;

/// Stamp: coherent noise sampled at each vertex's XZ position.
#[derive(Debug, Clone)]
pub struct StampMagnitude {
    scale: f32,
    seed: u32,
    perlin: Perlin,
}

impl StampMagnitude {
    pub fn new(scale: f32, seed: u32) -> Self {
        Self {
            scale,
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Noise value in [0, 1] at `position`. Depends only on position, scale
    /// and seed. Coordinates the noise lattice cannot index sample as 0.
    pub fn sample(&self, position: Vec3) -> f32 {
        let x = (position.x * self.scale) as f64;
        let z = (position.z * self.scale) as f64;
        if !(x.abs() <= MAX_NOISE_COORD && z.abs() <= MAX_NOISE_COORD) {
            return 0.0;
        }
        let n = self.perlin.get([x, z]);
        ((n + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }
}

impl PartialEq for StampMagnitude {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.seed == other.seed
    }
}

/// Displacement scale for selected vertices.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Magnitude {
    /// The falloff weight itself
    #[default]
    Falloff,
    /// Normalized delta to the mean height, times the weight
    Flatten(FlattenMagnitude),
    /// Noise value times the weight
    Stamp(StampMagnitude),
}

impl Magnitude {
    /// Magnitudes for every entry of `zone`, in zone order.
    pub fn evaluate(&self, zone: &SelectionZone, vertices: &[Vec3]) -> Vec<f32> {
        match self {
            Magnitude::Falloff => zone.weights().collect(),
            Magnitude::Flatten(flatten) => flatten
                .normalized_deltas(zone, vertices)
                .into_iter()
                .zip(zone.weights())
                .map(|(delta, weight)| delta * weight)
                .collect(),
            Magnitude::Stamp(stamp) => zone
                .entries()
                .iter()
                .map(|entry| stamp.sample(vertices[entry.index]) * entry.weight)
                .collect(),
        }
    }
}

/// Selection plus per-entry displacement data for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushFrame {
    pub zone: SelectionZone,
    /// Unit direction per zone entry
    pub directions: Vec<Vec3>,
    /// Signed magnitude per zone entry
    pub magnitudes: Vec<f32>,
}

impl BrushFrame {
    pub fn is_empty(&self) -> bool {
        self.zone.is_empty()
    }
}

/// A brush assembled from falloff, direction and magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub name: String,
    pub falloff: FalloffCurve,
    pub direction: Direction,
    pub magnitude: Magnitude,
}

impl Default for Brush {
    fn default() -> Self {
        Self::radial()
    }
}

impl Brush {
    /// Weight grows with distance, displacement along +Y.
    pub fn radial() -> Self {
        Self {
            name: "Radial".to_string(),
            falloff: FalloffCurve::Identity,
            direction: Direction::Fixed(Vec3::Y),
            magnitude: Magnitude::Falloff,
        }
    }

    /// Displace along a single world axis with an ease-in-out falloff.
    pub fn axial(axis: Axis) -> Self {
        Self {
            name: "Axial".to_string(),
            falloff: FalloffCurve::Smooth,
            direction: Direction::Axis(axis),
            magnitude: Magnitude::Falloff,
        }
    }

    /// Level selected vertices toward their mean height along `axis`.
    pub fn flatten(axis: Axis, threshold: f32) -> Self {
        Self {
            name: "Flatten".to_string(),
            falloff: FalloffCurve::Linear,
            direction: Direction::Axis(axis),
            magnitude: Magnitude::Flatten(FlattenMagnitude { axis, threshold }),
        }
    }

    /// Raise vertices by Perlin noise sampled at their XZ position.
    pub fn stamp(scale: f32, seed: u32) -> Self {
        Self {
            name: "Stamp".to_string(),
            falloff: FalloffCurve::Sharp,
            direction: Direction::Fixed(Vec3::Y),
            magnitude: Magnitude::Stamp(StampMagnitude::new(scale, seed)),
        }
    }

    /// Build the brush described by host settings.
    pub fn from_settings(settings: &BrushSettings) -> Self {
        let mut brush = match settings.kind {
            BrushKind::Radial => Self::radial(),
            BrushKind::Axial => Self::axial(settings.axis),
            BrushKind::Flatten => Self::flatten(settings.flatten_axis, settings.flatten_threshold),
            BrushKind::Stamp => Self::stamp(settings.noise_scale, settings.noise_seed),
        };
        brush.falloff = FalloffCurve::from_settings(settings, brush.falloff);
        brush
    }

    /// Falloff weight at normalized distance `t`, in [0, 1].
    pub fn falloff(&self, t: f32) -> f32 {
        self.falloff.evaluate(t)
    }

    /// Select vertices around `center` using this brush's falloff.
    pub fn select(&self, center: Vec3, radius: f32, vertices: &[Vec3]) -> SelectionZone {
        select(center, radius, vertices, |t| self.falloff(t))
    }

    /// Run selection, direction and magnitude passes for one frame.
    pub fn evaluate(&self, center: Vec3, radius: f32, vertices: &[Vec3]) -> BrushFrame {
        let zone = self.select(center, radius, vertices);
        let directions = (0..zone.len())
            .map(|slot| self.direction.at(&zone, slot))
            .collect();
        let magnitudes = self.magnitude.evaluate(&zone, vertices);
        BrushFrame {
            zone,
            directions,
            magnitudes,
        }
    }
}
