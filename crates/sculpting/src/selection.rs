//! Vertex selection within the brush sphere.
//!
//! Every frame the selection zone is rebuilt from scratch: a linear scan of the
//! vertex buffer collects each vertex whose squared distance to the hit point
//! is within the squared radius, together with its normalized distance and
//! falloff weight. Entries are kept in ascending vertex-index order so that
//! per-entry arrays (magnitudes, preview handles) line up with the zone.

use glam::Vec3;
use tracing::trace;

/// One selected vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionEntry {
    /// Index into the vertex buffer
    pub index: usize,
    /// Squared distance divided by squared radius, in [0, 1]
    pub t: f32,
    /// Falloff weight at `t`, in [0, 1]
    pub weight: f32,
}

/// Vertices inside the brush for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionZone {
    center: Vec3,
    radius: f32,
    entries: Vec<SelectionEntry>,
}

impl SelectionZone {
    /// A zone that selects nothing.
    pub fn empty(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            entries: Vec::new(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected vertex indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|entry| entry.index)
    }

    /// Falloff weights, parallel to [`Self::indices`].
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.iter().map(|entry| entry.weight)
    }
}

/// Select every vertex within `radius` of `center` (boundary inclusive).
///
/// `falloff` maps the normalized distance to a weight; its result is clamped
/// to [0, 1]. A non-positive or non-finite radius selects nothing, and so
/// does any vertex whose distance to `center` is NaN.
pub fn select(
    center: Vec3,
    radius: f32,
    vertices: &[Vec3],
    falloff: impl Fn(f32) -> f32,
) -> SelectionZone {
    if !(radius > 0.0) || !radius.is_finite() {
        return SelectionZone::empty(center, radius);
    }

    let sqr_radius = radius * radius;
    let entries: Vec<SelectionEntry> = vertices
        .iter()
        .enumerate()
        .filter_map(|(index, vertex)| {
            let sqr_distance = vertex.distance_squared(center);
            // Inclusion form so NaN distances are rejected
            if !(sqr_distance <= sqr_radius) {
                return None;
            }
            let t = (sqr_distance / sqr_radius).clamp(0.0, 1.0);
            let weight = falloff(t);
            let weight = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 1.0) };
            Some(SelectionEntry { index, t, weight })
        })
        .collect();

    trace!(
        "select: {} of {} vertices within r={}",
        entries.len(),
        vertices.len(),
        radius
    );

    SelectionZone {
        center,
        radius,
        entries,
    }
}
