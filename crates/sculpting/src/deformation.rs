//! Displacement of selected vertices.
//!
//! Offsets for the whole zone are computed first from the frame's parallel
//! arrays, and only then written to the geometry. A snapshot of the
//! pre-mutation buffer is taken before any write and committed to history
//! once the write has completed, so history never sees a half-applied buffer.

use glam::Vec3;
use sculpt_config::Sense;
use tracing::debug;

use crate::brush::BrushFrame;
use crate::geometry::{GeometryBuffer, MeshSnapshot};
use crate::history::HistoryManager;

/// Result of applying one stroke-step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplacementResult {
    /// Vertices that received a non-zero offset
    pub vertices_moved: usize,
    /// Whether a history entry was pushed
    pub committed: bool,
}

/// Per-vertex offsets for a frame, in zone order.
///
/// `offset = direction * magnitude * intensity * sense.sign()`; entries with
/// a zero offset are skipped.
pub fn compute_offsets(frame: &BrushFrame, intensity: f32, sense: Sense) -> Vec<(usize, Vec3)> {
    let scale = intensity * sense.sign();
    frame
        .zone
        .entries()
        .iter()
        .zip(frame.directions.iter().zip(&frame.magnitudes))
        .filter_map(|(entry, (&direction, &magnitude))| {
            let offset = direction * magnitude * scale;
            (offset != Vec3::ZERO).then_some((entry.index, offset))
        })
        .collect()
}

/// Apply a frame's displacement to `geometry` and record the previous state.
///
/// An empty selection, or one whose offsets are all zero, leaves both the
/// geometry and the history untouched.
pub fn apply_displacement(
    geometry: &mut GeometryBuffer,
    history: &mut HistoryManager<MeshSnapshot>,
    frame: &BrushFrame,
    intensity: f32,
    sense: Sense,
) -> DisplacementResult {
    if frame.is_empty() {
        return DisplacementResult::default();
    }

    let offsets = compute_offsets(frame, intensity, sense);
    if offsets.is_empty() {
        return DisplacementResult::default();
    }

    let before = geometry.snapshot();
    geometry.displace(&offsets);
    history.commit(before);

    debug!(
        "Applied stroke-step: {} of {} selected vertices moved ({} undo entries)",
        offsets.len(),
        frame.zone.len(),
        history.undo_count()
    );

    DisplacementResult {
        vertices_moved: offsets.len(),
        committed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;
    use crate::falloff::FalloffCurve;
    use sculpt_config::Axis;

    fn two_points() -> GeometryBuffer {
        GeometryBuffer::new(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)], Vec::new()).unwrap()
    }

    fn full_strength() -> Brush {
        Brush {
            falloff: FalloffCurve::Constant,
            ..Brush::axial(Axis::Y)
        }
    }

    #[test]
    fn test_commit_then_undo_is_bit_exact() {
        let mut geometry = two_points();
        let mut history = HistoryManager::new(10);

        // Radius 0.5 around the origin selects only vertex 0
        let frame = full_strength().evaluate(Vec3::ZERO, 0.5, geometry.positions());
        let result = apply_displacement(&mut geometry, &mut history, &frame, 1.0, Sense::Pull);
        assert_eq!(
            result,
            DisplacementResult {
                vertices_moved: 1,
                committed: true
            }
        );
        assert_eq!(
            geometry.positions(),
            &[Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]
        );

        let live = geometry.snapshot();
        let previous = history.undo(|| live).unwrap();
        geometry.restore(previous).unwrap();
        assert_eq!(geometry.positions(), &[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_push_inverts_offset() {
        let mut geometry = two_points();
        let mut history = HistoryManager::new(10);
        let frame = full_strength().evaluate(Vec3::ZERO, 0.5, geometry.positions());
        apply_displacement(&mut geometry, &mut history, &frame, 0.25, Sense::Push);
        assert_eq!(geometry.positions()[0], Vec3::new(0.0, -0.25, 0.0));
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut geometry = two_points();
        let before = geometry.clone();
        let mut history = HistoryManager::new(10);

        let frame = full_strength().evaluate(Vec3::new(5.0, 5.0, 5.0), 0.1, geometry.positions());
        let result = apply_displacement(&mut geometry, &mut history, &frame, 1.0, Sense::Pull);
        assert_eq!(result, DisplacementResult::default());
        assert_eq!(geometry, before);
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_offsets_do_not_commit() {
        let mut geometry = two_points();
        let mut history = HistoryManager::new(10);
        // Both vertices share y = 0, so flatten has nothing to do
        let frame = Brush::flatten(Axis::Y, 0.01).evaluate(Vec3::ZERO, 2.0, geometry.positions());
        assert_eq!(frame.zone.len(), 2);
        let result = apply_displacement(&mut geometry, &mut history, &frame, 1.0, Sense::Pull);
        assert!(!result.committed);
        assert!(history.is_empty());
    }

    #[test]
    fn test_offsets_follow_zone_order() {
        let geometry = GeometryBuffer::new(
            vec![
                Vec3::new(0.5, 0.0, 0.0),
                Vec3::new(9.0, 0.0, 0.0),
                Vec3::new(-0.5, 0.0, 0.0),
            ],
            Vec::new(),
        )
        .unwrap();
        let frame = full_strength().evaluate(Vec3::ZERO, 1.0, geometry.positions());
        let offsets = compute_offsets(&frame, 0.5, Sense::Pull);
        assert_eq!(
            offsets,
            vec![(0, Vec3::new(0.0, 0.5, 0.0)), (2, Vec3::new(0.0, 0.5, 0.0))]
        );
    }
}
