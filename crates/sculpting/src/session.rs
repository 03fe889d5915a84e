//! Sculpt session: one mesh being edited.
//!
//! The session exclusively owns the editable geometry, an untouched copy of
//! the original, the undo/redo history and the active brush. The host drives
//! it once per frame with [`SculptSession::handle_frame`]:
//!
//! 1. Sense override update (edge-triggered)
//! 2. Scroll-wheel radius adjustment while the override is held
//! 3. Selection + falloff + direction + magnitude for the hit point
//! 4. Displacement and history commit if an edit gesture is active
//!
//! No entry point returns an error into the frame loop; invalid input is
//! logged and the frame degrades to a no-op.

use glam::Vec3;
use sculpt_config::{BrushSettings, RADIUS_MAX, RADIUS_MIN, SCROLL_RADIUS_STEP, SculptConfig, Sense};
use tracing::{debug, error, info, trace, warn};

use crate::brush::{Brush, BrushFrame};
use crate::deformation::apply_displacement;
use crate::error::SculptError;
use crate::geometry::{GeometryBuffer, MeshSnapshot};
use crate::history::HistoryManager;
use crate::input::{FrameInput, HitPoint, SenseOverride};

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No valid hit: nothing selected, nothing applied
    Idle,
    /// Vertices were selected for preview only
    Selected { selected: usize },
    /// A stroke-step was applied and committed
    Applied { selected: usize, moved: usize },
}

/// Whether a preview handle should be drawn as pushing or pulling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleTone {
    Push,
    Pull,
}

/// Visualization marker for one selected vertex (mesh-local space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHandle {
    pub index: usize,
    pub position: Vec3,
    /// Marker size, 0.1 at zero magnitude up to 0.2 at |magnitude| >= 1
    pub size: f32,
    pub tone: HandleTone,
    /// Falloff weight, for blending the tone toward black
    pub strength: f32,
}

/// Outline of the brush on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRing {
    pub center: Vec3,
    pub normal: Vec3,
    pub radius: f32,
}

/// Everything the host needs to draw the brush this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushPreview {
    pub ring: BrushRing,
    pub handles: Vec<VertexHandle>,
}

/// Editing state for one mesh.
#[derive(Debug)]
pub struct SculptSession {
    /// Geometry as it was when the session began
    original: GeometryBuffer,
    /// Live geometry
    geometry: GeometryBuffer,
    history: HistoryManager<MeshSnapshot>,
    settings: BrushSettings,
    brush: Brush,
    sense_override: SenseOverride,
    /// Last frame's hit and brush evaluation, for preview
    last_frame: Option<(HitPoint, BrushFrame)>,
}

impl SculptSession {
    /// Begin editing `geometry` with the given configuration.
    ///
    /// Out-of-range brush settings are clamped with a warning.
    pub fn new(geometry: GeometryBuffer, config: &SculptConfig) -> Self {
        let settings = checked_settings(&config.brush);
        info!(
            "Sculpt session started: {} vertices, {} triangles, brush {:?}",
            geometry.vertex_count(),
            geometry.triangle_count(),
            settings.kind
        );

        Self {
            original: geometry.clone(),
            geometry,
            history: HistoryManager::new(config.history.max_history),
            brush: Brush::from_settings(&settings),
            settings,
            sense_override: SenseOverride::default(),
            last_frame: None,
        }
    }

    /// Begin editing raw positions and triangle indices.
    pub fn from_mesh(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        config: &SculptConfig,
    ) -> Result<Self, SculptError> {
        let geometry = GeometryBuffer::new(positions, indices).inspect_err(|e| {
            warn!("Cannot start sculpt session: {}", e);
        })?;
        Ok(Self::new(geometry, config))
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn radius(&self) -> f32 {
        self.settings.radius
    }

    pub fn sense(&self) -> Sense {
        self.settings.sense
    }

    pub fn is_override_active(&self) -> bool {
        self.sense_override.is_active()
    }

    /// Replace the brush settings and rebuild the brush.
    pub fn set_settings(&mut self, settings: BrushSettings) {
        self.settings = checked_settings(&settings);
        self.brush = Brush::from_settings(&self.settings);
        self.last_frame = None;
    }

    /// Change the history capacity; excess entries are evicted at once.
    pub fn set_max_history(&mut self, max_history: usize) {
        self.history.set_max_history(max_history);
    }

    pub fn history(&self) -> &HistoryManager<MeshSnapshot> {
        &self.history
    }

    pub fn geometry(&self) -> &GeometryBuffer {
        &self.geometry
    }

    /// Current vertex positions, in buffer order.
    pub fn vertex_buffer(&self) -> &[Vec3] {
        self.geometry.positions()
    }

    pub fn normals(&self) -> &[Vec3] {
        self.geometry.normals()
    }

    /// Last frame's brush evaluation, if the last frame had a valid hit.
    pub fn last_frame(&self) -> Option<&BrushFrame> {
        self.last_frame.as_ref().map(|(_, frame)| frame)
    }

    /// Run one interaction frame.
    pub fn handle_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        if self
            .sense_override
            .update(input.override_held, &mut self.settings.sense)
        {
            debug!("Brush sense now {:?}", self.settings.sense);
        }

        if input.override_held && input.scroll_delta != 0.0 {
            self.adjust_radius(input.scroll_delta);
        }

        let editing = input.is_editing();
        let Some(hit) = input.hit else {
            self.last_frame = None;
            if editing {
                warn!("Stroke input without a valid hit, skipping frame");
            } else {
                trace!("No brush hit this frame");
            }
            return FrameOutcome::Idle;
        };

        if !hit.local_point.is_finite() {
            self.last_frame = None;
            warn!("Non-finite brush hit {:?}, skipping frame", hit.local_point);
            return FrameOutcome::Idle;
        }

        let frame = self
            .brush
            .evaluate(hit.local_point, self.settings.radius, self.geometry.positions());
        let selected = frame.zone.len();

        let outcome = if editing {
            let result = apply_displacement(
                &mut self.geometry,
                &mut self.history,
                &frame,
                self.settings.intensity,
                self.settings.sense,
            );
            if result.committed {
                FrameOutcome::Applied {
                    selected,
                    moved: result.vertices_moved,
                }
            } else {
                FrameOutcome::Selected { selected }
            }
        } else {
            FrameOutcome::Selected { selected }
        };

        self.last_frame = Some((hit, frame));
        outcome
    }

    /// Grow or shrink the radius by scroll input, clamped to the slider range.
    pub fn adjust_radius(&mut self, scroll_delta: f32) {
        let radius = self.settings.radius - scroll_delta * SCROLL_RADIUS_STEP;
        self.settings.radius = radius.clamp(RADIUS_MIN, RADIUS_MAX);
        trace!("Brush radius now {}", self.settings.radius);
    }

    /// Commit a full replacement buffer supplied by the host.
    ///
    /// The previous state goes onto the undo stack. A buffer whose length
    /// differs from the mesh is rejected and nothing changes.
    pub fn apply_vertices_buffer(&mut self, positions: Vec<Vec3>) -> Result<(), SculptError> {
        let before = self.geometry.snapshot();
        self.geometry
            .set_positions(positions)
            .inspect_err(|e| warn!("Rejected vertex buffer commit: {}", e))?;
        self.history.commit(before);
        self.last_frame = None;
        debug!(
            "Committed host vertex buffer ({} vertices)",
            self.geometry.vertex_count()
        );
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one stroke-step. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let geometry = &self.geometry;
        let Some(previous) = self.history.undo(|| geometry.snapshot()) else {
            return false;
        };
        self.make_live(previous, "undo")
    }

    /// Step forward one stroke-step. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let geometry = &self.geometry;
        let Some(next) = self.history.redo(|| geometry.snapshot()) else {
            return false;
        };
        self.make_live(next, "redo")
    }

    fn make_live(&mut self, snapshot: MeshSnapshot, action: &str) -> bool {
        self.last_frame = None;
        match self.geometry.restore(snapshot) {
            Ok(()) => {
                debug!(
                    "{}: {} undo / {} redo entries",
                    action,
                    self.history.undo_count(),
                    self.history.redo_count()
                );
                true
            }
            Err(e) => {
                error!("{} failed to restore snapshot: {}", action, e);
                false
            }
        }
    }

    /// Discard every edit and the whole history, restoring the original.
    pub fn reset_to_backup(&mut self) {
        self.geometry = self.original.clone();
        self.history.clear();
        self.last_frame = None;
        debug!("Reset mesh to backup");
    }

    /// End the session, returning the geometry it started with.
    pub fn into_original(self) -> GeometryBuffer {
        self.original
    }

    /// End the session, returning the edited geometry.
    pub fn into_geometry(self) -> GeometryBuffer {
        self.geometry
    }

    /// Visualization data for the last frame, or `None` without a valid hit.
    pub fn brush_preview(&self) -> Option<BrushPreview> {
        let (hit, frame) = self.last_frame.as_ref()?;
        let positions = self.geometry.positions();
        let push = self.settings.sense == Sense::Push;

        let handles = frame
            .zone
            .entries()
            .iter()
            .zip(&frame.magnitudes)
            .map(|(entry, &magnitude)| VertexHandle {
                index: entry.index,
                position: positions[entry.index],
                size: 0.1 + 0.1 * magnitude.abs().min(1.0),
                tone: if push || magnitude < 0.0 {
                    HandleTone::Push
                } else {
                    HandleTone::Pull
                },
                strength: entry.weight,
            })
            .collect();

        Some(BrushPreview {
            ring: BrushRing {
                center: hit.local_point,
                normal: hit.normal,
                radius: frame.zone.radius(),
            },
            handles,
        })
    }
}

fn checked_settings(settings: &BrushSettings) -> BrushSettings {
    match settings.validate() {
        Ok(()) => settings.clone(),
        Err(e) => {
            warn!("Brush settings out of range ({}), clamping", e);
            settings.clamped()
        }
    }
}
