//! Per-frame input from the host.
//!
//! The host raycasts the mesh and reports pointer state once per frame. The
//! kernel only ever sees the hit in mesh-local space.

use glam::Vec3;
use sculpt_config::Sense;

/// Brush hit on the mesh surface, in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPoint {
    pub local_point: Vec3,
    pub normal: Vec3,
}

impl HitPoint {
    pub fn new(local_point: Vec3, normal: Vec3) -> Self {
        Self {
            local_point,
            normal,
        }
    }
}

/// Everything the session needs from the host for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// `None` when the ray missed the mesh this frame
    pub hit: Option<HitPoint>,
    /// Primary button went down this frame
    pub pressed: bool,
    /// Pointer moved with the primary button held
    pub dragging: bool,
    /// Primary button went up this frame
    pub released: bool,
    /// Override control (held state, not an edge)
    pub override_held: bool,
    /// Scroll-wheel delta this frame
    pub scroll_delta: f32,
}

impl FrameInput {
    /// Hover over `hit` without editing.
    pub fn hover(hit: HitPoint) -> Self {
        Self {
            hit: Some(hit),
            ..Default::default()
        }
    }

    /// Press the primary button over `hit`.
    pub fn press(hit: HitPoint) -> Self {
        Self {
            hit: Some(hit),
            pressed: true,
            ..Default::default()
        }
    }

    /// Drag over `hit` with the primary button held.
    pub fn drag(hit: HitPoint) -> Self {
        Self {
            hit: Some(hit),
            dragging: true,
            ..Default::default()
        }
    }

    pub fn with_override(mut self, held: bool) -> Self {
        self.override_held = held;
        self
    }

    /// Whether this frame should displace vertices.
    pub fn is_editing(&self) -> bool {
        (self.pressed || self.dragging) && !self.released
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum OverrideState {
    #[default]
    Normal,
    Overridden {
        saved: Sense,
    },
}

/// Temporary sense inversion while the override control is held.
///
/// Transitions happen only on edges of the held signal: the rising edge
/// saves the current sense and inverts it, the falling edge restores the
/// saved sense. Holding the control across frames changes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenseOverride {
    state: OverrideState,
}

impl SenseOverride {
    pub fn is_active(&self) -> bool {
        matches!(self.state, OverrideState::Overridden { .. })
    }

    /// Feed this frame's held state. Returns true if `sense` was changed.
    pub fn update(&mut self, held: bool, sense: &mut Sense) -> bool {
        match (self.state, held) {
            (OverrideState::Normal, true) => {
                self.state = OverrideState::Overridden { saved: *sense };
                *sense = sense.inverted();
                true
            }
            (OverrideState::Overridden { saved }, false) => {
                self.state = OverrideState::Normal;
                let changed = *sense != saved;
                *sense = saved;
                changed
            }
            _ => false,
        }
    }
}
