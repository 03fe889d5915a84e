//! Mesh sculpting kernel.
//!
//! This crate displaces the vertices of a triangle mesh with interactive
//! brushes and keeps a bounded undo/redo history of the edits.
//!
//! # Architecture
//!
//! Each frame the host reports a brush hit in mesh-local space. The session
//! selects every vertex within the brush radius, weights it with the brush's
//! falloff, asks the brush for a direction and magnitude per vertex, and
//! (while a stroke is active) displaces the selection and records the previous
//! buffer in history. Rendering, raycasting and UI stay with the host.
//!
//! ## Key Components
//!
//! - **Geometry**: Vertex/normal/index buffers, snapshots, normal recompute
//! - **Falloff**: Distance-to-weight curves
//! - **Selection**: Vertices inside the brush sphere, with weights
//! - **Brush**: Radial, axial, flatten and stamp brushes
//! - **Deformation**: Applies offsets and commits history
//! - **History**: Bounded linear undo/redo
//! - **Session**: Per-mesh controller driven once per frame
//! - **Registry**: Sessions keyed by mesh id

pub mod brush;
pub mod deformation;
pub mod error;
pub mod falloff;
pub mod geometry;
pub mod history;
pub mod input;
pub mod registry;
pub mod selection;
pub mod session;

pub use brush::{Brush, BrushFrame, Direction, Magnitude};
pub use deformation::{DisplacementResult, apply_displacement};
pub use error::SculptError;
pub use falloff::{FalloffCurve, KeyframedCurve};
pub use geometry::{Aabb, GeometryBuffer, MeshSnapshot};
pub use history::HistoryManager;
pub use input::{FrameInput, HitPoint};
pub use registry::{MeshId, SessionRegistry};
pub use selection::{SelectionEntry, SelectionZone, select};
pub use session::{BrushPreview, BrushRing, FrameOutcome, HandleTone, SculptSession, VertexHandle};

pub use sculpt_config::{Axis, BrushKind, BrushSettings, SculptConfig, Sense};
