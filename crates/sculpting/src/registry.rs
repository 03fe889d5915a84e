//! Sessions keyed by mesh identity.
//!
//! The host owns one registry and looks sessions up by [`MeshId`]. At most one
//! session exists per mesh; removing a session hands back the geometry the
//! session started with so the host can restore the mesh.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::GeometryBuffer;
use crate::session::SculptSession;

/// Host-assigned mesh identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// All active sculpt sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<MeshId, SculptSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for `mesh_id`, created with `make` if none exists yet.
    pub fn get_or_create(
        &mut self,
        mesh_id: MeshId,
        make: impl FnOnce() -> SculptSession,
    ) -> &mut SculptSession {
        self.sessions.entry(mesh_id).or_insert_with(|| {
            debug!("Creating sculpt session for mesh {}", mesh_id.0);
            make()
        })
    }

    pub fn get(&self, mesh_id: MeshId) -> Option<&SculptSession> {
        self.sessions.get(&mesh_id)
    }

    pub fn get_mut(&mut self, mesh_id: MeshId) -> Option<&mut SculptSession> {
        self.sessions.get_mut(&mesh_id)
    }

    pub fn contains(&self, mesh_id: MeshId) -> bool {
        self.sessions.contains_key(&mesh_id)
    }

    /// End the session for `mesh_id`, returning its original geometry.
    pub fn remove(&mut self, mesh_id: MeshId) -> Option<GeometryBuffer> {
        let session = self.sessions.remove(&mesh_id)?;
        debug!("Removed sculpt session for mesh {}", mesh_id.0);
        Some(session.into_original())
    }

    /// End every session, returning each mesh's original geometry.
    ///
    /// Results are ordered by mesh id.
    pub fn clear_all(&mut self) -> Vec<(MeshId, GeometryBuffer)> {
        let mut originals: Vec<(MeshId, GeometryBuffer)> = self
            .sessions
            .drain()
            .map(|(id, session)| (id, session.into_original()))
            .collect();
        originals.sort_by_key(|(id, _)| *id);
        if !originals.is_empty() {
            debug!("Cleared {} sculpt session(s)", originals.len());
        }
        originals
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of all active sessions, in ascending order.
    pub fn mesh_ids(&self) -> Vec<MeshId> {
        let mut ids: Vec<MeshId> = self.sessions.keys().copied().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FrameInput, HitPoint};
    use glam::Vec3;
    use sculpt_config::{BrushKind, BrushSettings, FalloffPreset, SculptConfig};

    fn make_session() -> SculptSession {
        let mut config = SculptConfig::default();
        config.brush = BrushSettings {
            falloff: Some(FalloffPreset::Constant),
            radius: 0.5,
            intensity: 1.0,
            ..BrushSettings::for_kind(BrushKind::Axial)
        };
        SculptSession::from_mesh(vec![Vec3::ZERO, Vec3::X], Vec::new(), &config).unwrap()
    }

    #[test]
    fn test_get_or_create_reuses_session() {
        let mut registry = SessionRegistry::new();
        let id = MeshId(7);

        registry
            .get_or_create(id, make_session)
            .handle_frame(&FrameInput::press(HitPoint::new(Vec3::ZERO, Vec3::Y)));

        let mut created = false;
        let session = registry.get_or_create(id, || {
            created = true;
            make_session()
        });
        assert!(session.can_undo());
        assert!(!created);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_returns_original() {
        let mut registry = SessionRegistry::new();
        let id = MeshId(1);
        registry
            .get_or_create(id, make_session)
            .handle_frame(&FrameInput::press(HitPoint::new(Vec3::ZERO, Vec3::Y)));
        assert_eq!(registry.get(id).unwrap().vertex_buffer()[0], Vec3::Y);

        let original = registry.remove(id).unwrap();
        assert_eq!(original.positions()[0], Vec3::ZERO);
        assert!(registry.is_empty());
        assert!(registry.remove(id).is_none());
        assert!(registry.get_mut(id).is_none());
    }

    #[test]
    fn test_clear_all() {
        let mut registry = SessionRegistry::new();
        for id in [3, 1, 2] {
            registry.get_or_create(MeshId(id), make_session);
        }
        assert_eq!(registry.mesh_ids(), vec![MeshId(1), MeshId(2), MeshId(3)]);

        let originals = registry.clear_all();
        let ids: Vec<MeshId> = originals.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![MeshId(1), MeshId(2), MeshId(3)]);
        assert!(registry.is_empty());
        assert!(!registry.contains(MeshId(1)));
        assert!(registry.clear_all().is_empty());
    }
}
