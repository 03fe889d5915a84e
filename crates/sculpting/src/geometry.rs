//! Geometry buffer and mesh snapshots.
//!
//! The [`GeometryBuffer`] owns the vertex positions, normals and triangle
//! indices of the mesh being sculpted. Vertex order is fixed for the lifetime
//! of a session: selection indices, history snapshots and host-side parallel
//! arrays all address vertices by position in this buffer.

use glam::Vec3;

use crate::error::SculptError;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Smallest box containing every point.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::empty();
        for &point in points {
            bounds.include_point(point);
        }
        bounds
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

/// Immutable copy of vertex positions and normals at one point in history.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSnapshot {
    positions: Box<[Vec3]>,
    normals: Box<[Vec3]>,
}

impl MeshSnapshot {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Mutable vertex data of the mesh being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl GeometryBuffer {
    /// Wrap positions and triangle indices, computing normals and bounds.
    ///
    /// `indices` may be empty for a point cloud; normals then default to +Y.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, SculptError> {
        validate_topology(&positions, &indices)?;

        let mut buffer = Self {
            normals: vec![Vec3::Y; positions.len()],
            bounds: Aabb::from_points(&positions),
            positions,
            indices,
        };
        buffer.recalculate_normals();
        Ok(buffer)
    }

    /// Wrap positions with host-supplied normals.
    pub fn with_normals(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, SculptError> {
        validate_topology(&positions, &indices)?;
        if normals.len() != positions.len() {
            return Err(SculptError::NormalCountMismatch {
                expected: positions.len(),
                actual: normals.len(),
            });
        }

        Ok(Self {
            bounds: Aabb::from_points(&positions),
            positions,
            normals,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` slice for GPU upload.
    pub fn positions_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Replace every position. The count must match the mesh.
    ///
    /// Normals and bounds are recomputed. On error the buffer is untouched.
    pub fn set_positions(&mut self, positions: Vec<Vec3>) -> Result<(), SculptError> {
        if positions.len() != self.positions.len() {
            return Err(SculptError::VertexCountMismatch {
                expected: self.positions.len(),
                actual: positions.len(),
            });
        }
        self.positions = positions;
        self.refresh();
        Ok(())
    }

    /// Add per-vertex offsets in place. `offsets` pairs a vertex index with
    /// the displacement to add to it.
    pub(crate) fn displace(&mut self, offsets: &[(usize, Vec3)]) {
        for &(index, offset) in offsets {
            self.positions[index] += offset;
        }
        self.refresh();
    }

    /// Take an immutable copy of the current positions and normals.
    pub fn snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            positions: self.positions.clone().into_boxed_slice(),
            normals: self.normals.clone().into_boxed_slice(),
        }
    }

    /// Make a snapshot the live state.
    pub fn restore(&mut self, snapshot: MeshSnapshot) -> Result<(), SculptError> {
        if snapshot.vertex_count() != self.positions.len() {
            return Err(SculptError::VertexCountMismatch {
                expected: self.positions.len(),
                actual: snapshot.vertex_count(),
            });
        }
        self.positions = snapshot.positions.into_vec();
        self.normals = snapshot.normals.into_vec();
        self.recalculate_bounds();
        Ok(())
    }

    /// Recompute normals and bounds after positions changed.
    pub fn refresh(&mut self) {
        self.recalculate_normals();
        self.recalculate_bounds();
    }

    /// Area-weighted vertex normals from the triangle list.
    ///
    /// Vertices not referenced by any triangle keep +Y. Without triangles
    /// the existing normals are left alone.
    pub fn recalculate_normals(&mut self) {
        if self.indices.is_empty() {
            return;
        }

        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let e1 = self.positions[b] - self.positions[a];
            let e2 = self.positions[c] - self.positions[a];
            // Magnitude is twice the triangle area
            let face_normal = e1.cross(e2);
            accumulated[a] += face_normal;
            accumulated[b] += face_normal;
            accumulated[c] += face_normal;
        }

        for (normal, sum) in self.normals.iter_mut().zip(accumulated) {
            *normal = sum.try_normalize().unwrap_or(Vec3::Y);
        }
    }

    pub fn recalculate_bounds(&mut self) {
        self.bounds = Aabb::from_points(&self.positions);
    }
}

fn validate_topology(positions: &[Vec3], indices: &[u32]) -> Result<(), SculptError> {
    if positions.is_empty() {
        return Err(SculptError::EmptyVertexBuffer);
    }
    if indices.len() % 3 != 0 {
        return Err(SculptError::IndexCountNotTriangles(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(SculptError::IndexOutOfRange {
            index,
            vertex_count: positions.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> GeometryBuffer {
        // Unit quad in the XZ plane, wound so normals face +Y
        GeometryBuffer::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![0, 2, 1, 0, 3, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_new_computes_normals_and_bounds() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for normal in mesh.normals() {
            assert!((*normal - Vec3::Y).length() < 1e-5);
        }
        assert_eq!(mesh.bounds().min, Vec3::ZERO);
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert_eq!(
            GeometryBuffer::new(Vec::new(), Vec::new()),
            Err(SculptError::EmptyVertexBuffer)
        );
        assert_eq!(
            GeometryBuffer::new(vec![Vec3::ZERO; 3], vec![0, 1]),
            Err(SculptError::IndexCountNotTriangles(2))
        );
        assert_eq!(
            GeometryBuffer::new(vec![Vec3::ZERO; 3], vec![0, 1, 3]),
            Err(SculptError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_with_normals_checks_count() {
        let result = GeometryBuffer::with_normals(vec![Vec3::ZERO; 2], vec![Vec3::Y], Vec::new());
        assert_eq!(
            result,
            Err(SculptError::NormalCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_point_cloud_keeps_default_normals() {
        let mut mesh = GeometryBuffer::new(vec![Vec3::ZERO, Vec3::X], Vec::new()).unwrap();
        mesh.displace(&[(0, Vec3::Y)]);
        assert_eq!(mesh.normals(), &[Vec3::Y, Vec3::Y]);
        assert_eq!(mesh.positions()[0], Vec3::Y);
    }

    #[test]
    fn test_set_positions_mismatch_leaves_buffer_untouched() {
        let mut mesh = quad();
        let before = mesh.clone();
        let result = mesh.set_positions(vec![Vec3::ONE; 3]);
        assert_eq!(
            result,
            Err(SculptError::VertexCountMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut mesh = quad();
        let snapshot = mesh.snapshot();

        mesh.displace(&[(2, Vec3::new(0.0, 0.5, 0.0))]);
        assert_ne!(mesh.positions(), snapshot.positions());
        assert_eq!(mesh.bounds().max.y, 0.5);

        mesh.restore(snapshot.clone()).unwrap();
        assert_eq!(mesh.positions(), snapshot.positions());
        assert_eq!(mesh.normals(), snapshot.normals());
        assert_eq!(mesh.bounds().max.y, 0.0);
    }

    #[test]
    fn test_positions_f32_is_flat() {
        let mesh = quad();
        let flat = mesh.positions_f32();
        assert_eq!(flat.len(), 12);
        assert_eq!(&flat[3..6], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_aabb_from_points() {
        let bounds = Aabb::from_points(&[Vec3::new(1.0, -2.0, 0.5), Vec3::new(-1.0, 3.0, 0.0)]);
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.5));
    }
}
