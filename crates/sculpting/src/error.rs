//! Error types for sculpting operations.

/// Errors that can occur while building or committing geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SculptError {
    #[error("Vertex buffer is empty")]
    EmptyVertexBuffer,

    #[error("Vertex count mismatch: mesh has {expected}, buffer has {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },

    #[error("Normal count mismatch: mesh has {expected} vertices, got {actual} normals")]
    NormalCountMismatch { expected: usize, actual: usize },

    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
}
