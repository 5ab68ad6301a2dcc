//! The input mesh a [`NavGraph`](crate::NavGraph) is built from.

use glam::{UVec3, Vec3A};

use crate::{builder::GraphBuildError, math::TriangleIndices as _};

/// A triangle list describing the walkable surface in local space.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TriMesh {
    /// The vertices of the surface.
    /// Follows the convention of a triangle list.
    pub vertices: Vec<Vec3A>,

    /// The indices of the surface, one entry per triangle.
    /// Follows the convention of a triangle list.
    pub indices: Vec<UVec3>,
}

impl TriMesh {
    /// Creates a trimesh from a flat index buffer, as found in most mesh formats.
    ///
    /// Fails if the buffer does not describe whole triangles or references a missing vertex.
    pub fn from_flat_indices(
        vertices: Vec<Vec3A>,
        indices: &[u32],
    ) -> Result<Self, GraphBuildError> {
        if indices.len() % 3 != 0 {
            return Err(GraphBuildError::IndexCountNotMultipleOfThree { len: indices.len() });
        }
        let trimesh = Self {
            vertices,
            indices: indices
                .chunks_exact(3)
                .map(|triangle| UVec3::new(triangle[0], triangle[1], triangle[2]))
                .collect(),
        };
        trimesh.validate_indices()?;
        Ok(trimesh)
    }

    /// Extends the trimesh with the vertices and indices of another trimesh.
    /// The indices of `other` will be offset by the number of vertices in `self`.
    pub fn extend(&mut self, other: TriMesh) {
        if self.vertices.len() > u32::MAX as usize {
            panic!("Cannot extend a trimesh with more than 2^32 vertices");
        }
        let next_vertex_index = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices
            .extend(other.indices.iter().map(|i| i + next_vertex_index));
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Checks that every index references an existing vertex.
    pub fn validate_indices(&self) -> Result<(), GraphBuildError> {
        let vertex_count = self.vertices.len();
        for (triangle, indices) in self.indices.iter().enumerate() {
            let index = indices.max_index();
            if index as usize >= vertex_count {
                return Err(GraphBuildError::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}
