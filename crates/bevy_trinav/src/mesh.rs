use anyhow::Context as _;
use bevy_app::prelude::*;
use bevy_asset::prelude::*;
use bevy_ecs::prelude::*;
use bevy_mesh::{Mesh, PrimitiveTopology};
use bevy_render::prelude::*;
use bevy_transform::components::GlobalTransform;
use glam::Vec3A;
use trinav::{NavGraphConfig, TriMesh};

use crate::{NavGraphSystems, NavSurface};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        insert_surfaces_from_meshes
            .run_if(resource_exists::<Assets<Mesh>>)
            .before(NavGraphSystems),
    );
}

/// Marks an entity with a [`Mesh3d`] as walkable.
///
/// As soon as the mesh asset is loaded, the entity gets a [`NavSurface`] built from the mesh
/// and the entity's [`GlobalTransform`] at that time.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Navigable {
    /// How the graph is built from the mesh.
    pub config: NavGraphConfig,
}

impl Default for Navigable {
    /// Skips degenerate triangles, since most render meshes have vertical faces.
    fn default() -> Self {
        Self {
            config: NavGraphConfig::lenient(),
        }
    }
}

fn insert_surfaces_from_meshes(
    mut commands: Commands,
    meshes: Res<Assets<Mesh>>,
    navigables: Query<(Entity, &Mesh3d, &GlobalTransform, &Navigable), Without<NavSurface>>,
) {
    for (entity, mesh, transform, navigable) in &navigables {
        let Some(mesh) = meshes.get(mesh) else {
            // Not loaded yet.
            continue;
        };
        let surface = surface_from_mesh(mesh, transform, &navigable.config);
        match surface {
            Ok(surface) => {
                commands.entity(entity).insert(surface);
            }
            Err(err) => {
                tracing::error!("Cannot build a navigation graph for {entity:?}: {err:#}");
                commands.entity(entity).remove::<Navigable>();
            }
        }
    }
}

fn surface_from_mesh(
    mesh: &Mesh,
    transform: &GlobalTransform,
    config: &NavGraphConfig,
) -> anyhow::Result<NavSurface> {
    let trimesh = TriMesh::from_mesh(mesh).context("Mesh is not an indexed triangle list")?;
    Ok(NavSurface::from_trimesh(&trimesh, transform, config)?)
}

/// Used to add [`TriMeshFromBevyMesh::from_mesh`] to [`TriMesh`].
pub trait TriMeshFromBevyMesh {
    /// Converts a [`Mesh`] into a [`TriMesh`].
    /// Returns `None` for meshes that are not indexed triangle lists.
    fn from_mesh(mesh: &Mesh) -> Option<TriMesh>;
}

impl TriMeshFromBevyMesh for TriMesh {
    fn from_mesh(mesh: &Mesh) -> Option<TriMesh> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return None;
        }
        let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION)?.as_float3()?;
        let vertices = positions.iter().map(|v| Vec3A::from_array(*v)).collect();
        let indices = mesh
            .indices()?
            .iter()
            .map(|i| u32::try_from(i).ok())
            .collect::<Option<Vec<_>>>()?;
        TriMesh::from_flat_indices(vertices, &indices).ok()
    }
}

#[cfg(test)]
mod tests {
    use bevy_asset::RenderAssetUsages;
    use bevy_mesh::Indices;

    use super::*;

    fn quad(topology: PrimitiveTopology) -> Mesh {
        Mesh::new(topology, RenderAssetUsages::default())
            .with_inserted_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![
                    [0.0, 0.0, 0.0],
                    [1.0, 0.0, 0.0],
                    [1.0, 0.0, 1.0],
                    [0.0, 0.0, 1.0],
                ],
            )
            .with_inserted_indices(Indices::U32(vec![0, 1, 2, 0, 2, 3]))
    }

    #[test]
    fn converts_triangle_list() {
        let trimesh = TriMesh::from_mesh(&quad(PrimitiveTopology::TriangleList)).unwrap();
        assert_eq!(trimesh.vertices.len(), 4);
        assert_eq!(trimesh.triangle_count(), 2);
        assert_eq!(trimesh.vertices[2], Vec3A::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn rejects_other_topologies() {
        assert!(TriMesh::from_mesh(&quad(PrimitiveTopology::LineList)).is_none());
    }

    #[test]
    fn rejects_unindexed_mesh() {
        let mut mesh = quad(PrimitiveTopology::TriangleList);
        mesh.remove_indices();
        assert!(TriMesh::from_mesh(&mesh).is_none());
    }
}
