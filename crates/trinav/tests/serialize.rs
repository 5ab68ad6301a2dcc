//! A built graph can be cached and loaded again.
#![cfg(feature = "serialize")]

use glam::{Affine3A, Vec2, Vec3A};
use trinav::{NavGraph, NavGraphConfig, TriMesh};

#[test]
fn graph_survives_json_round_trip() -> anyhow::Result<()> {
    let vertices = vec![
        Vec3A::new(0.0, 0.0, 0.0),
        Vec3A::new(4.0, 0.0, 0.0),
        Vec3A::new(1.0, 0.0, 1.0),
        Vec3A::new(0.0, 0.0, 4.0),
    ];
    let trimesh = TriMesh::from_flat_indices(vertices, &[0, 1, 2, 1, 2, 3])?;
    let graph = NavGraph::build(&trimesh, Affine3A::IDENTITY, &NavGraphConfig::default())?;

    let json = serde_json::to_string(&graph)?;
    let loaded: NavGraph = serde_json::from_str(&json)?;
    assert_eq!(loaded, graph);
    assert!(loaded.is_ready());

    let start = Vec2::new(0.5, 0.1);
    let end = Vec2::new(0.5, 3.0);
    assert_eq!(
        loaded.compute_path_2d(start, end),
        graph.compute_path_2d(start, end)
    );
    Ok(())
}

#[test]
fn trimesh_and_config_survive_json_round_trip() -> anyhow::Result<()> {
    let trimesh = TriMesh::from_flat_indices(vec![Vec3A::ZERO, Vec3A::X, Vec3A::Z], &[0, 1, 2])?;
    let loaded: TriMesh = serde_json::from_str(&serde_json::to_string(&trimesh)?)?;
    assert_eq!(loaded, trimesh);

    let config = NavGraphConfig::lenient();
    let loaded: NavGraphConfig = serde_json::from_str(&serde_json::to_string(&config)?)?;
    assert_eq!(loaded, config);
    Ok(())
}
