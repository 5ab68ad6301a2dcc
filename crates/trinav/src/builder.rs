//! Incremental construction of a [`NavGraph`] from a [`TriMesh`].
//!
//! Validation and projection happen up front in [`GraphBuilder::new`], so a broken mesh is
//! rejected before any cell exists. The pairwise adjacency scan is the expensive part and is
//! spread over [`GraphBuilder::step`] calls, one triangle each, so the host can interleave it
//! with other per-frame work.

use glam::{Affine3A, Vec2};
use thiserror::Error;

use crate::{
    config::NavGraphConfig,
    graph::{Cell, CellId, NavGraph, Portal},
    math::{TriangleIndices as _, TrianglePoints as _},
    trimesh::TriMesh,
};

/// Reasons a mesh cannot be turned into a [`NavGraph`]. All of them point at a broken asset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphBuildError {
    /// The flat index buffer does not describe whole triangles.
    #[error("Index count must be a multiple of 3, but got {len}")]
    IndexCountNotMultipleOfThree {
        /// Length of the offending index buffer.
        len: usize,
    },
    /// A triangle references a vertex that doesn't exist.
    #[error(
        "Triangle {triangle} references vertex {index}, but the mesh only has {vertex_count} vertices"
    )]
    IndexOutOfBounds {
        /// Index of the offending triangle.
        triangle: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// A triangle has no area once projected onto the navigation plane.
    #[error("Triangle {triangle} is degenerate on the navigation plane: {points:?}")]
    DegenerateTriangle {
        /// Index of the offending triangle.
        triangle: usize,
        /// The projected points of the triangle.
        points: [Vec2; 3],
    },
}

/// How far a [`GraphBuilder`] has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProgress {
    /// Cells are still being added.
    Building {
        /// Number of cells built so far.
        built: usize,
        /// Number of cells the finished graph will have.
        total: usize,
    },
    /// The graph is complete and can be queried.
    Ready,
}

/// Builds a [`NavGraph`] one triangle at a time.
///
/// ```
/// # use glam::{Affine3A, Vec3A};
/// # use trinav::{GraphBuilder, NavGraphConfig, TriMesh, BuildProgress};
/// let vertices = vec![Vec3A::ZERO, Vec3A::X, Vec3A::Z];
/// let trimesh = TriMesh::from_flat_indices(vertices, &[0, 1, 2]).unwrap();
/// let mut builder =
///     GraphBuilder::new(&trimesh, Affine3A::IDENTITY, &NavGraphConfig::default()).unwrap();
/// while builder.step() != BuildProgress::Ready {
///     // Do other work in between.
/// }
/// assert!(builder.graph().is_ready());
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    triangles: Vec<[Vec2; 3]>,
    next: usize,
    graph: NavGraph,
}

impl GraphBuilder {
    /// Validates `trimesh`, transforms it to world space with `transform` and projects it onto
    /// the navigation plane. No cell is built yet.
    pub fn new(
        trimesh: &TriMesh,
        transform: Affine3A,
        config: &NavGraphConfig,
    ) -> Result<Self, GraphBuildError> {
        trimesh.validate_indices()?;

        let mut triangles = Vec::with_capacity(trimesh.triangle_count());
        for (triangle, indices) in trimesh.indices.iter().enumerate() {
            let points = indices.vertices(&trimesh.vertices).map(|vertex| {
                let world = transform.transform_point3a(vertex);
                Vec2::new(world.x, world.z)
            });
            if points.iter().all(|p| p.is_finite()) && !points.is_degenerate() {
                triangles.push(points);
                continue;
            }
            if !config.skip_degenerate_triangles {
                return Err(GraphBuildError::DegenerateTriangle { triangle, points });
            }
            tracing::warn!("Skipping triangle {triangle}: degenerate on the navigation plane");
        }

        tracing::debug!(
            "Building navigation graph from {} triangles",
            triangles.len()
        );
        Ok(Self {
            triangles,
            next: 0,
            graph: NavGraph::default(),
        })
    }

    /// Adds the next triangle to the graph and links it to its neighbors.
    ///
    /// Once every triangle has been added, the graph is marked as ready.
    /// Calling this on a finished builder does nothing.
    pub fn step(&mut self) -> BuildProgress {
        if let Some(&points) = self.triangles.get(self.next) {
            self.add_cell(points);
            self.next += 1;
        }
        if self.next == self.triangles.len() && !self.graph.is_ready() {
            self.graph.mark_ready();
            tracing::info!(
                "Navigation graph ready: {} cells, {} portals",
                self.graph.cell_count(),
                self.graph.portals().count()
            );
        }
        self.progress()
    }

    /// The current progress, without doing any work.
    pub fn progress(&self) -> BuildProgress {
        if self.graph.is_ready() {
            BuildProgress::Ready
        } else {
            BuildProgress::Building {
                built: self.next,
                total: self.triangles.len(),
            }
        }
    }

    /// Whether the graph is complete.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.graph.is_ready()
    }

    /// The graph under construction. It answers every query with an empty result until it's ready.
    #[inline]
    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    /// Runs all remaining steps and returns the finished graph.
    pub fn finish(mut self) -> NavGraph {
        while self.step() != BuildProgress::Ready {}
        self.graph
    }

    fn add_cell(&mut self, points: [Vec2; 3]) {
        let cell = Cell::new(points);
        let mut links: Vec<(CellId, Portal)> = Vec::with_capacity(Cell::MAX_NEIGHBORS);
        for (other_id, other) in self.graph.raw_cells() {
            if other.is_full() {
                continue;
            }
            let Some(portal) = cell.shared_portal(other) else {
                continue;
            };
            links.push((other_id, portal));
            if links.len() == Cell::MAX_NEIGHBORS {
                break;
            }
        }

        let id = self.graph.insert_cell(cell);
        for (other_id, portal) in links {
            self.graph.link(id, other_id, portal);
        }
    }
}

impl NavGraph {
    /// Builds a graph in one go. Use a [`GraphBuilder`] to spread the work over several frames.
    pub fn build(
        trimesh: &TriMesh,
        transform: Affine3A,
        config: &NavGraphConfig,
    ) -> Result<Self, GraphBuildError> {
        Ok(GraphBuilder::new(trimesh, transform, config)?.finish())
    }
}
