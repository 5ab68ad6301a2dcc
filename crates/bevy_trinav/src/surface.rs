//! The navigable surface component and the system that builds its graph.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_transform::components::GlobalTransform;
use glam::{Vec2, Vec3};
use trinav::{BuildProgress, GraphBuildError, GraphBuilder, NavGraph, NavGraphConfig, TriMesh};

use crate::NavGraphBuildSettings;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, advance_builds.in_set(NavGraphSystems));
}

/// The system set in which [`NavSurface`]s are built, in [`Update`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavGraphSystems;

/// A walkable surface with its navigation graph.
///
/// A freshly created surface is not ready: its graph is built a few triangles per frame by the
/// [`TriNavPlugin`](crate::TriNavPlugin), and until then every path query returns an empty path.
/// The entity gets a [`NavGraphReady`] marker once the graph is complete.
#[derive(Component, Debug, Clone)]
pub struct NavSurface {
    builder: Option<GraphBuilder>,
    graph: NavGraph,
}

impl NavSurface {
    /// A surface whose graph will be built by `builder`.
    pub fn new(builder: GraphBuilder) -> Self {
        Self {
            builder: Some(builder),
            graph: NavGraph::default(),
        }
    }

    /// A surface for `trimesh` placed in the world at `transform`.
    pub fn from_trimesh(
        trimesh: &TriMesh,
        transform: &GlobalTransform,
        config: &NavGraphConfig,
    ) -> Result<Self, GraphBuildError> {
        GraphBuilder::new(trimesh, transform.affine(), config).map(Self::new)
    }

    /// A surface for a graph that was already built, e.g. one loaded from disk.
    pub fn from_graph(graph: NavGraph) -> Self {
        Self {
            builder: None,
            graph,
        }
    }

    /// The graph of this surface. Not ready while it is still being built.
    pub fn graph(&self) -> &NavGraph {
        match &self.builder {
            Some(builder) => builder.graph(),
            None => &self.graph,
        }
    }

    /// Whether the graph is complete and can answer queries.
    pub fn is_ready(&self) -> bool {
        self.graph().is_ready()
    }

    /// How far the graph has come.
    pub fn progress(&self) -> BuildProgress {
        match &self.builder {
            Some(builder) => builder.progress(),
            None if self.graph.is_ready() => BuildProgress::Ready,
            None => BuildProgress::Building { built: 0, total: 0 },
        }
    }

    /// Shortest path from `start` to `end` in world space, projected onto the xz-plane.
    /// Empty while the graph is being built or when there is no path.
    pub fn compute_path(&self, start: Vec3, end: Vec3) -> Vec<Vec2> {
        self.graph().compute_path(start, end)
    }

    fn step(&mut self) -> BuildProgress {
        let Some(builder) = &mut self.builder else {
            return self.progress();
        };
        if builder.step() != BuildProgress::Ready {
            return builder.progress();
        }
        if let Some(builder) = self.builder.take() {
            self.graph = builder.finish();
        }
        BuildProgress::Ready
    }
}

/// Marks an entity whose [`NavSurface`] is ready to answer path queries.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavGraphReady;

fn advance_builds(
    mut commands: Commands,
    settings: Res<NavGraphBuildSettings>,
    mut surfaces: Query<(Entity, &mut NavSurface, Has<NavGraphReady>)>,
) {
    let steps = settings.triangles_per_frame.max(1);
    for (entity, mut surface, marked) in &mut surfaces {
        if surface.is_ready() {
            if !marked {
                commands.entity(entity).insert(NavGraphReady);
            }
            continue;
        }
        if marked {
            // The surface was replaced with one that still needs building.
            commands.entity(entity).remove::<NavGraphReady>();
        }
        for _ in 0..steps {
            if surface.step() == BuildProgress::Ready {
                tracing::debug!("Navigation graph of {entity:?} is ready");
                commands.entity(entity).insert(NavGraphReady);
                break;
            }
        }
    }
}
