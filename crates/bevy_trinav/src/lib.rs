#![doc = include_str!("../../../readme.md")]

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;

#[cfg(feature = "bevy_mesh")]
mod mesh;
mod surface;

#[cfg(feature = "bevy_mesh")]
pub use mesh::{Navigable, TriMeshFromBevyMesh};
pub use surface::{NavGraphReady, NavGraphSystems, NavSurface};

pub use trinav;

/// The main plugin of the crate. Builds the graphs of all [`NavSurface`]s over several frames.
#[non_exhaustive]
#[derive(Default)]
pub struct TriNavPlugin;

impl Plugin for TriNavPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavGraphBuildSettings>();
        app.add_plugins(surface::plugin);
        #[cfg(feature = "bevy_mesh")]
        app.add_plugins(mesh::plugin);
    }
}

/// Controls how much construction work is done per frame.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct NavGraphBuildSettings {
    /// How many triangles every unfinished [`NavSurface`] adds to its graph per frame.
    ///
    /// Values below `1` are treated as `1`.
    pub triangles_per_frame: usize,
}

impl Default for NavGraphBuildSettings {
    fn default() -> Self {
        Self {
            triangles_per_frame: 1,
        }
    }
}
