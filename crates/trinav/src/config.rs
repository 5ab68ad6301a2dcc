/// Specifies how a [`NavGraph`](crate::NavGraph) is built from a [`TriMesh`](crate::TriMesh).
///
/// The defaults are strict: any triangle that collapses when projected onto the
/// navigation plane is treated as a broken asset and fails the build.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavGraphConfig {
    /// Skip triangles whose projected points coincide or are colinear instead of failing the build.
    ///
    /// Such triangles show up when the source mesh contains vertical faces such as walls.
    /// A skipped triangle is logged with a warning and never becomes a cell.
    pub skip_degenerate_triangles: bool,
}

impl NavGraphConfig {
    /// A config that skips degenerate triangles instead of failing.
    pub fn lenient() -> Self {
        Self {
            skip_degenerate_triangles: true,
        }
    }
}
