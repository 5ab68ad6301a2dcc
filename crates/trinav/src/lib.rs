#![doc = include_str!("../../../readme.md")]

mod builder;
mod config;
mod funnel;
mod graph;
mod locate;
pub(crate) mod math;
mod query;
mod search;
mod trimesh;

pub use builder::{BuildProgress, GraphBuildError, GraphBuilder};
pub use config::NavGraphConfig;
pub use funnel::smooth;
pub use graph::{Cell, CellId, NavGraph, Portal};
pub use math::{cross, path_length, project};
pub use search::{PathStep, SearchNode, search};
pub use trimesh::TriMesh;
