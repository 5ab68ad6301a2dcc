//! Point-to-point path queries, tying together locating, searching and smoothing.

use glam::{Vec2, Vec3};

use crate::{funnel::smooth, graph::NavGraph, math::project, search::search};

impl NavGraph {
    /// Finds the shortest path from `start` to `end` over the graph.
    ///
    /// Both points are projected onto the navigation plane by dropping their height.
    /// The returned path starts at `start` and ends at `end`. Every point in between is a corner
    /// where the path bends around the edge of the walkable surface.
    ///
    /// Returns an empty path if the graph is not ready, either point is off the graph, or the
    /// points are on disconnected parts of the graph. Querying the same point twice returns that
    /// point twice.
    pub fn compute_path(&self, start: Vec3, end: Vec3) -> Vec<Vec2> {
        self.compute_path_2d(project(start), project(end))
    }

    /// Like [`NavGraph::compute_path`], but for points already on the navigation plane.
    pub fn compute_path_2d(&self, start: Vec2, end: Vec2) -> Vec<Vec2> {
        if !self.is_ready() {
            return Vec::new();
        }
        let Some(start_cell) = self.locate(start, end) else {
            tracing::trace!("Path start {start} is not on the navigation graph");
            return Vec::new();
        };
        let Some(end_cell) = self.locate(end, start) else {
            tracing::trace!("Path end {end} is not on the navigation graph");
            return Vec::new();
        };
        if start_cell == end_cell {
            return vec![start, end];
        }

        let rough = search(self, start_cell, end_cell, start, end);
        if rough.is_empty() {
            return Vec::new();
        }
        smooth(start, end, &rough)
    }
}
