use glam::Vec2;

use crate::graph::{CellId, NavGraph};

impl NavGraph {
    /// Finds the cell containing `point`.
    ///
    /// A point on a shared edge or vertex can be inside several cells. In that case the cell whose
    /// centroid is closest to `reference` wins, which is usually the other end of the query.
    /// Remaining ties go to the cell that was built first, so the result is deterministic.
    ///
    /// Each cell's containment test is half-open: points on the edge opposite its first point
    /// belong to the cell on the other side. Where that edge is on the outer boundary of the
    /// surface, there is no such cell and the point is not found. Callers querying from exactly
    /// the boundary should nudge the point inwards first.
    ///
    /// Returns `None` if the point is not on the graph or the graph is not ready.
    pub fn locate(&self, point: Vec2, reference: Vec2) -> Option<CellId> {
        self.cells()
            .filter(|(_, cell)| cell.contains(point))
            .min_by(|(a_id, a), (b_id, b)| {
                let a_dist = a.centroid().distance_squared(reference);
                let b_dist = b.centroid().distance_squared(reference);
                a_dist.total_cmp(&b_dist).then_with(|| a_id.cmp(b_id))
            })
            .map(|(id, _)| id)
    }

    /// All cells containing `point`, in build order.
    pub fn cells_containing(&self, point: Vec2) -> impl Iterator<Item = CellId> + '_ {
        self.cells()
            .filter(move |(_, cell)| cell.contains(point))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Affine3A, Vec3A};

    use super::*;
    use crate::{GraphBuilder, NavGraphConfig, TriMesh};

    /// Unit square split along the diagonal (0,0)-(1,1).
    fn quad_graph() -> (NavGraph, CellId, CellId) {
        let vertices = vec![
            Vec3A::new(0.0, 0.0, 0.0),
            Vec3A::new(1.0, 0.0, 0.0),
            Vec3A::new(1.0, 0.0, 1.0),
            Vec3A::new(0.0, 0.0, 1.0),
        ];
        let trimesh = TriMesh::from_flat_indices(vertices, &[0, 1, 2, 0, 2, 3]).unwrap();
        let graph =
            NavGraph::build(&trimesh, Affine3A::IDENTITY, &NavGraphConfig::default()).unwrap();
        let ids: Vec<_> = graph.cells().map(|(id, _)| id).collect();
        (graph, ids[0], ids[1])
    }

    #[test]
    fn interior_point_ignores_reference() {
        let (graph, lower, upper) = quad_graph();
        for reference in [Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::splat(100.0)] {
            assert_eq!(graph.locate(Vec2::new(0.8, 0.1), reference), Some(lower));
            assert_eq!(graph.locate(Vec2::new(0.1, 0.8), reference), Some(upper));
        }
    }

    #[test]
    fn shared_edge_prefers_cell_towards_reference() {
        let (graph, lower, upper) = quad_graph();
        let on_edge = Vec2::splat(0.5);
        assert_eq!(graph.cells_containing(on_edge).count(), 2);
        assert_eq!(graph.locate(on_edge, Vec2::new(1.0, 0.0)), Some(lower));
        assert_eq!(graph.locate(on_edge, Vec2::new(0.0, 1.0)), Some(upper));
    }

    #[test]
    fn shared_vertex_is_deterministic() {
        let (graph, _, _) = quad_graph();
        let first = graph.locate(Vec2::ZERO, Vec2::new(0.3, 0.9));
        for _ in 0..10 {
            assert_eq!(graph.locate(Vec2::ZERO, Vec2::new(0.3, 0.9)), first);
        }
    }

    #[test]
    fn equidistant_reference_picks_first_built_cell() {
        let (graph, lower, _) = quad_graph();
        assert_eq!(graph.locate(Vec2::splat(0.5), Vec2::splat(0.5)), Some(lower));
    }

    #[test]
    fn point_off_the_graph_is_not_found() {
        let (graph, _, _) = quad_graph();
        assert_eq!(graph.locate(Vec2::new(2.0, 0.5), Vec2::ZERO), None);
        assert_eq!(graph.locate(Vec2::new(-0.1, 0.5), Vec2::ZERO), None);
    }

    #[test]
    fn outer_edge_opposite_first_point_is_not_found() {
        let (graph, lower, upper) = quad_graph();
        // Edges through each cell's first point, (0,0).
        assert_eq!(graph.locate(Vec2::new(0.5, 0.0), Vec2::ZERO), Some(lower));
        assert_eq!(graph.locate(Vec2::new(0.0, 0.5), Vec2::ZERO), Some(upper));
        // Edges opposite it.
        assert_eq!(graph.locate(Vec2::new(0.5, 1.0), Vec2::ZERO), None);
        assert_eq!(graph.locate(Vec2::new(1.0, 0.5), Vec2::ZERO), None);
        assert_eq!(graph.locate(Vec2::new(0.5, 0.999), Vec2::ZERO), Some(upper));
    }

    #[test]
    fn unready_graph_finds_nothing() {
        let vertices = vec![Vec3A::ZERO, Vec3A::X, Vec3A::Z];
        let trimesh = TriMesh::from_flat_indices(vertices, &[0, 1, 2]).unwrap();
        let builder =
            GraphBuilder::new(&trimesh, Affine3A::IDENTITY, &NavGraphConfig::default()).unwrap();
        assert_eq!(builder.graph().locate(Vec2::splat(0.1), Vec2::ZERO), None);
    }
}
