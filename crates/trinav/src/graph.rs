//! The navigation graph: one [`Cell`] per walkable triangle, linked through shared [`Portal`]s.

use glam::Vec2;
use slotmap::SlotMap;

use crate::math::TrianglePoints as _;

slotmap::new_key_type! {
    /// A stable key for a [`Cell`] in a [`NavGraph`].
    ///
    /// Keys are ordered by insertion, which makes them usable as a deterministic tie-breaker.
    pub struct CellId;
}

/// The edge shared by two adjacent cells.
///
/// The two points are unordered: a portal compares equal to the same portal with its points swapped.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    points: [Vec2; 2],
}

impl Portal {
    pub(crate) fn new(a: Vec2, b: Vec2) -> Self {
        debug_assert_ne!(a, b, "portal endpoints must be distinct");
        Self { points: [a, b] }
    }

    /// The two endpoints of the portal.
    #[inline]
    pub fn points(&self) -> [Vec2; 2] {
        self.points
    }

    /// Whether `point` is one of the portal's endpoints.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.points.contains(&point)
    }

    /// The point halfway between the two endpoints.
    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.points[0] + self.points[1]) * 0.5
    }

    /// Length of the portal.
    #[inline]
    pub fn width(&self) -> f32 {
        self.points[0].distance(self.points[1])
    }
}

impl PartialEq for Portal {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points || self.points == [other.points[1], other.points[0]]
    }
}

/// A walkable triangle projected onto the navigation plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    points: [Vec2; 3],
    centroid: Vec2,
    /// At most 3 entries, one per triangle edge.
    neighbors: Vec<(CellId, Portal)>,
}

impl Cell {
    /// Maximum number of neighbors a triangle can have.
    pub const MAX_NEIGHBORS: usize = 3;

    pub(crate) fn new(points: [Vec2; 3]) -> Self {
        Self {
            points,
            centroid: points.centroid(),
            neighbors: Vec::with_capacity(Self::MAX_NEIGHBORS),
        }
    }

    /// The boundary points of the cell, in the winding of the source triangle.
    #[inline]
    pub fn points(&self) -> &[Vec2; 3] {
        &self.points
    }

    /// The average of the boundary points.
    #[inline]
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// The adjacent cells and the portal shared with each of them.
    #[inline]
    pub fn neighbors(&self) -> &[(CellId, Portal)] {
        &self.neighbors
    }

    /// The portal shared with `other`, if the two cells are adjacent.
    pub fn portal_to(&self, other: CellId) -> Option<&Portal> {
        self.neighbors
            .iter()
            .find_map(|(id, portal)| (*id == other).then_some(portal))
    }

    /// Whether `point` lies inside the cell.
    ///
    /// Uses the barycentric test anchored at the first boundary point: points on the two edges
    /// through that point count as inside, points on the opposite edge do not.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.points.contains_point(point)
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.neighbors.len() >= Self::MAX_NEIGHBORS
    }

    /// The portal between `self` and `other`, which exists iff they share exactly two points.
    pub(crate) fn shared_portal(&self, other: &Cell) -> Option<Portal> {
        let mut shared = self.points.iter().filter(|p| other.points.contains(*p));
        let (Some(a), Some(b), None) = (shared.next(), shared.next(), shared.next()) else {
            return None;
        };
        Some(Portal::new(*a, *b))
    }

    /// The boundary point that is not an endpoint of `portal`.
    pub(crate) fn vertex_opposite(&self, portal: &Portal) -> Vec2 {
        self.points
            .iter()
            .copied()
            .find(|p| !portal.contains(*p))
            .unwrap_or(self.centroid)
    }
}

/// A graph of walkable cells, built once per mesh by a [`GraphBuilder`](crate::GraphBuilder).
///
/// While the graph is being built it is not ready, and every query treats it as empty.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavGraph {
    cells: SlotMap<CellId, Cell>,
    ready: bool,
}

impl PartialEq for NavGraph {
    /// Graphs are equal when they are equally ready and have the same cells under the same ids.
    fn eq(&self, other: &Self) -> bool {
        self.ready == other.ready && self.cells.iter().eq(other.cells.iter())
    }
}

impl NavGraph {
    /// Whether construction has finished. Queries on a graph that is not ready return nothing.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Iterates over all cells. Yields nothing while the graph is not ready.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> + '_ {
        self.ready.then(|| self.cells.iter()).into_iter().flatten()
    }

    /// The cell with the given id. `None` if it doesn't exist or the graph is not ready.
    #[inline]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        if !self.ready {
            return None;
        }
        self.cells.get(id)
    }

    /// Number of cells. `0` while the graph is not ready.
    pub fn cell_count(&self) -> usize {
        if self.ready { self.cells.len() } else { 0 }
    }

    /// Iterates over every portal once, together with the two cells it connects.
    pub fn portals(&self) -> impl Iterator<Item = (CellId, CellId, &Portal)> + '_ {
        self.cells().flat_map(|(id, cell)| {
            cell.neighbors
                .iter()
                .filter(move |(other, _)| id < *other)
                .map(move |(other, portal)| (id, *other, portal))
        })
    }

    pub(crate) fn raw_cells(&self) -> &SlotMap<CellId, Cell> {
        &self.cells
    }

    pub(crate) fn insert_cell(&mut self, cell: Cell) -> CellId {
        self.cells.insert(cell)
    }

    /// Links two cells symmetrically through `portal`.
    pub(crate) fn link(&mut self, a: CellId, b: CellId, portal: Portal) {
        if let Some(cell) = self.cells.get_mut(a) {
            cell.neighbors.push((b, portal));
        }
        if let Some(cell) = self.cells.get_mut(b) {
            cell.neighbors.push((a, portal));
        }
    }

    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }
}
