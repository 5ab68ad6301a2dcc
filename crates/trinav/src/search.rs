//! A* search over the cells of a [`NavGraph`].
//!
//! Costs are Euclidean distances between the representative points of consecutive cells: the
//! start point for the start cell, the end point for the end cell and the centroid for everything
//! in between. The heuristic is the straight-line distance to the end point, which is consistent
//! for these costs, so a closed cell never has to be reopened.
//!
//! The frontier is a `BinaryHeap` without decrease-key. A cheaper route pushes a fresh entry and
//! the outdated one is skipped when it surfaces.

use std::{cmp::Ordering, collections::BinaryHeap};

use glam::Vec2;
use slotmap::SecondaryMap;

use crate::graph::{CellId, NavGraph, Portal};

/// Bookkeeping for one cell during a single search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    /// The cell this node stands for.
    pub cell: CellId,
    /// The point used for distance accounting inside the cell.
    pub point: Vec2,
    /// Cost of the cheapest known route from the start.
    pub g: f32,
    /// Estimated remaining cost to the end point.
    pub h: f32,
    /// The cell this node was reached from. `None` for the start node.
    pub parent: Option<CellId>,
    /// The portal crossed to get here from `parent`.
    pub portal: Option<Portal>,
    /// Closed nodes have their final cost.
    pub closed: bool,
}

impl SearchNode {
    /// Total priority, `g + h`.
    #[inline]
    pub fn f(&self) -> f32 {
        self.g + self.h
    }
}

/// One cell of a rough path, as found by [`search`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    /// The cell entered by this step.
    pub cell: CellId,
    /// The representative point of the cell: its centroid, or the end point for the last step.
    pub point: Vec2,
    /// The portal crossed to enter the cell.
    pub portal: Portal,
    /// The vertex of the cell left behind that is not on `portal`.
    ///
    /// The cell left behind lies entirely on this side of the portal, which tells the smoother
    /// which portal endpoint is on the left.
    pub behind: Vec2,
}

struct OpenEntry {
    cell: CellId,
    f: f32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: the smallest f, then the oldest cell, is the greatest.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

/// Finds the cheapest chain of cells from `start_cell` to `end_cell`.
///
/// The result excludes the start cell and ends with `end_cell`. It is empty when the cells are
/// the same, when no route connects them or when the graph is not ready.
pub fn search(
    graph: &NavGraph,
    start_cell: CellId,
    end_cell: CellId,
    start_point: Vec2,
    end_point: Vec2,
) -> Vec<PathStep> {
    if start_cell == end_cell || graph.cell(start_cell).is_none() || graph.cell(end_cell).is_none()
    {
        return Vec::new();
    }

    let mut nodes: SecondaryMap<CellId, SearchNode> = SecondaryMap::new();
    let mut open = BinaryHeap::new();

    let start = SearchNode {
        cell: start_cell,
        point: start_point,
        g: 0.0,
        h: start_point.distance(end_point),
        parent: None,
        portal: None,
        closed: false,
    };
    open.push(OpenEntry {
        cell: start_cell,
        f: start.f(),
    });
    nodes.insert(start_cell, start);

    while let Some(entry) = open.pop() {
        let Some(current) = nodes.get_mut(entry.cell) else {
            continue;
        };
        if current.closed || entry.f > current.f() {
            // Superseded by a cheaper route.
            continue;
        }
        current.closed = true;
        if entry.cell == end_cell {
            return reconstruct(graph, &nodes, end_cell);
        }
        let (current_point, current_g) = (current.point, current.g);

        let Some(cell) = graph.cell(entry.cell) else {
            continue;
        };
        for (neighbor, portal) in cell.neighbors() {
            let point = if *neighbor == end_cell {
                end_point
            } else {
                match graph.cell(*neighbor) {
                    Some(neighbor_cell) => neighbor_cell.centroid(),
                    None => continue,
                }
            };
            let g = current_g + current_point.distance(point);

            match nodes.get_mut(*neighbor) {
                Some(node) if node.closed => {}
                Some(node) => {
                    if g < node.g {
                        node.g = g;
                        node.parent = Some(entry.cell);
                        node.portal = Some(*portal);
                        open.push(OpenEntry {
                            cell: *neighbor,
                            f: node.f(),
                        });
                    }
                }
                None => {
                    let node = SearchNode {
                        cell: *neighbor,
                        point,
                        g,
                        h: point.distance(end_point),
                        parent: Some(entry.cell),
                        portal: Some(*portal),
                        closed: false,
                    };
                    open.push(OpenEntry {
                        cell: *neighbor,
                        f: node.f(),
                    });
                    nodes.insert(*neighbor, node);
                }
            }
        }
    }

    Vec::new()
}

/// Walks the predecessor links back from `end_cell`, leaving out the start node.
fn reconstruct(
    graph: &NavGraph,
    nodes: &SecondaryMap<CellId, SearchNode>,
    end_cell: CellId,
) -> Vec<PathStep> {
    let mut steps = Vec::new();
    let mut current = nodes.get(end_cell);
    while let Some(node) = current {
        let (Some(parent), Some(portal)) = (node.parent, node.portal) else {
            break;
        };
        let Some(parent_cell) = graph.cell(parent) else {
            break;
        };
        steps.push(PathStep {
            cell: node.cell,
            point: node.point,
            portal,
            behind: parent_cell.vertex_opposite(&portal),
        });
        current = nodes.get(parent);
    }
    steps.reverse();
    steps
}
