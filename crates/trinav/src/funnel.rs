//! String pulling through the portals of a rough path.
//!
//! The funnel is an apex with a left and a right bound. Each portal either narrows a bound or,
//! when it would cross the opposite bound, turns that opposite bound into a new apex. Every apex
//! is a corner of the final path.
//!
//! Consecutive portals very often share an endpoint, and the taut path often runs exactly along a
//! portal endpoint. An exactly-zero angle therefore narrows the bound and never moves the apex.

use glam::Vec2;

use crate::{
    math::{approx_eq, cross},
    search::PathStep,
};

/// A portal split into its left and right endpoint relative to the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Gate {
    left: Vec2,
    right: Vec2,
}

impl Gate {
    fn point(point: Vec2) -> Self {
        Self {
            left: point,
            right: point,
        }
    }

    fn from_step(step: &PathStep) -> Self {
        let [a, b] = step.portal.points();
        // The cell being left lies behind the portal. Seen from there, `b` is on the left iff
        // `behind` is counter-clockwise of a->b.
        if cross(b - a, step.behind - a) > 0.0 {
            Self { left: b, right: a }
        } else {
            Self { left: a, right: b }
        }
    }
}

/// Turns the rough path found by [`search`](crate::search::search) into the shortest polyline
/// through its portals.
///
/// The result starts with `start`, ends with `end`, and every point in between is a portal
/// endpoint where the path turns.
pub fn smooth(start: Vec2, end: Vec2, rough: &[PathStep]) -> Vec<Vec2> {
    let gates: Vec<Gate> = std::iter::once(Gate::point(start))
        .chain(rough.iter().map(Gate::from_step))
        .chain(std::iter::once(Gate::point(end)))
        .collect();

    let mut path = vec![start];
    let mut apex = start;
    let mut left = start;
    let mut right = start;
    let mut left_index = 0;
    let mut right_index = 0;

    let mut i = 1;
    while i < gates.len() {
        let gate = gates[i];

        // Right bound.
        if cross(right - apex, gate.right - apex) >= 0.0 {
            if approx_eq(apex, right) || cross(left - apex, gate.right - apex) <= 0.0 {
                right = gate.right;
                right_index = i;
            } else {
                // Crossed over the left bound, which becomes the new apex.
                apex = left;
                push_corner(&mut path, apex);
                right = apex;
                right_index = left_index;
                i = left_index + 1;
                continue;
            }
        }

        // Left bound.
        if cross(left - apex, gate.left - apex) <= 0.0 {
            if approx_eq(apex, left) || cross(right - apex, gate.left - apex) >= 0.0 {
                left = gate.left;
                left_index = i;
            } else {
                // Crossed over the right bound, which becomes the new apex.
                apex = right;
                push_corner(&mut path, apex);
                left = apex;
                left_index = right_index;
                i = right_index + 1;
                continue;
            }
        }

        i += 1;
    }

    push_corner(&mut path, end);
    path
}

fn push_corner(path: &mut Vec<Vec2>, point: Vec2) {
    if path.last().is_none_or(|last| *last != point) {
        path.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CellId, Portal};

    fn step(a: [f32; 2], b: [f32; 2], behind: [f32; 2]) -> PathStep {
        PathStep {
            cell: CellId::default(),
            point: Vec2::ZERO,
            portal: Portal::new(Vec2::from_array(a), Vec2::from_array(b)),
            behind: Vec2::from_array(behind),
        }
    }

    #[test]
    fn no_portals_is_a_straight_line() {
        let path = smooth(Vec2::ZERO, Vec2::ONE, &[]);
        assert_eq!(path, vec![Vec2::ZERO, Vec2::ONE]);
    }

    #[test]
    fn straight_corridor_has_no_corners() {
        let rough = [
            step([1.0, -1.0], [1.0, 1.0], [0.0, -1.0]),
            step([2.0, 1.0], [2.0, -1.0], [1.0, -1.0]),
        ];
        let path = smooth(Vec2::ZERO, Vec2::new(3.0, 0.0), &rough);
        assert_eq!(path, vec![Vec2::ZERO, Vec2::new(3.0, 0.0)]);
    }

    #[test]
    fn bends_around_reflex_corner() {
        let start = Vec2::new(0.5, 0.1);
        let end = Vec2::new(0.5, 3.0);
        let rough = [step([4.0, 0.0], [1.0, 1.0], [0.0, 0.0])];
        assert_eq!(smooth(start, end, &rough), vec![start, Vec2::ONE, end]);
    }

    #[test]
    fn portal_point_order_does_not_matter() {
        let start = Vec2::new(0.5, 0.1);
        let end = Vec2::new(0.5, 3.0);
        let forward = smooth(start, end, &[step([4.0, 0.0], [1.0, 1.0], [0.0, 0.0])]);
        let reversed = smooth(start, end, &[step([1.0, 1.0], [4.0, 0.0], [0.0, 0.0])]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn zero_angle_narrows_without_new_corner() {
        // The right endpoint of the second portal lies exactly on the left bound.
        let rough = [
            step([1.0, 1.0], [1.0, -1.0], [-1.0, 0.0]),
            step([2.0, 3.0], [2.0, 2.0], [1.0, 1.0]),
        ];
        let end = Vec2::splat(3.0);
        assert_eq!(smooth(Vec2::ZERO, end, &rough), vec![Vec2::ZERO, end]);
    }

    #[test]
    fn end_on_portal_endpoint_is_not_duplicated() {
        let start = Vec2::new(0.5, 0.1);
        let rough = [step([4.0, 0.0], [1.0, 1.0], [0.0, 0.0])];
        assert_eq!(smooth(start, Vec2::ONE, &rough), vec![start, Vec2::ONE]);
    }

    #[test]
    fn gates_are_oriented_by_the_cell_left_behind() {
        // Travelling upwards: the left endpoint has the smaller x.
        let gate = Gate::from_step(&step([4.0, 0.0], [1.0, 1.0], [0.0, 0.0]));
        assert_eq!(gate.left, Vec2::ONE);
        assert_eq!(gate.right, Vec2::new(4.0, 0.0));
        // Travelling downwards through the same portal swaps them.
        let gate = Gate::from_step(&step([4.0, 0.0], [1.0, 1.0], [0.0, 4.0]));
        assert_eq!(gate.left, Vec2::new(4.0, 0.0));
        assert_eq!(gate.right, Vec2::ONE);
    }
}
