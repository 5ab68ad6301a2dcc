//! Planar geometry helpers shared by every stage of the pipeline.
//!
//! Navigation happens on the xz-plane. Heights are dropped on the way in and
//! it is up to the caller to put them back (usually with a downward raycast).

use glam::{UVec3, Vec2, Vec3, Vec3A};

/// Squared distance under which two points are treated as the same point by the funnel.
pub(crate) const POINT_EPSILON_SQ: f32 = 1.0e-5;

/// Projects a 3D point onto the navigation plane by dropping its height.
#[inline]
pub fn project(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// 2D cross product of `a` and `b`, the sign of the angle from `a` to `b`.
///
/// Positive when `b` is counter-clockwise from `a`, negative when clockwise and zero when they are colinear.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Total length of a polyline.
pub fn path_length(path: &[Vec2]) -> f32 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[inline]
pub(crate) fn approx_eq(a: Vec2, b: Vec2) -> bool {
    a.distance_squared(b) < POINT_EPSILON_SQ
}

pub(crate) trait TriangleIndices {
    fn max_index(&self) -> u32;
    fn vertices(&self, vertices: &[Vec3A]) -> [Vec3A; 3];
}

impl TriangleIndices for UVec3 {
    #[inline]
    fn max_index(&self) -> u32 {
        self.max_element()
    }

    #[inline]
    fn vertices(&self, vertices: &[Vec3A]) -> [Vec3A; 3] {
        [
            vertices[self[0] as usize],
            vertices[self[1] as usize],
            vertices[self[2] as usize],
        ]
    }
}

pub(crate) trait TrianglePoints {
    /// Twice the signed area.
    fn area2(&self) -> f32;
    fn centroid(&self) -> Vec2;
    /// Points coincide or are colinear.
    fn is_degenerate(&self) -> bool;
    /// Barycentric containment with the first point as origin.
    fn contains_point(&self, point: Vec2) -> bool;
}

impl TrianglePoints for [Vec2; 3] {
    #[inline]
    fn area2(&self) -> f32 {
        cross(self[1] - self[0], self[2] - self[0])
    }

    #[inline]
    fn centroid(&self) -> Vec2 {
        (self[0] + self[1] + self[2]) / 3.0
    }

    fn is_degenerate(&self) -> bool {
        self[0] == self[1] || self[1] == self[2] || self[0] == self[2] || self.area2() == 0.0
    }

    fn contains_point(&self, point: Vec2) -> bool {
        let edge1 = self[1] - self[0];
        let edge2 = self[2] - self[0];
        let det = cross(edge1, edge2);
        if det == 0.0 || !det.is_finite() {
            return false;
        }
        let offset = point - self[0];
        let u = cross(offset, edge2) / det;
        let v = cross(edge1, offset) / det;
        u >= 0.0 && v >= 0.0 && u + v < 1.0
    }
}
