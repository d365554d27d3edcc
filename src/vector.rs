//! Vector3/Point3D primitives (component 1).
//!
//! The mutable 3-vector primitive (add, sub, scale, dot, cross, length,
//! normalize) is `glam::DVec3` itself; there is nothing here beyond the
//! type alias and the one free function the half-edge/face code needs
//! that glam doesn't already provide as a method.

use glam::DVec3;

/// A point or free vector in three-space.
pub type Point3D = DVec3;

/// The (unnormalized) normal of the triangle `(a, b, c)`, oriented by the
/// right-hand rule; its length is twice the triangle's area.
pub fn triangle_normal([a, b, c]: [Point3D; 3]) -> Point3D {
    let ab = b - a;
    let ac = c - a;
    ab.cross(ac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_normal_matches_right_hand_rule() {
        let p1 = DVec3::new(-1.0, 0.0, 0.0);
        let p2 = DVec3::new(1.0, 0.0, 0.0);
        let p3 = DVec3::new(0.0, 1.0, 0.0);
        assert_eq!(triangle_normal([p1, p2, p3]), DVec3::new(0.0, 0.0, 2.0));
    }
}
