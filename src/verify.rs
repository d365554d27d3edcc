//! Hull verification.
//!
//! `Verifier::check` is an independent re-derivation of convexity and
//! containment from the output alone; it never touches the builder's mesh,
//! so it can catch defects the builder itself would be blind to.

use std::collections::HashMap;

use crate::builder::BuildResult;
use crate::vector::{triangle_normal, Point3D};

struct PlaneFace {
    normal: Point3D,
    offset: f64,
    centroid: Point3D,
}

/// Verifies a built hull against the points it was constructed from.
pub struct Verifier;

impl Verifier {
    /// Checks `result` for:
    /// - manifold closure: every directed boundary edge has exactly one
    ///   reverse counterpart among the other faces, and no two faces share
    ///   the same directed edge,
    /// - P3 convexity: every face's plane has every other vertex on or
    ///   behind it (within `tolerance`),
    /// - P4 containment: every input point lies on or behind every face
    ///   plane (within `10 * tolerance`),
    /// - P5 non-redundancy: no face has two consecutive edges whose reverse
    ///   counterparts are both owned by the same opposite face.
    ///
    /// `tolerance` defaults to `result.distance_tolerance` if `None`.
    /// Diagnostic lines are pushed to `sink` as they're found; returns
    /// `true` iff no diagnostics were emitted.
    pub fn check(
        result: &BuildResult,
        points: &[Point3D],
        tolerance: Option<f64>,
        mut sink: impl FnMut(String),
    ) -> bool {
        let tol = tolerance.unwrap_or(result.distance_tolerance);
        let mut ok = true;

        if result.polygons.is_empty() {
            sink("hull has no faces".to_string());
            return false;
        }

        let mut planes = Vec::with_capacity(result.polygons.len());
        for (fi, poly) in result.polygons.iter().enumerate() {
            if poly.len() < 3 {
                sink(format!("face {fi} has fewer than 3 vertices"));
                ok = false;
                planes.push(None);
                continue;
            }
            let pts: Vec<Point3D> = poly.iter().map(|&i| result.vertices[i]).collect();
            let centroid = pts.iter().fold(Point3D::ZERO, |a, &b| a + b) / pts.len() as f64;
            let mut raw = Point3D::ZERO;
            for i in 0..pts.len() {
                raw += (pts[i] - centroid).cross(pts[(i + 1) % pts.len()] - centroid);
            }
            if raw.length_squared() == 0.0 {
                raw = triangle_normal([pts[0], pts[1], pts[2]]);
            }
            let normal = raw.normalize();
            let offset = normal.dot(centroid);
            planes.push(Some(PlaneFace {
                normal,
                offset,
                centroid,
            }));
        }

        // manifold closure: every directed edge must have exactly one
        // reverse counterpart, and no two faces may share the same directed
        // edge.
        let mut edge_owner: HashMap<(usize, usize), usize> = HashMap::new();
        for (fi, poly) in result.polygons.iter().enumerate() {
            let n = poly.len();
            for k in 0..n {
                let a = poly[k];
                let b = poly[(k + 1) % n];
                if let Some(&prev_fi) = edge_owner.get(&(a, b)) {
                    sink(format!(
                        "duplicate directed edge ({a}, {b}) on faces {prev_fi} and {fi}"
                    ));
                    ok = false;
                }
                edge_owner.insert((a, b), fi);
            }
        }
        for (&(a, b), &fi) in &edge_owner {
            if !edge_owner.contains_key(&(b, a)) {
                sink(format!("edge ({a}, {b}) on face {fi} has no reverse"));
                ok = false;
            }
        }

        // P5: no face may have two consecutive edges (a,b), (b,c) whose
        // reverses (b,a) and (c,b) are owned by the same opposite face,
        // which would make `b` a redundant vertex.
        for (fi, poly) in result.polygons.iter().enumerate() {
            let n = poly.len();
            if n < 3 {
                continue;
            }
            for k in 0..n {
                let a = poly[k];
                let b = poly[(k + 1) % n];
                let c = poly[(k + 2) % n];
                let owner_ab = edge_owner.get(&(b, a));
                let owner_bc = edge_owner.get(&(c, b));
                if let (Some(&oa), Some(&ob)) = (owner_ab, owner_bc) {
                    if oa == ob {
                        sink(format!(
                            "face {fi} has a redundant vertex {b} (both neighboring edges opposite face {oa})"
                        ));
                        ok = false;
                    }
                }
            }
        }

        // P3: convexity between adjacent faces via shared plane/centroid.
        for (fi, plane) in planes.iter().enumerate() {
            let Some(plane) = plane else { continue };
            for (fj, other) in planes.iter().enumerate() {
                if fi == fj {
                    continue;
                }
                let Some(other) = other else { continue };
                let d = plane.normal.dot(other.centroid) - plane.offset;
                if d > tol {
                    sink(format!(
                        "face {fi} is non-convex with respect to face {fj} (centroid distance {d})"
                    ));
                    ok = false;
                }
            }
        }

        // P4: containment of every input point.
        let contain_tol = 10.0 * tol;
        for plane in planes.iter().flatten() {
            for (pi, p) in points.iter().enumerate() {
                let d = plane.normal.dot(*p) - plane.offset;
                if d > contain_tol {
                    sink(format!("input point {pi} lies outside the hull by {d}"));
                    ok = false;
                }
            }
        }

        ok
    }
}
