//! Face algebra.
//!
//! Plane computation (with the robust-normal fallback for near-degenerate
//! faces), adjacent-face merging with redundant-edge elimination, and the
//! half-edge consistency check.

use crate::conflict::{self, VertexList};
use crate::error::HullError;
use crate::mesh::{FaceId, FaceMark, HalfEdgeId, Mesh};
use crate::vector::Point3D;

/// Recomputes `face`'s normal, centroid, plane offset, area and vertex
/// count from its current boundary. `min_area` is `0.0` for the initial
/// tetrahedron and for every subsequent recompute too (the "plain form"):
/// the robust-normal fallback only ever fires for a face with exactly zero
/// area.
pub fn update_plane(mesh: &mut Mesh, face: FaceId, min_area: f64) {
    let edges = mesh.boundary_edges(face);
    let pts: Vec<Point3D> = edges
        .iter()
        .map(|&e| mesh.vertex(mesh.he(e).vertex).point)
        .collect();
    let n = pts.len();
    let centroid = pts.iter().fold(Point3D::ZERO, |a, &b| a + b) / n as f64;

    let mut raw_normal = Point3D::ZERO;
    for i in 0..n {
        let a = pts[i] - centroid;
        let b = pts[(i + 1) % n] - centroid;
        raw_normal += a.cross(b);
    }
    let area = raw_normal.length() * 0.5;

    let normal = if area > min_area {
        raw_normal.normalize()
    } else {
        robust_normal(&pts, raw_normal)
    };

    let f = mesh.face_mut(face);
    f.normal = normal;
    f.centroid = centroid;
    f.plane_offset = normal.dot(centroid);
    f.area = area;
    f.count = n;
}

/// Stabilizes the plane of a near-degenerate face by projecting the
/// candidate normal onto the subspace orthogonal to the face's longest
/// edge, then renormalizing.
fn robust_normal(pts: &[Point3D], candidate: Point3D) -> Point3D {
    let n = pts.len();
    let mut longest = Point3D::ZERO;
    let mut max_len2 = -1.0;
    for i in 0..n {
        let e = pts[(i + 1) % n] - pts[i];
        let l2 = e.length_squared();
        if l2 > max_len2 {
            max_len2 = l2;
            longest = e;
        }
    }
    if max_len2 <= 0.0 {
        return Point3D::Z;
    }
    let unit = longest.normalize();
    let mut projected = candidate - unit * candidate.dot(unit);
    if projected.length_squared() == 0.0 {
        projected = unit.cross(Point3D::X);
        if projected.length_squared() == 0.0 {
            projected = unit.cross(Point3D::Y);
        }
    }
    projected.normalize()
}

/// Moves the whole of `face`'s claimed run out of `claimed`, returning its
/// head so the caller can fold it into `unclaimed` or reassign it.
fn take_conflict_run(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    face: FaceId,
    runs: &mut Vec<crate::mesh::VertexId>,
) {
    if let Some(run) = conflict::remove_all_points_from_face(mesh, claimed, face) {
        runs.push(run);
    }
}

/// Absorbs the face across `edge_ab` (on `face_a`) into `face_a`.
///
/// Walks past any run of multiple consecutive shared edges, reassigns the
/// absorbed face's non-shared edges to `face_a`, stitches the two
/// junctions (possibly collapsing a further redundant face), recomputes
/// `face_a`'s plane, and reassigns every orphaned conflict vertex to
/// `face_a` or to `unclaimed`.
pub fn merge_across(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    unclaimed: &mut VertexList,
    face_a: FaceId,
    edge_ab: HalfEdgeId,
    tolerance: f64,
) -> Result<(), HullError> {
    let face_b = mesh.opposite_face(edge_ab);
    mesh.face_mut(face_b).mark = FaceMark::Deleted;

    let mut runs = Vec::new();
    take_conflict_run(mesh, claimed, face_b, &mut runs);

    let hedge_opp0 = mesh
        .he(edge_ab)
        .opposite
        .ok_or(HullError::Internal("shared edge missing opposite"))?;

    let mut hedge_adj_prev = mesh
        .he(edge_ab)
        .prev
        .ok_or(HullError::Internal("edge missing prev"))?;
    let mut hedge_adj_next = mesh
        .he(edge_ab)
        .next
        .ok_or(HullError::Internal("edge missing next"))?;
    let mut hedge_opp_prev = mesh
        .he(hedge_opp0)
        .prev
        .ok_or(HullError::Internal("edge missing prev"))?;
    let mut hedge_opp_next = mesh
        .he(hedge_opp0)
        .next
        .ok_or(HullError::Internal("edge missing next"))?;

    while mesh.opposite_face(hedge_adj_prev) == face_b {
        hedge_adj_prev = mesh
            .he(hedge_adj_prev)
            .prev
            .ok_or(HullError::Internal("edge missing prev"))?;
        hedge_opp_next = mesh
            .he(hedge_opp_next)
            .next
            .ok_or(HullError::Internal("edge missing next"))?;
    }
    while mesh.opposite_face(hedge_adj_next) == face_b {
        hedge_opp_prev = mesh
            .he(hedge_opp_prev)
            .prev
            .ok_or(HullError::Internal("edge missing prev"))?;
        hedge_adj_next = mesh
            .he(hedge_adj_next)
            .next
            .ok_or(HullError::Internal("edge missing next"))?;
    }

    // reassign the non-shared portion of B's ring to A
    let mut h = hedge_opp_next;
    loop {
        mesh.he_mut(h).face = face_a;
        if h == hedge_opp_prev {
            break;
        }
        h = mesh
            .he(h)
            .next
            .ok_or(HullError::Internal("edge missing next"))?;
    }

    if mesh.face(face_a).first_edge == Some(edge_ab) {
        mesh.face_mut(face_a).first_edge = Some(hedge_adj_next);
    }

    if let Some(d) = connect_half_edges(mesh, hedge_opp_prev, hedge_adj_next, face_a)? {
        take_conflict_run(mesh, claimed, d, &mut runs);
    }
    if let Some(d) = connect_half_edges(mesh, hedge_adj_prev, hedge_opp_next, face_a)? {
        take_conflict_run(mesh, claimed, d, &mut runs);
    }

    update_plane(mesh, face_a, 0.0);
    check_consistency(mesh, face_a)?;

    for run_head in runs {
        let mut v = Some(run_head);
        while let Some(vid) = v {
            let next = mesh.vertex(vid).next;
            let point = mesh.vertex(vid).point;
            let d = mesh.face(face_a).distance_to_plane(point);
            if d > tolerance {
                conflict::add_point_to_face(mesh, claimed, vid, face_a);
            } else {
                unclaimed.add(mesh, vid);
            }
            v = next;
        }
    }

    Ok(())
}

/// Joins `hedge_prev.next = hedge` on `face_a`'s ring. If the two edges'
/// opposite faces coincide, the shared vertex between them is redundant
/// (a redundant vertex): the opposite face's matching edge pair collapses,
/// discarding the opposite face entirely if it was a triangle, or just
/// shrinking it otherwise. Returns the discarded face, if any.
fn connect_half_edges(
    mesh: &mut Mesh,
    hedge_prev: HalfEdgeId,
    hedge: HalfEdgeId,
    face_a: FaceId,
) -> Result<Option<FaceId>, HullError> {
    let prev_opp_face = mesh.opposite_face(hedge_prev);
    let this_opp_face = mesh.opposite_face(hedge);

    if prev_opp_face != this_opp_face {
        mesh.he_mut(hedge_prev).next = Some(hedge);
        mesh.he_mut(hedge).prev = Some(hedge_prev);
        return Ok(None);
    }

    let opp_face = this_opp_face;
    if mesh.face(face_a).first_edge == Some(hedge_prev) {
        mesh.face_mut(face_a).first_edge = Some(hedge);
    }

    let hedge_self_opp = mesh
        .he(hedge)
        .opposite
        .ok_or(HullError::Internal("edge missing opposite"))?;

    let discarded = if mesh.face(opp_face).count == 3 {
        let prev_of_opp = mesh
            .he(hedge_self_opp)
            .prev
            .ok_or(HullError::Internal("edge missing prev"))?;
        let new_opp = mesh
            .he(prev_of_opp)
            .opposite
            .ok_or(HullError::Internal("edge missing opposite"))?;
        mesh.face_mut(opp_face).mark = FaceMark::Deleted;
        mesh.he_mut(hedge).opposite = Some(new_opp);
        mesh.he_mut(new_opp).opposite = Some(hedge);
        Some(opp_face)
    } else {
        let opp_next = mesh
            .he(hedge_self_opp)
            .next
            .ok_or(HullError::Internal("edge missing next"))?;
        let before = mesh
            .he(opp_next)
            .prev
            .ok_or(HullError::Internal("edge missing prev"))?;
        if mesh.face(opp_face).first_edge == Some(before) {
            mesh.face_mut(opp_face).first_edge = Some(opp_next);
        }
        let before_before = mesh
            .he(before)
            .prev
            .ok_or(HullError::Internal("edge missing prev"))?;
        mesh.he_mut(opp_next).prev = Some(before_before);
        mesh.he_mut(before_before).next = Some(opp_next);

        mesh.he_mut(hedge).opposite = Some(opp_next);
        mesh.he_mut(opp_next).opposite = Some(hedge);
        mesh.face_mut(opp_face).count -= 1;
        None
    };

    let prev_prev = mesh
        .he(hedge_prev)
        .prev
        .ok_or(HullError::Internal("edge missing prev"))?;
    mesh.he_mut(hedge).prev = Some(prev_prev);
    mesh.he_mut(prev_prev).next = Some(hedge);

    if discarded.is_none() {
        update_plane(mesh, opp_face, 0.0);
    }

    Ok(discarded)
}

/// Checks the half-edge invariants for one live face: every edge has
/// an opposite that is an involution connecting the correct vertex pair,
/// the vertex count matches the boundary walk, and no boundary neighbor is
/// deleted.
pub fn check_consistency(mesh: &Mesh, face: FaceId) -> Result<(), HullError> {
    let f = mesh.face(face);
    if f.mark != FaceMark::Visible {
        return Ok(());
    }

    let edges = mesh.boundary_edges(face);
    if edges.len() < 3 {
        return Err(HullError::Internal("face has fewer than 3 vertices"));
    }
    if edges.len() != f.count {
        return Err(HullError::Internal("face vertex count mismatch"));
    }

    for &e in &edges {
        let he = mesh.he(e);
        let opp = he
            .opposite
            .ok_or(HullError::Internal("half-edge missing opposite"))?;
        let opp_he = mesh.he(opp);
        if opp_he.opposite != Some(e) {
            return Err(HullError::Internal("opposite is not an involution"));
        }
        if mesh.tail(opp) != he.vertex || opp_he.vertex != mesh.tail(e) {
            return Err(HullError::Internal("opposite edge endpoints mismatch"));
        }
        if mesh.face(opp_he.face).mark == FaceMark::Deleted {
            return Err(HullError::Internal("boundary neighbor is deleted"));
        }
    }

    Ok(())
}
