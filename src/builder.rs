//! The hull builder (component 5): tolerance estimation, initial simplex,
//! main loop (eye selection, horizon, new-face fan, merge passes, orphan
//! reassignment), and output extraction.

use std::collections::HashSet;

use crate::conflict::{self, VertexList};
use crate::error::{DegenerateInput, HullError};
use crate::face_ops;
use crate::mesh::{FaceId, FaceMark, HalfEdgeId, Mesh, VertexId};
use crate::tolerance::{self, axis_extremes};
use crate::vector::{triangle_normal, Point3D};

/// The result of a successful build: the hull's vertices (a subset of the
/// input, compacted and re-indexed), its faces as counter-clockwise vertex
/// index lists around the outward normal, and the tolerance used throughout
/// construction.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The hull's vertices, compacted and re-indexed from the input.
    pub vertices: Vec<Point3D>,
    /// One entry per face: vertex indices into `vertices`, counter-clockwise
    /// around the outward normal.
    pub polygons: Vec<Vec<usize>>,
    /// The §4.1 tolerance used throughout construction.
    pub distance_tolerance: f64,
}

/// The incremental QuickHull builder. Stateless; `build` owns a fresh mesh
/// and conflict list for the duration of one call. A builder instance must
/// not be shared between threads mid-build, but independent builds may run
/// concurrently on disjoint inputs.
pub struct HullBuilder;

impl HullBuilder {
    /// Builds the convex hull of `points`.
    ///
    /// `max_iter`, if given, truncates the main loop after that many eye
    /// points have been absorbed, leaving a (non-convex, partially built)
    /// mesh extracted as-is, a debugging/benchmarking knob.
    ///
    /// # Errors
    /// Returns [`HullError::TooFewPoints`] for fewer than four points,
    /// [`HullError::Input`] if the points are coincident, colinear or
    /// coplanar, and [`HullError::Internal`] if a topological invariant is
    /// violated mid-build (never expected on well-formed input).
    pub fn build(points: &[Point3D], max_iter: Option<usize>) -> Result<BuildResult, HullError> {
        if points.len() < 4 {
            return Err(HullError::TooFewPoints);
        }

        let tolerance = tolerance::compute_tolerance(points);

        let mut mesh = Mesh::new();
        for (i, p) in points.iter().enumerate() {
            mesh.add_vertex(*p, i as i64);
        }

        let idx = pick_initial_four(points, tolerance)?;
        let faces = build_initial_simplex(&mut mesh, points, idx)?;

        let mut claimed = VertexList::new();
        assign_initial_points(&mut mesh, &mut claimed, points, &idx, &faces, tolerance);

        let mut num_iter = 0usize;
        loop {
            if let Some(max) = max_iter {
                if num_iter >= max {
                    break;
                }
            }
            let Some(eye) = next_point_to_add(&mesh, &claimed) else {
                break;
            };
            add_vertex_to_hull(&mut mesh, &mut claimed, eye, tolerance)?;
            num_iter += 1;
        }

        Ok(extract_result(&mut mesh, points, tolerance))
    }
}

/// Picks the four starting vertices and fails with the
/// appropriate degeneracy diagnostic if they're too close to coincident,
/// colinear or coplanar. The `tolerance` vs `100 * tolerance` asymmetry
/// between the coincident test and the colinear/coplanar tests is
/// intentional and must not be "fixed".
fn pick_initial_four(points: &[Point3D], tolerance: f64) -> Result<[usize; 4], HullError> {
    let (min_idx, max_idx) = axis_extremes(points);

    let mut max_extent = 0.0;
    let mut axis = 0;
    for a in 0..3 {
        let extent = points[max_idx[a]][a] - points[min_idx[a]][a];
        if extent > max_extent {
            max_extent = extent;
            axis = a;
        }
    }
    if max_extent <= tolerance {
        return Err(HullError::Input(DegenerateInput::Coincident));
    }

    let i0 = max_idx[axis];
    let i1 = min_idx[axis];
    let unit01 = (points[i1] - points[i0]).normalize();

    let mut max_sq = 0.0;
    let mut i2 = 0usize;
    let mut normal = Point3D::ZERO;
    for (i, p) in points.iter().enumerate() {
        if i == i0 || i == i1 {
            continue;
        }
        let diff = *p - points[i0];
        let cross = unit01.cross(diff);
        let sq = cross.length_squared();
        if sq > max_sq {
            max_sq = sq;
            i2 = i;
            normal = cross;
        }
    }
    if max_sq.sqrt() <= 100.0 * tolerance {
        return Err(HullError::Input(DegenerateInput::Colinear));
    }

    normal = normal.normalize();
    normal = (normal - normal.dot(unit01) * unit01).normalize();

    let d0 = points[i2].dot(normal);
    let mut max_dist = 0.0;
    let mut i3 = 0usize;
    for (i, p) in points.iter().enumerate() {
        if i == i0 || i == i1 || i == i2 {
            continue;
        }
        let d = (p.dot(normal) - d0).abs();
        if d > max_dist {
            max_dist = d;
            i3 = i;
        }
    }
    if max_dist <= 100.0 * tolerance {
        return Err(HullError::Input(DegenerateInput::Coplanar));
    }

    Ok([i0, i1, i2, i3])
}

/// Builds the four triangular faces of the initial
/// tetrahedron, oriented outward, and stitches their six shared edges.
fn build_initial_simplex(
    mesh: &mut Mesh,
    points: &[Point3D],
    idx: [usize; 4],
) -> Result<[FaceId; 4], HullError> {
    let mut faces = [FaceId(0); 4];

    for k in 0..4 {
        let mut tri = [0usize; 3];
        let mut p = 0;
        for j in 0..4 {
            if j != k {
                tri[p] = idx[j];
                p += 1;
            }
        }
        let excluded = idx[k];
        let vids = [VertexId(tri[0]), VertexId(tri[1]), VertexId(tri[2])];
        let pts = [points[tri[0]], points[tri[1]], points[tri[2]]];

        let raw_normal = triangle_normal(pts);
        let unit_normal = raw_normal.normalize();
        let centroid = (pts[0] + pts[1] + pts[2]) / 3.0;
        let offset = unit_normal.dot(centroid);
        let dist = unit_normal.dot(points[excluded]) - offset;

        let (v0, v1, v2) = if dist > 0.0 {
            (vids[1], vids[0], vids[2])
        } else {
            (vids[0], vids[1], vids[2])
        };

        let (face_id, ..) = mesh.create_triangle(v0, v1, v2);
        face_ops::update_plane(mesh, face_id, 0.0);
        faces[k] = face_id;
    }

    stitch_tetrahedron(mesh, &faces)?;
    Ok(faces)
}

/// Pairs up the six shared edges among the four initial faces. Rather than
/// hand-deriving the pairing from the sign of a single dot product between
/// two symmetric stitching patterns, this matches edges directly by
/// endpoint, reaching the same end state (all six opposite pairs
/// established) more robustly.
fn stitch_tetrahedron(mesh: &mut Mesh, faces: &[FaceId; 4]) -> Result<(), HullError> {
    let edges: Vec<HalfEdgeId> = faces.iter().flat_map(|&f| mesh.boundary_edges(f)).collect();

    for i in 0..edges.len() {
        if mesh.he(edges[i]).opposite.is_some() {
            continue;
        }
        let (tail_i, head_i) = (mesh.tail(edges[i]), mesh.he(edges[i]).vertex);
        let mut found = false;
        for j in (i + 1)..edges.len() {
            if mesh.he(edges[j]).opposite.is_some() {
                continue;
            }
            let (tail_j, head_j) = (mesh.tail(edges[j]), mesh.he(edges[j]).vertex);
            if tail_j == head_i && head_j == tail_i {
                mesh.he_mut(edges[i]).opposite = Some(edges[j]);
                mesh.he_mut(edges[j]).opposite = Some(edges[i]);
                found = true;
                break;
            }
        }
        if !found {
            return Err(HullError::Internal(
                "initial tetrahedron edge missing opposite pairing",
            ));
        }
    }
    Ok(())
}

/// Assigns every point not among the initial four to the face
/// of greatest positive distance exceeding tolerance; points above no face
/// are discarded as interior.
fn assign_initial_points(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    points: &[Point3D],
    idx: &[usize; 4],
    faces: &[FaceId; 4],
    tolerance: f64,
) {
    let idx_set: HashSet<usize> = idx.iter().copied().collect();
    for i in 0..points.len() {
        if idx_set.contains(&i) {
            continue;
        }
        let p = points[i];
        let mut best_face = None;
        let mut best_d = tolerance;
        for &f in faces {
            let d = mesh.face(f).distance_to_plane(p);
            if d > best_d {
                best_d = d;
                best_face = Some(f);
            }
        }
        if let Some(f) = best_face {
            conflict::add_point_to_face(mesh, claimed, VertexId(i), f);
        }
    }
}

/// The vertex in the conflict list with the greatest distance to its
/// own assigned face, restricted to the run of the first non-empty face.
fn next_point_to_add(mesh: &Mesh, claimed: &VertexList) -> Option<VertexId> {
    let head = claimed.first()?;
    let face = mesh.vertex(head).face.expect("claimed vertex has no face");

    let mut best = head;
    let mut best_dist = mesh.face(face).distance_to_plane(mesh.vertex(head).point);

    let mut v = mesh.vertex(head).next;
    while let Some(vid) = v {
        if mesh.vertex(vid).face != Some(face) {
            break;
        }
        let d = mesh.face(face).distance_to_plane(mesh.vertex(vid).point);
        if d > best_dist {
            best_dist = d;
            best = vid;
        }
        v = mesh.vertex(vid).next;
    }
    Some(best)
}

/// Marks `face` deleted and moves its orphaned conflict-run vertices into
/// `unclaimed`, one at a time.
fn delete_face_points(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    unclaimed: &mut VertexList,
    face: FaceId,
) {
    if let Some(run_head) = conflict::remove_all_points_from_face(mesh, claimed, face) {
        let mut v = Some(run_head);
        while let Some(vid) = v {
            let next = mesh.vertex(vid).next;
            unclaimed.add(mesh, vid);
            v = next;
        }
    }
    mesh.face_mut(face).mark = FaceMark::Deleted;
}

/// One level of the horizon DFS's explicit work stack, converted from
/// recursion to an explicit stack so stack depth is bounded by heap
/// allocation rather than call depth.
struct Frame {
    edges: Vec<HalfEdgeId>,
    pos: usize,
}

/// Computes the horizon separating faces visible from `eye_point`
/// from those that aren't, starting from `face0` (the face that claimed the
/// eye). Deletes every visible face along the way, folding their orphaned
/// conflict points into `unclaimed`.
fn compute_horizon(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    unclaimed: &mut VertexList,
    eye_point: Point3D,
    face0: FaceId,
    tolerance: f64,
) -> Result<Vec<HalfEdgeId>, HullError> {
    let mut horizon = Vec::new();

    delete_face_points(mesh, claimed, unclaimed, face0);
    let edges0 = mesh.boundary_edges(face0);
    let mut stack = vec![Frame {
        edges: edges0,
        pos: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.pos >= frame.edges.len() {
            stack.pop();
            continue;
        }
        let edge = frame.edges[frame.pos];
        frame.pos += 1;

        let opp = mesh
            .he(edge)
            .opposite
            .ok_or(HullError::Internal("horizon edge missing opposite"))?;
        let opp_face = mesh.he(opp).face;

        // An edge whose opposite face is already DELETED was an internal
        // edge of the visible region (reached from the other side earlier
        // in this same walk, e.g. a fan of 3+ faces sharing a vertex); it is
        // neither a horizon edge nor something to recurse across, so it is
        // skipped entirely.
        if mesh.face(opp_face).mark == FaceMark::Visible {
            if mesh.face(opp_face).distance_to_plane(eye_point) > tolerance {
                delete_face_points(mesh, claimed, unclaimed, opp_face);
                let ring = mesh.boundary_edges(opp_face);
                let idx = ring
                    .iter()
                    .position(|&e| e == opp)
                    .ok_or(HullError::Internal("opposite edge not on its own face ring"))?;
                let mut child_edges = Vec::with_capacity(ring.len() - 1);
                for k in 1..ring.len() {
                    child_edges.push(ring[(idx + k) % ring.len()]);
                }
                stack.push(Frame {
                    edges: child_edges,
                    pos: 0,
                });
            } else {
                horizon.push(edge);
            }
        }
    }

    if horizon.len() < 3 {
        return Err(HullError::Internal("horizon has fewer than 3 edges"));
    }
    Ok(horizon)
}

/// Creates a triangular fan of new faces, one per horizon edge,
/// connecting each to the eye. Stitches each new face's middle edge to the
/// surviving outer neighbor, and chains the new faces' side edges into a
/// ring around the eye.
fn add_new_faces(
    mesh: &mut Mesh,
    eye: VertexId,
    horizon: &[HalfEdgeId],
) -> Result<Vec<FaceId>, HullError> {
    let mut new_faces = Vec::with_capacity(horizon.len());
    let mut first_left = None;
    let mut prev_right = None;

    for &h in horizon {
        let tail = mesh.tail(h);
        let head = mesh.he(h).vertex;
        let (face_id, edge_eye_tail, edge_tail_head, edge_head_eye) =
            mesh.create_triangle(eye, tail, head);

        let outer = mesh
            .he(h)
            .opposite
            .ok_or(HullError::Internal("horizon edge missing opposite"))?;
        mesh.he_mut(edge_tail_head).opposite = Some(outer);
        mesh.he_mut(outer).opposite = Some(edge_tail_head);

        if let Some(pr) = prev_right {
            mesh.he_mut(edge_eye_tail).opposite = Some(pr);
            mesh.he_mut(pr).opposite = Some(edge_eye_tail);
        } else {
            first_left = Some(edge_eye_tail);
        }
        prev_right = Some(edge_head_eye);

        face_ops::update_plane(mesh, face_id, 0.0);
        new_faces.push(face_id);
    }

    let fl = first_left.ok_or(HullError::Internal("empty horizon"))?;
    let pr = prev_right.ok_or(HullError::Internal("empty horizon"))?;
    mesh.he_mut(fl).opposite = Some(pr);
    mesh.he_mut(pr).opposite = Some(fl);

    Ok(new_faces)
}

#[derive(Clone, Copy)]
enum MergeKind {
    /// Pass 1: merge if the *larger* of the two faces sees the other as
    /// non-convex; otherwise mark the current face NON_CONVEX for pass 2.
    NonConvexWrtLargerFace,
    /// Pass 2: merge whenever either side sees the other as non-convex.
    NonConvex,
}

/// Attempts a single merge across one of `face`'s edges, returning whether
/// a merge happened. On a full walk with no merge, marks `face` NON_CONVEX
/// if any edge was deferred (pass 1 only).
fn try_one_merge(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    unclaimed: &mut VertexList,
    face: FaceId,
    kind: MergeKind,
    tolerance: f64,
) -> Result<bool, HullError> {
    let he0 = mesh
        .face(face)
        .first_edge
        .ok_or(HullError::Internal("face missing first_edge"))?;
    let mut edge = he0;
    let mut convex = true;

    loop {
        let opp = mesh
            .he(edge)
            .opposite
            .ok_or(HullError::Internal("edge missing opposite"))?;
        let opp_face = mesh.he(opp).face;

        let d_self = mesh.face(face).distance_to_plane(mesh.face(opp_face).centroid);
        let d_opp = mesh.face(opp_face).distance_to_plane(mesh.face(face).centroid);

        let merge = match kind {
            MergeKind::NonConvexWrtLargerFace => {
                if mesh.face(face).area > mesh.face(opp_face).area {
                    if d_self > -tolerance {
                        true
                    } else {
                        if d_opp > -tolerance {
                            convex = false;
                        }
                        false
                    }
                } else if d_opp > -tolerance {
                    true
                } else {
                    if d_self > -tolerance {
                        convex = false;
                    }
                    false
                }
            }
            MergeKind::NonConvex => d_self > -tolerance || d_opp > -tolerance,
        };

        if merge {
            face_ops::merge_across(mesh, claimed, unclaimed, face, edge, tolerance)?;
            return Ok(true);
        }

        edge = mesh
            .he(edge)
            .next
            .ok_or(HullError::Internal("edge missing next"))?;
        if edge == he0 {
            break;
        }
    }

    if !convex {
        mesh.face_mut(face).mark = FaceMark::NonConvex;
    }
    Ok(false)
}

/// Re-tests every vertex in `unclaimed` against every
/// VISIBLE new face, placing it on the face of greatest positive distance
/// exceeding tolerance (with an early-exit once a face is found whose
/// distance exceeds `1000 * tolerance`).
fn resolve_unclaimed_points(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    unclaimed: &mut VertexList,
    new_faces: &[FaceId],
    tolerance: f64,
) {
    let mut v = unclaimed.first();
    while let Some(vid) = v {
        let next = mesh.vertex(vid).next;
        let point = mesh.vertex(vid).point;

        let mut best_face = None;
        let mut best_d = tolerance;
        for &f in new_faces {
            if mesh.face(f).mark != FaceMark::Visible {
                continue;
            }
            let d = mesh.face(f).distance_to_plane(point);
            if d > best_d {
                best_d = d;
                best_face = Some(f);
                if d > 1000.0 * tolerance {
                    break;
                }
            }
        }

        unclaimed.delete(mesh, vid);
        if let Some(f) = best_face {
            conflict::add_point_to_face(mesh, claimed, vid, f);
        }
        v = next;
    }
}

/// Absorbs one eye point into the hull: horizon, new-face fan, two merge
/// passes, orphan reassignment.
fn add_vertex_to_hull(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    eye: VertexId,
    tolerance: f64,
) -> Result<(), HullError> {
    let face0 = mesh.vertex(eye).face.expect("eye must have an assigned face");
    conflict::remove_point_from_face(mesh, claimed, eye, face0);

    let mut unclaimed = VertexList::new();
    let eye_point = mesh.vertex(eye).point;
    let horizon = compute_horizon(mesh, claimed, &mut unclaimed, eye_point, face0, tolerance)?;

    let new_faces = add_new_faces(mesh, eye, &horizon)?;

    for &f in &new_faces {
        if mesh.face(f).mark == FaceMark::Visible {
            while try_one_merge(
                mesh,
                claimed,
                &mut unclaimed,
                f,
                MergeKind::NonConvexWrtLargerFace,
                tolerance,
            )? {}
        }
    }
    for &f in &new_faces {
        if mesh.face(f).mark == FaceMark::NonConvex {
            mesh.face_mut(f).mark = FaceMark::Visible;
            while try_one_merge(mesh, claimed, &mut unclaimed, f, MergeKind::NonConvex, tolerance)?
            {}
        }
    }

    resolve_unclaimed_points(mesh, claimed, &mut unclaimed, &new_faces, tolerance);
    Ok(())
}

/// Resets vertex indices, drops non-VISIBLE faces, marks and compacts
/// the surviving vertices, and emits the final vertex/polygon arrays.
fn extract_result(mesh: &mut Mesh, points: &[Point3D], tolerance: f64) -> BuildResult {
    for v in mesh.vertices.iter_mut() {
        v.index = -1;
    }

    let visible_faces: Vec<FaceId> = (0..mesh.faces.len())
        .map(FaceId)
        .filter(|&f| mesh.face(f).mark == FaceMark::Visible)
        .collect();

    for &f in &visible_faces {
        for e in mesh.boundary_edges(f) {
            let v = mesh.he(e).vertex;
            mesh.vertex_mut(v).index = 0;
        }
    }

    let mut out_points = Vec::new();
    for i in 0..points.len() {
        if mesh.vertex(VertexId(i)).index == 0 {
            mesh.vertex_mut(VertexId(i)).index = out_points.len() as i64;
            out_points.push(points[i]);
        }
    }

    let mut polygons = Vec::with_capacity(visible_faces.len());
    for &f in &visible_faces {
        let poly: Vec<usize> = mesh
            .boundary_edges(f)
            .iter()
            .map(|&e| mesh.vertex(mesh.he(e).vertex).index as usize)
            .collect();
        polygons.push(poly);
    }

    BuildResult {
        vertices: out_points,
        polygons,
        distance_tolerance: tolerance,
    }
}
