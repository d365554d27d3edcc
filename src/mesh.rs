//! The half-edge polyhedral mesh.
//!
//! An arena of vertices/half-edges/faces addressed by newtype indices,
//! the ownership-respecting choice when the target language has strict
//! aliasing rules. `Option<Id>` stands in for nullable pointers.

use crate::vector::Point3D;

/// Index into [`Mesh::vertices`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VertexId(pub usize);

/// Index into [`Mesh::half_edges`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HalfEdgeId(pub usize);

/// Index into [`Mesh::faces`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FaceId(pub usize);

/// A face's lifecycle tag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FaceMark {
    /// Part of the live hull boundary.
    Visible,
    /// Locally non-convex against the smaller of its two neighbors; deferred
    /// to the second merge pass.
    NonConvex,
    /// Absorbed by a merge or discarded as a horizon-visible face.
    Deleted,
}

/// A wrapper around one input point.
#[derive(Clone, Debug)]
pub struct Vertex {
    /// The point's coordinates.
    pub point: Point3D,
    /// Overloaded field: the original input index while the mesh is being
    /// built, the "used" marker (`0`) during output compaction, and finally
    /// the compacted output index. Kept as a single field rather than split
    /// in three, matching the source algorithm's behavior verbatim.
    pub index: i64,
    /// The face currently claiming this vertex as an outside point, if any.
    pub face: Option<FaceId>,
    /// Intrusive links in whichever [`crate::conflict::VertexList`] this
    /// vertex currently belongs to (the global claimed list, or the
    /// transient unclaimed list during horizon construction).
    pub prev: Option<VertexId>,
    pub next: Option<VertexId>,
}

/// An oriented edge belonging to exactly one face.
#[derive(Clone, Copy, Debug)]
pub struct HalfEdge {
    /// The head vertex of this edge.
    pub vertex: VertexId,
    /// The face on this edge's interior side.
    pub face: FaceId,
    /// Successor around `face`.
    pub next: Option<HalfEdgeId>,
    /// Predecessor around `face`.
    pub prev: Option<HalfEdgeId>,
    /// The paired half-edge on the adjacent face.
    pub opposite: Option<HalfEdgeId>,
}

/// A convex polygon embedded in a plane.
#[derive(Clone, Debug)]
pub struct Face {
    /// Any one of this face's half-edges; `first_edge -> next -> ...`
    /// enumerates the boundary.
    pub first_edge: Option<HalfEdgeId>,
    /// Unit outward normal.
    pub normal: Point3D,
    /// `normal . centroid`.
    pub plane_offset: f64,
    pub centroid: Point3D,
    pub area: f64,
    /// Vertex degree.
    pub count: usize,
    pub mark: FaceMark,
    /// Head of the contiguous run of this face's outside points in the
    /// global conflict list, or `None` if the face claims no points.
    pub outside: Option<VertexId>,
}

impl Face {
    /// Signed distance from this face's plane to `p`; positive means `p` is
    /// above the plane (outside the hull on this face's side).
    pub fn distance_to_plane(&self, p: Point3D) -> f64 {
        self.normal.dot(p) - self.plane_offset
    }
}

/// The arena owning every vertex, half-edge and face created during a build.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            half_edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, point: Point3D, index: i64) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            point,
            index,
            face: None,
            prev: None,
            next: None,
        });
        id
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }

    pub fn he(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    pub fn he_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.half_edges[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.0]
    }

    /// The tail vertex of `e`, i.e. `prev(e).vertex`.
    pub fn tail(&self, e: HalfEdgeId) -> VertexId {
        let prev = self.he(e).prev.expect("half-edge missing prev");
        self.he(prev).vertex
    }

    pub fn opposite_face(&self, e: HalfEdgeId) -> FaceId {
        let opp = self.he(e).opposite.expect("half-edge missing opposite");
        self.he(opp).face
    }

    /// Creates a triangular face `v0 -> v1 -> v2 -> v0`, with no `opposite`
    /// links set and the plane left uninitialized (callers finish the face
    /// via `face_ops::update_plane`). Returns the face and its three
    /// half-edges in boundary order.
    pub fn create_triangle(
        &mut self,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
    ) -> (FaceId, HalfEdgeId, HalfEdgeId, HalfEdgeId) {
        let face_id = FaceId(self.faces.len());
        self.faces.push(Face {
            first_edge: None,
            normal: Point3D::ZERO,
            plane_offset: 0.0,
            centroid: Point3D::ZERO,
            area: 0.0,
            count: 3,
            mark: FaceMark::Visible,
            outside: None,
        });

        let e0 = HalfEdgeId(self.half_edges.len());
        self.half_edges.push(HalfEdge {
            vertex: v1,
            face: face_id,
            next: None,
            prev: None,
            opposite: None,
        });
        let e1 = HalfEdgeId(self.half_edges.len());
        self.half_edges.push(HalfEdge {
            vertex: v2,
            face: face_id,
            next: None,
            prev: None,
            opposite: None,
        });
        let e2 = HalfEdgeId(self.half_edges.len());
        self.half_edges.push(HalfEdge {
            vertex: v0,
            face: face_id,
            next: None,
            prev: None,
            opposite: None,
        });

        self.he_mut(e0).next = Some(e1);
        self.he_mut(e0).prev = Some(e2);
        self.he_mut(e1).next = Some(e2);
        self.he_mut(e1).prev = Some(e0);
        self.he_mut(e2).next = Some(e0);
        self.he_mut(e2).prev = Some(e1);

        self.face_mut(face_id).first_edge = Some(e0);

        (face_id, e0, e1, e2)
    }

    /// This face's half-edges, in boundary order starting at `first_edge`.
    pub fn boundary_edges(&self, face: FaceId) -> Vec<HalfEdgeId> {
        let start = self.face(face).first_edge.expect("face missing first_edge");
        let mut out = Vec::with_capacity(self.face(face).count);
        let mut e = start;
        loop {
            out.push(e);
            e = self.he(e).next.expect("half-edge missing next");
            if e == start {
                break;
            }
        }
        out
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
