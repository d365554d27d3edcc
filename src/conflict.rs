//! The conflict list.
//!
//! `VertexList` is an intrusive doubly linked list threaded through
//! [`crate::mesh::Vertex::prev`]/`next`. The same list type plays two roles
//! during a build: the global "claimed" list (partitioned per face, each
//! face's share stored as a contiguous run whose head is `Face::outside`)
//! and the transient "unclaimed" list used while computing a horizon. A
//! given vertex is only ever in one of the two at a time.

use crate::mesh::{FaceId, Mesh, VertexId};

/// An intrusive doubly linked list of vertices.
#[derive(Default)]
pub struct VertexList {
    head: Option<VertexId>,
    tail: Option<VertexId>,
}

impl VertexList {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn first(&self) -> Option<VertexId> {
        self.head
    }

    /// Appends `v` to the tail of the list.
    pub fn add(&mut self, mesh: &mut Mesh, v: VertexId) {
        mesh.vertex_mut(v).prev = self.tail;
        mesh.vertex_mut(v).next = None;
        match self.tail {
            Some(t) => mesh.vertex_mut(t).next = Some(v),
            None => self.head = Some(v),
        }
        self.tail = Some(v);
    }

    /// Inserts `v` immediately before `mark`, which must already be in this
    /// list.
    pub fn insert_before(&mut self, mesh: &mut Mesh, v: VertexId, mark: VertexId) {
        let prev = mesh.vertex(mark).prev;
        mesh.vertex_mut(v).prev = prev;
        mesh.vertex_mut(v).next = Some(mark);
        mesh.vertex_mut(mark).prev = Some(v);
        match prev {
            Some(p) => mesh.vertex_mut(p).next = Some(v),
            None => self.head = Some(v),
        }
    }

    /// Unlinks `v` from this list.
    pub fn delete(&mut self, mesh: &mut Mesh, v: VertexId) {
        let prev = mesh.vertex(v).prev;
        let next = mesh.vertex(v).next;
        match prev {
            Some(p) => mesh.vertex_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => mesh.vertex_mut(n).prev = prev,
            None => self.tail = prev,
        }
        mesh.vertex_mut(v).prev = None;
        mesh.vertex_mut(v).next = None;
    }

    /// Splices the contiguous run `[run_head ..= run_tail]` out of this
    /// list. The run's own internal links are left intact; `run_head.prev`
    /// and `run_tail.next` are cleared so the run can stand alone as its own
    /// sequence.
    fn splice_out_run(&mut self, mesh: &mut Mesh, run_head: VertexId, run_tail: VertexId) {
        let before = mesh.vertex(run_head).prev;
        let after = mesh.vertex(run_tail).next;
        match before {
            Some(b) => mesh.vertex_mut(b).next = after,
            None => self.head = after,
        }
        match after {
            Some(a) => mesh.vertex_mut(a).prev = before,
            None => self.tail = before,
        }
        mesh.vertex_mut(run_head).prev = None;
        mesh.vertex_mut(run_tail).next = None;
    }
}

/// `addPointToFace`: assigns `v` to `f`, keeping `f`'s claimed run
/// contiguous with `f.outside` as its head.
pub fn add_point_to_face(mesh: &mut Mesh, claimed: &mut VertexList, v: VertexId, f: FaceId) {
    mesh.vertex_mut(v).face = Some(f);
    match mesh.face(f).outside {
        None => {
            claimed.add(mesh, v);
            mesh.face_mut(f).outside = Some(v);
        }
        Some(head) => {
            claimed.insert_before(mesh, v, head);
            mesh.face_mut(f).outside = Some(v);
        }
    }
}

/// `removePointFromFace`: unlinks `v` from `claimed`, repairing `f`'s
/// `outside` head if `v` was it.
pub fn remove_point_from_face(mesh: &mut Mesh, claimed: &mut VertexList, v: VertexId, f: FaceId) {
    if mesh.face(f).outside == Some(v) {
        let next = mesh.vertex(v).next;
        let next_in_face = next.is_some_and(|n| mesh.vertex(n).face == Some(f));
        mesh.face_mut(f).outside = if next_in_face { next } else { None };
    }
    claimed.delete(mesh, v);
}

/// `removeAllPointsFromFace`: splices the whole of `f`'s claimed run
/// out of `claimed` and returns its head (the run itself stays linked for
/// the caller to walk or re-append elsewhere), or `None` if `f` claims no
/// points.
pub fn remove_all_points_from_face(
    mesh: &mut Mesh,
    claimed: &mut VertexList,
    f: FaceId,
) -> Option<VertexId> {
    let head = mesh.face(f).outside?;
    let mut tail = head;
    loop {
        match mesh.vertex(tail).next {
            Some(n) if mesh.vertex(n).face == Some(f) => tail = n,
            _ => break,
        }
    }
    claimed.splice_out_run(mesh, head, tail);
    mesh.face_mut(f).outside = None;
    Some(head)
}
