//! A robust implementation of the incremental QuickHull algorithm for
//! computing the convex hull of a set of points in three dimensions.
//!
//! The hull is built as a half-edge mesh: points are absorbed
//! one at a time, each insertion computing a horizon of visible faces,
//! stitching a new fan of triangles to it, and merging adjacent faces that
//! would otherwise leave the hull non-convex within floating-point
//! tolerance. This follows the algorithm described by Barber, Dobkin and
//! Huhdanpaa ("The Quickhull Algorithm for Convex Hulls", ACM TOMS 1996)
//! and, for the half-edge bookkeeping, John Lloyd's `QuickHull3D`.
//!
//! # Example
//!
//! ```
//! use hull3d::{HullBuilder, Point3D};
//!
//! let points = vec![
//!     Point3D::new(0.0, 0.0, 0.0),
//!     Point3D::new(1.0, 0.0, 0.0),
//!     Point3D::new(0.0, 1.0, 0.0),
//!     Point3D::new(0.0, 0.0, 1.0),
//!     Point3D::new(0.25, 0.25, 0.25),
//! ];
//! let hull = HullBuilder::build(&points, None).unwrap();
//! assert_eq!(hull.vertices.len(), 4);
//! ```

#![warn(missing_docs, clippy::all)]

mod builder;
mod conflict;
mod error;
mod face_ops;
mod mesh;
mod tolerance;
mod vector;
mod verify;

#[cfg(test)]
mod tests;

pub use builder::{BuildResult, HullBuilder};
pub use error::{DegenerateInput, HullError};
pub use vector::Point3D;
pub use verify::Verifier;
