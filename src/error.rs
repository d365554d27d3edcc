//! Error types for hull construction.

use std::error::Error;
use std::fmt;

/// The specific way the input failed the initial-simplex preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateInput {
    /// The bounding-box extent over all points is at most the tolerance.
    Coincident,
    /// The third simplex vertex's perpendicular distance from the first edge
    /// is at most `100 * tolerance`.
    Colinear,
    /// The fourth simplex vertex's height above the base triangle is at most
    /// `100 * tolerance`.
    Coplanar,
}

impl fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DegenerateInput::Coincident => "Input points appear to be coincident",
            DegenerateInput::Colinear => "Input points appear to be colinear",
            DegenerateInput::Coplanar => "Input points appear to be coplanar",
        };
        write!(f, "{msg}")
    }
}

/// The type of error returned while building a hull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HullError {
    /// Fewer than four points were supplied.
    TooFewPoints,
    /// The input violates one of the initial-simplex preconditions.
    Input(DegenerateInput),
    /// A topological invariant of the half-edge mesh was violated mid-build.
    /// Unreachable on well-formed input; indicates a bug rather than bad data.
    Internal(&'static str),
}

impl fmt::Display for HullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HullError::TooFewPoints => write!(f, "less than four input points specified"),
            HullError::Input(kind) => write!(f, "{kind}"),
            HullError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl Error for HullError {}
