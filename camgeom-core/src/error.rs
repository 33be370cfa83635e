use thiserror::Error;

/// Everything that can go wrong while converting or transforming point sets.
///
/// None of these are recoverable locally. They are returned to the caller as soon
/// as they are detected and no partial result is ever produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// An array had the wrong number of rows, columns or elements for the operation.
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A matrix that must be inverted has no inverse.
    #[error("the {what} is singular and cannot be inverted")]
    SingularMatrix { what: &'static str },
    /// The homogeneous scale of a point was exactly zero, so it lies at infinity
    /// and has no cartesian representation.
    #[error("point {column} has a zero homogeneous scale and lies at infinity")]
    PointAtInfinity { column: usize },
}

pub type Result<T> = core::result::Result<T, ProjectionError>;
