use crate::{HomogeneousPointSet, PointSet, ProjectionError, Result};
use log::*;
use nalgebra::{storage::Storage, DMatrix, Dim, Matrix, Matrix4, Vector3};

/// The coordinate axis a rotation is performed about.
///
/// Only the three axes of 3d space are supported. Arbitrary axis rotations are out
/// of scope, use [`nalgebra::Rotation3`] for those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The two coordinates which are mixed by a rotation about this axis, lower index first.
    fn plane(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// Creates a `(d + 1) x (d + 1)` homogeneous translation by `offset`, where `d` is
/// the length of the offset.
///
/// ```
/// use camgeom_core::translation;
/// let t = translation(&[1.0, 2.0]).unwrap();
/// assert_eq!(t.shape(), (3, 3));
/// assert_eq!(t[(0, 2)], 1.0);
/// assert_eq!(t[(1, 2)], 2.0);
/// assert_eq!(t[(2, 2)], 1.0);
/// ```
pub fn translation(offset: &[f64]) -> Result<DMatrix<f64>> {
    if offset.is_empty() {
        return Err(ProjectionError::ShapeMismatch {
            what: "translation dimension (minimum)",
            expected: 1,
            found: 0,
        });
    }
    let dim = offset.len();
    let mut transform = DMatrix::identity(dim + 1, dim + 1);
    for (row, &value) in offset.iter().enumerate() {
        transform[(row, dim)] = value;
    }
    Ok(transform)
}

/// Creates the 3d homogeneous translation by `offset`.
///
/// This is [`translation`] with the shape fixed at compile time.
pub fn translation3(offset: Vector3<f64>) -> Matrix4<f64> {
    let mut transform = Matrix4::identity();
    for (row, &value) in offset.iter().enumerate() {
        transform[(row, 3)] = value;
    }
    transform
}

/// Creates a 3d homogeneous rotation of `degrees` about `axis`.
///
/// The two coordinates orthogonal to the axis receive the block
/// `[[cos, -sin], [sin, cos]]`, with the lower coordinate in the first row.
pub fn rotation(axis: Axis, degrees: f64) -> Matrix4<f64> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (a, b) = axis.plane();
    let mut transform = Matrix4::identity();
    transform[(a, a)] = cos;
    transform[(a, b)] = -sin;
    transform[(b, a)] = sin;
    transform[(b, b)] = cos;
    transform
}

pub fn rotation_x(degrees: f64) -> Matrix4<f64> {
    rotation(Axis::X, degrees)
}

pub fn rotation_y(degrees: f64) -> Matrix4<f64> {
    rotation(Axis::Y, degrees)
}

pub fn rotation_z(degrees: f64) -> Matrix4<f64> {
    rotation(Axis::Z, degrees)
}

/// Copies any matrix into a dynamically sized one so it can be multiplied with point sets.
pub fn into_dynamic<R, C, S>(matrix: &Matrix<f64, R, C, S>) -> DMatrix<f64>
where
    R: Dim,
    C: Dim,
    S: Storage<f64, R, C>,
{
    DMatrix::from_iterator(matrix.nrows(), matrix.ncols(), matrix.iter().copied())
}

/// Applies a homogeneous transform to a set of cartesian points.
///
/// The points are promoted to homogeneous coordinates, left-multiplied by the
/// transform and demoted back to cartesian coordinates. For `d` dimensional points
/// the transform must be `(d + 1) x (d + 1)`.
///
/// ```
/// use camgeom_core::{transform_points, translation, PointSet};
/// let points = PointSet::from_rows(&[[0.0, 1.0], [0.0, 1.0]]).unwrap();
/// let moved = transform_points(&translation(&[2.0, -1.0]).unwrap(), &points).unwrap();
/// assert_eq!(moved.to_rows(), vec![vec![2.0, 3.0], vec![-1.0, 0.0]]);
/// ```
pub fn transform_points(transform: &DMatrix<f64>, points: &PointSet) -> Result<PointSet> {
    let size = points.dim() + 1;
    if transform.nrows() != size {
        return Err(ProjectionError::ShapeMismatch {
            what: "transform rows",
            expected: size,
            found: transform.nrows(),
        });
    }
    if transform.ncols() != size {
        return Err(ProjectionError::ShapeMismatch {
            what: "transform columns",
            expected: size,
            found: transform.ncols(),
        });
    }
    trace!("transforming {} points of dimension {}", points.len(), points.dim());
    let homogeneous = points.to_homogeneous()?;
    HomogeneousPointSet(transform * &homogeneous.0).to_cartesian()
}
