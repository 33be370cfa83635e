//! This crate plugs into `camgeom-core` and provides the projective pinhole camera.
//! It can be used to project 3d world points onto the 2d image, and to go backwards from
//! the 2d image to the 3d world when the depth of every point is known.
//!
//! The camera is made of two parts:
//!
//! * The extrinsic matrix `M`, a rigid transform taking world points into the frame of the camera.
//! * The central projection `L`, which takes camera points onto the image plane.
//!
//! The full projection is `P = L * M`. Since `P` is `3 x 4` it cannot be inverted directly,
//! and the depth of the point is lost by the perspective divide. Going backwards is therefore
//! split into two square problems, [`invert_projection`] and [`invert_transform`], with
//! the lost depth supplied by the caller.
//!
//! - `X` the world point
//! - `c` the same point in camera coordinates
//! - `x` the image point
//!
//! ```text
//!           M                 L
//!   X ------------> c ----------------> x
//!   X <------------ c <---------------- x, z
//!      M inverse       L' inverse
//! ```

mod camera;
mod commute;
mod settings;

pub use camera::*;
pub use commute::*;
pub use settings::*;

use camgeom_core::{into_dynamic, PointSet, ProjectionError, Result};
use log::*;
use nalgebra::{DVector, Matrix3, Matrix3x4, Point2};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The intrinsic parameters of an ideal pinhole camera: a single focal length shared by
/// both image axes and the principal point where the optical axis hits the image.
///
/// There is no skew and no distortion.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CentralProjection {
    pub focal: f64,
    pub principal_point: Point2<f64>,
}

impl CentralProjection {
    /// Creates a central projection with a focal length of `1.0` and the principal point
    /// at the origin, which leaves camera coordinates on the plane `z = 1` untouched.
    pub fn identity() -> Self {
        Self {
            focal: 1.0,
            principal_point: Point2::origin(),
        }
    }

    pub fn focal(self, focal: f64) -> Self {
        Self { focal, ..self }
    }

    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    /// Retrieve the `3 x 4` matrix `L`, see [`central_projection`].
    pub fn matrix(&self) -> Matrix3x4<f64> {
        central_projection(self.principal_point, self.focal)
    }

    /// Recover camera points from image points and their depths, see [`invert_projection`].
    pub fn invert(&self, image_points: &PointSet, depths: &DVector<f64>) -> Result<PointSet> {
        invert_projection(&self.matrix(), image_points, depths)
    }
}

/// Creates the `3 x 4` matrix that projects homogeneous camera coordinates onto
/// homogeneous image coordinates.
///
/// The last row passes the depth through unchanged, so the homogeneous scale of an
/// image point is the depth of the camera point it came from.
///
/// ```
/// use camgeom_pinhole::central_projection;
/// use camgeom_core::nalgebra::{Matrix3x4, Point2};
/// let l = central_projection(Point2::new(8.0, -10.0), 8.0);
/// assert_eq!(l, Matrix3x4::new(
///     8.0, 0.0, 8.0, 0.0,
///     0.0, 8.0, -10.0, 0.0,
///     0.0, 0.0, 1.0, 0.0,
/// ));
/// ```
#[rustfmt::skip]
pub fn central_projection(principal_point: Point2<f64>, focal: f64) -> Matrix3x4<f64> {
    Matrix3x4::new(
        focal,  0.0,    principal_point.x,  0.0,
        0.0,    focal,  principal_point.y,  0.0,
        0.0,    0.0,    1.0,                0.0,
    )
}

/// Recovers `3 x n` camera points from `2 x n` image points and the depth of each point.
///
/// The homogeneous image point `[x, y, 1]` is scaled by its depth `z` to undo the perspective
/// divide, giving `[x * z, y * z, z]`. The last column of `central` is dropped to form a square
/// matrix `L'`, and the camera point is `L'^-1 * [x * z, y * z, z]`.
///
/// Returns [`ProjectionError::SingularMatrix`] if `L'` cannot be inverted, which happens when
/// the focal length is zero.
///
/// ```
/// use camgeom_pinhole::{central_projection, invert_projection};
/// use camgeom_core::PointSet;
/// use camgeom_core::nalgebra::{DVector, Point2};
/// let l = central_projection(Point2::new(1.0, 2.0), 2.0);
/// let image = PointSet::from_rows(&[[3.0], [2.0]]).unwrap();
/// let camera = invert_projection(&l, &image, &DVector::from_vec(vec![4.0])).unwrap();
/// assert_eq!(camera.to_rows(), vec![vec![4.0], vec![0.0], vec![4.0]]);
/// ```
pub fn invert_projection(
    central: &Matrix3x4<f64>,
    image_points: &PointSet,
    depths: &DVector<f64>,
) -> Result<PointSet> {
    image_points.expect_dim("image points", 2)?;
    if depths.len() != image_points.len() {
        return Err(ProjectionError::ShapeMismatch {
            what: "depth count",
            expected: image_points.len(),
            found: depths.len(),
        });
    }
    let square = Matrix3::from_fn(|r, c| central[(r, c)]);
    let inverse = square.try_inverse().ok_or_else(|| {
        debug!("central projection has no inverse: {:?}", square);
        ProjectionError::SingularMatrix {
            what: "central projection",
        }
    })?;
    let mut scaled = image_points.to_homogeneous()?.0;
    for (index, &depth) in depths.iter().enumerate() {
        let mut column = scaled.column_mut(index);
        column *= depth;
    }
    trace!("inverted projection of {} image points", image_points.len());
    Ok(PointSet(into_dynamic(&inverse) * scaled))
}
