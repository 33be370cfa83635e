use crate::CentralProjection;
use camgeom_core::{
    into_dynamic, rotation_x, rotation_y, rotation_z, transform_points, translation3,
    HomogeneousPointSet, PointSet, ProjectionError, Result,
};
use log::*;
use nalgebra::{DVector, Matrix3x4, Matrix4, Vector3};

/// Combines the extrinsic transforms and the central projection into the full projection.
///
/// The extrinsic matrix is `M = Rz * Rx * Ry * T`, so a world point is translated first and
/// then rotated about y, x and z in that order. The full projection is `P = L * M`.
///
/// Returns `(P, M)`. `M` is needed again to undo the extrinsic transform with
/// [`invert_transform`].
pub fn compose(
    translation: &Matrix4<f64>,
    rotation_x: &Matrix4<f64>,
    rotation_y: &Matrix4<f64>,
    rotation_z: &Matrix4<f64>,
    central: &Matrix3x4<f64>,
) -> (Matrix3x4<f64>, Matrix4<f64>) {
    let extrinsics = rotation_z * rotation_x * rotation_y * translation;
    let projection = central * extrinsics;
    debug!("composed extrinsics {} and projection {}", extrinsics, projection);
    (projection, extrinsics)
}

/// Projects `3 x n` world points through the full projection `P`, giving `2 x n` image points.
///
/// The depth of each point is lost. A point with a depth of exactly zero lies in the plane of
/// the optical center and has no image, which is reported as
/// [`ProjectionError::PointAtInfinity`].
pub fn project(projection: &Matrix3x4<f64>, world_points: &PointSet) -> Result<PointSet> {
    world_points.expect_dim("world points", 3)?;
    let homogeneous = world_points.to_homogeneous()?;
    HomogeneousPointSet(into_dynamic(projection) * &homogeneous.0).to_cartesian()
}

/// Computes the depth of every world point in the frame of the camera described by `extrinsics`.
///
/// This is the z coordinate of `M * [X; 1]`, which is also the homogeneous scale of the
/// projected image point and the depth needed by [`invert_projection`](crate::invert_projection).
pub fn camera_depth(extrinsics: &Matrix4<f64>, world_points: &PointSet) -> Result<DVector<f64>> {
    world_points.expect_dim("world points", 3)?;
    let homogeneous = world_points.to_homogeneous()?;
    let camera = into_dynamic(extrinsics) * &homogeneous.0;
    Ok(camera.row(2).transpose())
}

/// Takes `3 x n` camera points back into the world by applying the inverse of `extrinsics`.
///
/// Returns [`ProjectionError::SingularMatrix`] if `extrinsics` cannot be inverted, which only
/// happens if it was not built from rotations and translations.
pub fn invert_transform(extrinsics: &Matrix4<f64>, camera_points: &PointSet) -> Result<PointSet> {
    camera_points.expect_dim("camera points", 3)?;
    let inverse = extrinsics.try_inverse().ok_or_else(|| {
        debug!("extrinsic matrix has no inverse: {}", extrinsics);
        ProjectionError::SingularMatrix {
            what: "extrinsic matrix",
        }
    })?;
    transform_points(&into_dynamic(&inverse), camera_points)
}

/// A pinhole camera placed in the world.
///
/// The full projection is derived from the parts on demand and is never stored, so it
/// cannot go out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub intrinsics: CentralProjection,
    pub extrinsics: Matrix4<f64>,
}

impl Camera {
    pub fn new(intrinsics: CentralProjection, extrinsics: Matrix4<f64>) -> Self {
        Self {
            intrinsics,
            extrinsics,
        }
    }

    /// Creates a camera from a translation and rotations about each axis in degrees,
    /// composed as in [`compose`].
    ///
    /// ```
    /// use camgeom_pinhole::{Camera, CentralProjection};
    /// use camgeom_core::PointSet;
    /// use camgeom_core::nalgebra::{Point2, Vector3};
    /// let camera = Camera::from_parts(
    ///     CentralProjection::identity().focal(8.0).principal_point(Point2::new(8.0, -10.0)),
    ///     Vector3::new(-27.1, -2.9, -3.2),
    ///     [-30.0, 135.0, 90.0],
    /// );
    /// let world = PointSet::from_rows(&[[1.0, -4.0], [2.0, 0.5], [30.0, 12.0]]).unwrap();
    /// let image = camera.project(&world).unwrap();
    /// let depths = camera.depths(&world).unwrap();
    /// let recovered = camera.unproject(&image, &depths).unwrap();
    /// assert!((recovered.0 - world.0).amax() < 1e-9);
    /// ```
    pub fn from_parts(
        intrinsics: CentralProjection,
        translation: Vector3<f64>,
        [x, y, z]: [f64; 3],
    ) -> Self {
        let (_, extrinsics) = compose(
            &translation3(translation),
            &rotation_x(x),
            &rotation_y(y),
            &rotation_z(z),
            &intrinsics.matrix(),
        );
        Self::new(intrinsics, extrinsics)
    }

    /// Retrieve the full projection `P = L * M`.
    pub fn projection(&self) -> Matrix3x4<f64> {
        self.intrinsics.matrix() * self.extrinsics
    }

    pub fn project(&self, world_points: &PointSet) -> Result<PointSet> {
        project(&self.projection(), world_points)
    }

    /// Apply only the extrinsic transform, giving the points in camera coordinates.
    pub fn camera_points(&self, world_points: &PointSet) -> Result<PointSet> {
        world_points.expect_dim("world points", 3)?;
        transform_points(&into_dynamic(&self.extrinsics), world_points)
    }

    pub fn depths(&self, world_points: &PointSet) -> Result<DVector<f64>> {
        camera_depth(&self.extrinsics, world_points)
    }

    /// Recovers world points from image points and their camera depths by running
    /// both stages of the inverse.
    pub fn unproject(&self, image_points: &PointSet, depths: &DVector<f64>) -> Result<PointSet> {
        let camera_points = self.intrinsics.invert(image_points, depths)?;
        invert_transform(&self.extrinsics, &camera_points)
    }
}
