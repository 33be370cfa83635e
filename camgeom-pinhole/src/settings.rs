use crate::{Camera, CentralProjection};
use nalgebra::{Point2, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings that place and describe a camera.
///
/// Rotations are given in degrees and are applied after the translation, about y first,
/// then x, then z.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSettings {
    /// The image point hit by the optical axis
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_principal_point")
    )]
    pub principal_point: [f64; 2],
    /// The focal length, which must not be zero for the projection to be invertible
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_focal"))]
    pub focal: f64,
    /// The translation applied to world points before any rotation
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_translation"))]
    pub translation: [f64; 3],
    /// Degrees of rotation about the x axis
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_rotation_x"))]
    pub rotation_x: f64,
    /// Degrees of rotation about the y axis
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_rotation_y"))]
    pub rotation_y: f64,
    /// Degrees of rotation about the z axis
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_rotation_z"))]
    pub rotation_z: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            principal_point: default_principal_point(),
            focal: default_focal(),
            translation: default_translation(),
            rotation_x: default_rotation_x(),
            rotation_y: default_rotation_y(),
            rotation_z: default_rotation_z(),
        }
    }
}

impl CameraSettings {
    pub fn central_projection(&self) -> CentralProjection {
        CentralProjection::identity()
            .focal(self.focal)
            .principal_point(Point2::from(self.principal_point))
    }

    /// Compose the camera these settings describe.
    pub fn camera(&self) -> Camera {
        Camera::from_parts(
            self.central_projection(),
            Vector3::from(self.translation),
            [self.rotation_x, self.rotation_y, self.rotation_z],
        )
    }
}

fn default_principal_point() -> [f64; 2] {
    [8.0, -10.0]
}

fn default_focal() -> f64 {
    8.0
}

fn default_translation() -> [f64; 3] {
    [-27.1, -2.9, -3.2]
}

fn default_rotation_x() -> f64 {
    -30.0
}

fn default_rotation_y() -> f64 {
    135.0
}

fn default_rotation_z() -> f64 {
    90.0
}
