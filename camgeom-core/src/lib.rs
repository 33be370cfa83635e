//! # camgeom core
//!
//! This library provides the point and transform primitives shared by the camgeom crates.
//! Point sets are stored column-wise in dense [`nalgebra`] matrices, so a set of `n`
//! points of dimension `d` is a `d x n` matrix. Transforms act on homogeneous
//! coordinates, which are formed by appending a component of `1.0` to every point.
//!
//! ## Homogeneous coordinates
//!
//! A homogeneous point `(x, y, w)` represents the cartesian point `(x / w, y / w)`.
//! Any non-zero multiple of it represents the same cartesian point. When `w` is zero
//! the point lies at infinity, and since it has no cartesian representation the
//! conversion back to cartesian coordinates fails with
//! [`ProjectionError::PointAtInfinity`].
//!
//! ## Transforms
//!
//! A transform on `d` dimensional points is a `(d + 1) x (d + 1)` matrix. Translations
//! can be built for any dimension with [`translation`]. Rotations are only provided
//! about the three coordinate axes of 3d space with [`rotation`]. Transforms are
//! combined by matrix multiplication, and the order matters:
//!
//! ```text
//! M = Rz * Rx * Ry * T
//!
//! the point is translated first, then rotated about y, then x, then z
//! ```

mod error;
mod point;
mod transform;

pub use error::*;
pub use nalgebra;
pub use point::*;
pub use transform::*;
