use crate::{ProjectionError, Result};
use derive_more::{AsRef, Deref, From, Into};
use log::*;
use nalgebra::{DMatrix, DVector, Point};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// An ordered set of points of the same dimension stored column-wise, so a set of
/// `n` points in `d` dimensions is a `d x n` matrix.
///
/// A set may be empty (zero columns), but it cannot be ragged, since every column
/// of the matrix has the same number of rows.
///
/// When serialized, the set is written as its rows, so a set of 2d points becomes
/// `[[x0, x1, ...], [y0, y1, ...]]`.
#[derive(Debug, Clone, PartialEq, AsRef, Deref, From, Into)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct PointSet(pub DMatrix<f64>);

impl PointSet {
    /// Creates a set from row-major data where each inner slice holds one coordinate
    /// of every point.
    ///
    /// ```
    /// use camgeom_core::PointSet;
    /// let points = PointSet::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(points.dim(), 2);
    /// assert_eq!(points.len(), 3);
    /// assert_eq!(points[(1, 2)], 6.0);
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let count = rows.first().map_or(0, |row| row.as_ref().len());
        if let Some(row) = rows.iter().find(|row| row.as_ref().len() != count) {
            return Err(ProjectionError::ShapeMismatch {
                what: "point set row length",
                expected: count,
                found: row.as_ref().len(),
            });
        }
        Ok(Self(DMatrix::from_fn(rows.len(), count, |r, c| {
            rows[r].as_ref()[c]
        })))
    }

    /// Creates a set from nalgebra points of a fixed dimension.
    ///
    /// The points must have at least one dimension.
    pub fn from_points<const D: usize>(points: impl IntoIterator<Item = Point<f64, D>>) -> Self {
        debug_assert!(D > 0, "points must have at least one dimension");
        let mut coords = Vec::new();
        for point in points {
            coords.extend(point.coords.iter());
        }
        Self(DMatrix::from_column_slice(D, coords.len() / D, &coords))
    }

    /// The dimension shared by every point in the set.
    pub fn dim(&self) -> usize {
        self.0.nrows()
    }

    /// The number of points in the set.
    pub fn len(&self) -> usize {
        self.0.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve a single point as a column vector.
    pub fn point(&self, index: usize) -> Option<DVector<f64>> {
        (index < self.len()).then(|| self.0.column(index).into_owned())
    }

    /// Iterate over every point as a column vector.
    pub fn points(&self) -> impl Iterator<Item = DVector<f64>> + '_ {
        self.0.column_iter().map(|column| column.into_owned())
    }

    /// Check that the points have the dimension an operation requires.
    pub fn expect_dim(&self, what: &'static str, dim: usize) -> Result<()> {
        if self.dim() == dim {
            Ok(())
        } else {
            Err(ProjectionError::ShapeMismatch {
                what,
                expected: dim,
                found: self.dim(),
            })
        }
    }

    /// Append a row of ones, see [`cartesian_to_homogeneous`].
    pub fn to_homogeneous(&self) -> Result<HomogeneousPointSet> {
        cartesian_to_homogeneous(&self.0).map(HomogeneousPointSet)
    }

    /// Collect the rows of the set, the inverse of [`PointSet::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.0
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for PointSet {
    type Error = ProjectionError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<PointSet> for Vec<Vec<f64>> {
    fn from(points: PointSet) -> Self {
        points.to_rows()
    }
}

/// A [`PointSet`] with an extra row holding the homogeneous scale of every point.
///
/// This only exists transiently while a transform is applied. It is never the
/// canonical representation of a set.
#[derive(Debug, Clone, PartialEq, AsRef, Deref, From, Into)]
pub struct HomogeneousPointSet(pub DMatrix<f64>);

impl HomogeneousPointSet {
    /// Divide out the scale row, see [`homogeneous_to_cartesian`].
    pub fn to_cartesian(&self) -> Result<PointSet> {
        homogeneous_to_cartesian(&self.0).map(PointSet)
    }
}

/// Converts a `d x n` matrix of cartesian points into a `(d + 1) x n` matrix of
/// homogeneous points by appending a row of ones.
///
/// The points must have at least one dimension.
///
/// ```
/// use camgeom_core::cartesian_to_homogeneous;
/// use camgeom_core::nalgebra::DMatrix;
/// let points = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
/// let homogeneous = cartesian_to_homogeneous(&points).unwrap();
/// assert_eq!(homogeneous, DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 1.0, 1.0]));
/// ```
pub fn cartesian_to_homogeneous(points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if points.nrows() == 0 {
        return Err(ProjectionError::ShapeMismatch {
            what: "cartesian point dimension (minimum)",
            expected: 1,
            found: 0,
        });
    }
    trace!(
        "promoting {} points of dimension {} to homogeneous",
        points.ncols(),
        points.nrows()
    );
    let dim = points.nrows();
    Ok(points.clone().insert_row(dim, 1.0))
}

/// Converts a `(d + 1) x n` matrix of homogeneous points into a `d x n` matrix of
/// cartesian points by dividing each point by its last component and dropping it.
///
/// A point whose last component is exactly zero lies at infinity. Rather than
/// produce infinities or NaN, this returns [`ProjectionError::PointAtInfinity`]
/// for the first such point.
pub fn homogeneous_to_cartesian(points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if points.nrows() < 2 {
        return Err(ProjectionError::ShapeMismatch {
            what: "homogeneous point dimension (minimum)",
            expected: 2,
            found: points.nrows(),
        });
    }
    let dim = points.nrows() - 1;
    let scale = points.row(dim);
    if let Some(column) = scale.iter().position(|&w| w == 0.0) {
        return Err(ProjectionError::PointAtInfinity { column });
    }
    trace!(
        "demoting {} homogeneous points of dimension {} to cartesian",
        points.ncols(),
        points.nrows()
    );
    Ok(DMatrix::from_fn(dim, points.ncols(), |r, c| {
        points[(r, c)] / scale[c]
    }))
}
