use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix1, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::Float;

/// A location in the plane.
///
/// Points are plain values: a centroid copied out of a record matrix is unaffected by any later
/// change to the matrix it was copied from.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Point<F> {
    pub fn new(x: F, y: F) -> Self {
        Point { x, y }
    }

    /// Reads a point from a row of a planar record matrix.
    ///
    /// Returns `Error::NotPlanar` if the row does not hold exactly two coordinates.
    pub fn from_row(row: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<Self> {
        match row.len() {
            2 => Ok(Point::new(row[0], row[1])),
            n => Err(Error::NotPlanar(n)),
        }
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Point<F>) -> F {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn to_array(self) -> Array1<F> {
        Array1::from(vec![self.x, self.y])
    }
}

impl<F> From<(F, F)> for Point<F> {
    fn from((x, y): (F, F)) -> Self {
        Point { x, y }
    }
}

/// Checks that a record matrix describes points in the plane, i.e. has exactly two columns.
///
/// An empty matrix is accepted as long as it has the planar shape `(0, 2)`.
pub fn check_planar<F>(records: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<()> {
    match records.ncols() {
        2 => Ok(()),
        n => Err(Error::NotPlanar(n)),
    }
}

/// Stacks a sequence of points into a record matrix with shape `(n_points, 2)`.
pub fn records_from_points<F: Float>(points: &[Point<F>]) -> Result<Array2<F>> {
    let flat = points.iter().flat_map(|p| [p.x, p.y]).collect::<Vec<_>>();
    Ok(Array2::from_shape_vec((points.len(), 2), flat)?)
}

/// Iterates over the rows of a planar record matrix as points.
///
/// The matrix is expected to have passed [`check_planar`].
pub fn points<'a, F: Float>(records: ArrayView2<'a, F>) -> impl Iterator<Item = Point<F>> + 'a {
    (0..records.nrows()).map(move |i| Point::new(records[[i, 0]], records[[i, 1]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, s};

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Point<f64>>();
        has_autotraits::<Error>();
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0., 0.);
        let b = Point::new(3., 4.);
        assert_abs_diff_eq!(a.distance(&b), 5.0);
        assert_abs_diff_eq!(b.distance(&a), 5.0);
        assert_abs_diff_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn points_and_records_agree() {
        let pts = vec![Point::new(1.0, 2.0), Point::new(-3.0, 4.5)];
        let records = records_from_points(&pts).unwrap();
        assert_eq!(records, array![[1.0, 2.0], [-3.0, 4.5]]);
        assert_eq!(points(records.view()).collect::<Vec<_>>(), pts);
    }

    #[test]
    fn points_outlive_the_view_they_come_from() {
        fn first_column_sum(records: &Array2<f64>) -> f64 {
            let iter = {
                let view = records.view();
                points(view)
            };
            iter.map(|p| p.x).sum()
        }

        let records = array![[1.0, 0.0], [2.0, 0.0], [4.0, 1.0]];
        assert_abs_diff_eq!(first_column_sum(&records), 7.0);
        assert_eq!(points(records.slice(s![1.., ..])).count(), 2);
    }

    #[test]
    fn empty_points_give_planar_records() {
        let records = records_from_points::<f64>(&[]).unwrap();
        assert_eq!(records.dim(), (0, 2));
        assert!(check_planar(&records).is_ok());
    }

    #[test]
    fn non_planar_records_are_rejected() {
        let records = array![[1.0, 2.0, 3.0]];
        assert_eq!(check_planar(&records), Err(Error::NotPlanar(3)));
        assert_eq!(
            Point::from_row(&records.row(0)),
            Err(Error::NotPlanar(3))
        );
    }

    #[test]
    fn from_row_copies_values() {
        let mut records = array![[7.0, -1.0]];
        let p = Point::from_row(&records.row(0)).unwrap();
        records[[0, 0]] = 0.0;
        assert_eq!(p, Point::new(7.0, -1.0));
        assert_eq!(p.to_array(), array![7.0, -1.0]);
    }
}
