//! Utility functions for randomly generating datasets

use lloyd::{points, Point};
use ndarray::{s, Array, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{StandardNormal, Uniform},
    RandomExt,
};

use crate::{PLANE_MAX, PLANE_MIN};

/// Generates `n_points` points with integer coordinates drawn uniformly from
/// `PLANE_MIN..=PLANE_MAX` on both axes.
///
/// The result is a record matrix with shape `(n_points, 2)`.
pub fn generate_dataset(n_points: usize, rng: &mut impl Rng) -> Array2<f64> {
    let grid = Array::random_using(
        (n_points, 2),
        Uniform::new_inclusive(PLANE_MIN, PLANE_MAX),
        rng,
    );
    grid.mapv(f64::from)
}

/// Same as [`generate_dataset`], returning the points as values instead of a record matrix.
pub fn generate_points(n_points: usize, rng: &mut impl Rng) -> Vec<Point<f64>> {
    points(generate_dataset(n_points, rng).view()).collect()
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, 2)`,
/// generate `blob_size` points (a "blob") around each of the blob centroids.
///
/// More specifically, each blob is formed by `blob_size` points sampled from a normal
/// distribution centered in the blob centroid with unit variance.
///
/// `blobs` can be used to quickly assemble a synthetic dataset to test or
/// benchmark the clustering engine on a best-case scenario input.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, StandardNormal, rng);
    origin_blob + blob_centroid
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Axis};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn dataset_has_integer_coordinates_inside_the_plane() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let records = generate_dataset(500, &mut rng);

        assert_eq!(records.dim(), (500, 2));
        for &v in records.iter() {
            assert_eq!(v.fract(), 0.0);
            assert!(v >= PLANE_MIN as f64 && v <= PLANE_MAX as f64);
        }
    }

    #[test]
    fn dataset_is_reproducible_under_a_seed() {
        let a = generate_dataset(50, &mut Xoshiro256Plus::seed_from_u64(7));
        let b = generate_dataset(50, &mut Xoshiro256Plus::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_dataset() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        assert_eq!(generate_dataset(0, &mut rng).dim(), (0, 2));
        assert!(generate_points(0, &mut rng).is_empty());
    }

    #[test]
    fn points_follow_records() {
        let pts = generate_points(10, &mut Xoshiro256Plus::seed_from_u64(3));
        let records = generate_dataset(10, &mut Xoshiro256Plus::seed_from_u64(3));
        for (p, row) in pts.iter().zip(records.rows()) {
            assert_eq!(p.x, row[0]);
            assert_eq!(p.y, row[1]);
        }
    }

    #[test]
    fn blobs_surround_their_centroids() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let centroids = array![[-5., -5.], [5., 5.]];
        let data = blobs(1000, &centroids, &mut rng);

        assert_eq!(data.dim(), (2000, 2));
        let first = data.slice(s![..1000, ..]).mean_axis(Axis(0)).unwrap();
        let second = data.slice(s![1000.., ..]).mean_axis(Axis(0)).unwrap();
        assert_abs_diff_eq!(first, array![-5., -5.], epsilon = 0.2);
        assert_abs_diff_eq!(second, array![5., 5.], epsilon = 0.2);
    }
}
