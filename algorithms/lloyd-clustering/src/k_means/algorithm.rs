use lloyd::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, DataMut, Ix1, Ix2, Zip};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The outcome of a single iteration of Lloyd's algorithm.
///
/// K-means alternates two steps:
/// - assignment step: assign each observation to the nearest centroid
///   (minimum euclidean distance, the lowest index wins a tie);
/// - update step: move each centroid to the mean of the observations assigned to it.
///
/// A `Step` carries the centroids produced by the update step together with the grouping that
/// was computed during the assignment step. The grouping therefore reflects the centroids that
/// went *into* the step, not the ones coming out of it.
pub struct Step<F> {
    /// New centroids with shape `(n_centroids, n_features)`, in the same order as the input.
    pub centroids: Array2<F>,
    /// For every centroid, the observations assigned to it, in dataset order.
    pub clusters: Vec<Array2<F>>,
    /// For every observation, the index of the centroid it was assigned to.
    pub memberships: Array1<usize>,
    /// Sum of the squared distances between each observation and its assigned centroid.
    pub inertia: F,
}

/// Performs one assignment and update pass over `observations`, with shape
/// `(n_observations, n_features)`, starting from `centroids`, with shape
/// `(n_centroids, n_features)`.
///
/// The computation is deterministic and does not modify its inputs. A centroid which attracts no
/// observation keeps its previous position. Without any centroid there is nothing to assign to,
/// and an empty `Step` is returned.
///
/// ```
/// use lloyd_clustering::step;
/// use ndarray::array;
///
/// let observations = array![[0., 0.], [0., 1.], [10., 10.], [10., 11.]];
/// let centroids = array![[0., 0.], [10., 10.]];
///
/// let step = step(&observations, &centroids);
/// assert_eq!(step.centroids, array![[0., 0.5], [10., 10.5]]);
/// assert_eq!(step.clusters[0], array![[0., 0.], [0., 1.]]);
/// assert_eq!(step.clusters[1], array![[10., 10.], [10., 11.]]);
/// ```
pub fn step<F: Float>(
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Step<F> {
    let n_clusters = centroids.nrows();
    if n_clusters == 0 {
        return Step {
            centroids: centroids.to_owned(),
            clusters: Vec::new(),
            memberships: Array1::zeros(0),
            inertia: F::zero(),
        };
    }

    let n_samples = observations.nrows();
    let mut memberships = Array1::zeros(n_samples);
    let mut dists = Array1::zeros(n_samples);
    update_memberships_and_dists(centroids, observations, &mut memberships, &mut dists);

    Step {
        centroids: compute_centroids(centroids, observations, &memberships),
        clusters: group_observations(n_clusters, observations, &memberships),
        memberships,
        inertia: dists.sum(),
    }
}

/// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
/// returns, for each observation, the index of the closest centroid.
///
/// Returns an empty array if there are no centroids.
pub fn memberships<F: Float>(
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array1<usize> {
    if centroids.nrows() == 0 {
        return Array1::zeros(0);
    }
    let mut memberships = Array1::zeros(observations.nrows());
    Zip::from(observations.rows())
        .and(&mut memberships)
        .for_each(|observation, membership| {
            *membership = closest_centroid(centroids, &observation).0
        });
    memberships
}

/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster.
fn compute_centroids<F: Float>(
    // (n_centroids, n_features)
    old_centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut centroids = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut centroid = centroids.row_mut(cluster_membership);
            centroid += &observation;
            counts[cluster_membership] += 1;
        });

    Zip::from(centroids.rows_mut())
        .and(old_centroids.rows())
        .and(&counts)
        .for_each(|mut centroid, old_centroid, &cnt| {
            if cnt == 0 {
                centroid.assign(&old_centroid);
            } else {
                centroid /= F::cast(cnt);
            }
        });
    centroids
}

/// Splits `observations` into one matrix per cluster, preserving the dataset order.
fn group_observations<F: Float>(
    n_clusters: usize,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Vec<Array2<F>> {
    let mut counts = vec![0; n_clusters];
    cluster_memberships.iter().for_each(|&c| counts[c] += 1);

    let mut clusters = counts
        .iter()
        .map(|&cnt| Array2::zeros((cnt, observations.ncols())))
        .collect::<Vec<_>>();
    let mut filled = vec![0; n_clusters];
    for (observation, &c) in observations.rows().into_iter().zip(cluster_memberships.iter()) {
        clusters[c].row_mut(filled[c]).assign(&observation);
        filled[c] += 1;
    }
    clusters
}

// Efficient combination of the membership and the squared distance to the closest centroid.
fn update_memberships_and_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.rows())
        .and(cluster_memberships)
        .and(dists)
        .for_each(|observation, cluster_membership, dist| {
            let (m, d) = closest_centroid(centroids, &observation);
            *cluster_membership = m;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// and the squared distance to it.
///
/// On a tie the centroid with the lowest index wins. `centroids` must not be empty.
pub(crate) fn closest_centroid<F: Float>(
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) =
        (0, sq_euclidean(&first_centroid, observation));

    for (centroid_index, centroid) in centroids.rows().into_iter().enumerate().skip(1) {
        let distance = sq_euclidean(&centroid, observation);
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

/// Squared euclidean distance. Ordering by it is the same as ordering by the euclidean distance.
pub(crate) fn sq_euclidean<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix1>,
    b: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}
