use std::fmt;
use std::str::FromStr;

use super::algorithm::sq_euclidean;
use crate::KMeansError;
use lloyd::Float;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2, Zip};
use ndarray_rand::rand;
use ndarray_rand::rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Specifies centroid initialization algorithm for k-means.
pub enum InitStrategy {
    /// Pick `n_clusters` distinct points uniformly at random.
    Random,
    /// Pick one point at random, then repeatedly the point farthest away from every centroid
    /// chosen so far (Gonzalez' greedy heuristic).
    FarthestFirst,
    /// Pick one point at random, then sample the following centroids with a probability
    /// proportional to their distance from the closest centroid chosen so far.
    KMeansPlusPlus,
    /// Leave the centroids to the caller, who places them by hand.
    Manual,
}

impl InitStrategy {
    /// Every strategy, in the order a front-end lists them.
    pub const ALL: [InitStrategy; 4] = [
        InitStrategy::Random,
        InitStrategy::FarthestFirst,
        InitStrategy::KMeansPlusPlus,
        InitStrategy::Manual,
    ];

    /// The name a front-end uses for the strategy. [`FromStr`] accepts exactly these names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::FarthestFirst => "Farthest-First",
            Self::KMeansPlusPlus => "KMeans++",
            Self::Manual => "Manual",
        }
    }

    /// Runs the initialization algorithm. `n_clusters` must lie in `1..=observations.nrows()`.
    pub(crate) fn run<F: Float>(
        &self,
        n_clusters: usize,
        observations: &ArrayView2<F>,
        rng: &mut impl Rng,
    ) -> Array2<F> {
        match self {
            Self::Random => random_init(n_clusters, observations, rng),
            Self::FarthestFirst => farthest_first(n_clusters, observations, rng),
            Self::KMeansPlusPlus => k_means_pp(n_clusters, observations, rng),
            Self::Manual => Array2::zeros((0, observations.ncols())),
        }
    }
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitStrategy {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|strategy| strategy.name() == s)
            .copied()
            .ok_or_else(|| KMeansError::UnknownStrategy(s.to_string()))
    }
}

/// Selects the initial centroids of a run.
///
/// Returns a matrix with shape `(n_centroids, n_features)`, where every row is a copy of one of
/// the observations. The matrix is empty when there are no observations, when `n_clusters` is
/// zero or when the strategy is [`InitStrategy::Manual`].
///
/// `n_clusters` is clamped to the number of observations. `FarthestFirst` and `KMeansPlusPlus`
/// additionally stop early once every observation coincides with an already chosen centroid, so
/// they never pick the same location twice.
pub fn initialize<F: Float>(
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    n_clusters: usize,
    strategy: InitStrategy,
    rng: &mut impl Rng,
) -> Array2<F> {
    let n_samples = observations.nrows();
    if n_samples == 0 || n_clusters == 0 {
        return Array2::zeros((0, observations.ncols()));
    }

    let n_clusters = if n_clusters > n_samples {
        warn!(
            "requested {} clusters but only {} points are available, using {}",
            n_clusters, n_samples, n_samples
        );
        n_samples
    } else {
        n_clusters
    };

    strategy.run(n_clusters, &observations.view(), rng)
}

/// Same as [`initialize`], with the strategy given by its front-end name.
///
/// An unknown name never fails: it is logged and yields no centroids.
pub fn initialize_named<F: Float>(
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    n_clusters: usize,
    strategy: &str,
    rng: &mut impl Rng,
) -> Array2<F> {
    match strategy.parse::<InitStrategy>() {
        Ok(strategy) => initialize(observations, n_clusters, strategy, rng),
        Err(err) => {
            warn!("{}, no centroids initialized", err);
            Array2::zeros((0, observations.ncols()))
        }
    }
}

fn random_init<F: Float>(
    n_clusters: usize,
    observations: &ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    observations.select(Axis(0), &indices)
}

fn farthest_first<F: Float>(
    n_clusters: usize,
    observations: &ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let n_samples = observations.nrows();
    let mut latest = rng.gen_range(0..n_samples);
    let mut chosen = vec![latest];

    let mut dists = Array1::from_elem(n_samples, F::infinity());
    while chosen.len() < n_clusters {
        update_min_dists(&observations.row(latest), observations, &mut dists);

        // strict comparison keeps the first of several equally distant points
        let (farthest, max_dist) = dists
            .iter()
            .enumerate()
            .fold((0, F::neg_infinity()), |(best, best_dist), (idx, &dist)| {
                if dist > best_dist {
                    (idx, dist)
                } else {
                    (best, best_dist)
                }
            });
        if max_dist <= F::zero() {
            debug!(
                "farthest-first ran out of distinct points after {} centroids",
                chosen.len()
            );
            break;
        }
        latest = farthest;
        chosen.push(latest);
    }
    observations.select(Axis(0), &chosen)
}

fn k_means_pp<F: Float>(
    n_clusters: usize,
    observations: &ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let n_samples = observations.nrows();
    let mut latest = rng.gen_range(0..n_samples);
    let mut chosen = vec![latest];

    let mut dists = Array1::from_elem(n_samples, F::infinity());
    while chosen.len() < n_clusters {
        update_min_dists(&observations.row(latest), observations, &mut dists);

        let total = dists.sum();
        if total <= F::zero() {
            debug!(
                "k-means++ ran out of distinct points after {} centroids",
                chosen.len()
            );
            break;
        }
        let target = rng.gen_range(F::zero()..F::one()) * total;
        latest = cumulative_pick(&dists, target);
        chosen.push(latest);
    }
    observations.select(Axis(0), &chosen)
}

/// Index of the first positive weight at which the running sum of `weights` reaches `target`.
///
/// Rounding can leave the full sum marginally below `target`, in which case the last positive
/// weight is returned.
fn cumulative_pick<F: Float>(weights: &Array1<F>, target: F) -> usize {
    let mut cumulative = F::zero();
    let mut last_positive = 0;
    for (idx, &weight) in weights.iter().enumerate() {
        if weight <= F::zero() {
            continue;
        }
        cumulative += weight;
        last_positive = idx;
        if cumulative >= target {
            return idx;
        }
    }
    last_positive
}

/// Lowers every entry of `dists` to the euclidean distance between the matching observation and
/// `centroid`, if that is closer.
fn update_min_dists<F: Float>(
    centroid: &ArrayView1<F>,
    observations: &ArrayView2<F>,
    dists: &mut Array1<F>,
) {
    Zip::from(observations.rows())
        .and(dists)
        .for_each(|observation, dist| {
            let d = sq_euclidean(&observation, centroid).sqrt();
            if d < *dist {
                *dist = d;
            }
        });
}
