use crate::KMeansParamsError;

use super::init::InitStrategy;
use lloyd::ParamGuard;
use ndarray_rand::rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which assignment the [run controller](crate::RunController) keeps as the displayed grouping.
pub enum GroupingRefresh {
    /// Replace the grouping after every step, so it always matches the latest assignment.
    EveryStep,
    /// Keep the grouping computed by the first step of the run and leave it untouched by the
    /// following steps.
    FirstStepOnly,
}

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for a [K-means run](crate::RunController).
pub struct KMeansValidParams<R: Rng> {
    /// The number of clusters we will be looking for in the dataset.
    n_clusters: usize,
    /// The initialization strategy used to initialize the centroids.
    init: InitStrategy,
    /// `run_to_convergence` stops after `max_n_iterations` steps and declares the run converged
    /// even if the centroids are still moving.
    max_n_iterations: u64,
    /// Which assignment is kept as the displayed grouping.
    grouping: GroupingRefresh,
    /// The random number generator
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](KMeansValidParams) for
/// a [K-means run](crate::RunController) (using the builder pattern).
pub struct KMeansParams<R: Rng>(KMeansValidParams<R>);

impl<R: Rng> KMeansParams<R> {
    /// `new` lets us configure our run:
    /// * we will be looking for `n_clusters` in the dataset;
    /// * `rng` is the only source of randomness of the run, it is used by the initialization
    ///   strategies.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `init = Random`
    /// * `max_n_iterations = 25`
    /// * `grouping = EveryStep`
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(KMeansValidParams {
            n_clusters,
            init: InitStrategy::Random,
            max_n_iterations: 25,
            grouping: GroupingRefresh::EveryStep,
            rng,
        })
    }

    /// Change the value of `n_clusters`
    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.0.n_clusters = n_clusters;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: InitStrategy) -> Self {
        self.0.init = init;
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `grouping`
    pub fn grouping(mut self, grouping: GroupingRefresh) -> Self {
        self.0.grouping = grouping;
        self
    }
}

impl<R: Rng> ParamGuard for KMeansParams<R> {
    type Checked = KMeansValidParams<R>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.max_n_iterations == 0 {
            Err(KMeansParamsError::MaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<R: Rng> KMeansValidParams<R> {
    /// The number of clusters we will be looking for in the dataset.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Cluster initialization strategy
    pub fn init_method(&self) -> InitStrategy {
        self.init
    }

    /// Maximum number of steps taken by a single `run_to_convergence`.
    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// Which assignment is kept as the displayed grouping.
    pub fn grouping(&self) -> GroupingRefresh {
        self.grouping
    }

    /// Returns the random generator
    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub(crate) fn set_n_clusters(&mut self, n_clusters: usize) {
        self.n_clusters = n_clusters;
    }

    pub(crate) fn set_init_method(&mut self, init: InitStrategy) {
        self.init = init;
    }
}
