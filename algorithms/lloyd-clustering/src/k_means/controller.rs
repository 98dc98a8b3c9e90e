use crate::k_means::algorithm::{memberships, step, Step};
use crate::k_means::hyperparams::{GroupingRefresh, KMeansParams, KMeansValidParams};
use crate::k_means::init::{initialize, InitStrategy};
use crate::KMeansError;
use lloyd::{check_planar, points, traits::Fit, Float, Point};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix2};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Step-wise K-means clustering over points in the plane.
///
/// K-means partitions a set of observations into clusters, where each observation belongs to
/// the cluster with the nearest mean. The mean of the points within a cluster is called
/// *centroid*.
///
/// The algorithm implemented here is the _standard algorithm_ (also known as Lloyd's Algorithm),
/// driven one step at a time so that every intermediate state can be displayed:
/// - initialisation step: select initial centroids using one of the [strategies](InitStrategy),
///   or place them by hand;
/// - assignment step: assign each observation to the nearest centroid;
/// - update step: move each centroid to the mean of its observations. A centroid without any
///   observation stays where it is.
///
/// Assignment and update are repeated until a step leaves every centroid exactly where it was,
/// or until `max_n_iterations` steps have been taken by a single
/// [`run_to_convergence`](RunController::run_to_convergence), in which case the run is declared
/// converged anyway.
///
/// ## Tutorial
///
/// ```
/// use lloyd::ParamGuard;
/// use lloyd_clustering::{InitStrategy, KMeans, RunController, RunStatus};
/// use ndarray::array;
///
/// let records = array![[0., 0.], [0., 1.], [10., 10.], [10., 11.]];
/// let params = KMeans::params(2)
///     .init_method(InitStrategy::FarthestFirst)
///     .check()
///     .expect("valid hyperparameters");
/// let mut run = RunController::new(params, records).expect("planar records");
///
/// assert_eq!(run.initialize_clusters(), RunStatus::Running);
/// run.run_to_convergence();
/// assert!(run.is_converged());
///
/// let mut centroids = run.centroid_points();
/// centroids.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
/// assert_eq!(centroids[0].y, 0.5);
/// assert_eq!(centroids[1].y, 10.5);
/// ```
pub struct KMeans;

impl KMeans {
    /// Configures a run looking for `n_clusters`, seeded for reproducibility.
    pub fn params(n_clusters: usize) -> KMeansParams<Xoshiro256Plus> {
        KMeansParams::new(n_clusters, Xoshiro256Plus::seed_from_u64(42))
    }

    /// Configures a run looking for `n_clusters`, drawing randomness from `rng`.
    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> KMeansParams<R> {
        KMeansParams::new(n_clusters, rng)
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where a run stands.
pub enum RunStatus {
    /// No centroids yet.
    Uninitialized,
    /// Centroids are set and steps may still move them.
    Running,
    /// Steps no longer change anything.
    Converged,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Everything a front-end needs to display a run, besides the dataset itself.
pub struct RunState<F> {
    centroids: Array2<F>,
    clusters: Vec<Array2<F>>,
    iteration_count: u64,
    converged: bool,
    inertia: Option<F>,
    placed_by_hand: bool,
}

impl<F: Float> RunState<F> {
    fn empty(n_features: usize) -> Self {
        RunState {
            centroids: Array2::zeros((0, n_features)),
            clusters: Vec::new(),
            iteration_count: 0,
            converged: false,
            inertia: None,
            placed_by_hand: false,
        }
    }

    /// Current centroids with shape `(n_centroids, 2)`; empty before initialisation.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Displayed grouping, one matrix of points per centroid.
    pub fn clusters(&self) -> &[Array2<F>] {
        &self.clusters
    }

    /// Number of steps taken since initialisation.
    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Sum of squared distances to the assigned centroids, as measured by the latest step.
    pub fn inertia(&self) -> Option<F> {
        self.inertia
    }

    pub fn status(&self) -> RunStatus {
        if self.converged {
            RunStatus::Converged
        } else if self.centroids.nrows() == 0 {
            RunStatus::Uninitialized
        } else {
            RunStatus::Running
        }
    }
}

/// Owns a dataset and the state of the K-means run over it.
///
/// All mutations go through the actions below, each of which runs to completion before
/// returning. Replacing the dataset or changing the number of clusters or the initialization
/// strategy discards the current run.
pub struct RunController<F: Float, R: Rng> {
    records: Array2<F>,
    params: KMeansValidParams<R>,
    state: RunState<F>,
}

impl<F: Float, R: Rng> RunController<F, R> {
    /// Creates an uninitialized run over `records`, with shape `(n_points, 2)`.
    pub fn new(params: KMeansValidParams<R>, records: Array2<F>) -> Result<Self, KMeansError> {
        check_planar(&records)?;
        let state = RunState::empty(records.ncols());
        Ok(RunController {
            records,
            params,
            state,
        })
    }

    /// Selects initial centroids with the configured strategy and starts a new run.
    ///
    /// Any previous run is discarded. If the strategy yields no centroid (no points, no
    /// clusters requested or [`InitStrategy::Manual`]) the run stays uninitialized.
    pub fn initialize_clusters(&mut self) -> RunStatus {
        self.state = RunState::empty(self.records.ncols());
        let centroids = initialize(
            &self.records,
            self.params.n_clusters(),
            self.params.init_method(),
            self.params.rng_mut(),
        );
        if centroids.nrows() > 0 {
            info!(
                "initialized {} centroids with {}",
                centroids.nrows(),
                self.params.init_method()
            );
            self.start(centroids);
        } else {
            debug!(
                "{} produced no centroids for {} points",
                self.params.init_method(),
                self.records.nrows()
            );
        }
        self.status()
    }

    /// Performs one assignment and update step.
    ///
    /// Does nothing unless the run is [`RunStatus::Running`]. The run converges when the step
    /// leaves every centroid exactly where it was.
    pub fn step_once(&mut self) -> RunStatus {
        if self.status() != RunStatus::Running {
            return self.status();
        }

        let Step {
            centroids,
            clusters,
            inertia,
            ..
        } = step(&self.records, &self.state.centroids);

        let first_step = self.state.iteration_count == 0;
        if first_step || self.params.grouping() == GroupingRefresh::EveryStep {
            self.state.clusters = clusters;
        }
        self.state.iteration_count += 1;
        self.state.inertia = Some(inertia);

        let unchanged = centroids == self.state.centroids;
        self.state.centroids = centroids;
        debug!("step {}: inertia {}", self.state.iteration_count, inertia);
        if unchanged {
            info!("converged after {} steps", self.state.iteration_count);
            self.state.converged = true;
        }
        self.status()
    }

    /// Steps until the run converges, taking at most `max_n_iterations` steps.
    ///
    /// A run that is still moving once the cap is reached is declared converged anyway. Returns
    /// the number of steps taken by this call.
    pub fn run_to_convergence(&mut self) -> u64 {
        let mut n_steps = 0;
        while self.status() == RunStatus::Running && n_steps < self.params.max_n_iterations() {
            self.step_once();
            n_steps += 1;
        }
        if self.status() == RunStatus::Running {
            info!(
                "stopping after {} steps without convergence, declaring the run converged",
                n_steps
            );
            self.state.converged = true;
        }
        n_steps
    }

    /// Discards the current run. The dataset is kept.
    pub fn reset(&mut self) {
        self.state = RunState::empty(self.records.ncols());
    }

    /// Replaces the dataset and discards the current run.
    pub fn new_dataset(&mut self, records: Array2<F>) -> Result<(), KMeansError> {
        check_planar(&records)?;
        self.records = records;
        self.reset();
        Ok(())
    }

    /// Adds a hand-placed centroid, as done with [`InitStrategy::Manual`].
    ///
    /// Centroids can be placed until the first step is taken, and only on a run that is
    /// uninitialized or whose centroids were all placed by hand.
    pub fn place_centroid(&mut self, centroid: Point<F>) -> Result<RunStatus, KMeansError> {
        self.ensure_not_stepped()?;
        if self.status() == RunStatus::Running && !self.state.placed_by_hand {
            return Err(KMeansError::CentroidsFromStrategy(
                self.params.init_method().to_string(),
            ));
        }
        self.state.placed_by_hand = true;
        self.state
            .centroids
            .push_row(centroid.to_array().view())
            .map_err(lloyd::Error::from)?;
        self.state
            .clusters
            .push(Array2::zeros((0, self.records.ncols())));
        Ok(self.status())
    }

    /// Replaces all centroids by hand-placed ones, with shape `(n_centroids, 2)`.
    ///
    /// Centroids can be placed until the first step is taken. An empty matrix leaves the run
    /// uninitialized.
    pub fn set_centroids(&mut self, centroids: Array2<F>) -> Result<RunStatus, KMeansError> {
        check_planar(&centroids)?;
        self.ensure_not_stepped()?;
        self.reset();
        if centroids.nrows() > 0 {
            self.start(centroids);
            self.state.placed_by_hand = true;
        }
        Ok(self.status())
    }

    /// Changes the number of clusters of the next initialisation and discards the current run.
    pub fn set_n_clusters(&mut self, n_clusters: usize) {
        self.params.set_n_clusters(n_clusters);
        self.reset();
    }

    /// Changes the strategy of the next initialisation and discards the current run.
    pub fn set_init_method(&mut self, init: InitStrategy) {
        self.params.set_init_method(init);
        self.reset();
    }

    /// The dataset, with shape `(n_points, 2)`.
    pub fn records(&self) -> &Array2<F> {
        &self.records
    }

    pub fn records_view(&self) -> ArrayView2<'_, F> {
        self.records.view()
    }

    /// The dataset as points.
    pub fn points(&self) -> impl Iterator<Item = Point<F>> + '_ {
        points(self.records.view())
    }

    pub fn centroids(&self) -> &Array2<F> {
        self.state.centroids()
    }

    pub fn centroid_points(&self) -> Vec<Point<F>> {
        points(self.state.centroids.view()).collect()
    }

    pub fn clusters(&self) -> &[Array2<F>] {
        self.state.clusters()
    }

    pub fn iteration_count(&self) -> u64 {
        self.state.iteration_count()
    }

    pub fn is_converged(&self) -> bool {
        self.state.is_converged()
    }

    pub fn status(&self) -> RunStatus {
        self.state.status()
    }

    pub fn inertia(&self) -> Option<F> {
        self.state.inertia()
    }

    pub fn state(&self) -> &RunState<F> {
        &self.state
    }

    pub fn params(&self) -> &KMeansValidParams<R> {
        &self.params
    }

    /// For every point of the dataset, the index of the closest current centroid. Computed on
    /// demand so that it always matches the centroids; empty before initialisation.
    pub fn memberships(&self) -> Array1<usize> {
        memberships(&self.records, &self.state.centroids)
    }

    fn start(&mut self, centroids: Array2<F>) {
        self.state.clusters = (0..centroids.nrows())
            .map(|_| Array2::zeros((0, self.records.ncols())))
            .collect();
        self.state.centroids = centroids;
    }

    fn ensure_not_stepped(&self) -> Result<(), KMeansError> {
        if self.state.iteration_count > 0 || self.state.converged {
            Err(KMeansError::CentroidsAfterStep)
        } else {
            Ok(())
        }
    }
}

impl<F: Float, R: Rng + Clone, D: Data<Elem = F>> Fit<ArrayBase<D, Ix2>, KMeansError>
    for KMeansValidParams<R>
{
    type Object = RunController<F, R>;

    /// Initializes a run over `records` and steps it to convergence.
    fn fit(&self, records: &ArrayBase<D, Ix2>) -> Result<Self::Object, KMeansError> {
        let mut run = RunController::new(self.clone(), records.to_owned())?;
        run.initialize_clusters();
        run.run_to_convergence();
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KMeansParamsError;
    use approx::assert_abs_diff_eq;
    use lloyd::ParamGuard;
    use ndarray::array;

    fn two_blobs() -> Array2<f64> {
        array![[0., 0.], [0., 1.], [10., 10.], [10., 11.]]
    }

    fn controller(params: KMeansParams<Xoshiro256Plus>) -> RunController<f64, Xoshiro256Plus> {
        RunController::new(params.check_unwrap(), two_blobs()).unwrap()
    }

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<RunController<f64, Xoshiro256Plus>>();
        has_autotraits::<RunState<f64>>();
        has_autotraits::<RunStatus>();
    }

    #[test]
    fn starts_uninitialized() {
        let run = controller(KMeans::params(2));
        assert_eq!(run.status(), RunStatus::Uninitialized);
        assert_eq!(run.centroids().dim(), (0, 2));
        assert!(run.clusters().is_empty());
        assert!(run.memberships().is_empty());
        assert_eq!(run.inertia(), None);
        assert_eq!(run.points().count(), 4);
    }

    #[test]
    fn rejects_non_planar_records() {
        let params = KMeans::params(2).check_unwrap();
        let res = RunController::new(params, array![[1., 2., 3.]]);
        assert!(matches!(
            res,
            Err(KMeansError::LloydError(lloyd::Error::NotPlanar(3)))
        ));
    }

    #[test]
    fn manually_placed_centroids_step_like_initialized_ones() {
        let mut run = controller(KMeans::params(2).init_method(InitStrategy::Manual));
        assert_eq!(run.initialize_clusters(), RunStatus::Uninitialized);

        assert_eq!(
            run.place_centroid(Point::new(0., 0.)).unwrap(),
            RunStatus::Running
        );
        run.place_centroid(Point::new(10., 10.)).unwrap();
        assert_eq!(run.clusters().len(), 2);

        assert_eq!(run.step_once(), RunStatus::Running);
        assert_eq!(run.centroids(), &array![[0., 0.5], [10., 10.5]]);
        assert_eq!(run.clusters()[0], array![[0., 0.], [0., 1.]]);
        assert_eq!(run.clusters()[1], array![[10., 10.], [10., 11.]]);
        assert_abs_diff_eq!(run.inertia().unwrap(), 2.0);

        assert_eq!(run.step_once(), RunStatus::Converged);
        assert_eq!(run.iteration_count(), 2);
        assert_eq!(run.memberships(), array![0, 0, 1, 1]);

        assert!(matches!(
            run.place_centroid(Point::new(5., 5.)),
            Err(KMeansError::CentroidsAfterStep)
        ));
    }

    #[test]
    fn strategy_centroids_cannot_be_extended_by_hand() {
        let mut run = controller(KMeans::params(2).init_method(InitStrategy::FarthestFirst));
        run.initialize_clusters();
        assert!(matches!(
            run.place_centroid(Point::new(5., 5.)),
            Err(KMeansError::CentroidsFromStrategy(name)) if name == "Farthest-First"
        ));
        assert_eq!(run.centroids().nrows(), 2);
        assert_eq!(run.clusters().len(), 2);

        run.step_once();
        assert_eq!(run.centroids().nrows(), 2);

        // hand-placed runs keep accepting centroids until they step
        run.set_centroids(array![[0., 0.]]).unwrap_err();
        run.reset();
        run.set_centroids(array![[0., 0.]]).unwrap();
        run.place_centroid(Point::new(10., 10.)).unwrap();
        assert_eq!(run.centroids().nrows(), 2);
    }

    #[test]
    fn set_centroids_replaces_the_initialization() {
        let mut run = controller(KMeans::params(2));
        run.initialize_clusters();
        run.set_centroids(array![[0., 0.], [10., 10.]]).unwrap();
        assert_eq!(run.centroid_points(), vec![Point::new(0., 0.), Point::new(10., 10.)]);

        assert_eq!(
            run.set_centroids(Array2::zeros((0, 2))).unwrap(),
            RunStatus::Uninitialized
        );
        assert!(matches!(
            run.set_centroids(array![[1.]]),
            Err(KMeansError::LloydError(lloyd::Error::NotPlanar(1)))
        ));
    }

    #[test]
    fn converged_runs_ignore_steps() {
        let mut run = controller(KMeans::params(2));
        run.set_centroids(array![[0., 0.], [10., 10.]]).unwrap();
        run.run_to_convergence();
        assert_eq!(run.status(), RunStatus::Converged);

        let state = run.state().clone();
        assert_eq!(run.step_once(), RunStatus::Converged);
        assert_eq!(run.run_to_convergence(), 0);
        assert_eq!(run.state(), &state);
    }

    #[test]
    fn first_step_only_freezes_the_grouping() {
        // The first assignment puts (4, 0) with the left centroid, the second one moves it
        let records = array![[-10., 0.], [4., 0.], [6., 0.]];
        for (grouping, expected) in [
            (GroupingRefresh::EveryStep, array![[-10., 0.]]),
            (GroupingRefresh::FirstStepOnly, array![[-10., 0.], [4., 0.]]),
        ]
        .iter()
        {
            let params = KMeans::params(2).grouping(*grouping).check_unwrap();
            let mut run = RunController::new(params, records.clone()).unwrap();
            run.set_centroids(array![[0., 0.], [10., 0.]]).unwrap();
            run.step_once();
            assert_eq!(run.clusters()[0], array![[-10., 0.], [4., 0.]]);
            run.step_once();
            assert_eq!(&run.clusters()[0], expected, "{:?}", grouping);
        }
    }

    #[test]
    fn reconfiguring_resets_the_run() {
        let mut run = controller(KMeans::params(2));
        run.initialize_clusters();
        run.step_once();

        run.set_n_clusters(3);
        assert_eq!(run.status(), RunStatus::Uninitialized);
        assert_eq!(run.initialize_clusters(), RunStatus::Running);
        assert_eq!(run.centroids().nrows(), 3);

        run.set_init_method(InitStrategy::KMeansPlusPlus);
        assert_eq!(run.status(), RunStatus::Uninitialized);
        assert_eq!(run.params().init_method(), InitStrategy::KMeansPlusPlus);
    }

    #[test]
    fn fit_runs_to_convergence() {
        let run = KMeans::params(2)
            .init_method(InitStrategy::FarthestFirst)
            .fit(&two_blobs())
            .unwrap();
        assert!(run.is_converged());
        assert_eq!(run.centroids().nrows(), 2);
        assert_eq!(run.records_view(), two_blobs());

        let res = KMeans::params(2).max_n_iterations(0).fit(&two_blobs());
        assert!(matches!(
            res,
            Err(KMeansError::InvalidParams(KMeansParamsError::MaxIterations))
        ));
    }
}
