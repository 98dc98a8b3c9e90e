use thiserror::Error;

/// An error when checking the hyperparameters of a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansParamsError {
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when driving a K-means run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When an initialization strategy is requested by a name we do not know
    #[error("unknown initialization strategy `{0}`")]
    UnknownStrategy(String),
    /// Centroids can only be placed by hand before the first step has been taken
    #[error("centroids cannot be placed once the run has started stepping")]
    CentroidsAfterStep,
    /// Centroids chosen by an initialization strategy cannot be added to by hand
    #[error("the run was initialized with {0}, centroids cannot be added by hand")]
    CentroidsFromStrategy(String),
    #[error(transparent)]
    LloydError(#[from] lloyd::error::Error),
}
