//! `lloyd-clustering` implements K-Means over points in the plane, one step at a time.
//!
//! ## The big picture
//!
//! `lloyd-clustering` is the engine behind an interactive K-Means visualisation. A front-end owns
//! the dataset, lets the user pick the number of clusters and an initialization strategy, and
//! then either steps through the algorithm or runs it to convergence, rendering the points and
//! centroids after every action.
//!
//! ## Current state
//!
//! The crate provides three layers, usable on their own:
//! * [`initialize`]: centroid initialization with the [`InitStrategy::Random`],
//!   [`InitStrategy::FarthestFirst`] and [`InitStrategy::KMeansPlusPlus`] strategies, plus the
//!   [`InitStrategy::Manual`] placeholder for hand-placed centroids;
//! * [`step`]: a single, pure iteration of Lloyd's algorithm;
//! * [`RunController`]: the state machine which owns a dataset and a [`RunState`], and exposes
//!   the actions a front-end triggers.
//!
//! All randomness comes from the random number generator handed to the hyperparameters (or to
//! [`initialize`]), so a seeded generator reproduces a run exactly.
mod k_means;

pub use k_means::*;
