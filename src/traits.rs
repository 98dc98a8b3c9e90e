//! Provide traits for the algorithms built on top of `lloyd`
//!

use std::error::Error;

/// Fittable algorithms
///
/// A fittable algorithm takes a record matrix and returns a model which summarises what it
/// learned about the records. The hyperparameters of the algorithm are stored in the
/// implementing type, and the random source (if any) is cloned from them so that the
/// hyperparameters can be fitted again with the same outcome.
pub trait Fit<R, E: Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, records: &R) -> Result<Self::Object, E>;
}
