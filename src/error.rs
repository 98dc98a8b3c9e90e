//! Error types in lloyd
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("records must have exactly 2 columns (x, y), found {0}")]
    NotPlanar(usize),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
