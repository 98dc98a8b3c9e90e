//! `lloyd` provides the shared building blocks of a step-wise K-Means engine
//! for points in the plane.
//!
//! ## The big picture
//!
//! The workspace is split the same way the engine is used by an interactive
//! front-end:
//!
//! * `lloyd` (this crate) holds the numeric [`Float`] abstraction, the [`Point`] value type,
//!   helpers to move between points and `(n, 2)` record matrices, the error type and the
//!   [`ParamGuard`] trait used to validate hyper-parameters;
//! * `lloyd-clustering` implements centroid initialisation, the assignment/update step and the
//!   run controller that drives a clustering to convergence one step at a time;
//! * `lloyd-datasets` produces the random point sets the front-end displays.
//!
//! Records are stored as `ndarray` matrices with shape `(n_points, 2)`: column `0` holds the
//! `x` coordinate and column `1` the `y` coordinate.

pub mod error;
mod float;
mod param_guard;
mod point;
pub mod prelude;
pub mod traits;

pub use error::{Error, Result};
pub use float::Float;
pub use param_guard::ParamGuard;
pub use point::{check_planar, points, records_from_points, Point};
