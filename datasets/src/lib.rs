//! `lloyd-datasets` generates the point sets clustered by the `lloyd` engine.
//!
//! ## The Big Picture
//!
//! The interactive front-end displays points on a fixed square plane spanning
//! [`PLANE_MIN`]..=[`PLANE_MAX`] on both axes and asks for a fresh random dataset every time the
//! user wants to start over. This crate owns that generator, together with a blob generator
//! which is handy for tests and benchmarks that need well separated clusters.
//!
//! Every generator takes the random number generator as an argument, so that a seeded generator
//! reproduces the same dataset.
//!
//! ```
//! use lloyd_datasets::{generate_dataset, PLANE_MAX, PLANE_MIN};
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let mut rng = Xoshiro256Plus::seed_from_u64(42);
//! let records = generate_dataset(100, &mut rng);
//! assert_eq!(records.dim(), (100, 2));
//! assert!(records
//!     .iter()
//!     .all(|&v| v >= PLANE_MIN as f64 && v <= PLANE_MAX as f64));
//! ```

pub mod generate;

pub use generate::{blobs, generate_dataset, generate_points};

/// Lower bound of both axes of the displayed plane.
pub const PLANE_MIN: i32 = -10;
/// Upper bound of both axes of the displayed plane.
pub const PLANE_MAX: i32 = 10;
/// Size of the dataset the front-end generates when none is requested explicitly.
pub const DEFAULT_DATASET_SIZE: usize = 100;
