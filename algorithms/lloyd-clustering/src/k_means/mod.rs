mod algorithm;
mod controller;
mod errors;
mod hyperparams;
mod init;

pub use algorithm::*;
pub use controller::*;
pub use errors::*;
pub use hyperparams::*;
pub use init::*;
